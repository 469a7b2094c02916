use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::{Json, Router};
use tracing::debug;

use crate::config::{SiteConfig, Track};
use crate::event::{parse_date_key, EventContext, EventError};
use crate::{gcal, ics, page};

pub type SharedConfig = Arc<SiteConfig>;

pub fn router(config: SharedConfig) -> Router {
    Router::new()
        .route("/", get(handle_page))
        .route("/health", get(handle_health))
        .route("/schedule.json", get(handle_schedule))
        .route("/calendar/:track/:key", get(handle_ics))
        .route("/calendar/:track/:key/google", get(handle_google))
        .fallback(|| async { Redirect::permanent("/") })
        .with_state(config)
}

async fn handle_page(State(config): State<SharedConfig>) -> Response {
    match page::render(&config) {
        Ok(html) => Html(html).into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    }
}

async fn handle_health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

async fn handle_schedule(State(config): State<SharedConfig>) -> Response {
    Json(&config.tracks).into_response()
}

async fn handle_ics(
    State(config): State<SharedConfig>,
    Path((track_id, key)): Path<(String, String)>,
) -> Response {
    let key = key.trim_end_matches(".ics");
    let (track, event) = match resolve_session(&config, &track_id, key) {
        Ok(found) => found,
        Err(response) => return response,
    };

    let (payload, filename) = match serialize_event(&config, &event) {
        Ok(serialized) => serialized,
        Err(err) => return (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    };

    debug!(track = %track.id, key, "serving calendar file");

    (
        [
            (
                header::CONTENT_TYPE,
                "text/calendar; charset=utf-8".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        payload,
    )
        .into_response()
}

async fn handle_google(
    State(config): State<SharedConfig>,
    Path((track_id, key)): Path<(String, String)>,
) -> Response {
    let (_, event) = match resolve_session(&config, &track_id, &key) {
        Ok(found) => found,
        Err(response) => return response,
    };

    match gcal::event_url(&config.calendar, &event) {
        Ok(url) => Redirect::temporary(&url).into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response(),
    }
}

fn serialize_event(
    config: &SiteConfig,
    event: &EventContext,
) -> Result<(String, String), EventError> {
    Ok((
        ics::event_ics(&config.calendar, event)?,
        ics::ics_filename(event)?,
    ))
}

fn resolve_session<'a>(
    config: &'a SiteConfig,
    track_id: &str,
    key: &str,
) -> Result<(&'a Track, EventContext), Response> {
    let Some(track) = config.track(track_id) else {
        return Err((StatusCode::NOT_FOUND, format!("unknown track {track_id}\n")).into_response());
    };

    let date = match parse_date_key(key) {
        Ok(date) => date,
        Err(err) => {
            debug!(track = %track.id, key, "rejected date key");
            return Err((StatusCode::NOT_FOUND, format!("{err}\n")).into_response());
        }
    };

    let Some(session) = track.session_on(date) else {
        return Err((
            StatusCode::NOT_FOUND,
            format!("no session on {date} for track {track_id}\n"),
        )
            .into_response());
    };

    Ok((
        track,
        EventContext::for_session(&config.calendar, track, session),
    ))
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    fn shared() -> SharedConfig {
        Arc::new(SiteConfig::load(None).unwrap())
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn serves_calendar_file_as_attachment() {
        let response = handle_ics(
            State(shared()),
            Path(("113".to_string(), "20250916.ics".to_string())),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/calendar; charset=utf-8"
        );
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"chm-113-quiz-1-review_20250916.ics\""
        );

        let body = body_string(response).await;
        assert!(body.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(body.contains("DTSTART;TZID=America/Phoenix:20250916T180000\r\n"));
    }

    #[tokio::test]
    async fn bare_date_key_works_without_extension() {
        let response = handle_ics(
            State(shared()),
            Path(("115".to_string(), "20250923".to_string())),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn redirects_to_google_calendar() {
        let config = shared();
        let response = handle_google(
            State(Arc::clone(&config)),
            Path(("113".to_string(), "20250916".to_string())),
        )
        .await;

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);

        let track = config.track("113").unwrap();
        let event = EventContext::for_session(&config.calendar, track, &track.sessions[0]);
        let expected = gcal::event_url(&config.calendar, &event).unwrap();
        assert_eq!(
            response.headers()[header::LOCATION].to_str().unwrap(),
            expected
        );
    }

    #[tokio::test]
    async fn unknown_lookups_are_not_found() {
        let cases = [
            ("116", "20250916.ics"),
            ("113", "2025-09-16.ics"),
            ("113", "20250917.ics"),
        ];

        for (track, key) in cases {
            let response = handle_ics(
                State(shared()),
                Path((track.to_string(), key.to_string())),
            )
            .await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{track}/{key}");
        }
    }

    #[tokio::test]
    async fn page_and_schedule_render() {
        let response = handle_page(State(shared())).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("GCU Chemistry Club"));

        let response = handle_schedule(State(shared())).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("\"CHM-113 • Quiz 1 Review\""));
    }
}
