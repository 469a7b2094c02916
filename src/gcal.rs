use url::form_urlencoded;

use crate::config::CalendarConfig;
use crate::event::{timestamp, EventContext, EventError};

const RENDER_URL: &str = "https://calendar.google.com/calendar/render";

/// Google Calendar pre-fill link for one event. Parameter names and order
/// are what the service expects; don't reorder them.
pub fn event_url(calendar: &CalendarConfig, event: &EventContext) -> Result<String, EventError> {
    let dates = format!(
        "{}/{}",
        timestamp(event.date, event.start)?,
        timestamp(event.date, event.end)?
    );

    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("action", "TEMPLATE")
        .append_pair("text", &event.title)
        .append_pair("details", &event.description)
        .append_pair("location", &event.location)
        .append_pair("dates", &dates)
        .append_pair("ctz", &calendar.tzid)
        .finish();

    Ok(format!("{RENDER_URL}?{query}"))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::config::SiteConfig;

    fn quiz_review() -> (SiteConfig, EventContext) {
        let config = SiteConfig::load(None).unwrap();
        let track = config.track("113").unwrap();
        let session = track
            .session_on(NaiveDate::from_ymd_opt(2025, 9, 16).unwrap())
            .unwrap();
        let event = EventContext::for_session(&config.calendar, track, session);
        (config, event)
    }

    #[test]
    fn builds_the_documented_link() {
        let (config, event) = quiz_review();
        let url = event_url(&config.calendar, &event).unwrap();

        assert_eq!(
            url,
            "https://calendar.google.com/calendar/render\
             ?action=TEMPLATE\
             &text=CHM-113+%E2%80%A2+Quiz+1+Review\
             &details=Chemistry+Club+review+session+%28Location%3A+Building+57+Room+130+%2857-130%29%29.\
             &location=Building+57+Room+130+%2857-130%29\
             &dates=20250916T180000%2F20250916T190000\
             &ctz=America%2FPhoenix"
        );
    }

    #[test]
    fn dates_parameter_shape() {
        let (config, event) = quiz_review();
        let url = event_url(&config.calendar, &event).unwrap();

        let dates = url
            .split("dates=")
            .nth(1)
            .and_then(|rest| rest.split('&').next())
            .unwrap();
        let (start, end) = dates.split_once("%2F").unwrap();

        for stamp in [start, end] {
            let (day, clock) = stamp.split_once('T').unwrap();
            assert_eq!(day.len(), 8);
            assert_eq!(clock.len(), 6);
            assert!(day.bytes().chain(clock.bytes()).all(|b| b.is_ascii_digit()));
        }
    }

    #[test]
    fn link_is_deterministic() {
        let (config, event) = quiz_review();
        assert_eq!(
            event_url(&config.calendar, &event).unwrap(),
            event_url(&config.calendar, &event).unwrap()
        );
    }
}
