use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::event::{date_key, reserved_character};

/// Schedule baked into the binary; `--config` swaps it out at startup.
pub const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Everything the site serves, loaded once at startup and read-only after.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub site: SiteMeta,
    pub calendar: CalendarConfig,
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteMeta {
    pub club: String,
    pub headline: String,
    pub intro: String,
    pub instagram: String,
    pub footer: String,
}

/// Serialization settings shared by every generated event, including the
/// default session window the original page never spelled out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    pub prodid: String,
    pub uid_domain: String,
    /// Zone identifier carried next to every timestamp. The zone must not
    /// observe daylight saving; timestamps are serialized without offsets.
    pub tzid: String,
    pub tz_name: String,
    pub tz_offset: String,
    /// Human label for the zone, shown on the schedule page.
    pub tz_label: String,
    /// Stub the per-event description is synthesized from.
    pub description: String,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub course: String,
    pub name: String,
    pub term: String,
    pub room: String,
    pub location: String,
    pub sessions: Vec<Session>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub date: NaiveDate,
    pub title: String,
}

impl SiteConfig {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config: Self = match path {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("failed to read config file {}", path.display()))?;
                toml::from_str(&raw)
                    .with_context(|| format!("failed to parse config file {}", path.display()))?
            }
            None => toml::from_str(DEFAULT_CONFIG).context("failed to parse built-in schedule")?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn track(&self, id: &str) -> Option<&Track> {
        self.tracks.iter().find(|track| track.id == id)
    }

    fn validate(&self) -> Result<()> {
        if self.tracks.is_empty() {
            bail!("schedule contains no tracks");
        }

        if self.calendar.start >= self.calendar.end {
            bail!(
                "session window starts at {} but ends at {}",
                self.calendar.start,
                self.calendar.end
            );
        }

        for (idx, track) in self.tracks.iter().enumerate() {
            if self.tracks[..idx].iter().any(|other| other.id == track.id) {
                bail!("duplicate track id {}", track.id);
            }

            if track.sessions.is_empty() {
                bail!("track {} has no sessions", track.id);
            }

            if let Some(c) = reserved_character(&track.location) {
                warn!(track = %track.id, %c, "location contains a reserved calendar character");
            }

            for (idx, session) in track.sessions.iter().enumerate() {
                date_key(session.date)
                    .with_context(|| format!("track {}: unusable session date", track.id))?;

                // Sessions are addressed by date within their track.
                if track.sessions[..idx]
                    .iter()
                    .any(|other| other.date == session.date)
                {
                    bail!("track {} has two sessions on {}", track.id, session.date);
                }

                if let Some(c) = reserved_character(&session.title) {
                    warn!(track = %track.id, %c, "title contains a reserved calendar character");
                }
            }
        }

        Ok(())
    }
}

impl Track {
    pub fn session_on(&self, date: NaiveDate) -> Option<&Session> {
        self.sessions.iter().find(|session| session.date == date)
    }
}

impl Session {
    /// Display category, the part after the `"<Course> • <Category>"` dot.
    #[must_use]
    pub fn category(&self) -> &str {
        self.title
            .split_once(" • ")
            .map(|(_, category)| category)
            .unwrap_or(&self.title)
    }
}
