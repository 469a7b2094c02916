use chrono::{Datelike, NaiveDate, NaiveTime};
use thiserror::Error;

use crate::config::{CalendarConfig, Session, Track};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    #[error("invalid calendar date: {0}")]
    InvalidDate(String),
}

/// One session as handed to the serializers: everything the link form and
/// the file form need, with the window defaults already applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventContext {
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: NaiveDate,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl EventContext {
    pub fn for_session(calendar: &CalendarConfig, track: &Track, session: &Session) -> Self {
        Self {
            title: session.title.clone(),
            description: format!("{} (Location: {}).", calendar.description, track.location),
            location: track.location.clone(),
            date: session.date,
            start: calendar.start,
            end: calendar.end,
        }
    }
}

/// Compact `YYYYMMDD` key shared by timestamps, UIDs and download URLs.
/// Only four-digit years fit the key, anything else is an invalid date.
pub fn date_key(date: NaiveDate) -> Result<String, EventError> {
    if !(1..=9999).contains(&date.year()) {
        return Err(EventError::InvalidDate(date.to_string()));
    }

    Ok(format!(
        "{:04}{:02}{:02}",
        date.year(),
        date.month(),
        date.day()
    ))
}

/// Inverse of [`date_key`], used to resolve date keys taken from URLs.
pub fn parse_date_key(key: &str) -> Result<NaiveDate, EventError> {
    if key.len() != 8 || !key.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(EventError::InvalidDate(key.to_string()));
    }

    NaiveDate::parse_from_str(key, "%Y%m%d").map_err(|_| EventError::InvalidDate(key.to_string()))
}

/// `YYYYMMDDTHHMMSS`, no zone suffix. The zone rides separately, either as
/// a `ctz` query parameter or a `TZID` property parameter.
pub fn timestamp(date: NaiveDate, time: NaiveTime) -> Result<String, EventError> {
    Ok(format!("{}T{}", date_key(date)?, time.format("%H%M%S")))
}

/// Lowercase, alphanumeric-and-hyphen, collapsed. Stable for a given title.
#[must_use]
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// First character the calendar file format reserves, if any. Serialization
/// passes these through unescaped, so configuration loading warns on them.
#[must_use]
pub fn reserved_character(text: &str) -> Option<char> {
    text.chars().find(|c| matches!(c, ',' | ';' | '\\' | '\n'))
}
