use ics::parameters::TzIDParam;
use ics::properties::{CalScale, Description, DtEnd, DtStart, Location, Method, Summary, TzName};
use ics::{ICalendar, Standard, TimeZone};

use crate::config::CalendarConfig;
use crate::event::{date_key, slugify, timestamp, EventContext, EventError};

/// Single-event iCalendar document, CRLF-terminated, ready to download.
///
/// Text fields are copied verbatim; reserved characters (comma, semicolon,
/// backslash, newline) pass through unescaped. The DTSTAMP reuses the event
/// date with a zero clock rather than a real UTC conversion, which keeps
/// the payload a pure function of its input.
pub fn event_ics(calendar: &CalendarConfig, event: &EventContext) -> Result<String, EventError> {
    let key = date_key(event.date)?;
    let uid = format!("{key}-{}@{}", slugify(&event.title), calendar.uid_domain);

    let mut standard = Standard::new("19700101T000000", &calendar.tz_offset, &calendar.tz_offset);
    standard.push(TzName::new(&calendar.tz_name));

    let mut icalendar = ICalendar::new("2.0", &calendar.prodid);
    icalendar.push(CalScale::new("GREGORIAN"));
    icalendar.push(Method::new("PUBLISH"));
    icalendar.add_timezone(TimeZone::standard(&calendar.tzid, standard));

    let mut ics_event = ics::Event::new(uid, format!("{key}T000000Z"));

    let mut dtstart = DtStart::new(timestamp(event.date, event.start)?);
    dtstart.add(TzIDParam::new(&calendar.tzid));
    ics_event.push(dtstart);

    let mut dtend = DtEnd::new(timestamp(event.date, event.end)?);
    dtend.add(TzIDParam::new(&calendar.tzid));
    ics_event.push(dtend);

    ics_event.push(Summary::new(&event.title));
    ics_event.push(Description::new(&event.description));
    ics_event.push(Location::new(&event.location));

    icalendar.add_event(ics_event);

    Ok(icalendar.to_string())
}

/// Download filename offered next to the payload.
pub fn ics_filename(event: &EventContext) -> Result<String, EventError> {
    Ok(format!(
        "{}_{}.ics",
        slugify(&event.title),
        date_key(event.date)?
    ))
}
