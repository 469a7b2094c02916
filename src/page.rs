use std::fmt::Write;

use crate::config::{SiteConfig, Track};
use crate::event::{date_key, EventError};

/// Server-side render of the club page: intro card, one schedule table per
/// track with the two calendar actions per session, Instagram call-to-action.
pub fn render(config: &SiteConfig) -> Result<String, EventError> {
    let mut tracks = String::new();
    for track in &config.tracks {
        tracks.push_str(&render_track(config, track)?);
    }

    let site = &config.site;
    Ok(format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{club}</title>
</head>
<body>
<header>
<h1>{club}</h1>
<nav><a href="#schedule">Schedule</a></nav>
</header>
<section>
<h2>{headline}</h2>
<p>{intro}</p>
</section>
<section id="schedule">
{tracks}</section>
<section>
<p>Follow us on Instagram for live updates. Announcements, room locations,
and last-minute changes are posted here.</p>
<p><a href="https://instagram.com/{instagram}">@{instagram}</a></p>
</section>
<footer>{club} &bull; {footer}</footer>
</body>
</html>
"##,
        club = site.club,
        headline = site.headline,
        intro = site.intro,
        instagram = site.instagram,
        footer = site.footer,
    ))
}

fn render_track(config: &SiteConfig, track: &Track) -> Result<String, EventError> {
    let calendar = &config.calendar;
    let window = format!(
        "{}\u{2013}{} ({})",
        calendar.start.format("%-I:%M"),
        calendar.end.format("%-I:%M %p"),
        calendar.tz_label
    );

    let mut out = String::new();
    let _ = writeln!(out, "<h3>{} - {}</h3>", track.name, track.term);
    let _ = writeln!(
        out,
        "<p>All sessions: {window} &bull; Location: {}</p>",
        track.room
    );
    out.push_str("<table>\n");

    for session in &track.sessions {
        let key = date_key(session.date)?;
        let _ = writeln!(
            out,
            "<tr><td>{date}</td><td>{window}</td><td>{category}</td>\
             <td><a href=\"/calendar/{id}/{key}/google\">Add to Calendar</a> \
             <a href=\"/calendar/{id}/{key}.ics\">.ics file</a></td></tr>",
            date = session.date.format("%a, %b %-d, %Y"),
            category = session.category(),
            id = track.id,
        );
    }

    out.push_str("</table>\n");
    Ok(out)
}
