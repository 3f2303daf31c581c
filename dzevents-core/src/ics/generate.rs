//! ICS document generation.

use chrono::{DateTime, NaiveDate, Utc};
use icalendar::{Alarm, Calendar, Component, EventLike, Property, Trigger, ValueType};
use tracing::{debug, warn};

use super::escape::{escape_text, fold_line, param_text, sanitize_value};
use crate::config::ExportConfig;
use crate::error::{ExportError, ExportResult};
use crate::event::EventCalendarRecord;
use crate::schedule::EventSchedule;

const UTC_FORMAT: &str = "%Y%m%dT%H%M%SZ";
const DATE_FORMAT: &str = "%Y%m%d";

/// Calendar properties in the order they are written.
const CALENDAR_PROPERTY_ORDER: [&str; 6] = [
    "VERSION",
    "PRODID",
    "CALSCALE",
    "METHOD",
    "X-WR-CALNAME",
    "X-WR-TIMEZONE",
];

/// VEVENT properties in the order they are written. Anything else follows.
const EVENT_PROPERTY_ORDER: [&str; 11] = [
    "UID",
    "DTSTAMP",
    "DTSTART",
    "DTEND",
    "SUMMARY",
    "DESCRIPTION",
    "LOCATION",
    "URL",
    "CATEGORIES",
    "ORGANIZER",
    "STATUS",
];

/// Stable UID for an event: `event-<id>@<host>`
pub fn event_uid(record: &EventCalendarRecord, config: &ExportConfig) -> String {
    format!("event-{}@{}", record.id, config.host)
}

/// Generate a calendar holding a single event.
///
/// The schedule is resolved before anything is built, so an invalid record
/// yields an error and no output.
pub fn generate_ics(
    record: &EventCalendarRecord,
    config: &ExportConfig,
    stamp: DateTime<Utc>,
) -> ExportResult<String> {
    let schedule = EventSchedule::resolve(record, config.tz()?)?;

    let mut cal = new_calendar(config);
    cal.push(build_event(record, &schedule, config, stamp));

    Ok(finish_ics(&cal.done(), config))
}

/// Generate one calendar holding several events.
///
/// Records without a start date are left out without raising an error.
/// Records whose dates do not parse are left out with a warning.
pub fn generate_bulk_ics(
    records: &[EventCalendarRecord],
    config: &ExportConfig,
    stamp: DateTime<Utc>,
) -> ExportResult<String> {
    let tz = config.tz()?;

    let mut cal = new_calendar(config);
    for record in records {
        match EventSchedule::resolve(record, tz) {
            Ok(schedule) => {
                cal.push(build_event(record, &schedule, config, stamp));
            }
            Err(ExportError::MissingStart(id)) => {
                debug!(event_id = id, "skipping event without start date");
            }
            Err(e) => {
                warn!(
                    event_id = record.id.get(),
                    error = %e,
                    "skipping event with invalid schedule"
                );
            }
        }
    }

    Ok(finish_ics(&cal.done(), config))
}

fn new_calendar(config: &ExportConfig) -> Calendar {
    let mut cal = Calendar::new();
    cal.append_property(Property::new("METHOD", "PUBLISH"));
    if let Some(ref name) = config.calendar_name {
        cal.append_property(Property::new("X-WR-CALNAME", escape_text(name)));
    }
    cal.append_property(Property::new("X-WR-TIMEZONE", escape_text(&config.timezone)));
    cal
}

/// Build the VEVENT. Text values are escaped here; icalendar writes them as given.
fn build_event(
    record: &EventCalendarRecord,
    schedule: &EventSchedule,
    config: &ExportConfig,
    stamp: DateTime<Utc>,
) -> icalendar::Event {
    let mut event = icalendar::Event::new();
    event.uid(&sanitize_value(&event_uid(record, config)));
    event.add_property("DTSTAMP", stamp.format(UTC_FORMAT).to_string());

    match *schedule {
        EventSchedule::AllDay { start, end } => {
            add_date_property(&mut event, "DTSTART", start);
            add_date_property(&mut event, "DTEND", end);
        }
        EventSchedule::Timed { start, end } => {
            event.add_property("DTSTART", start.format(UTC_FORMAT).to_string());
            event.add_property("DTEND", end.format(UTC_FORMAT).to_string());
        }
    }

    event.summary(&escape_text(&record.title));

    if let Some(description) = compose_description(record) {
        event.description(&escape_text(&description));
    }

    if let Some(ref location) = record.location {
        event.location(&escape_text(location));
    }

    if let Some(ref url) = record.url {
        event.add_property("URL", sanitize_value(url));
    }

    let categories: Vec<String> = record
        .categories
        .iter()
        .filter(|c| !c.trim().is_empty())
        .map(|c| escape_text(c))
        .collect();
    if !categories.is_empty() {
        event.add_property("CATEGORIES", categories.join(","));
    }

    let organizer = record.organizer_or(&config.fallback_organizer());
    if let Some(ref email) = organizer.email {
        let mut prop = Property::new("ORGANIZER", format!("MAILTO:{}", sanitize_value(email)));
        if let Some(ref name) = organizer.name {
            prop.add_parameter("CN", &param_text(name));
        }
        event.append_property(prop);
    }

    event.add_property("STATUS", "CONFIRMED");

    if let Some(minutes) = record.reminder_minutes {
        let trigger = Trigger::before_start(chrono::Duration::minutes(i64::from(minutes)));
        event.alarm(Alarm::display(&escape_text(&record.title), trigger));
    }

    event.done()
}

fn add_date_property(event: &mut icalendar::Event, name: &str, date: NaiveDate) {
    let mut prop = Property::new(name, date.format(DATE_FORMAT).to_string());
    prop.append_parameter(ValueType::Date);
    event.append_property(prop);
}

/// Post-process icalendar's output:
/// - PRODID comes from the config
/// - calendar and VEVENT properties follow a fixed order, alarms last
/// - VALARM loses the UID and DTSTAMP the crate adds to every component
/// - lines are refolded so continuation lines stay within 75 octets too
fn finish_ics(cal: &Calendar, config: &ExportConfig) -> String {
    let unfolded = cal.to_string().replace("\r\n ", "").replace("\r\n\t", "");
    let prodid = format!("PRODID:{}", escape_text(&config.product_id));

    let mut out = String::with_capacity(unfolded.len() + unfolded.len() / 20);
    let mut header: Vec<&str> = Vec::new();
    let mut properties: Vec<&str> = Vec::new();
    let mut alarms: Vec<&str> = Vec::new();
    let mut header_done = false;
    let mut in_event = false;
    let mut in_alarm = false;

    for line in unfolded.lines().filter(|l| !l.is_empty()) {
        if !header_done && (line == "BEGIN:VEVENT" || line == "END:VCALENDAR") {
            header.sort_by_key(|l| property_rank(l, &CALENDAR_PROPERTY_ORDER));
            for l in header.drain(..) {
                let l = if l.starts_with("PRODID:") { prodid.as_str() } else { l };
                push_line(&mut out, l);
            }
            header_done = true;
        }

        match line {
            "BEGIN:VCALENDAR" | "END:VCALENDAR" => push_line(&mut out, line),
            "BEGIN:VEVENT" => {
                in_event = true;
                push_line(&mut out, line);
            }
            "END:VEVENT" => {
                properties.sort_by_key(|l| property_rank(l, &EVENT_PROPERTY_ORDER));
                for l in properties.drain(..).chain(alarms.drain(..)) {
                    push_line(&mut out, l);
                }
                push_line(&mut out, line);
                in_event = false;
            }
            "BEGIN:VALARM" => {
                in_alarm = true;
                alarms.push(line);
            }
            "END:VALARM" => {
                in_alarm = false;
                alarms.push(line);
            }
            _ if in_alarm => {
                if !line.starts_with("UID:") && !line.starts_with("DTSTAMP:") {
                    alarms.push(line);
                }
            }
            _ if in_event => properties.push(line),
            _ => header.push(line),
        }
    }

    out
}

fn property_rank(line: &str, order: &[&str]) -> usize {
    let name = line.split([';', ':']).next().unwrap_or(line);
    order.iter().position(|p| *p == name).unwrap_or(order.len())
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(&fold_line(line));
    out.push_str("\r\n");
}

/// The description followed by price, capacity, contact and URL lines.
fn compose_description(record: &EventCalendarRecord) -> Option<String> {
    let details: Vec<String> = [
        ("Price", &record.price),
        ("Capacity", &record.capacity),
        ("Contact", &record.contact),
        ("Event URL", &record.url),
    ]
    .into_iter()
    .filter_map(|(label, value)| value.as_ref().map(|v| format!("{}: {}", label, v)))
    .collect();

    match (&record.description, details.is_empty()) {
        (None, true) => None,
        (None, false) => Some(details.join("\n")),
        (Some(base), true) => Some(base.clone()),
        (Some(base), false) => Some(format!("{}\n\n{}", base, details.join("\n"))),
    }
}
