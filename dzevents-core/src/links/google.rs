//! Google Calendar "render" template links.

use url::Url;

use super::{compose_details, resolve_schedule};
use crate::config::ExportConfig;
use crate::error::ExportResult;
use crate::event::EventCalendarRecord;
use crate::schedule::EventSchedule;

const GOOGLE_BASE_URL: &str = "https://calendar.google.com/calendar/render";

/// `dates` value: `YYYYMMDDTHHMMSSZ/YYYYMMDDTHHMMSSZ`, or `YYYYMMDD/YYYYMMDD`
/// for all-day events (end exclusive).
fn google_dates(schedule: &EventSchedule) -> String {
    match schedule {
        EventSchedule::AllDay { start, end } => {
            format!("{}/{}", start.format("%Y%m%d"), end.format("%Y%m%d"))
        }
        EventSchedule::Timed { start, end } => format!(
            "{}/{}",
            start.format("%Y%m%dT%H%M%SZ"),
            end.format("%Y%m%dT%H%M%SZ")
        ),
    }
}

pub fn google_url(record: &EventCalendarRecord, config: &ExportConfig) -> ExportResult<String> {
    let schedule = resolve_schedule(record, config)?;

    let mut params: Vec<(&str, String)> = vec![
        ("action", "TEMPLATE".to_string()),
        ("text", record.title.clone()),
        ("dates", google_dates(&schedule)),
        ("details", compose_details(record, config)),
        ("location", record.location.clone().unwrap_or_default()),
        ("trp", "false".to_string()),
    ];
    if let Some(minutes) = record.reminder_minutes {
        params.push(("remind", minutes.to_string()));
    }

    Ok(Url::parse_with_params(GOOGLE_BASE_URL, &params)?.to_string())
}
