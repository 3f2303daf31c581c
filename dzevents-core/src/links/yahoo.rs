//! Yahoo Calendar links.

use url::Url;

use super::{compose_details, resolve_schedule};
use crate::config::ExportConfig;
use crate::error::ExportResult;
use crate::event::EventCalendarRecord;

const YAHOO_BASE_URL: &str = "https://calendar.yahoo.com/";

/// `st`/`et` are Unix timestamps of the UTC instants, so they follow the
/// same timezone contract as ICS and the other links.
pub fn yahoo_url(record: &EventCalendarRecord, config: &ExportConfig) -> ExportResult<String> {
    let schedule = resolve_schedule(record, config)?;
    let (start, end) = schedule.instants(config.tz()?)?;

    let mut params: Vec<(&str, String)> = vec![
        ("v", "60".to_string()),
        ("view", "d".to_string()),
        ("type", "20".to_string()),
        ("title", record.title.clone()),
        ("st", start.timestamp().to_string()),
        ("et", end.timestamp().to_string()),
        ("desc", compose_details(record, config)),
        ("in_loc", record.location.clone().unwrap_or_default()),
    ];
    if schedule.is_all_day() {
        params.push(("dur", "allday".to_string()));
    }

    Ok(Url::parse_with_params(YAHOO_BASE_URL, &params)?.to_string())
}
