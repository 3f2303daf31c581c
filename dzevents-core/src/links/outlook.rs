//! Outlook.com compose deep links.

use url::Url;

use super::{compose_details, resolve_schedule};
use crate::config::ExportConfig;
use crate::error::ExportResult;
use crate::event::EventCalendarRecord;
use crate::schedule::EventSchedule;

const OUTLOOK_BASE_URL: &str = "https://outlook.live.com/calendar/0/deeplink/compose";

/// Outlook wants ISO 8601 with punctuation (`2025-03-14T19:00:00Z`), or
/// plain dates plus `allday=true` for all-day events.
fn outlook_dates(schedule: &EventSchedule) -> (String, String) {
    match schedule {
        EventSchedule::AllDay { start, end } => (
            start.format("%Y-%m-%d").to_string(),
            end.format("%Y-%m-%d").to_string(),
        ),
        EventSchedule::Timed { start, end } => (
            start.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            end.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
        ),
    }
}

pub fn outlook_url(record: &EventCalendarRecord, config: &ExportConfig) -> ExportResult<String> {
    let schedule = resolve_schedule(record, config)?;
    let (startdt, enddt) = outlook_dates(&schedule);

    let mut params: Vec<(&str, String)> = vec![
        ("path", "/calendar/action/compose".to_string()),
        ("rru", "addevent".to_string()),
        ("subject", record.title.clone()),
        ("startdt", startdt),
        ("enddt", enddt),
        ("body", compose_details(record, config)),
        ("location", record.location.clone().unwrap_or_default()),
    ];
    if schedule.is_all_day() {
        params.push(("allday", "true".to_string()));
    }

    Ok(Url::parse_with_params(OUTLOOK_BASE_URL, &params)?.to_string())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{config, param, record};
    use super::*;

    #[test]
    fn test_outlook_url_parameters() {
        let url = outlook_url(&record(), &config()).unwrap();

        assert!(url.starts_with("https://outlook.live.com/calendar/0/deeplink/compose?"));
        assert_eq!(param(&url, "path").as_deref(), Some("/calendar/action/compose"));
        assert_eq!(param(&url, "rru").as_deref(), Some("addevent"));
        assert_eq!(param(&url, "subject").as_deref(), Some("Board Game Night"));
        assert_eq!(param(&url, "startdt").as_deref(), Some("2025-03-14T19:00:00Z"));
        assert_eq!(param(&url, "enddt").as_deref(), Some("2025-03-14T22:30:00Z"));
        assert_eq!(param(&url, "body").as_deref(), Some("Bring your favourite game"));
        assert_eq!(param(&url, "allday"), None);
    }

    #[test]
    fn test_outlook_url_all_day() {
        let mut record = record();
        record.start_time = None;
        record.end_time = None;

        let url = outlook_url(&record, &config()).unwrap();
        assert_eq!(param(&url, "startdt").as_deref(), Some("2025-03-14"));
        assert_eq!(param(&url, "enddt").as_deref(), Some("2025-03-15"));
        assert_eq!(param(&url, "allday").as_deref(), Some("true"));
    }

    #[test]
    fn test_outlook_url_converts_from_configured_zone() {
        let config = ExportConfig {
            timezone: "America/New_York".to_string(),
            ..config()
        };

        let url = outlook_url(&record(), &config).unwrap();
        assert_eq!(param(&url, "startdt").as_deref(), Some("2025-03-14T23:00:00Z"));
    }
}
