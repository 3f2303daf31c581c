//! "Add to calendar" links for external calendar providers.
//!
//! Google, Outlook and Yahoo accept a pre-filled event through URL query
//! parameters. Apple Calendar has no such endpoint and imports ICS instead,
//! so an Apple link is the event's ICS document.

mod google;
mod outlook;
mod yahoo;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ExportConfig;
use crate::error::{ExportError, ExportResult};
use crate::event::EventCalendarRecord;
use crate::ics::{CONTENT_TYPE, IcsExport, event_filename, generate_ics};
use crate::schedule::EventSchedule;

pub use google::google_url;
pub use outlook::outlook_url;
pub use yahoo::yahoo_url;

/// External calendar a link can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarProvider {
    Google,
    Outlook,
    Yahoo,
    Apple,
}

impl CalendarProvider {
    pub const ALL: [CalendarProvider; 4] = [
        CalendarProvider::Google,
        CalendarProvider::Outlook,
        CalendarProvider::Yahoo,
        CalendarProvider::Apple,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CalendarProvider::Google => "google",
            CalendarProvider::Outlook => "outlook",
            CalendarProvider::Yahoo => "yahoo",
            CalendarProvider::Apple => "apple",
        }
    }
}

impl fmt::Display for CalendarProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CalendarProvider {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CalendarProvider::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                ExportError::Config(format!(
                    "Unknown calendar provider '{}'. \
                     Expected one of: google, outlook, yahoo, apple",
                    s
                ))
            })
    }
}

/// What a provider link resolves to.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CalendarLink {
    Url { url: String },
    Ics(IcsExport),
}

/// Build the link for `provider`.
pub fn calendar_link(
    provider: CalendarProvider,
    record: &EventCalendarRecord,
    config: &ExportConfig,
    stamp: DateTime<Utc>,
) -> ExportResult<CalendarLink> {
    debug!(event_id = record.id.get(), %provider, "building calendar link");

    let url = match provider {
        CalendarProvider::Google => google_url(record, config)?,
        CalendarProvider::Outlook => outlook_url(record, config)?,
        CalendarProvider::Yahoo => yahoo_url(record, config)?,
        CalendarProvider::Apple => {
            return Ok(CalendarLink::Ics(IcsExport {
                filename: event_filename(record),
                content_type: CONTENT_TYPE,
                body: generate_ics(record, config, stamp)?,
            }));
        }
    };

    Ok(CalendarLink::Url { url })
}

/// The event details shown in provider links.
///
/// Base description, then organizer, website, price and capacity. Website,
/// price and capacity only appear when their visibility flag is on.
pub fn compose_details(record: &EventCalendarRecord, config: &ExportConfig) -> String {
    let mut extras = Vec::new();

    let fallback = config.fallback_organizer();
    let organizer = record.organizer_or(&fallback);
    match (&organizer.name, &organizer.email) {
        (Some(name), Some(email)) => extras.push(format!("Organizer: {} ({})", name, email)),
        (Some(name), None) => extras.push(format!("Organizer: {}", name)),
        (None, Some(email)) => extras.push(format!("Organizer: {}", email)),
        (None, None) => {}
    }

    let visibility = record.visibility;
    if let Some(website) = record.website_or_url().filter(|_| visibility.show_url) {
        extras.push(format!("Website: {}", website));
    }
    if let Some(price) = record.price.as_ref().filter(|_| visibility.show_price) {
        extras.push(format!("Price: {}", price));
    }
    if let Some(capacity) = record.capacity.as_ref().filter(|_| visibility.show_capacity) {
        extras.push(format!("Capacity: {}", capacity));
    }

    match (record.description.as_deref(), extras.is_empty()) {
        (None, _) => extras.join("\n"),
        (Some(base), true) => base.to_string(),
        (Some(base), false) => format!("{}\n\n{}", base, extras.join("\n")),
    }
}

/// Resolve the schedule with the configured timezone.
fn resolve_schedule(
    record: &EventCalendarRecord,
    config: &ExportConfig,
) -> ExportResult<EventSchedule> {
    EventSchedule::resolve(record, config.tz()?)
}


#[cfg(test)]
mod tests {
    use super::test_support::{config, record};
    use super::*;
    use crate::event::{LinkVisibility, Organizer};

    #[test]
    fn test_provider_from_str() {
        assert_eq!("google".parse::<CalendarProvider>().unwrap(), CalendarProvider::Google);
        assert_eq!("Outlook".parse::<CalendarProvider>().unwrap(), CalendarProvider::Outlook);
        assert!("hotmail".parse::<CalendarProvider>().is_err());
    }

    #[test]
    fn test_compose_details_respects_visibility() {
        let mut record = record();
        record.website = Some("https://meeple.example".to_string());
        record.price = Some("Free".to_string());
        record.capacity = Some("30".to_string());

        assert_eq!(compose_details(&record, &config()), "Bring your favourite game");

        record.visibility = LinkVisibility::from_flags("yes", "yes", "yes");
        assert_eq!(
            compose_details(&record, &config()),
            "Bring your favourite game\n\n\
             Website: https://meeple.example\nPrice: Free\nCapacity: 30"
        );
    }

    #[test]
    fn test_compose_details_omits_website_unless_flag_is_yes() {
        let mut record = record();
        record.website = Some("https://meeple.example".to_string());
        record.visibility = LinkVisibility::from_flags("no", "yes", "yes");

        let details = compose_details(&record, &config());
        assert!(!details.contains("Website"), "{}", details);
        assert!(!details.contains("meeple.example"), "{}", details);
    }

    #[test]
    fn test_compose_details_includes_organizer() {
        let mut record = record();
        record.description = None;
        record.organizer = Organizer {
            name: Some("Games Club".to_string()),
            email: Some("club@example.org".to_string()),
        };

        assert_eq!(
            compose_details(&record, &config()),
            "Organizer: Games Club (club@example.org)"
        );
    }

    #[test]
    fn test_compose_details_skips_flagged_but_empty_fields() {
        let mut record = record();
        record.visibility = LinkVisibility::from_flags("yes", "yes", "yes");

        assert_eq!(compose_details(&record, &config()), "Bring your favourite game");
    }

    #[test]
    fn test_apple_link_is_ics() {
        let link =
            calendar_link(CalendarProvider::Apple, &record(), &config(), Utc::now()).unwrap();

        let CalendarLink::Ics(export) = link else {
            panic!("Apple should route to ICS");
        };
        assert_eq!(export.filename, "event-99-board-game-night.ics");
        assert_eq!(export.content_type, "text/calendar; charset=utf-8");
        assert!(export.body.starts_with("BEGIN:VCALENDAR"));
    }

    #[test]
    fn test_url_providers_return_urls() {
        let url_providers = [
            CalendarProvider::Google,
            CalendarProvider::Outlook,
            CalendarProvider::Yahoo,
        ];
        for provider in url_providers {
            let link = calendar_link(provider, &record(), &config(), Utc::now()).unwrap();
            assert!(matches!(link, CalendarLink::Url { .. }), "{provider} should be a URL");
        }
    }
}
