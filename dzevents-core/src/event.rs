//! Event records as seen by the calendar formatters.
//!
//! An `EventCalendarRecord` is built from stored event data right before an
//! export and thrown away afterwards. Formatters only ever borrow it.

use serde::{Deserialize, Serialize};

use crate::error::{ExportError, ExportResult};

/// Identifier of a stored event. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(u64);

impl EventId {
    pub fn new(id: u64) -> Option<Self> {
        (id > 0).then_some(EventId(id))
    }

    /// Parse a user-supplied identifier. Empty, non-numeric and zero ids are rejected.
    pub fn parse(s: &str) -> ExportResult<Self> {
        s.trim()
            .parse::<u64>()
            .ok()
            .and_then(EventId::new)
            .ok_or_else(|| ExportError::InvalidId(s.to_string()))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Event organizer (ORGANIZER in ICS, "Organizer:" line in links)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Organizer {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Which optional blocks a calendar link may reveal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkVisibility {
    pub show_url: bool,
    pub show_price: bool,
    pub show_capacity: bool,
}

impl LinkVisibility {
    /// Build from stored flag strings. Only the literal `"yes"` turns a flag on.
    pub fn from_flags(show_url: &str, show_price: &str, show_capacity: &str) -> Self {
        LinkVisibility {
            show_url: show_url == "yes",
            show_price: show_price == "yes",
            show_capacity: show_capacity == "yes",
        }
    }
}

/// The fields of an event that calendar exports care about.
///
/// Text fields are `None` when absent or empty. Dates are `YYYY-MM-DD` and
/// times `HH:MM[:SS]` wall-clock strings, interpreted in the configured timezone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventCalendarRecord {
    pub id: EventId,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,

    pub start_date: Option<String>,
    pub start_time: Option<String>,
    pub end_date: Option<String>,
    pub end_time: Option<String>,

    pub price: Option<String>,
    pub capacity: Option<String>,
    pub contact: Option<String>,
    pub organizer: Organizer,
    /// External website for the event (falls back to `url` in links)
    pub website: Option<String>,
    /// Canonical URL of the event page
    pub url: Option<String>,
    pub categories: Vec<String>,

    /// Minutes before start to remind, if any
    pub reminder_minutes: Option<u32>,
    pub visibility: LinkVisibility,
}

impl EventCalendarRecord {
    /// A record with only an id and title; everything else absent.
    pub fn new(id: EventId, title: impl Into<String>) -> Self {
        EventCalendarRecord {
            id,
            title: title.into(),
            description: None,
            location: None,
            start_date: None,
            start_time: None,
            end_date: None,
            end_time: None,
            price: None,
            capacity: None,
            contact: None,
            organizer: Organizer::default(),
            website: None,
            url: None,
            categories: Vec::new(),
            reminder_minutes: None,
            visibility: LinkVisibility::default(),
        }
    }

    /// The event's organizer with missing fields taken from `fallback`.
    ///
    /// The fallback name is only used alongside the fallback email, so an
    /// event's own address never gets someone else's name.
    pub fn organizer_or(&self, fallback: &Organizer) -> Organizer {
        let own = &self.organizer;
        match own.email {
            Some(_) => own.clone(),
            None => Organizer {
                name: own.name.clone().or_else(|| fallback.name.clone()),
                email: fallback.email.clone(),
            },
        }
    }

    /// Website shown in links: the explicit website, or the event page URL.
    pub fn website_or_url(&self) -> Option<&str> {
        self.website.as_deref().or(self.url.as_deref())
    }
}

/// Turn an optional stored string into `None` when it is empty or whitespace.
pub(crate) fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_id_rejects_zero_and_garbage() {
        assert!(EventId::parse("0").is_err());
        assert!(EventId::parse("").is_err());
        assert!(EventId::parse("abc").is_err());
        assert!(EventId::parse("-4").is_err());
        assert_eq!(EventId::parse(" 42 ").unwrap().get(), 42);
    }

    #[test]
    fn test_visibility_flags_require_literal_yes() {
        let vis = LinkVisibility::from_flags("yes", "Yes", "1");
        assert!(vis.show_url);
        assert!(!vis.show_price);
        assert!(!vis.show_capacity);

        let vis = LinkVisibility::from_flags("", "true", "yes ");
        assert_eq!(vis, LinkVisibility::default());
    }

    #[test]
    fn test_organizer_falls_back_per_field() {
        let fallback = Organizer {
            name: Some("Events Team".to_string()),
            email: Some("events@example.org".to_string()),
        };
        let mut record = EventCalendarRecord::new(EventId::new(1).unwrap(), "Demo");
        assert_eq!(record.organizer_or(&fallback), fallback);

        record.organizer.name = Some("Jane".to_string());
        let organizer = record.organizer_or(&fallback);
        assert_eq!(organizer.name.as_deref(), Some("Jane"));
        assert_eq!(organizer.email.as_deref(), Some("events@example.org"));

        record.organizer = Organizer {
            name: None,
            email: Some("jane@example.org".to_string()),
        };
        let organizer = record.organizer_or(&fallback);
        assert_eq!(organizer.name, None);
        assert_eq!(organizer.email.as_deref(), Some("jane@example.org"));
    }

    #[test]
    fn test_website_falls_back_to_url() {
        let mut record = EventCalendarRecord::new(EventId::new(1).unwrap(), "Demo");
        assert_eq!(record.website_or_url(), None);

        record.url = Some("https://example.com/events/demo".to_string());
        assert_eq!(record.website_or_url(), Some("https://example.com/events/demo"));

        record.website = Some("https://demo.example.org".to_string());
        assert_eq!(record.website_or_url(), Some("https://demo.example.org"));
    }
}
