//! Stored events and the file-backed event store.
//!
//! `StoredEvent` mirrors how event data is persisted: loose optional strings
//! and `"yes"` flags. `StoredEvent::to_record` is the one place that data is
//! normalised into an `EventCalendarRecord`.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ExportError, ExportResult};
use crate::event::{EventCalendarRecord, EventId, LinkVisibility, Organizer, non_empty};

/// Kind of stored item that can be exported.
pub const EVENT_KIND: &str = "event";

fn default_kind() -> String {
    EVENT_KIND.to_string()
}

/// Publication status of a stored item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishStatus {
    #[default]
    Publish,
    Draft,
    Pending,
    Private,
    Future,
    Trash,
}

impl PublishStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublishStatus::Publish => "publish",
            PublishStatus::Draft => "draft",
            PublishStatus::Pending => "pending",
            PublishStatus::Private => "private",
            PublishStatus::Future => "future",
            PublishStatus::Trash => "trash",
        }
    }
}

/// An event as persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoredEvent {
    pub id: u64,
    #[serde(default = "default_kind")]
    pub kind: String,
    pub status: PublishStatus,

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
    pub organizer_name: Option<String>,
    pub organizer_email: Option<String>,
    pub website: Option<String>,
    pub url: Option<String>,
    pub categories: Vec<String>,
    pub reminder_minutes: Option<u32>,

    /// `"yes"` to show the website in calendar links
    pub show_url: String,
    /// `"yes"` to show the price in calendar links
    pub show_price: String,
    /// `"yes"` to show the capacity in calendar links
    pub show_capacity: String,
}

impl StoredEvent {
    /// Why this item may not be exported, if it may not.
    pub fn ineligibility(&self) -> Option<String> {
        if self.kind != EVENT_KIND {
            return Some(format!("not an event (kind '{}')", self.kind));
        }
        if self.status != PublishStatus::Publish {
            return Some(format!("not published (status '{}')", self.status.as_str()));
        }
        None
    }

    /// Build the record the formatters consume.
    pub fn to_record(&self) -> ExportResult<EventCalendarRecord> {
        let id = EventId::new(self.id).ok_or_else(|| ExportError::InvalidId(self.id.to_string()))?;

        let title = match self.title.trim() {
            "" => "(No title)".to_string(),
            t => t.to_string(),
        };

        Ok(EventCalendarRecord {
            id,
            title,
            description: non_empty(self.description.as_deref()),
            location: non_empty(self.location.as_deref()),
            start_date: non_empty(self.start_date.as_deref()),
            start_time: non_empty(self.start_time.as_deref()),
            end_date: non_empty(self.end_date.as_deref()),
            end_time: non_empty(self.end_time.as_deref()),
            price: non_empty(self.price.as_deref()),
            capacity: non_empty(self.capacity.as_deref()),
            contact: non_empty(self.contact.as_deref()),
            organizer: Organizer {
                name: non_empty(self.organizer_name.as_deref()),
                email: non_empty(self.organizer_email.as_deref()),
            },
            website: non_empty(self.website.as_deref()),
            url: non_empty(self.url.as_deref()),
            categories: self
                .categories
                .iter()
                .filter_map(|c| non_empty(Some(c.as_str())))
                .collect(),
            reminder_minutes: self.reminder_minutes,
            visibility: LinkVisibility::from_flags(
                &self.show_url,
                &self.show_price,
                &self.show_capacity,
            ),
        })
    }
}

/// Where exports look events up.
pub trait EventSource {
    fn find(&self, id: EventId) -> ExportResult<Option<StoredEvent>>;
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct EventsFile {
    #[serde(default)]
    events: Vec<StoredEvent>,
}

/// Events loaded from a TOML or JSON file with an `events` list.
#[derive(Debug, Default, Clone)]
pub struct EventStore {
    events: BTreeMap<u64, StoredEvent>,
}

impl EventStore {
    pub fn from_events(events: impl IntoIterator<Item = StoredEvent>) -> Self {
        EventStore {
            events: events.into_iter().map(|e| (e.id, e)).collect(),
        }
    }

    /// Load `path`. `.json` files are read as JSON, anything else as TOML.
    pub fn load(path: &Path) -> ExportResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ExportError::Store(format!("Could not read {}: {}", path.display(), e))
        })?;

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let file: EventsFile = if is_json {
            serde_json::from_str(&content).map_err(|e| ExportError::Store(e.to_string()))?
        } else {
            toml::from_str(&content).map_err(|e| ExportError::Store(e.to_string()))?
        };

        Ok(Self::from_events(file.events))
    }

    pub fn events(&self) -> impl Iterator<Item = &StoredEvent> {
        self.events.values()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSource for EventStore {
    fn find(&self, id: EventId) -> ExportResult<Option<StoredEvent>> {
        Ok(self.events.get(&id.get()).cloned())
    }
}
