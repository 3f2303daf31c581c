//! Calendar export for events.
//!
//! This crate turns stored events into calendar formats:
//! - `ics` for RFC 5545 documents (single event or many)
//! - `links` for Google, Outlook and Yahoo "add to calendar" URLs
//! - `export` for looking events up and checking they may be exported

pub mod config;
pub mod error;
pub mod event;
pub mod export;
pub mod ics;
pub mod links;
pub mod schedule;
pub mod store;

pub use config::ExportConfig;
pub use error::{ExportError, ExportResult};
pub use event::{EventCalendarRecord, EventId, LinkVisibility, Organizer};
pub use export::{Exporter, MAX_BULK_EVENTS};
pub use ics::IcsExport;
pub use links::{CalendarLink, CalendarProvider};
pub use schedule::EventSchedule;
pub use store::{EventSource, EventStore, PublishStatus, StoredEvent};
