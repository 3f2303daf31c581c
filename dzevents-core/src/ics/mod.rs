//! ICS generation.
//!
//! This module writes .ics documents according to RFC 5545 and names the
//! files they are delivered as.

mod escape;
mod generate;

use chrono::NaiveDate;
use serde::Serialize;

use crate::event::EventCalendarRecord;

pub use escape::{MAX_LINE_OCTETS, escape_text, fold_line};
pub use generate::{event_uid, generate_bulk_ics, generate_ics};

/// MIME type of every ICS document we produce.
pub const CONTENT_TYPE: &str = "text/calendar; charset=utf-8";

/// A finished ICS document, ready to be written or sent.
#[derive(Debug, Clone, Serialize)]
pub struct IcsExport {
    pub filename: String,
    pub content_type: &'static str,
    pub body: String,
}

/// `event-<id>-<slug>.ics`, or `event-<id>.ics` when the title has nothing to slug.
pub fn event_filename(record: &EventCalendarRecord) -> String {
    let slug: String = slug::slugify(&record.title).chars().take(50).collect();
    let slug = slug.trim_end_matches('-');

    if slug.is_empty() {
        format!("event-{}.ics", record.id)
    } else {
        format!("event-{}-{}.ics", record.id, slug)
    }
}

/// `multiple-events-<YYYY-MM-DD>.ics`
pub fn bulk_filename(date: NaiveDate) -> String {
    format!("multiple-events-{}.ics", date.format("%Y-%m-%d"))
}
