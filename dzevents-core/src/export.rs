//! Exporting stored events: lookup, eligibility, and delivery as ICS or links.
//!
//! Identifiers and eligibility are checked before any formatting starts.
//! A single export fails on an unusable event; a bulk export leaves such
//! events out and carries on.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::config::ExportConfig;
use crate::error::{ExportError, ExportResult};
use crate::event::{EventCalendarRecord, EventId};
use crate::ics::{
    CONTENT_TYPE, IcsExport, bulk_filename, event_filename, generate_bulk_ics, generate_ics,
};
use crate::links::{CalendarLink, CalendarProvider, calendar_link};
use crate::store::EventSource;

/// Most events a single bulk export may request.
pub const MAX_BULK_EVENTS: usize = 50;

/// Exports events from `source` using `config`.
pub struct Exporter<'a, S: EventSource> {
    source: &'a S,
    config: &'a ExportConfig,
}

impl<'a, S: EventSource> Exporter<'a, S> {
    pub fn new(source: &'a S, config: &'a ExportConfig) -> Self {
        Exporter { source, config }
    }

    /// Look up an exportable event and build its record.
    pub fn record(&self, id: EventId) -> ExportResult<EventCalendarRecord> {
        let stored = self
            .source
            .find(id)?
            .ok_or(ExportError::NotFound(id.get()))?;

        if let Some(reason) = stored.ineligibility() {
            return Err(ExportError::NotExportable {
                id: id.get(),
                reason,
            });
        }

        stored.to_record()
    }

    /// Export one event as an ICS document.
    pub fn export_event(&self, id: &str, now: DateTime<Utc>) -> ExportResult<IcsExport> {
        let id = EventId::parse(id)?;
        let record = self.record(id)?;

        let body = generate_ics(&record, self.config, now)?;
        info!(event_id = id.get(), "exported event");

        Ok(IcsExport {
            filename: event_filename(&record),
            content_type: CONTENT_TYPE,
            body,
        })
    }

    /// Export several events into one ICS document.
    ///
    /// The whole request is rejected if it is empty, names more than
    /// `MAX_BULK_EVENTS` ids, or contains an invalid id. Unknown, unpublished
    /// and undated events are left out.
    pub fn export_events<T: AsRef<str>>(
        &self,
        ids: &[T],
        now: DateTime<Utc>,
    ) -> ExportResult<IcsExport> {
        if ids.is_empty() {
            return Err(ExportError::NoEvents);
        }
        if ids.len() > MAX_BULK_EVENTS {
            return Err(ExportError::TooManyEvents {
                requested: ids.len(),
                limit: MAX_BULK_EVENTS,
            });
        }

        let mut parsed: Vec<EventId> = Vec::with_capacity(ids.len());
        for raw in ids {
            let id = EventId::parse(raw.as_ref())?;
            if !parsed.contains(&id) {
                parsed.push(id);
            }
        }

        let mut records = Vec::with_capacity(parsed.len());
        for id in parsed {
            match self.record(id) {
                Ok(record) => records.push(record),
                Err(e @ (ExportError::NotFound(_) | ExportError::NotExportable { .. })) => {
                    debug!(event_id = id.get(), reason = %e, "skipping event in bulk export");
                }
                Err(e) => return Err(e),
            }
        }

        let body = generate_bulk_ics(&records, self.config, now)?;
        let today = now.with_timezone(&self.config.tz()?).date_naive();
        info!(requested = ids.len(), "exported events");

        Ok(IcsExport {
            filename: bulk_filename(today),
            content_type: CONTENT_TYPE,
            body,
        })
    }

    /// Build a provider link for one event.
    pub fn link(
        &self,
        id: &str,
        provider: CalendarProvider,
        now: DateTime<Utc>,
    ) -> ExportResult<CalendarLink> {
        let id = EventId::parse(id)?;
        let record = self.record(id)?;
        calendar_link(provider, &record, self.config, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{EventStore, PublishStatus, StoredEvent};
    use chrono::TimeZone;

    fn stored(id: u64, start_date: Option<&str>) -> StoredEvent {
        StoredEvent {
            id,
            kind: "event".to_string(),
            title: format!("Event {}", id),
            start_date: start_date.map(str::to_string),
            start_time: Some("10:00".to_string()),
            ..StoredEvent::default()
        }
    }

    fn store() -> EventStore {
        let mut draft = stored(4, Some("2025-05-04"));
        draft.status = PublishStatus::Draft;
        let mut page = stored(5, Some("2025-05-05"));
        page.kind = "page".to_string();

        EventStore::from_events([
            stored(1, Some("2025-05-01")),
            stored(2, None),
            stored(3, Some("2025-05-03")),
            draft,
            page,
        ])
    }

    fn config() -> ExportConfig {
        ExportConfig {
            host: "example.org".to_string(),
            ..ExportConfig::default()
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 20, 12, 0, 0).unwrap()
    }

    fn count_events(ics: &str) -> usize {
        ics.lines().filter(|l| *l == "BEGIN:VEVENT").count()
    }

    #[test]
    fn test_export_event() {
        let (store, config) = (store(), config());
        let export = Exporter::new(&store, &config).export_event("1", now()).unwrap();

        assert_eq!(export.filename, "event-1-event-1.ics");
        assert_eq!(export.content_type, "text/calendar; charset=utf-8");
        assert_eq!(count_events(&export.body), 1);
        assert!(export.body.contains("UID:event-1@example.org"));
    }

    #[test]
    fn test_export_event_rejects_invalid_ids() {
        let (store, config) = (store(), config());
        let exporter = Exporter::new(&store, &config);

        assert!(matches!(exporter.export_event("", now()), Err(ExportError::InvalidId(_))));
        assert!(matches!(exporter.export_event("0", now()), Err(ExportError::InvalidId(_))));
        assert!(matches!(exporter.export_event("12a", now()), Err(ExportError::InvalidId(_))));
        assert!(matches!(exporter.export_event("99", now()), Err(ExportError::NotFound(99))));
    }

    #[test]
    fn test_export_event_rejects_ineligible() {
        let (store, config) = (store(), config());
        let exporter = Exporter::new(&store, &config);

        assert!(matches!(
            exporter.export_event("4", now()),
            Err(ExportError::NotExportable { id: 4, .. })
        ));
        assert!(matches!(
            exporter.export_event("5", now()),
            Err(ExportError::NotExportable { id: 5, .. })
        ));
    }

    #[test]
    fn test_export_event_without_start_is_rejected() {
        let (store, config) = (store(), config());
        let err = Exporter::new(&store, &config).export_event("2", now()).unwrap_err();
        assert!(matches!(err, ExportError::MissingStart(2)));
    }

    #[test]
    fn test_export_events_skips_undated() {
        let (store, config) = (store(), config());
        let export = Exporter::new(&store, &config)
            .export_events(&["1", "2", "3"], now())
            .unwrap();

        assert_eq!(export.filename, "multiple-events-2025-04-20.ics");
        assert_eq!(count_events(&export.body), 2);
        assert!(export.body.contains("UID:event-1@example.org"));
        assert!(!export.body.contains("UID:event-2@example.org"));
        assert!(export.body.contains("UID:event-3@example.org"));
    }

    #[test]
    fn test_export_events_skips_missing_and_ineligible() {
        let (store, config) = (store(), config());
        let export = Exporter::new(&store, &config)
            .export_events(&["1", "4", "5", "77", "1"], now())
            .unwrap();

        assert_eq!(count_events(&export.body), 1);
    }

    #[test]
    fn test_export_events_enforces_limit() {
        let (store, config) = (store(), config());
        let exporter = Exporter::new(&store, &config);

        let ids: Vec<String> = (1..=51).map(|i| i.to_string()).collect();
        assert!(matches!(
            exporter.export_events(&ids, now()),
            Err(ExportError::TooManyEvents { requested: 51, limit: 50 })
        ));

        let ids: Vec<String> = (1..=50).map(|i| i.to_string()).collect();
        assert!(exporter.export_events(&ids, now()).is_ok());
    }

    #[test]
    fn test_export_events_rejects_bad_request() {
        let (store, config) = (store(), config());
        let exporter = Exporter::new(&store, &config);

        let empty: [&str; 0] = [];
        assert!(matches!(exporter.export_events(&empty, now()), Err(ExportError::NoEvents)));
        assert!(matches!(
            exporter.export_events(&["1", "x"], now()),
            Err(ExportError::InvalidId(_))
        ));
    }

    #[test]
    fn test_bulk_filename_uses_configured_zone_date() {
        let store = store();
        let config = ExportConfig {
            timezone: "Pacific/Auckland".to_string(),
            ..config()
        };

        let export = Exporter::new(&store, &config)
            .export_events(&["1"], now())
            .unwrap();
        // 12:00 UTC is already the next day in Auckland
        assert_eq!(export.filename, "multiple-events-2025-04-21.ics");
    }

    #[test]
    fn test_link_for_stored_event() {
        let (store, config) = (store(), config());
        let link = Exporter::new(&store, &config)
            .link("3", CalendarProvider::Google, now())
            .unwrap();

        let CalendarLink::Url { url } = link else {
            panic!("expected URL");
        };
        assert!(url.contains("dates=20250503T100000Z%2F20250503T110000Z"), "{}", url);
    }
}
