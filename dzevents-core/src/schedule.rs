//! Resolving an event's stored dates and times into a concrete schedule.
//!
//! Rules:
//! - no start time and no end time: all-day, ending the day after the start
//!   (or the day after the end date for multi-day events)
//! - no end date: ends on the start date at the end time, or one hour after
//!   the start when there is no end time either
//! - otherwise both sides are taken as given, an empty time meaning midnight
//!
//! Wall-clock values are interpreted in the configured timezone and converted
//! to UTC once, here. Every output format works from the UTC instants.

use chrono::{DateTime, Days, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{ExportError, ExportResult};
use crate::event::EventCalendarRecord;

/// Length of a timed event with no end information.
pub const DEFAULT_DURATION_MINUTES: i64 = 60;

/// When an event happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSchedule {
    /// `end` is exclusive, as DTEND;VALUE=DATE expects
    AllDay { start: NaiveDate, end: NaiveDate },
    Timed { start: DateTime<Utc>, end: DateTime<Utc> },
}

impl EventSchedule {
    /// Resolve the record's schedule. Fails if there is no start date or a
    /// date/time does not parse.
    pub fn resolve(record: &EventCalendarRecord, tz: Tz) -> ExportResult<Self> {
        let start_date = record
            .start_date
            .as_deref()
            .ok_or(ExportError::MissingStart(record.id.get()))
            .and_then(parse_date)?;
        let end_date = record.end_date.as_deref().map(parse_date).transpose()?;
        let start_time = record.start_time.as_deref().map(parse_time).transpose()?;
        let end_time = record.end_time.as_deref().map(parse_time).transpose()?;

        if start_time.is_none() && end_time.is_none() {
            let last_day = match end_date {
                Some(d) if d > start_date => d,
                _ => start_date,
            };
            let end = next_day(last_day)?;
            return Ok(EventSchedule::AllDay {
                start: start_date,
                end,
            });
        }

        let start_local = start_date.and_time(start_time.unwrap_or(NaiveTime::MIN));
        let default_end = || add_signed(start_local, Duration::minutes(DEFAULT_DURATION_MINUTES));

        let end_local = match (end_date, end_time) {
            (None, Some(t)) => start_date.and_time(t),
            (None, None) => default_end()?,
            (Some(d), t) => d.and_time(t.unwrap_or(NaiveTime::MIN)),
        };
        let end_local = if end_local < start_local {
            default_end()?
        } else {
            end_local
        };

        Ok(EventSchedule::Timed {
            start: to_utc(start_local, tz)?,
            end: to_utc(end_local, tz)?,
        })
    }

    pub fn is_all_day(&self) -> bool {
        matches!(self, EventSchedule::AllDay { .. })
    }

    /// Start and end as UTC instants. All-day bounds are local midnights.
    pub fn instants(&self, tz: Tz) -> ExportResult<(DateTime<Utc>, DateTime<Utc>)> {
        match *self {
            EventSchedule::Timed { start, end } => Ok((start, end)),
            EventSchedule::AllDay { start, end } => Ok((
                to_utc(start.and_time(NaiveTime::MIN), tz)?,
                to_utc(end.and_time(NaiveTime::MIN), tz)?,
            )),
        }
    }
}

fn parse_date(s: &str) -> ExportResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| ExportError::InvalidDate(s.to_string()))
}

fn parse_time(s: &str) -> ExportResult<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|_| ExportError::InvalidTime(s.to_string()))
}

fn next_day(date: NaiveDate) -> ExportResult<NaiveDate> {
    date.checked_add_days(Days::new(1))
        .ok_or_else(|| ExportError::InvalidDate(date.to_string()))
}

fn add_signed(local: NaiveDateTime, delta: Duration) -> ExportResult<NaiveDateTime> {
    local
        .checked_add_signed(delta)
        .ok_or_else(|| ExportError::InvalidDate(local.to_string()))
}

/// Wall clock in `tz` to UTC. Times skipped by a DST jump move forward an
/// hour; repeated times take the earlier instant.
fn to_utc(local: NaiveDateTime, tz: Tz) -> ExportResult<DateTime<Utc>> {
    tz.from_local_datetime(&local)
        .earliest()
        .or_else(|| {
            local
                .checked_add_signed(Duration::hours(1))
                .and_then(|later| tz.from_local_datetime(&later).earliest())
        })
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| ExportError::InvalidTime(local.to_string()))
}
