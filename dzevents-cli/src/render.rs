//! Terminal rendering for export results.
//!
//! Extension traits that add colored output to dzevents-core types using
//! owo_colors.

use std::path::Path;

use dzevents_core::{CalendarLink, CalendarProvider, IcsExport};
use owo_colors::OwoColorize;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for CalendarProvider {
    fn render(&self) -> String {
        let label = match self {
            CalendarProvider::Google => "Google",
            CalendarProvider::Outlook => "Outlook",
            CalendarProvider::Yahoo => "Yahoo",
            CalendarProvider::Apple => "Apple",
        };
        format!("{:<8}", label).bold().to_string()
    }
}

impl Render for CalendarLink {
    fn render(&self) -> String {
        match self {
            CalendarLink::Url { url } => url.clone(),
            CalendarLink::Ics(export) => format!("{} {}", export.filename, "(ics)".dimmed()),
        }
    }
}

/// Summary line for a written file
pub fn render_written(export: &IcsExport, path: &Path) -> String {
    let events = export
        .body
        .lines()
        .filter(|l| *l == "BEGIN:VEVENT")
        .count();
    let noun = if events == 1 { "event" } else { "events" };

    format!(
        "{} {} {}",
        "Wrote".green(),
        path.display(),
        format!("({} {})", events, noun).dimmed()
    )
}
