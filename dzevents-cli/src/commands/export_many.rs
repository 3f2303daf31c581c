use std::collections::BTreeSet;

use anyhow::Result;
use chrono::Utc;
use dzevents_core::{EventId, EventStore, ExportConfig, Exporter};
use owo_colors::OwoColorize;

use crate::output::Destination;
use crate::render::render_written;

pub fn run(
    store: &EventStore,
    config: &ExportConfig,
    ids: &[String],
    dest: Destination,
) -> Result<()> {
    let export = Exporter::new(store, config).export_events(ids, Utc::now())?;

    if let Some(path) = dest.deliver(&export)? {
        println!("{}", render_written(&export, &path));

        let requested = unique_ids(ids);
        let written = export.body.lines().filter(|l| *l == "BEGIN:VEVENT").count();
        if written < requested {
            println!(
                "{}",
                format!(
                    "  {} of {} requested events were not exportable",
                    requested - written,
                    requested
                )
                .dimmed()
            );
        }
    }

    Ok(())
}

/// Number of distinct events named by `ids`, so "1 01 1" counts once.
fn unique_ids(ids: &[String]) -> usize {
    ids.iter()
        .filter_map(|id| EventId::parse(id).ok())
        .collect::<BTreeSet<_>>()
        .len()
}
