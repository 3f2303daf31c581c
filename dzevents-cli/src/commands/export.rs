use anyhow::Result;
use chrono::Utc;
use dzevents_core::{EventStore, ExportConfig, Exporter};

use crate::output::Destination;
use crate::render::render_written;

pub fn run(store: &EventStore, config: &ExportConfig, id: &str, dest: Destination) -> Result<()> {
    let export = Exporter::new(store, config).export_event(id, Utc::now())?;

    if let Some(path) = dest.deliver(&export)? {
        println!("{}", render_written(&export, &path));
    }

    Ok(())
}
