use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use dzevents_core::{CalendarLink, CalendarProvider, EventStore, ExportConfig, Exporter};

use crate::output::write_file;
use crate::render::render_written;

pub fn run(
    store: &EventStore,
    config: &ExportConfig,
    id: &str,
    provider: CalendarProvider,
    open: bool,
    out: Option<PathBuf>,
) -> Result<()> {
    let link = Exporter::new(store, config).link(id, provider, Utc::now())?;

    match link {
        CalendarLink::Url { url } => {
            println!("{}", url);
            if open {
                open::that(&url).context("Could not open the link in a browser")?;
            }
        }
        // Apple Calendar imports the .ics file directly
        CalendarLink::Ics(export) => {
            let dir = out.unwrap_or_else(|| PathBuf::from("."));
            let path = write_file(&dir, &export)?;
            println!("{}", render_written(&export, &path));
            if open {
                open::that(&path)
                    .with_context(|| format!("Could not open {}", path.display()))?;
            }
        }
    }

    Ok(())
}
