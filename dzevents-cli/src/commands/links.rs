use anyhow::Result;
use chrono::Utc;
use dzevents_core::{CalendarProvider, EventStore, ExportConfig, Exporter};

use crate::render::Render;

pub fn run(store: &EventStore, config: &ExportConfig, id: &str, json: bool) -> Result<()> {
    let exporter = Exporter::new(store, config);
    let now = Utc::now();

    let mut links = Vec::with_capacity(CalendarProvider::ALL.len());
    for provider in CalendarProvider::ALL {
        links.push((provider, exporter.link(id, provider, now)?));
    }

    if json {
        let map: serde_json::Map<String, serde_json::Value> = links
            .iter()
            .map(|(provider, link)| Ok((provider.to_string(), serde_json::to_value(link)?)))
            .collect::<Result<_, serde_json::Error>>()?;
        println!("{}", serde_json::to_string_pretty(&map)?);
        return Ok(());
    }

    for (provider, link) in &links {
        println!("{} {}", provider.render(), link.render());
    }

    Ok(())
}
