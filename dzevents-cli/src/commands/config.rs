use std::path::{Path, PathBuf};

use anyhow::Result;
use dzevents_core::ExportConfig;
use owo_colors::OwoColorize;

pub fn run(
    config: &ExportConfig,
    config_file: Option<&Path>,
    events: Option<PathBuf>,
) -> Result<()> {
    let config_path = match config_file {
        Some(path) => path.to_path_buf(),
        None => ExportConfig::config_path()?,
    };
    let events_path = events.unwrap_or_else(|| config.events_path());

    println!("{}", "Paths".bold());
    println!("  Config:  {}", config_path.display());
    println!("  Events:  {}", events_path.display());
    println!();
    println!("{}", "Settings".bold());
    print!("{}", indent(&toml::to_string_pretty(config)?));

    Ok(())
}

fn indent(s: &str) -> String {
    s.lines().map(|l| format!("  {}\n", l)).collect()
}
