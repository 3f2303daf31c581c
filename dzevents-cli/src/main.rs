mod commands;
mod output;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use dzevents_core::{CalendarProvider, EventStore, ExportConfig};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::output::Destination;

#[derive(Parser)]
#[command(name = "dzevents")]
#[command(about = "Export events as ICS files or add-to-calendar links")]
struct Cli {
    /// Config file (default: ~/.config/dzevents/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Events file, TOML or JSON (overrides `events_file` from the config)
    #[arg(long, global = true)]
    events: Option<PathBuf>,

    /// Show debug logs
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export one event as an .ics file
    Export {
        id: String,

        /// Directory to write the file to (default: current directory)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Print the ICS document instead of writing a file
        #[arg(long, conflicts_with = "out")]
        stdout: bool,
    },
    /// Export several events into one .ics file
    ExportMany {
        #[arg(required = true)]
        ids: Vec<String>,

        /// Directory to write the file to (default: current directory)
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Print the ICS document instead of writing a file
        #[arg(long, conflicts_with = "out")]
        stdout: bool,
    },
    /// Build an add-to-calendar link for one event
    Link {
        id: String,

        #[arg(short, long, value_enum)]
        provider: Provider,

        /// Open the link (or the .ics file for Apple) afterwards
        #[arg(long)]
        open: bool,

        /// Directory for the Apple .ics file (default: current directory)
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Show links for every provider
    Links {
        id: String,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the effective configuration
    Config,
}

#[derive(Clone, Copy, ValueEnum)]
enum Provider {
    Google,
    Outlook,
    Yahoo,
    Apple,
}

impl From<Provider> for CalendarProvider {
    fn from(p: Provider) -> Self {
        match p {
            Provider::Google => CalendarProvider::Google,
            Provider::Outlook => CalendarProvider::Outlook,
            Provider::Yahoo => CalendarProvider::Yahoo,
            Provider::Apple => CalendarProvider::Apple,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Export { id, out, stdout } => {
            let store = load_store(&config, cli.events)?;
            commands::export::run(&store, &config, &id, Destination::new(out, stdout))
        }
        Commands::ExportMany { ids, out, stdout } => {
            let store = load_store(&config, cli.events)?;
            commands::export_many::run(&store, &config, &ids, Destination::new(out, stdout))
        }
        Commands::Link {
            id,
            provider,
            open,
            out,
        } => {
            let store = load_store(&config, cli.events)?;
            commands::link::run(&store, &config, &id, provider.into(), open, out)
        }
        Commands::Links { id, json } => {
            let store = load_store(&config, cli.events)?;
            commands::links::run(&store, &config, &id, json)
        }
        Commands::Config => commands::config::run(&config, cli.config.as_deref(), cli.events),
    }
}

/// Logs go to stderr so ICS printed on stdout stays clean.
fn init_logging(verbose: bool) {
    let default_filter = if verbose { "dzevents_cli=debug,dzevents_core=debug" } else { "warn" };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&std::path::Path>) -> Result<ExportConfig> {
    let config = match path {
        Some(path) => ExportConfig::load_from(path),
        None => ExportConfig::load(),
    };
    config.context("Could not load configuration")
}

fn load_store(config: &ExportConfig, events: Option<PathBuf>) -> Result<EventStore> {
    let path = events.unwrap_or_else(|| config.events_path());

    if !path.exists() {
        anyhow::bail!(
            "No events file found at {}.\n\n\
            Point to one with:\n  \
            dzevents --events <file> <command>\n\n\
            or set `events_file` in {}",
            path.display(),
            ExportConfig::config_path()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "the config file".to_string())
        );
    }

    let store = EventStore::load(&path)
        .with_context(|| format!("Could not load events from {}", path.display()))?;
    debug!(path = %path.display(), events = store.len(), "loaded events");

    Ok(store)
}
