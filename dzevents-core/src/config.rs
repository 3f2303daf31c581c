//! Export configuration.
//!
//! Everything the formatters need beyond the event itself lives in
//! `ExportConfig`, which is passed into every call. Nothing reads settings
//! from global state.

use std::path::{Path, PathBuf};

use chrono_tz::Tz;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{ExportError, ExportResult};
use crate::event::Organizer;

static DEFAULT_EVENTS_FILE: &str = "~/.config/dzevents/events.toml";
static DEFAULT_PRODUCT_ID: &str = "-//DZ Events//Calendar Export//EN";

fn default_host() -> String {
    "localhost".to_string()
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_product_id() -> String {
    DEFAULT_PRODUCT_ID.to_string()
}

fn default_events_file() -> PathBuf {
    PathBuf::from(DEFAULT_EVENTS_FILE)
}

/// Configuration at ~/.config/dzevents/config.toml, overridable with
/// `DZEVENTS_*` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Domain used as the UID suffix (`event-<id>@<host>`)
    #[serde(default = "default_host")]
    pub host: String,

    /// Fallback organizer when an event has none of its own
    #[serde(default)]
    pub organizer_name: Option<String>,
    #[serde(default)]
    pub organizer_email: Option<String>,

    /// IANA zone the stored wall-clock times are in
    #[serde(default = "default_timezone")]
    pub timezone: String,

    #[serde(default = "default_product_id")]
    pub product_id: String,

    /// X-WR-CALNAME, if set
    #[serde(default)]
    pub calendar_name: Option<String>,

    #[serde(default = "default_events_file")]
    pub events_file: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            host: default_host(),
            organizer_name: None,
            organizer_email: None,
            timezone: default_timezone(),
            product_id: default_product_id(),
            calendar_name: None,
            events_file: default_events_file(),
        }
    }
}

impl ExportConfig {
    pub fn config_path() -> ExportResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ExportError::Config("Could not determine config directory".into()))?
            .join("dzevents");

        Ok(config_dir.join("config.toml"))
    }

    /// Load from the default config file (if it exists) and the environment.
    pub fn load() -> ExportResult<Self> {
        Self::build(&Self::config_path()?, false)
    }

    /// Load from `path` layered under `DZEVENTS_*` environment variables.
    /// The file must exist.
    pub fn load_from(path: &Path) -> ExportResult<Self> {
        Self::build(path, true)
    }

    fn build(path: &Path, required: bool) -> ExportResult<Self> {
        let config: ExportConfig = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(required))
            .add_source(Environment::with_prefix("DZEVENTS"))
            .build()
            .map_err(|e| ExportError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| ExportError::Config(e.to_string()))?;

        config.tz()?;
        Ok(config)
    }

    /// Organizer used for events that carry none of their own.
    pub fn fallback_organizer(&self) -> Organizer {
        Organizer {
            name: self.organizer_name.clone(),
            email: self.organizer_email.clone(),
        }
    }

    /// The configured timezone.
    pub fn tz(&self) -> ExportResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| ExportError::InvalidTimezone(self.timezone.clone()))
    }

    /// Events file path with `~` expanded.
    pub fn events_path(&self) -> PathBuf {
        let full_path_str = shellexpand::tilde(&self.events_file.to_string_lossy()).into_owned();
        PathBuf::from(full_path_str)
    }
}
