//! Layered runtime settings.
//!
//! Sources, lowest precedence first: built-in defaults, a TOML file
//! (`fairtick.toml`, or `--config`), `FAIRTICK_*` environment variables
//! (nested keys separated by `__`, e.g. `FAIRTICK_CACHE__QUOTE_TTL_SECS`),
//! then command-line flags.

use std::path::{Path, PathBuf};

use fairtick_core::{CacheSettings, Lookback, ValuatorConfig};
use serde::Deserialize;

use crate::cli::Cli;
use crate::error::CliError;

const DEFAULT_CONFIG_FILE: &str = "fairtick.toml";
const ENV_PREFIX: &str = "FAIRTICK";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub watchlist_path: PathBuf,
    pub fixtures_path: Option<PathBuf>,
    pub history_years: u8,
    pub log_filter: String,
    pub cache: CacheSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            watchlist_path: PathBuf::from("tickers.json"),
            fixtures_path: None,
            history_years: 5,
            log_filter: String::from("warn"),
            cache: CacheSettings::default(),
        }
    }
}

impl Settings {
    /// Resolve settings for this invocation.
    ///
    /// An explicit `--config` file must exist; the default file is optional.
    pub fn load(cli: &Cli) -> Result<Self, CliError> {
        let mut settings = match &cli.config {
            Some(path) => Self::from_sources(path, true)?,
            None => Self::from_sources(Path::new(DEFAULT_CONFIG_FILE), false)?,
        };

        if let Some(path) = &cli.watchlist {
            settings.watchlist_path = path.clone();
        }
        if let Some(path) = &cli.fixtures {
            settings.fixtures_path = Some(path.clone());
        }
        Ok(settings)
    }

    fn from_sources(file: &Path, required: bool) -> Result<Self, CliError> {
        let settings = config::Config::builder()
            .add_source(
                config::File::from(file)
                    .format(config::FileFormat::Toml)
                    .required(required),
            )
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize::<Self>()?;
        Ok(settings)
    }

    pub fn valuator_config(&self) -> ValuatorConfig {
        ValuatorConfig {
            cache: self.cache,
            lookback: Lookback::years(self.history_years),
        }
    }
}
