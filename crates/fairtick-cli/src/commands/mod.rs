mod opportunities;
mod valuate;
mod watchlist;

use std::sync::Arc;

use fairtick_core::{BatchReport, FixtureProvider, MarketDataProvider, Symbol, ValuationRecord};
use fairtick_watchlist::{Watchlist, WatchlistStore};
use serde::Serialize;

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::metadata::{Envelope, EnvelopeError, Metadata};
use crate::settings::Settings;

/// Command payload, rendered per output format.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Records(Vec<ValuationRecord>),
    Watchlist(Watchlist),
    Change(WatchlistChange),
}

/// Summary of a watchlist mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WatchlistChange {
    pub action: &'static str,
    pub category: &'static str,
    pub symbols: Vec<Symbol>,
    pub changed: usize,
    pub persisted: bool,
}

pub struct CommandResult {
    pub payload: Payload,
    pub warnings: Vec<String>,
    pub errors: Vec<EnvelopeError>,
}

impl CommandResult {
    pub fn ok(payload: Payload) -> Self {
        Self {
            payload,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// Records plus one warning per unpriced symbol and one error per
    /// failed fetch.
    pub fn from_report(report: BatchReport) -> Self {
        let BatchReport {
            records,
            failures,
            skipped,
        } = report;

        Self {
            payload: Payload::Records(records),
            warnings: skipped
                .iter()
                .map(|symbol| format!("{symbol}: no usable price, skipped"))
                .collect(),
            errors: failures
                .into_iter()
                .map(|failure| EnvelopeError {
                    code: failure.code.to_owned(),
                    message: failure.message,
                    symbol: Some(failure.symbol.to_string()),
                })
                .collect(),
        }
    }
}

/// Shared state handed to every command.
pub struct Context {
    pub settings: Settings,
    pub provider: Arc<dyn MarketDataProvider>,
    pub store: WatchlistStore,
}

pub async fn run(cli: &Cli, settings: Settings) -> Result<Envelope<Payload>, CliError> {
    let mut warnings = Vec::new();
    let provider: Arc<dyn MarketDataProvider> = match &settings.fixtures_path {
        Some(path) => Arc::new(FixtureProvider::from_path(path)?),
        None => {
            warnings.push(String::from(
                "no fixtures configured; every symbol will be reported as not found",
            ));
            Arc::new(FixtureProvider::new())
        }
    };
    let store = WatchlistStore::open(&settings.watchlist_path);
    let mut context = Context {
        settings,
        provider,
        store,
    };

    let result = match &cli.command {
        Command::Valuate(args) => valuate::run(args, &context).await?,
        Command::Opportunities => opportunities::run(&context).await,
        Command::Watchlist(args) => watchlist::run(args, &mut context).await?,
    };

    let CommandResult {
        payload,
        warnings: command_warnings,
        errors,
    } = result;

    let mut meta = Metadata::new(context.provider.id());
    for warning in warnings.into_iter().chain(command_warnings) {
        meta.push_warning(warning);
    }

    Ok(Envelope {
        meta,
        data: payload,
        errors,
    })
}

fn parse_symbols(raw: &[String]) -> Result<Vec<Symbol>, CliError> {
    raw.iter()
        .map(|value| Symbol::parse(value).map_err(CliError::from))
        .collect()
}
