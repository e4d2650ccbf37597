//! Offline provider backed by in-memory instrument data.
//!
//! Fixture documents are JSON objects keyed by symbol:
//!
//! ```json
//! {
//!   "AAPL": {
//!     "quote": { "currentPrice": 180.0, "trailingEps": 6.0 },
//!     "earnings": [{ "date": "2024-02-01", "eps": 2.18 }],
//!     "prices": [{ "date": "2024-02-01", "close": 186.9 }]
//!   }
//! }
//! ```
//!
//! Entries that do not parse are skipped with a warning so one bad row never
//! hides the rest of the document.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::data_source::{Lookback, MarketDataProvider, ProviderError, ProviderFuture};
use crate::{EarningsSeries, InstrumentData, PriceSeries, QuoteSnapshot, Symbol, TradingDate};

#[derive(Debug, Default, Deserialize)]
struct FixtureEntry {
    #[serde(default)]
    quote: Value,
    #[serde(default)]
    earnings: Vec<Value>,
    #[serde(default)]
    prices: Vec<Value>,
}

/// Serves quotes and series from a fixed symbol map.
#[derive(Debug, Clone, Default)]
pub struct FixtureProvider {
    instruments: HashMap<Symbol, InstrumentData>,
}

impl FixtureProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_instrument(mut self, symbol: Symbol, data: InstrumentData) -> Self {
        self.insert(symbol, data);
        self
    }

    pub fn insert(&mut self, symbol: Symbol, data: InstrumentData) {
        self.instruments.insert(symbol, data);
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    /// Symbols known to this provider, sorted.
    pub fn symbols(&self) -> Vec<Symbol> {
        let mut symbols: Vec<Symbol> = self.instruments.keys().cloned().collect();
        symbols.sort();
        symbols
    }

    /// Parse a fixture document.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] with kind `InvalidResponse` when the document
    /// is not a JSON object. Malformed entries inside it are skipped.
    pub fn from_json_str(input: &str) -> Result<Self, ProviderError> {
        let document: HashMap<String, Value> = serde_json::from_str(input)
            .map_err(|error| {
                ProviderError::invalid_response(format!("fixture document: {error}"))
            })?;

        let mut provider = Self::new();
        for (raw_symbol, raw_entry) in document {
            let symbol = match Symbol::parse(&raw_symbol) {
                Ok(symbol) => symbol,
                Err(error) => {
                    warn!(
                        symbol = %raw_symbol,
                        %error,
                        "skipping fixture entry with invalid symbol"
                    );
                    continue;
                }
            };
            let entry: FixtureEntry = match serde_json::from_value(raw_entry) {
                Ok(entry) => entry,
                Err(error) => {
                    warn!(%symbol, %error, "skipping malformed fixture entry");
                    continue;
                }
            };
            provider.insert(symbol.clone(), decode_entry(&symbol, entry));
        }

        Ok(provider)
    }

    /// Read and parse a fixture file.
    ///
    /// # Errors
    ///
    /// `Unavailable` when the file cannot be read, `InvalidResponse` when it
    /// is not a fixture document.
    pub fn from_path(path: &Path) -> Result<Self, ProviderError> {
        let contents = std::fs::read_to_string(path).map_err(|error| {
            ProviderError::unavailable(format!("cannot read fixture '{}': {error}", path.display()))
        })?;
        Self::from_json_str(&contents)
    }

    fn lookup(&self, symbol: &Symbol) -> Result<&InstrumentData, ProviderError> {
        self.instruments
            .get(symbol)
            .ok_or_else(|| ProviderError::not_found(symbol))
    }
}

fn decode_entry(symbol: &Symbol, entry: FixtureEntry) -> InstrumentData {
    let quote = if entry.quote.is_null() {
        QuoteSnapshot::default()
    } else {
        serde_json::from_value(entry.quote).unwrap_or_else(|error| {
            warn!(%symbol, %error, "fixture quote is malformed; using an empty snapshot");
            QuoteSnapshot::default()
        })
    };

    InstrumentData {
        quote,
        earnings: EarningsSeries::new(decode_points(symbol, &entry.earnings, "eps")),
        prices: PriceSeries::new(decode_points(symbol, &entry.prices, "close")),
    }
}

fn decode_points<'a>(
    symbol: &'a Symbol,
    rows: &'a [Value],
    value_key: &'static str,
) -> impl Iterator<Item = (TradingDate, f64)> + 'a {
    rows.iter().filter_map(move |row| {
        let point = row
            .get("date")
            .and_then(Value::as_str)
            .and_then(|raw| TradingDate::parse(raw).ok())
            .zip(row.get(value_key).and_then(Value::as_f64));
        if point.is_none() {
            warn!(%symbol, field = value_key, %row, "skipping malformed fixture row");
        }
        point
    })
}

impl MarketDataProvider for FixtureProvider {
    fn id(&self) -> &'static str {
        "fixture"
    }

    fn snapshot<'a>(&'a self, symbol: &'a Symbol) -> ProviderFuture<'a, QuoteSnapshot> {
        Box::pin(async move { self.lookup(symbol).map(|data| data.quote.clone()) })
    }

    fn earnings<'a>(&'a self, symbol: &'a Symbol) -> ProviderFuture<'a, EarningsSeries> {
        Box::pin(async move { self.lookup(symbol).map(|data| data.earnings.clone()) })
    }

    fn price_history<'a>(
        &'a self,
        symbol: &'a Symbol,
        lookback: Lookback,
    ) -> ProviderFuture<'a, PriceSeries> {
        Box::pin(async move {
            let prices = &self.lookup(symbol)?.prices;
            Ok(match prices.latest_date() {
                Some(latest) => prices.since(latest.years_before(lookback.as_years())),
                None => PriceSeries::default(),
            })
        })
    }
}
