//! Provider-backed batch evaluation with freshness caching.
//!
//! The [`Valuator`] is the only stateful piece of the engine: it owns the
//! provider handle and two caches (finished records and historical multiples)
//! and feeds fetched data through the pure [`valuation`](crate::valuation)
//! pipeline.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::{CacheSettings, FreshnessCache};
use crate::data_source::{Lookback, MarketDataProvider, ProviderError};
use crate::valuation::{
    estimate_historical_multiple, evaluate, HistoricalMultiple, Status, ValuationRecord,
};
use crate::{AssetClass, Symbol};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValuatorConfig {
    pub cache: CacheSettings,
    pub lookback: Lookback,
}

/// A symbol whose snapshot could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolFailure {
    pub symbol: Symbol,
    pub asset_class: AssetClass,
    pub code: &'static str,
    pub message: String,
}

impl SymbolFailure {
    fn new(symbol: &Symbol, asset_class: AssetClass, error: &ProviderError) -> Self {
        Self {
            symbol: symbol.clone(),
            asset_class,
            code: error.code(),
            message: error.message().to_owned(),
        }
    }
}

/// Outcome of one evaluation cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchReport {
    /// Evaluated rows in request order.
    pub records: Vec<ValuationRecord>,
    /// Symbols whose snapshot fetch failed.
    pub failures: Vec<SymbolFailure>,
    /// Symbols whose snapshot carried no usable price.
    pub skipped: Vec<Symbol>,
}

impl BatchReport {
    /// Records classified as undervalued.
    pub fn undervalued(&self) -> impl Iterator<Item = &ValuationRecord> {
        self.records
            .iter()
            .filter(|record| record.status == Status::Undervalued)
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    pub fn merge(&mut self, other: BatchReport) {
        self.records.extend(other.records);
        self.failures.extend(other.failures);
        self.skipped.extend(other.skipped);
    }
}

pub struct Valuator {
    provider: Arc<dyn MarketDataProvider>,
    config: ValuatorConfig,
    records: FreshnessCache<(AssetClass, Symbol), ValuationRecord>,
    multiples: FreshnessCache<Symbol, HistoricalMultiple>,
}

impl Valuator {
    pub fn new(provider: Arc<dyn MarketDataProvider>, config: ValuatorConfig) -> Self {
        let record_ttl = config.cache.quote_ttl.max(config.cache.crypto_ttl);
        Self {
            provider,
            config,
            records: FreshnessCache::new(record_ttl),
            multiples: FreshnessCache::new(config.cache.history_ttl),
        }
    }

    pub fn provider_id(&self) -> &'static str {
        self.provider.id()
    }

    pub const fn config(&self) -> &ValuatorConfig {
        &self.config
    }

    /// Evaluate one symbol, serving a fresh cached record when available.
    ///
    /// Returns `Ok(None)` when the snapshot has no usable price.
    ///
    /// # Errors
    ///
    /// Only a failed snapshot fetch is an error. Failed earnings or price
    /// history fetches degrade the historical multiple instead.
    pub async fn evaluate_symbol(
        &self,
        asset_class: AssetClass,
        symbol: &Symbol,
    ) -> Result<Option<ValuationRecord>, ProviderError> {
        let key = (asset_class, symbol.clone());
        if let Some(record) = self.records.get(&key).await {
            debug!(%symbol, asset_class = asset_class.as_str(), "record cache hit");
            return Ok(Some(record));
        }

        let quote = self.provider.snapshot(symbol).await?;
        let multiple = match asset_class {
            AssetClass::Equity => self.historical_multiple(symbol).await.multiple,
            AssetClass::Etf | AssetClass::Crypto => None,
        };

        let Some(record) = evaluate(symbol, asset_class, &quote, multiple) else {
            return Ok(None);
        };
        self.records
            .put(key, record.clone(), Some(self.record_ttl(asset_class)))
            .await;
        Ok(Some(record))
    }

    /// Evaluate symbols in order; one failing symbol never aborts the rest.
    pub async fn evaluate_batch(&self, asset_class: AssetClass, symbols: &[Symbol]) -> BatchReport {
        let mut report = BatchReport::default();
        for symbol in symbols {
            match self.evaluate_symbol(asset_class, symbol).await {
                Ok(Some(record)) => report.records.push(record),
                Ok(None) => {
                    warn!(%symbol, "skipping symbol without a usable price");
                    report.skipped.push(symbol.clone());
                }
                Err(error) => {
                    warn!(%symbol, code = error.code(), %error, "snapshot fetch failed");
                    report
                        .failures
                        .push(SymbolFailure::new(symbol, asset_class, &error));
                }
            }
        }
        report
    }

    /// Drop expired entries from both caches.
    pub async fn clear_expired(&self) {
        self.records.clear_expired().await;
        self.multiples.clear_expired().await;
    }

    async fn historical_multiple(&self, symbol: &Symbol) -> HistoricalMultiple {
        if let Some(cached) = self.multiples.get(symbol).await {
            return cached;
        }

        let earnings = self.provider.earnings(symbol).await;
        let prices = self
            .provider
            .price_history(symbol, self.config.lookback)
            .await;
        let estimate = match (earnings, prices) {
            (Ok(earnings), Ok(prices)) => estimate_historical_multiple(&earnings, &prices),
            (Err(error), _) | (_, Err(error)) => {
                warn!(%symbol, code = error.code(), %error, "historical data unavailable");
                HistoricalMultiple::error()
            }
        };
        debug!(
            %symbol,
            method = %estimate.method,
            multiple = ?estimate.multiple,
            "historical multiple"
        );

        self.multiples.put(symbol.clone(), estimate, None).await;
        estimate
    }

    fn record_ttl(&self, asset_class: AssetClass) -> Duration {
        match asset_class {
            AssetClass::Crypto => self.config.cache.crypto_ttl,
            AssetClass::Equity | AssetClass::Etf => self.config.cache.quote_ttl,
        }
    }
}
