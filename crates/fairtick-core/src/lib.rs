//! # Fairtick Core
//!
//! Valuation engine and domain types for the fairtick watchlist toolkit.
//!
//! ## Overview
//!
//! This crate turns provider data into classified valuation records:
//!
//! - **Canonical domain types** for symbols, dates, quotes, and price/EPS series
//! - **Historical multiple estimator** over five years of earnings and closes
//! - **Valuation models** aggregated into a composite fair value with fallbacks
//! - **Classification** per asset class, plus the crypto trend overlay
//! - **Freshness cache** and a provider-backed batch [`Valuator`]
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Provider implementations (fixture documents) |
//! | [`cache`] | TTL freshness cache and cache settings |
//! | [`data_source`] | Provider trait, lookback window, provider errors |
//! | [`domain`] | Domain models (Symbol, TradingDate, QuoteSnapshot, series) |
//! | [`error`] | Validation errors |
//! | [`format`] | Large-number and percentage formatting |
//! | [`valuation`] | Pure estimator, models, aggregation, classification |
//! | [`valuator`] | Cached, fail-isolated batch evaluation |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use fairtick_core::{AssetClass, FixtureProvider, Symbol, Valuator, ValuatorConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let provider = FixtureProvider::from_path("fixtures/sample.json".as_ref())?;
//!     let valuator = Valuator::new(Arc::new(provider), ValuatorConfig::default());
//!
//!     let report = valuator
//!         .evaluate_batch(AssetClass::Equity, &[Symbol::parse("AAPL")?])
//!         .await;
//!     for record in report.undervalued() {
//!         println!("{} {}", record.symbol, record.status);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │  CLI / User     │
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │    Valuator     │────▶│ FreshnessCache   │
//! └────────┬────────┘     └──────────────────┘
//!          │
//!          ▼
//! ┌─────────────────┐     ┌──────────────────┐
//! │ MarketData      │     │ valuation::*     │
//! │ Provider        │────▶│ (pure pipeline)  │
//! └─────────────────┘     └──────────────────┘
//! ```

pub mod adapters;
pub mod cache;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod format;
pub mod valuation;
pub mod valuator;

pub use adapters::FixtureProvider;
pub use cache::{CacheSettings, FreshnessCache};
pub use data_source::{
    Lookback, MarketDataProvider, ProviderError, ProviderErrorKind, ProviderFuture,
};
pub use domain::{
    AssetClass, EarningsSeries, InstrumentData, PriceSeries, QuoteSnapshot, SeriesPoint, Symbol,
    TradingDate,
};
pub use error::ValidationError;
pub use format::{format_large_number, format_percent};
pub use valuation::{
    aggregate, build_models, crypto_trend, estimate_historical_multiple, evaluate,
    evaluate_instrument, ClassificationPolicy, FairValue, HistoricalMultiple, ModelDetail,
    ModelEstimate, ModelSet, MultipleMethod, RecordMetrics, Status, Trend, ValuationModel,
    ValuationRecord,
};
pub use valuator::{BatchReport, SymbolFailure, Valuator, ValuatorConfig};
