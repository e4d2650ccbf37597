//! # Valuation Engine
//!
//! Pure functions from provider inputs to a classified [`ValuationRecord`]:
//!
//! ```text
//! EarningsSeries + PriceSeries ──▶ estimate_historical_multiple
//!                                         │
//! QuoteSnapshot ─────────────────▶ build_models ──▶ aggregate ──▶ classify
//! ```
//!
//! Nothing here performs I/O or keeps state between calls, so evaluating the
//! same inputs twice produces identical records.

mod aggregate;
mod classify;
mod historical;
mod models;
mod record;

pub use aggregate::{aggregate, FairValue, ModelDetail};
pub use classify::{
    crypto_trend, Bound, ClassificationPolicy, ReferencePolicy, Status, ThresholdTable, Trend,
    CRYPTO_THRESHOLDS, EQUITY_THRESHOLDS, ETF_THRESHOLDS,
};
pub use historical::{estimate_historical_multiple, HistoricalMultiple, MultipleMethod};
pub use models::{build_models, growth_formula, ModelEstimate, ModelSet, ValuationModel};
pub use record::{
    evaluate, evaluate_instrument, CryptoMetrics, EquityMetrics, EtfMetrics, RecordMetrics,
    ValuationRecord,
};
