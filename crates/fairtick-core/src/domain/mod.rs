//! # Domain Models
//!
//! Canonical inputs of the valuation engine.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`QuoteSnapshot`] | Quote plus trailing fundamentals, every field optional |
//! | [`EarningsSeries`] | Per-period EPS in provider order |
//! | [`PriceSeries`] | Daily closes sorted by date |
//! | [`InstrumentData`] | The three inputs for one symbol |
//! | [`AssetClass`] | Equity, ETF or crypto |
//! | [`Symbol`] | Validated ticker |
//! | [`TradingDate`] | `YYYY-MM-DD` calendar date |
//!
//! Missing provider fields are modelled as `None` throughout; nothing in this
//! module substitutes zero for an absent value.

mod date;
mod models;
mod symbol;

pub use date::TradingDate;
pub use models::{
    AssetClass, EarningsSeries, InstrumentData, PriceSeries, QuoteSnapshot, SeriesPoint,
};
pub use symbol::Symbol;
