//! Market data provider contract.
//!
//! The engine never fetches anything itself; a [`MarketDataProvider`] hands
//! it a quote snapshot plus earnings and price series per symbol.
//!
//! | Method | Returns |
//! |--------|---------|
//! | [`snapshot`](MarketDataProvider::snapshot) | [`QuoteSnapshot`] |
//! | [`earnings`](MarketDataProvider::earnings) | [`EarningsSeries`] |
//! | [`price_history`](MarketDataProvider::price_history) | [`PriceSeries`] over a [`Lookback`] |

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use crate::{EarningsSeries, PriceSeries, QuoteSnapshot, Symbol};

/// Boxed future returned by provider methods.
pub type ProviderFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, ProviderError>> + Send + 'a>>;

/// Price-history window requested from a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lookback {
    years: u8,
}

impl Lookback {
    pub const fn years(years: u8) -> Self {
        Self { years }
    }

    pub const fn as_years(self) -> u8 {
        self.years
    }
}

impl Default for Lookback {
    fn default() -> Self {
        Self::years(5)
    }
}

/// Provider-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderErrorKind {
    NotFound,
    Unavailable,
    InvalidResponse,
    Internal,
}

/// Structured provider failure, reported per symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderError {
    kind: ProviderErrorKind,
    message: String,
}

impl ProviderError {
    pub fn not_found(symbol: &Symbol) -> Self {
        Self {
            kind: ProviderErrorKind::NotFound,
            message: format!("no data for symbol '{symbol}'"),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::Unavailable,
            message: message.into(),
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::InvalidResponse,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: ProviderErrorKind::Internal,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> ProviderErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            ProviderErrorKind::NotFound => "provider.not_found",
            ProviderErrorKind::Unavailable => "provider.unavailable",
            ProviderErrorKind::InvalidResponse => "provider.invalid_response",
            ProviderErrorKind::Internal => "provider.internal",
        }
    }
}

impl Display for ProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for ProviderError {}

/// Source of quotes, earnings history, and price history.
///
/// Implementations must be `Send + Sync`; the valuator holds them behind an
/// `Arc` and calls them one symbol at a time.
pub trait MarketDataProvider: Send + Sync {
    /// Short identifier used in logs and output metadata.
    fn id(&self) -> &'static str;

    /// Current quote and trailing fundamentals.
    ///
    /// # Errors
    ///
    /// [`ProviderErrorKind::NotFound`] for unknown symbols, otherwise any
    /// transport or decoding failure.
    fn snapshot<'a>(&'a self, symbol: &'a Symbol) -> ProviderFuture<'a, QuoteSnapshot>;

    /// Per-period EPS history.
    fn earnings<'a>(&'a self, symbol: &'a Symbol) -> ProviderFuture<'a, EarningsSeries>;

    /// Daily closes covering `lookback`.
    fn price_history<'a>(
        &'a self,
        symbol: &'a Symbol,
        lookback: Lookback,
    ) -> ProviderFuture<'a, PriceSeries>;
}
