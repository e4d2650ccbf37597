use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{EarningsSeries, PriceSeries};

/// Ratios at or above this are treated as earnings shocks and discarded.
const MAX_HISTORICAL_PE: f64 = 200.0;

/// How a historical multiple was (or was not) obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MultipleMethod {
    #[serde(rename = "5y Historical Avg")]
    HistoricalAverage,
    #[serde(rename = "No historical EPS")]
    NoHistoricalEps,
    #[serde(rename = "No price history")]
    NoPriceHistory,
    #[serde(rename = "Insufficient data")]
    InsufficientData,
    #[serde(rename = "Error")]
    Error,
}

impl MultipleMethod {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::HistoricalAverage => "5y Historical Avg",
            Self::NoHistoricalEps => "No historical EPS",
            Self::NoPriceHistory => "No price history",
            Self::InsufficientData => "Insufficient data",
            Self::Error => "Error",
        }
    }
}

impl Display for MultipleMethod {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Average trailing P/E over the lookback window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoricalMultiple {
    pub multiple: Option<f64>,
    pub method: MultipleMethod,
}

impl HistoricalMultiple {
    const fn missing(method: MultipleMethod) -> Self {
        Self {
            multiple: None,
            method,
        }
    }

    /// Outcome reported when fetching the input series failed.
    pub const fn error() -> Self {
        Self::missing(MultipleMethod::Error)
    }
}

/// Average the P/E of every reporting period with positive EPS.
///
/// Each report is paired with the latest close on or before its date; reports
/// that predate the price history are skipped rather than extrapolated.
pub fn estimate_historical_multiple(
    earnings: &EarningsSeries,
    prices: &PriceSeries,
) -> HistoricalMultiple {
    if earnings.is_empty() {
        return HistoricalMultiple::missing(MultipleMethod::NoHistoricalEps);
    }
    if prices.is_empty() {
        return HistoricalMultiple::missing(MultipleMethod::NoPriceHistory);
    }

    let ratios: Vec<f64> = earnings
        .points()
        .iter()
        .filter(|report| report.value > 0.0)
        .filter_map(|report| {
            let close = prices.close_on_or_before(report.date)?;
            let ratio = close / report.value;
            if ratio > 0.0 && ratio < MAX_HISTORICAL_PE {
                Some(ratio)
            } else {
                tracing::debug!(
                    date = %report.date,
                    ratio,
                    "discarding out-of-range historical P/E"
                );
                None
            }
        })
        .collect();

    if ratios.is_empty() {
        return HistoricalMultiple::missing(MultipleMethod::InsufficientData);
    }

    HistoricalMultiple {
        multiple: Some(ratios.iter().sum::<f64>() / ratios.len() as f64),
        method: MultipleMethod::HistoricalAverage,
    }
}
