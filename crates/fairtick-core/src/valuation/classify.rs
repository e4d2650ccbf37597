//! Potential-to-label classification.
//!
//! Every asset class runs the same strategy: pick a reference value, compute
//! the potential `(reference - price) / price`, then walk an ordered band
//! table. Only the reference policy and the table differ per class.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::AssetClass;

/// Discrete valuation label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "Infravalorada")]
    Undervalued,
    #[serde(rename = "Precio Justo")]
    FairPrice,
    #[serde(rename = "Sobrevalorada")]
    Overvalued,
    #[serde(rename = "Oportunidad de Rebote")]
    ReboundOpportunity,
    #[serde(rename = "Recuperando")]
    Recovering,
    #[serde(rename = "Cerca de Máximos")]
    NearHighs,
    #[serde(rename = "En Máximos")]
    AtHighs,
    #[serde(rename = "Neutro")]
    Neutral,
    #[serde(rename = "N/A")]
    NotAvailable,
}

impl Status {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Undervalued => "Infravalorada",
            Self::FairPrice => "Precio Justo",
            Self::Overvalued => "Sobrevalorada",
            Self::ReboundOpportunity => "Oportunidad de Rebote",
            Self::Recovering => "Recuperando",
            Self::NearHighs => "Cerca de Máximos",
            Self::AtHighs => "En Máximos",
            Self::Neutral => "Neutro",
            Self::NotAvailable => "N/A",
        }
    }
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Moving-average trend signal for crypto, reported beside the status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trend {
    #[serde(rename = "Alcista (Bullish)")]
    Bullish,
    #[serde(rename = "Bajista (Bearish)")]
    Bearish,
    #[serde(rename = "Neutro")]
    Neutral,
    #[serde(rename = "N/A")]
    NotAvailable,
}

impl Trend {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bullish => "Alcista (Bullish)",
            Self::Bearish => "Bajista (Bearish)",
            Self::Neutral => "Neutro",
            Self::NotAvailable => "N/A",
        }
    }
}

impl Display for Trend {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Price above both averages is bullish, below both bearish.
pub fn crypto_trend(price: f64, ma_50: Option<f64>, ma_200: Option<f64>) -> Trend {
    let (Some(ma_50), Some(ma_200)) = (ma_50, ma_200) else {
        return Trend::NotAvailable;
    };

    if price > ma_50 && price > ma_200 {
        Trend::Bullish
    } else if price < ma_50 && price < ma_200 {
        Trend::Bearish
    } else {
        Trend::Neutral
    }
}

/// Which value the current price is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferencePolicy {
    /// Composite fair value; any present value is usable.
    FairValue,
    /// 52-week high; usable only when strictly positive.
    FiftyTwoWeekHigh,
}

impl ReferencePolicy {
    fn accepts(self, reference: f64) -> bool {
        match self {
            Self::FairValue => reference.is_finite(),
            Self::FiftyTwoWeekHigh => reference.is_finite() && reference > 0.0,
        }
    }
}

/// Lower edge of a band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    Above(f64),
    AtLeast(f64),
    Unbounded,
}

impl Bound {
    fn admits(self, potential: f64) -> bool {
        match self {
            Self::Above(edge) => potential > edge,
            Self::AtLeast(edge) => potential >= edge,
            Self::Unbounded => true,
        }
    }
}

/// Bands checked top-down; the first admitting band wins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdTable {
    pub bands: &'static [(Bound, Status)],
    /// Label used when no potential can be computed.
    pub missing: Status,
}

impl ThresholdTable {
    pub fn classify(&self, potential: Option<f64>) -> Status {
        let Some(potential) = potential else {
            return self.missing;
        };

        self.bands
            .iter()
            .find(|(bound, _)| bound.admits(potential))
            .map_or(self.missing, |(_, status)| *status)
    }
}

const FAIR_VALUE_BANDS: &[(Bound, Status)] = &[
    (Bound::Above(0.20), Status::Undervalued),
    (Bound::AtLeast(-0.20), Status::FairPrice),
    (Bound::Unbounded, Status::Overvalued),
];

const HIGH_WATERMARK_BANDS: &[(Bound, Status)] = &[
    (Bound::Above(0.20), Status::ReboundOpportunity),
    (Bound::Above(0.05), Status::Recovering),
    (Bound::AtLeast(0.0), Status::NearHighs),
    (Bound::Unbounded, Status::AtHighs),
];

pub const EQUITY_THRESHOLDS: ThresholdTable = ThresholdTable {
    bands: FAIR_VALUE_BANDS,
    missing: Status::NotAvailable,
};

pub const ETF_THRESHOLDS: ThresholdTable = ThresholdTable {
    bands: HIGH_WATERMARK_BANDS,
    missing: Status::NotAvailable,
};

pub const CRYPTO_THRESHOLDS: ThresholdTable = ThresholdTable {
    bands: HIGH_WATERMARK_BANDS,
    missing: Status::Neutral,
};

/// Reference policy plus threshold table for one asset class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationPolicy {
    pub reference: ReferencePolicy,
    pub thresholds: ThresholdTable,
}

impl ClassificationPolicy {
    pub const fn for_asset_class(asset_class: AssetClass) -> Self {
        match asset_class {
            AssetClass::Equity => Self {
                reference: ReferencePolicy::FairValue,
                thresholds: EQUITY_THRESHOLDS,
            },
            AssetClass::Etf => Self {
                reference: ReferencePolicy::FiftyTwoWeekHigh,
                thresholds: ETF_THRESHOLDS,
            },
            AssetClass::Crypto => Self {
                reference: ReferencePolicy::FiftyTwoWeekHigh,
                thresholds: CRYPTO_THRESHOLDS,
            },
        }
    }

    /// Signed fractional gap from `price` up to the reference.
    pub fn potential(&self, price: f64, reference: Option<f64>) -> Option<f64> {
        if !(price.is_finite() && price > 0.0) {
            return None;
        }
        reference
            .filter(|value| self.reference.accepts(*value))
            .map(|value| (value - price) / price)
    }

    pub fn classify(&self, potential: Option<f64>) -> Status {
        self.thresholds.classify(potential)
    }
}
