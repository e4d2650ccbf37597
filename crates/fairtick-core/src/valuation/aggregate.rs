use std::fmt::{Display, Formatter};

use serde::{Serialize, Serializer};

use crate::valuation::models::{ModelEstimate, ModelSet};
use crate::QuoteSnapshot;

/// Explanation attached to a composite fair value.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelDetail {
    /// Every computed model, including those excluded from the mean.
    Models(Vec<ModelEstimate>),
    NoValidModels,
    FallbackTrailingPe,
    InsufficientData,
}

impl Display for ModelDetail {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Models(estimates) => {
                for (index, estimate) in estimates.iter().enumerate() {
                    if index > 0 {
                        f.write_str("\n")?;
                    }
                    write!(f, "{}: ${:.2}", estimate.model, estimate.value)?;
                }
                Ok(())
            }
            Self::NoValidModels => f.write_str("No valid models"),
            Self::FallbackTrailingPe => f.write_str("Fallback: Trailing PE"),
            Self::InsufficientData => f.write_str("Insufficient Data"),
        }
    }
}

impl Serialize for ModelDetail {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Composite fair value and how it was reached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FairValue {
    pub value: Option<f64>,
    pub detail: ModelDetail,
}

/// Combine the model set into one fair value.
///
/// With models present, the mean of the strictly positive estimates wins.
/// With no models at all, trailing EPS times trailing P/E is the last resort.
pub fn aggregate(models: &ModelSet, quote: &QuoteSnapshot) -> FairValue {
    if !models.is_empty() {
        let valid: Vec<f64> = models
            .iter()
            .map(|estimate| estimate.value)
            .filter(|value| *value > 0.0)
            .collect();

        if valid.is_empty() {
            return FairValue {
                value: None,
                detail: ModelDetail::NoValidModels,
            };
        }

        return FairValue {
            value: Some(valid.iter().sum::<f64>() / valid.len() as f64),
            detail: ModelDetail::Models(models.iter().copied().collect()),
        };
    }

    match (quote.trailing_eps, quote.trailing_pe) {
        (Some(eps), Some(trailing_pe)) => FairValue {
            value: Some(eps * trailing_pe),
            detail: ModelDetail::FallbackTrailingPe,
        },
        _ => FairValue {
            value: None,
            detail: ModelDetail::InsufficientData,
        },
    }
}
