use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::QuoteSnapshot;

/// Base multiple of the growth formula for a no-growth company.
const NO_GROWTH_MULTIPLE: f64 = 8.5;
/// Ceiling on the growth rate implied by P/E over PEG, in percent.
const MAX_IMPLIED_GROWTH: f64 = 25.0;

/// Independent fair-value models in the default set.
///
/// A book-value model is intentionally absent; it undervalues asset-light
/// businesses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValuationModel {
    #[serde(rename = "Analyst Target")]
    AnalystTarget,
    #[serde(rename = "Graham Formula")]
    GrowthFormula,
    #[serde(rename = "Historical PE")]
    HistoricalMultiple,
}

impl ValuationModel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::AnalystTarget => "Analyst Target",
            Self::GrowthFormula => "Graham Formula",
            Self::HistoricalMultiple => "Historical PE",
        }
    }
}

impl Display for ValuationModel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A single model's estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelEstimate {
    pub model: ValuationModel,
    pub value: f64,
}

/// Estimates keyed by model, at most one per model, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelSet {
    estimates: Vec<ModelEstimate>,
}

impl ModelSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an estimate, replacing any previous value for the same model.
    pub fn insert(&mut self, model: ValuationModel, value: f64) {
        match self.estimates.iter_mut().find(|e| e.model == model) {
            Some(existing) => existing.value = value,
            None => self.estimates.push(ModelEstimate { model, value }),
        }
    }

    pub fn get(&self, model: ValuationModel) -> Option<f64> {
        self.estimates
            .iter()
            .find(|e| e.model == model)
            .map(|e| e.value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelEstimate> {
        self.estimates.iter()
    }

    pub fn len(&self) -> usize {
        self.estimates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.estimates.is_empty()
    }
}

/// Compute every model whose inputs are available.
pub fn build_models(quote: &QuoteSnapshot, historical_multiple: Option<f64>) -> ModelSet {
    let mut models = ModelSet::new();

    // Positivity is checked at aggregation for the analyst target.
    if let Some(target) = quote.target_mean_price {
        models.insert(ValuationModel::AnalystTarget, target);
    }

    if let Some(value) = growth_formula(quote.trailing_eps, quote.trailing_pe, quote.peg_ratio) {
        models.insert(ValuationModel::GrowthFormula, value);
    }

    // A loss-making EPS still yields an estimate; aggregation filters it out.
    let eps = quote.trailing_eps.filter(|eps| *eps != 0.0);
    if let (Some(multiple), Some(eps)) = (historical_multiple, eps) {
        models.insert(ValuationModel::HistoricalMultiple, eps * multiple);
    }

    tracing::debug!(count = models.len(), "built valuation models");
    models
}

/// `EPS * (8.5 + 2g)` with `g = min(P/E / PEG, 25)`.
pub fn growth_formula(eps: Option<f64>, trailing_pe: Option<f64>, peg: Option<f64>) -> Option<f64> {
    let eps = positive(eps)?;
    let trailing_pe = trailing_pe?;
    let peg = positive(peg)?;

    let growth = (trailing_pe / peg).min(MAX_IMPLIED_GROWTH);
    Some(eps * (NO_GROWTH_MULTIPLE + 2.0 * growth))
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}
