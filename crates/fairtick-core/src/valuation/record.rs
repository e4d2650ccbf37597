use serde::Serialize;

use crate::valuation::aggregate::aggregate;
use crate::valuation::classify::{crypto_trend, ClassificationPolicy, Status, Trend};
use crate::valuation::historical::estimate_historical_multiple;
use crate::valuation::models::build_models;
use crate::{AssetClass, InstrumentData, QuoteSnapshot, Symbol};

/// Display ratios carried through for equities.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EquityMetrics {
    pub market_cap: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub trailing_pe: Option<f64>,
    pub price_to_book: Option<f64>,
    pub price_to_sales: Option<f64>,
    pub enterprise_value: Option<f64>,
    pub debt_to_equity: Option<f64>,
    /// Per-model breakdown or fallback note from aggregation.
    pub models: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EtfMetrics {
    pub fund_yield: Option<f64>,
    pub expense_ratio: Option<f64>,
    pub ytd_return: Option<f64>,
    pub category: Option<String>,
    pub total_assets: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CryptoMetrics {
    pub market_cap: Option<f64>,
    pub volume_24h: Option<f64>,
    pub circulating_supply: Option<f64>,
    pub fifty_day_average: Option<f64>,
    pub two_hundred_day_average: Option<f64>,
    pub trend: Trend,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordMetrics {
    Equity(EquityMetrics),
    Etf(EtfMetrics),
    Crypto(CryptoMetrics),
}

/// One evaluated row, computed fresh each cycle.
///
/// For ETFs and crypto `fair_value` holds the 52-week high the potential was
/// measured against.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValuationRecord {
    pub symbol: Symbol,
    pub name: String,
    pub asset_class: AssetClass,
    pub price: f64,
    pub fair_value: Option<f64>,
    pub potential: Option<f64>,
    pub status: Status,
    pub metrics: RecordMetrics,
}

/// Value one instrument from an already-computed historical multiple.
///
/// The multiple only feeds equities. Returns `None` when the quote has no
/// usable price.
pub fn evaluate(
    symbol: &Symbol,
    asset_class: AssetClass,
    quote: &QuoteSnapshot,
    historical_multiple: Option<f64>,
) -> Option<ValuationRecord> {
    let Some(price) = quote.price() else {
        tracing::debug!(%symbol, "no usable price in quote");
        return None;
    };
    let policy = ClassificationPolicy::for_asset_class(asset_class);

    let (reference, metrics) = match asset_class {
        AssetClass::Equity => {
            let models = build_models(quote, historical_multiple);
            let fair = aggregate(&models, quote);
            let metrics = RecordMetrics::Equity(EquityMetrics {
                market_cap: quote.market_cap,
                dividend_yield: quote.dividend_yield,
                trailing_pe: quote.trailing_pe,
                price_to_book: quote.price_to_book,
                price_to_sales: quote.price_to_sales,
                enterprise_value: quote.enterprise_value,
                debt_to_equity: quote.debt_to_equity,
                models: fair.detail.to_string(),
            });
            (fair.value, metrics)
        }
        AssetClass::Etf => (
            quote.fifty_two_week_high,
            RecordMetrics::Etf(EtfMetrics {
                fund_yield: quote.fund_yield,
                expense_ratio: quote.expense_ratio,
                ytd_return: quote.ytd_return,
                category: quote.category.clone(),
                total_assets: quote.total_assets,
            }),
        ),
        AssetClass::Crypto => (
            quote.fifty_two_week_high,
            RecordMetrics::Crypto(CryptoMetrics {
                market_cap: quote.market_cap,
                volume_24h: quote.volume_24h,
                circulating_supply: quote.circulating_supply,
                fifty_day_average: quote.fifty_day_average,
                two_hundred_day_average: quote.two_hundred_day_average,
                trend: crypto_trend(
                    price,
                    quote.fifty_day_average,
                    quote.two_hundred_day_average,
                ),
            }),
        ),
    };

    let potential = policy.potential(price, reference);
    Some(ValuationRecord {
        symbol: symbol.clone(),
        name: quote
            .short_name
            .clone()
            .unwrap_or_else(|| symbol.to_string()),
        asset_class,
        price,
        fair_value: reference,
        potential,
        status: policy.classify(potential),
        metrics,
    })
}

/// Full pure pipeline: estimator, models, aggregation, classification.
pub fn evaluate_instrument(
    symbol: &Symbol,
    asset_class: AssetClass,
    data: &InstrumentData,
) -> Option<ValuationRecord> {
    let multiple = match asset_class {
        AssetClass::Equity => estimate_historical_multiple(&data.earnings, &data.prices).multiple,
        AssetClass::Etf | AssetClass::Crypto => None,
    };
    evaluate(symbol, asset_class, &data.quote, multiple)
}
