use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{TradingDate, ValidationError};

/// Asset category a symbol is tracked and classified under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    Equity,
    Etf,
    Crypto,
}

impl AssetClass {
    pub const ALL: [AssetClass; 3] = [Self::Equity, Self::Etf, Self::Crypto];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Equity => "equity",
            Self::Etf => "etf",
            Self::Crypto => "crypto",
        }
    }

    /// Watchlist document key for this class.
    pub const fn category(self) -> &'static str {
        match self {
            Self::Equity => "stocks",
            Self::Etf => "etfs",
            Self::Crypto => "crypto",
        }
    }
}

impl Display for AssetClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetClass {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "equity" | "stock" | "stocks" => Ok(Self::Equity),
            "etf" | "etfs" => Ok(Self::Etf),
            "crypto" => Ok(Self::Crypto),
            _ => Err(ValidationError::InvalidAssetClass {
                value: s.to_owned(),
            }),
        }
    }
}

/// Point-in-time quote and trailing fundamentals for one instrument.
///
/// Providers omit fields freely; every field is optional and an absent field
/// is never read as zero. Keys also accept the provider's camelCase spelling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteSnapshot {
    #[serde(alias = "shortName", deserialize_with = "lenient_text")]
    pub short_name: Option<String>,
    #[serde(alias = "currentPrice", deserialize_with = "lenient_number")]
    pub current_price: Option<f64>,
    #[serde(alias = "regularMarketPrice", deserialize_with = "lenient_number")]
    pub regular_market_price: Option<f64>,
    #[serde(alias = "trailingEps", deserialize_with = "lenient_number")]
    pub trailing_eps: Option<f64>,
    #[serde(alias = "trailingPE", deserialize_with = "lenient_number")]
    pub trailing_pe: Option<f64>,
    #[serde(alias = "forwardPE", deserialize_with = "lenient_number")]
    pub forward_pe: Option<f64>,
    #[serde(alias = "pegRatio", deserialize_with = "lenient_number")]
    pub peg_ratio: Option<f64>,
    #[serde(alias = "bookValue", deserialize_with = "lenient_number")]
    pub book_value: Option<f64>,
    #[serde(alias = "targetMeanPrice", deserialize_with = "lenient_number")]
    pub target_mean_price: Option<f64>,
    #[serde(alias = "marketCap", deserialize_with = "lenient_number")]
    pub market_cap: Option<f64>,
    #[serde(alias = "dividendYield", deserialize_with = "lenient_number")]
    pub dividend_yield: Option<f64>,
    #[serde(alias = "priceToBook", deserialize_with = "lenient_number")]
    pub price_to_book: Option<f64>,
    #[serde(alias = "priceToSalesTrailing12Months", deserialize_with = "lenient_number")]
    pub price_to_sales: Option<f64>,
    #[serde(alias = "enterpriseValue", deserialize_with = "lenient_number")]
    pub enterprise_value: Option<f64>,
    #[serde(alias = "debtToEquity", deserialize_with = "lenient_number")]
    pub debt_to_equity: Option<f64>,
    #[serde(alias = "fiftyTwoWeekHigh", deserialize_with = "lenient_number")]
    pub fifty_two_week_high: Option<f64>,
    #[serde(alias = "fiftyDayAverage", deserialize_with = "lenient_number")]
    pub fifty_day_average: Option<f64>,
    #[serde(alias = "twoHundredDayAverage", deserialize_with = "lenient_number")]
    pub two_hundred_day_average: Option<f64>,
    #[serde(alias = "circulatingSupply", deserialize_with = "lenient_number")]
    pub circulating_supply: Option<f64>,
    #[serde(alias = "volume24Hr", deserialize_with = "lenient_number")]
    pub volume_24h: Option<f64>,
    #[serde(deserialize_with = "lenient_text")]
    pub category: Option<String>,
    #[serde(alias = "annualReportExpenseRatio", deserialize_with = "lenient_number")]
    pub expense_ratio: Option<f64>,
    #[serde(alias = "ytdReturn", deserialize_with = "lenient_number")]
    pub ytd_return: Option<f64>,
    #[serde(alias = "yield", deserialize_with = "lenient_number")]
    pub fund_yield: Option<f64>,
    #[serde(alias = "totalAssets", deserialize_with = "lenient_number")]
    pub total_assets: Option<f64>,
}

impl QuoteSnapshot {
    /// Current trading price, falling back to the regular-market price.
    ///
    /// Only finite, strictly positive prices count; anything else means the
    /// instrument cannot be valued this cycle.
    pub fn price(&self) -> Option<f64> {
        [self.current_price, self.regular_market_price]
            .into_iter()
            .flatten()
            .find(|price| price.is_finite() && *price > 0.0)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LenientField<T> {
    Valid(T),
    Invalid(IgnoredAny),
}

/// Reads a numeric field, dropping values of the wrong type instead of the
/// whole snapshot.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<LenientField<f64>>::deserialize(deserializer)? {
        Some(LenientField::Valid(value)) if value.is_finite() => Some(value),
        Some(_) => {
            tracing::warn!("ignoring non-numeric quote field");
            None
        }
        None => None,
    })
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<LenientField<String>>::deserialize(deserializer)? {
        Some(LenientField::Valid(text)) => Some(text),
        Some(LenientField::Invalid(_)) => {
            tracing::warn!("ignoring non-text quote field");
            None
        }
        None => None,
    })
}

/// One dated observation in an earnings or price series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub date: TradingDate,
    pub value: f64,
}

/// Per-period earnings-per-share, in provider order.
///
/// Duplicate report dates are kept; non-positive values are kept and left to
/// the consumers to exclude.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EarningsSeries {
    points: Vec<SeriesPoint>,
}

impl EarningsSeries {
    pub fn new(points: impl IntoIterator<Item = (TradingDate, f64)>) -> Self {
        Self {
            points: finite_points(points, "eps"),
        }
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Daily closes ordered by date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceSeries {
    points: Vec<SeriesPoint>,
}

impl PriceSeries {
    pub fn new(points: impl IntoIterator<Item = (TradingDate, f64)>) -> Self {
        let mut points = finite_points(points, "close");
        points.sort_by_key(|point| point.date);
        Self { points }
    }

    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn latest_date(&self) -> Option<TradingDate> {
        self.points.last().map(|point| point.date)
    }

    /// Most recent close dated on or before `date`.
    pub fn close_on_or_before(&self, date: TradingDate) -> Option<f64> {
        let end = self.points.partition_point(|point| point.date <= date);
        end.checked_sub(1).map(|index| self.points[index].value)
    }

    /// Keep only observations dated on or after `start`.
    pub fn since(&self, start: TradingDate) -> Self {
        let from = self.points.partition_point(|point| point.date < start);
        Self {
            points: self.points[from..].to_vec(),
        }
    }
}

/// Everything the pipeline consumes for one symbol.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstrumentData {
    pub quote: QuoteSnapshot,
    pub earnings: EarningsSeries,
    pub prices: PriceSeries,
}

fn finite_points(
    points: impl IntoIterator<Item = (TradingDate, f64)>,
    field: &'static str,
) -> Vec<SeriesPoint> {
    points
        .into_iter()
        .filter_map(|(date, value)| {
            if value.is_finite() {
                Some(SeriesPoint { date, value })
            } else {
                tracing::debug!(%date, field, "dropping non-finite series value");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(raw: &str) -> TradingDate {
        TradingDate::parse(raw).expect("valid date")
    }

    #[test]
    fn asset_class_parses_category_names() {
        assert_eq!("stocks".parse::<AssetClass>(), Ok(AssetClass::Equity));
        assert_eq!("ETFs".parse::<AssetClass>(), Ok(AssetClass::Etf));
        assert_eq!("crypto".parse::<AssetClass>(), Ok(AssetClass::Crypto));
        assert!(matches!(
            "bonds".parse::<AssetClass>(),
            Err(ValidationError::InvalidAssetClass { .. })
        ));
        assert_eq!(AssetClass::Etf.category(), "etfs");
    }

    #[test]
    fn price_prefers_current_then_regular_market() {
        let mut quote = QuoteSnapshot {
            current_price: Some(10.0),
            regular_market_price: Some(11.0),
            ..QuoteSnapshot::default()
        };
        assert_eq!(quote.price(), Some(10.0));

        quote.current_price = None;
        assert_eq!(quote.price(), Some(11.0));

        quote.current_price = Some(0.0);
        quote.regular_market_price = None;
        assert_eq!(quote.price(), None);
    }

    #[test]
    fn snapshot_accepts_provider_keys() {
        let quote: QuoteSnapshot = serde_json::from_str(
            r#"{"currentPrice": 150.0, "trailingPE": 30.0, "yield": 0.015, "volume24Hr": 1e9}"#,
        )
        .expect("provider payload");
        assert_eq!(quote.current_price, Some(150.0));
        assert_eq!(quote.trailing_pe, Some(30.0));
        assert_eq!(quote.fund_yield, Some(0.015));
        assert_eq!(quote.volume_24h, Some(1e9));
        assert_eq!(quote.trailing_eps, None);
    }

    #[test]
    fn snapshot_drops_only_the_malformed_field() {
        let quote: QuoteSnapshot = serde_json::from_str(
            r#"{"currentPrice": 150, "targetMeanPrice": 200.0, "trailingPE": "Infinity",
                "shortName": 42, "marketCap": null}"#,
        )
        .expect("lenient payload");
        assert_eq!(quote.current_price, Some(150.0));
        assert_eq!(quote.target_mean_price, Some(200.0));
        assert_eq!(quote.trailing_pe, None);
        assert_eq!(quote.short_name, None);
        assert_eq!(quote.market_cap, None);
    }

    #[test]
    fn price_series_sorts_and_looks_up_on_or_before() {
        let prices = PriceSeries::new([
            (date("2023-01-03"), 102.0),
            (date("2023-01-01"), 100.0),
            (date("2023-01-02"), f64::NAN),
        ]);
        assert_eq!(prices.len(), 2);
        assert_eq!(prices.close_on_or_before(date("2022-12-31")), None);
        assert_eq!(prices.close_on_or_before(date("2023-01-01")), Some(100.0));
        assert_eq!(prices.close_on_or_before(date("2023-01-02")), Some(100.0));
        assert_eq!(prices.close_on_or_before(date("2024-06-30")), Some(102.0));
        assert_eq!(prices.since(date("2023-01-02")).len(), 1);
    }

    #[test]
    fn earnings_series_keeps_order_duplicates_and_non_positive_values() {
        let earnings = EarningsSeries::new([
            (date("2023-01-01"), 5.0),
            (date("2023-01-01"), -1.0),
            (date("2022-01-01"), f64::INFINITY),
        ]);
        let values: Vec<f64> = earnings.points().iter().map(|p| p.value).collect();
        assert_eq!(values, vec![5.0, -1.0]);
    }
}
