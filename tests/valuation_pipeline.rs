//! Behavior-driven tests for the valuation pipeline
//!
//! These tests verify WHAT a user sees for a symbol: the historical multiple,
//! the models that feed the fair value, and the final label.

use fairtick_core::valuation::growth_formula;
use fairtick_core::{
    aggregate, build_models, estimate_historical_multiple, evaluate, evaluate_instrument,
    AssetClass, ClassificationPolicy, EarningsSeries, InstrumentData, ModelDetail, ModelSet,
    MultipleMethod, PriceSeries, QuoteSnapshot, RecordMetrics, Status, Symbol, TradingDate, Trend,
    ValuationModel,
};

fn date(raw: &str) -> TradingDate {
    TradingDate::parse(raw).expect("valid date")
}

fn symbol(raw: &str) -> Symbol {
    Symbol::parse(raw).expect("valid symbol")
}

fn earnings(points: &[(&str, f64)]) -> EarningsSeries {
    EarningsSeries::new(points.iter().map(|(d, v)| (date(d), *v)))
}

fn prices(points: &[(&str, f64)]) -> PriceSeries {
    PriceSeries::new(points.iter().map(|(d, v)| (date(d), *v)))
}

// =============================================================================
// Historical multiple
// =============================================================================

#[test]
fn when_eps_and_closes_line_up_the_system_reports_their_average_multiple() {
    // Given: two annual reports with closes on the same dates
    let eps = earnings(&[("2022-01-01", 4.0), ("2023-01-01", 5.0)]);
    let closes = prices(&[("2022-01-01", 80.0), ("2023-01-01", 100.0)]);

    // When: the multiple is estimated
    let estimate = estimate_historical_multiple(&eps, &closes);

    // Then: both ratios are 20, so the mean is 20
    assert_eq!(estimate.multiple, Some(20.0));
    assert_eq!(estimate.method, MultipleMethod::HistoricalAverage);
    assert_eq!(estimate.method.to_string(), "5y Historical Avg");
}

#[test]
fn when_every_eps_is_non_positive_the_system_reports_insufficient_data() {
    // Given: losses and a break-even year
    let eps = earnings(&[("2021-12-31", -1.5), ("2022-12-31", 0.0), ("2023-12-31", -0.2)]);
    let closes = prices(&[("2021-12-31", 50.0), ("2022-12-31", 40.0), ("2023-12-31", 45.0)]);

    // When / Then
    let estimate = estimate_historical_multiple(&eps, &closes);
    assert_eq!(estimate.multiple, None);
    assert_eq!(estimate.method.to_string(), "Insufficient data");
}

#[test]
fn when_a_report_predates_all_prices_the_system_skips_it_instead_of_extrapolating() {
    // Given: the first report lands before any recorded close
    let eps = earnings(&[("2019-01-01", 1.0), ("2023-01-01", 5.0)]);
    let closes = prices(&[("2022-12-30", 150.0), ("2023-06-01", 500.0)]);

    // When
    let estimate = estimate_historical_multiple(&eps, &closes);

    // Then: only the 2023 report pairs, with the close from before its date
    assert_eq!(estimate.multiple, Some(30.0));
}

// =============================================================================
// Models and aggregation
// =============================================================================

#[test]
fn when_growth_is_moderate_the_graham_value_uses_it_unclamped() {
    assert_eq!(growth_formula(Some(5.0), Some(30.0), Some(1.5)), Some(242.5));
}

#[test]
fn when_implied_growth_is_extreme_the_graham_value_clamps_it_to_25() {
    let value = growth_formula(Some(5.0), Some(100.0), Some(1.0));
    assert_eq!(value, Some(292.5));
    assert_ne!(value, Some(5.0 * 208.5));
}

#[test]
fn when_no_model_applies_the_system_falls_back_to_trailing_pe() {
    // Given: EPS and trailing P/E but no target, PEG, or history
    let quote = QuoteSnapshot {
        trailing_eps: Some(5.0),
        trailing_pe: Some(30.0),
        ..QuoteSnapshot::default()
    };

    // When
    let fair = aggregate(&ModelSet::new(), &quote);

    // Then
    assert_eq!(fair.value, Some(150.0));
    assert_eq!(fair.detail, ModelDetail::FallbackTrailingPe);
    assert_eq!(fair.detail.to_string(), "Fallback: Trailing PE");
}

#[test]
fn when_nothing_is_known_the_fair_value_is_insufficient_data() {
    let fair = aggregate(&ModelSet::new(), &QuoteSnapshot::default());
    assert_eq!(fair.value, None);
    assert_eq!(fair.detail.to_string(), "Insufficient Data");
}

#[test]
fn when_only_non_positive_models_exist_the_system_reports_no_valid_models() {
    // Given: a negative analyst target is still a model
    let quote = QuoteSnapshot {
        target_mean_price: Some(-3.0),
        trailing_eps: Some(5.0),
        trailing_pe: Some(30.0),
        ..QuoteSnapshot::default()
    };
    let models = build_models(&quote, None);
    assert_eq!(models.len(), 1);

    // When / Then: the trailing P/E fallback does not kick in
    let fair = aggregate(&models, &quote);
    assert_eq!(fair.value, None);
    assert_eq!(fair.detail.to_string(), "No valid models");
}

#[test]
fn when_every_model_applies_the_detail_lists_each_one() {
    // Given: target, growth inputs, and a historical multiple
    let quote = QuoteSnapshot {
        current_price: Some(200.0),
        target_mean_price: Some(250.0),
        trailing_eps: Some(5.0),
        trailing_pe: Some(30.0),
        peg_ratio: Some(1.5),
        ..QuoteSnapshot::default()
    };

    // When
    let models = build_models(&quote, Some(20.0));
    let fair = aggregate(&models, &quote);

    // Then: (250 + 242.5 + 100) / 3
    assert_eq!(models.get(ValuationModel::HistoricalMultiple), Some(100.0));
    assert_eq!(fair.value, Some(592.5 / 3.0));
    assert_eq!(
        fair.detail.to_string(),
        "Analyst Target: $250.00\nGraham Formula: $242.50\nHistorical PE: $100.00"
    );
}

#[test]
fn when_a_loss_maker_has_a_historical_multiple_the_system_reports_no_valid_models() {
    // Given: negative trailing EPS alongside a trailing P/E and a history
    let quote = QuoteSnapshot {
        current_price: Some(100.0),
        trailing_eps: Some(-2.0),
        trailing_pe: Some(25.0),
        ..QuoteSnapshot::default()
    };

    // When
    let record =
        evaluate(&symbol("LOSS"), AssetClass::Equity, &quote, Some(20.0)).expect("record");

    // Then: the negative estimate is filtered and the fallback does not apply
    assert_eq!(record.fair_value, None);
    assert_eq!(record.potential, None);
    assert_eq!(record.status.to_string(), "N/A");
    match &record.metrics {
        RecordMetrics::Equity(metrics) => assert_eq!(metrics.models, "No valid models"),
        other => panic!("unexpected metrics {other:?}"),
    }
}

/// Every presence combination of the growth-formula inputs.
#[test]
fn growth_formula_truth_table_is_total() {
    let eps_cases = [None, Some(-1.0), Some(0.0), Some(5.0)];
    let pe_cases = [None, Some(30.0)];
    let peg_cases = [None, Some(-1.0), Some(0.0), Some(1.5)];

    for eps in eps_cases {
        for pe in pe_cases {
            for peg in peg_cases {
                let expected = (eps == Some(5.0) && pe.is_some() && peg == Some(1.5))
                    .then_some(242.5);
                assert_eq!(
                    growth_formula(eps, pe, peg),
                    expected,
                    "eps={eps:?} pe={pe:?} peg={peg:?}"
                );
            }
        }
    }
}

// =============================================================================
// Classification
// =============================================================================

#[test]
fn when_potential_sits_exactly_on_the_band_edge_the_equity_is_fairly_priced() {
    let policy = ClassificationPolicy::for_asset_class(AssetClass::Equity);

    let on_edge = policy.potential(100.0, Some(120.0));
    assert_eq!(on_edge, Some(0.20));
    assert_eq!(policy.classify(on_edge), Status::FairPrice);
    assert_eq!(Status::FairPrice.to_string(), "Precio Justo");

    assert_eq!(policy.classify(Some(0.2001)), Status::Undervalued);
    assert_eq!(Status::Undervalued.to_string(), "Infravalorada");
}

#[test]
fn when_the_52_week_high_is_missing_etf_and_crypto_defaults_differ() {
    let quote = QuoteSnapshot {
        current_price: Some(10.0),
        ..QuoteSnapshot::default()
    };

    let etf = evaluate(&symbol("VOO"), AssetClass::Etf, &quote, None).expect("record");
    let crypto = evaluate(&symbol("BTC-USD"), AssetClass::Crypto, &quote, None).expect("record");

    assert_eq!(etf.status.to_string(), "N/A");
    assert_eq!(crypto.status.to_string(), "Neutro");
}

#[test]
fn when_price_straddles_the_averages_the_crypto_trend_is_neutral() {
    let quote = QuoteSnapshot {
        current_price: Some(100.0),
        fifty_two_week_high: Some(100.0),
        fifty_day_average: Some(90.0),
        two_hundred_day_average: Some(110.0),
        ..QuoteSnapshot::default()
    };

    let record = evaluate(&symbol("ETH-USD"), AssetClass::Crypto, &quote, None).expect("record");

    assert_eq!(record.status.to_string(), "Cerca de Máximos");
    match record.metrics {
        RecordMetrics::Crypto(metrics) => assert_eq!(metrics.trend, Trend::Neutral),
        other => panic!("unexpected metrics {other:?}"),
    }
}

// =============================================================================
// Full pipeline
// =============================================================================

fn sample_instrument() -> InstrumentData {
    InstrumentData {
        quote: QuoteSnapshot {
            short_name: Some("Example Corp".into()),
            current_price: Some(100.0),
            target_mean_price: Some(127.5),
            trailing_eps: Some(5.0),
            trailing_pe: Some(20.0),
            peg_ratio: Some(2.0),
            market_cap: Some(1.2e11),
            ..QuoteSnapshot::default()
        },
        earnings: earnings(&[("2021-12-31", 4.0), ("2022-12-31", 4.5), ("2023-12-31", 5.0)]),
        prices: prices(&[
            ("2021-12-31", 72.0),
            ("2022-12-30", 81.0),
            ("2023-12-29", 90.0),
            ("2024-06-28", 100.0),
        ]),
    }
}

#[test]
fn when_the_pipeline_runs_end_to_end_the_record_carries_every_model() {
    // Given: an equity with full inputs
    let data = sample_instrument();

    // When
    let record = evaluate_instrument(&symbol("EXM"), AssetClass::Equity, &data).expect("record");

    // Then: multiple is 18, so models are 127.5, 142.5, 90 and the mean is 120
    assert_eq!(record.name, "Example Corp");
    assert_eq!(record.fair_value, Some(120.0));
    assert_eq!(record.potential, Some(0.20));
    assert_eq!(record.status, Status::FairPrice);
    match &record.metrics {
        RecordMetrics::Equity(metrics) => {
            assert_eq!(
                metrics.models,
                "Analyst Target: $127.50\nGraham Formula: $142.50\nHistorical PE: $90.00"
            );
            assert_eq!(metrics.market_cap, Some(1.2e11));
        }
        other => panic!("unexpected metrics {other:?}"),
    }
}

#[test]
fn when_the_pipeline_runs_twice_on_the_same_inputs_the_output_is_byte_identical() {
    let data = sample_instrument();

    let first = evaluate_instrument(&symbol("EXM"), AssetClass::Equity, &data);
    let second = evaluate_instrument(&symbol("EXM"), AssetClass::Equity, &data);

    let first = serde_json::to_vec(&first).expect("serializes");
    let second = serde_json::to_vec(&second).expect("serializes");
    assert_eq!(first, second);
}
