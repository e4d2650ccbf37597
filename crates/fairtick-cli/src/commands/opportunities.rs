use fairtick_core::{AssetClass, Valuator};

use super::{CommandResult, Context, Payload};

/// Watchlist stocks classified as undervalued.
pub async fn run(context: &Context) -> CommandResult {
    let valuator = Valuator::new(
        context.provider.clone(),
        context.settings.valuator_config(),
    );
    let report = valuator
        .evaluate_batch(AssetClass::Equity, context.store.symbols(AssetClass::Equity))
        .await;

    let undervalued = report.undervalued().cloned().collect();
    let mut result = CommandResult::from_report(report);
    result.payload = Payload::Records(undervalued);
    result
}
