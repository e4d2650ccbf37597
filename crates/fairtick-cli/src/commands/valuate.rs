use fairtick_core::{AssetClass, BatchReport, Valuator};

use crate::cli::{CategoryArg, ValuateArgs};
use crate::error::CliError;

use super::{parse_symbols, CommandResult, Context};

/// Evaluate the requested categories.
///
/// Explicit symbols replace the watchlist; with `--category all` they are
/// valued as stocks.
pub async fn run(args: &ValuateArgs, context: &Context) -> Result<CommandResult, CliError> {
    let explicit = parse_symbols(&args.symbols)?;
    let valuator = Valuator::new(
        context.provider.clone(),
        context.settings.valuator_config(),
    );

    let mut report = BatchReport::default();
    if explicit.is_empty() {
        for asset_class in args.category.asset_classes() {
            let symbols = context.store.symbols(asset_class);
            tracing::debug!(
                category = asset_class.category(),
                count = symbols.len(),
                "valuing watchlist category"
            );
            report.merge(valuator.evaluate_batch(asset_class, symbols).await);
        }
    } else {
        let asset_class = match args.category {
            CategoryArg::Stocks | CategoryArg::All => AssetClass::Equity,
            CategoryArg::Etfs => AssetClass::Etf,
            CategoryArg::Crypto => AssetClass::Crypto,
        };
        report = valuator.evaluate_batch(asset_class, &explicit).await;
    }

    Ok(CommandResult::from_report(report))
}
