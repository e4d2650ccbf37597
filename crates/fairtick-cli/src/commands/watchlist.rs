use fairtick_core::{AssetClass, Symbol};
use fairtick_watchlist::{AddOutcome, PersistOutcome};

use crate::cli::{WatchlistArgs, WatchlistCommand};
use crate::error::CliError;

use super::{parse_symbols, CommandResult, Context, Payload, WatchlistChange};

pub async fn run(args: &WatchlistArgs, context: &mut Context) -> Result<CommandResult, CliError> {
    match &args.command {
        WatchlistCommand::List => Ok(CommandResult::ok(Payload::Watchlist(
            context.store.watchlist().clone(),
        ))),
        WatchlistCommand::Add {
            category,
            symbol,
            no_validate,
        } => {
            let asset_class = AssetClass::from(*category);
            let symbol = Symbol::parse(symbol)?;
            if !no_validate {
                ensure_priced(context, &symbol).await?;
            }
            Ok(add(context, asset_class, symbol))
        }
        WatchlistCommand::Remove { category, symbols } => {
            let asset_class = AssetClass::from(*category);
            let symbols = parse_symbols(symbols)?;
            Ok(remove(context, asset_class, symbols))
        }
    }
}

/// A symbol is only tracked once the provider can price it.
async fn ensure_priced(context: &Context, symbol: &Symbol) -> Result<(), CliError> {
    let quote = context.provider.snapshot(symbol).await.map_err(|error| {
        CliError::Command(format!("cannot validate '{symbol}': {error}"))
    })?;
    if quote.price().is_none() {
        return Err(CliError::Command(format!(
            "'{symbol}' has no usable price; use --no-validate to add it anyway"
        )));
    }
    Ok(())
}

fn add(context: &mut Context, asset_class: AssetClass, symbol: Symbol) -> CommandResult {
    let outcome = context.store.add(asset_class, symbol.clone());
    let (changed, persisted) = match outcome {
        AddOutcome::Added(persist) => (1, persist.is_saved()),
        AddOutcome::AlreadyPresent => (0, true),
    };

    let mut result = CommandResult::ok(Payload::Change(WatchlistChange {
        action: "add",
        category: asset_class.category(),
        symbols: vec![symbol.clone()],
        changed,
        persisted,
    }));
    match outcome {
        AddOutcome::AlreadyPresent => {
            result = result.with_warning(format!(
                "{symbol} is already tracked in {}",
                asset_class.category()
            ));
        }
        AddOutcome::Added(PersistOutcome::Failed) => {
            result = result.with_warning(unsaved_warning(context));
        }
        AddOutcome::Added(PersistOutcome::Saved) => {}
    }
    result
}

fn remove(context: &mut Context, asset_class: AssetClass, symbols: Vec<Symbol>) -> CommandResult {
    let outcome = context.store.remove(asset_class, &symbols);
    let removed = outcome.removed;
    let persisted = outcome.persist.is_none_or(PersistOutcome::is_saved);

    let mut result = CommandResult::ok(Payload::Change(WatchlistChange {
        action: "remove",
        category: asset_class.category(),
        changed: removed,
        symbols,
        persisted,
    }));
    if removed == 0 {
        result = result.with_warning(format!(
            "none of the symbols were tracked in {}",
            asset_class.category()
        ));
    }
    if !persisted {
        result = result.with_warning(unsaved_warning(context));
    }
    result
}

fn unsaved_warning(context: &Context) -> String {
    format!(
        "watchlist change kept in memory but not saved to {}",
        context.store.path().display()
    )
}
