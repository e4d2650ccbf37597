use std::io::{self, Write};

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use fairtick_core::{
    format_large_number, format_percent, AssetClass, RecordMetrics, ValuationRecord,
};
use fairtick_watchlist::Watchlist;
use serde_json::json;

use crate::cli::OutputFormat;
use crate::commands::{Payload, WatchlistChange};
use crate::error::CliError;
use crate::metadata::Envelope;

pub fn render(
    envelope: &Envelope<Payload>,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(envelope)?
            } else {
                serde_json::to_string(envelope)?
            };
            writeln!(out, "{payload}")?;
        }
        OutputFormat::Ndjson => render_ndjson(&mut out, envelope)?,
        OutputFormat::Table => render_table(&mut out, envelope)?,
    }
    Ok(())
}

/// One line per record (or one line for non-record payloads), then one line
/// per error.
fn render_ndjson(out: &mut impl Write, envelope: &Envelope<Payload>) -> Result<(), CliError> {
    match &envelope.data {
        Payload::Records(records) => {
            for record in records {
                writeln!(out, "{}", serde_json::to_string(record)?)?;
            }
        }
        other => writeln!(out, "{}", serde_json::to_string(other)?)?,
    }
    for error in &envelope.errors {
        writeln!(out, "{}", json!({ "error": error }))?;
    }
    Ok(())
}

fn render_table(out: &mut impl Write, envelope: &Envelope<Payload>) -> Result<(), CliError> {
    match &envelope.data {
        Payload::Records(records) => {
            if records.is_empty() {
                writeln!(out, "no records")?;
            }
            for asset_class in AssetClass::ALL {
                let rows: Vec<&ValuationRecord> = records
                    .iter()
                    .filter(|record| record.asset_class == asset_class)
                    .collect();
                if !rows.is_empty() {
                    writeln!(out, "{}", records_table(asset_class, &rows))?;
                }
            }
        }
        Payload::Watchlist(watchlist) => writeln!(out, "{}", watchlist_table(watchlist))?,
        Payload::Change(change) => writeln!(out, "{}", describe_change(change))?,
    }

    if !envelope.meta.warnings.is_empty() {
        writeln!(out, "warnings:")?;
        for warning in &envelope.meta.warnings {
            writeln!(out, "  - {warning}")?;
        }
    }
    if !envelope.errors.is_empty() {
        writeln!(out, "errors:")?;
        for error in &envelope.errors {
            let symbol = error.symbol.as_deref().unwrap_or("-");
            writeln!(out, "  - {symbol}: {} ({})", error.message, error.code)?;
        }
    }
    Ok(())
}

fn records_table(asset_class: AssetClass, records: &[&ValuationRecord]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let reference = match asset_class {
        AssetClass::Equity => "Fair Value",
        AssetClass::Etf | AssetClass::Crypto => "52w High",
    };
    let mut header = vec!["Symbol", "Name", "Price", reference, "Potential", "Status"];
    header.extend(match asset_class {
        AssetClass::Equity => vec!["Market Cap", "P/E", "P/B", "Div Yield", "Models"],
        AssetClass::Etf => vec!["Yield", "Expense", "YTD", "Assets", "Category"],
        AssetClass::Crypto => vec!["Trend", "Market Cap", "Volume 24h", "MA50", "MA200"],
    });
    table.set_header(header);

    for record in records {
        let mut row = vec![
            record.symbol.to_string(),
            record.name.clone(),
            format!("{:.2}", record.price),
            money(record.fair_value),
            format_percent(record.potential),
            record.status.to_string(),
        ];
        row.extend(metric_cells(&record.metrics));
        table.add_row(row);
    }
    table
}

fn metric_cells(metrics: &RecordMetrics) -> Vec<String> {
    match metrics {
        RecordMetrics::Equity(m) => vec![
            format_large_number(m.market_cap),
            ratio(m.trailing_pe),
            ratio(m.price_to_book),
            format_percent(m.dividend_yield),
            m.models.clone(),
        ],
        RecordMetrics::Etf(m) => vec![
            format_percent(m.fund_yield),
            format_percent(m.expense_ratio),
            format_percent(m.ytd_return),
            format_large_number(m.total_assets),
            m.category.clone().unwrap_or_else(|| String::from("-")),
        ],
        RecordMetrics::Crypto(m) => vec![
            m.trend.to_string(),
            format_large_number(m.market_cap),
            format_large_number(m.volume_24h),
            money(m.fifty_day_average),
            money(m.two_hundred_day_average),
        ],
    }
}

fn watchlist_table(watchlist: &Watchlist) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Category", "Symbols"]);
    for asset_class in AssetClass::ALL {
        let symbols = watchlist
            .symbols(asset_class)
            .iter()
            .map(|symbol| symbol.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![asset_class.category().to_owned(), symbols]);
    }
    table
}

fn describe_change(change: &WatchlistChange) -> String {
    let symbols = change
        .symbols
        .iter()
        .map(|symbol| symbol.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "{} {} [{symbols}]: {} changed{}",
        change.action,
        change.category,
        change.changed,
        if change.persisted { "" } else { " (not saved)" }
    )
}

fn money(value: Option<f64>) -> String {
    value.map_or_else(|| String::from("-"), |v| format!("${v:.2}"))
}

fn ratio(value: Option<f64>) -> String {
    value.map_or_else(|| String::from("-"), |v| format!("{v:.2}"))
}
