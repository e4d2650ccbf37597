//! CLI argument definitions for fairtick.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `valuate` | Value and classify watchlist (or listed) symbols |
//! | `opportunities` | Undervalued stocks only |
//! | `watchlist` | List, add, or remove tracked symbols |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `table` | Output format (table, json, ndjson) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--config` | `fairtick.toml` | Settings file |
//! | `--watchlist` | from settings | Watchlist JSON file |
//! | `--fixtures` | from settings | Provider fixture document |
//!
//! # Examples
//!
//! ```bash
//! fairtick --fixtures fixtures/sample.json valuate
//! fairtick --format json --pretty valuate --category crypto
//! fairtick watchlist add etfs VOO
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use fairtick_core::AssetClass;

/// Fair-value estimates and valuation labels for a watchlist.
#[derive(Debug, Parser)]
#[command(
    name = "fairtick",
    author,
    version,
    about = "Fair-value estimates and valuation labels for a watchlist",
    long_about = "fairtick values stocks against analyst targets, the Graham growth formula, and \
their own 5-year P/E history, and measures ETFs and crypto against their 52-week highs.\n\
\n\
Use 'fairtick <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Settings file (TOML). Defaults to `fairtick.toml` when present.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Watchlist file, overriding the configured path.
    #[arg(long, global = true)]
    pub watchlist: Option<PathBuf>,

    /// Fixture document served as market data.
    #[arg(long, global = true)]
    pub fixtures: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table.
    Table,
    /// Single JSON envelope.
    Json,
    /// One JSON record per line.
    Ndjson,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Value and classify symbols.
    Valuate(ValuateArgs),
    /// List undervalued stocks from the watchlist.
    Opportunities,
    /// Manage tracked symbols.
    Watchlist(WatchlistArgs),
}

#[derive(Debug, Args)]
pub struct ValuateArgs {
    /// Category to evaluate.
    #[arg(long, value_enum, default_value_t = CategoryArg::All)]
    pub category: CategoryArg,

    /// Symbols to evaluate instead of the watchlist.
    pub symbols: Vec<String>,
}

#[derive(Debug, Args)]
pub struct WatchlistArgs {
    #[command(subcommand)]
    pub command: WatchlistCommand,
}

#[derive(Debug, Subcommand)]
pub enum WatchlistCommand {
    /// Show every category.
    List,
    /// Track a symbol.
    Add {
        #[arg(value_enum)]
        category: Category,
        symbol: String,
        /// Skip the provider price check.
        #[arg(long, default_value_t = false)]
        no_validate: bool,
    },
    /// Stop tracking symbols.
    Remove {
        #[arg(value_enum)]
        category: Category,
        #[arg(required = true)]
        symbols: Vec<String>,
    },
}

/// Watchlist category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Category {
    Stocks,
    Etfs,
    Crypto,
}

impl From<Category> for AssetClass {
    fn from(value: Category) -> Self {
        match value {
            Category::Stocks => AssetClass::Equity,
            Category::Etfs => AssetClass::Etf,
            Category::Crypto => AssetClass::Crypto,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    Stocks,
    Etfs,
    Crypto,
    All,
}

impl CategoryArg {
    pub fn asset_classes(self) -> Vec<AssetClass> {
        match self {
            Self::Stocks => vec![AssetClass::Equity],
            Self::Etfs => vec![AssetClass::Etf],
            Self::Crypto => vec![AssetClass::Crypto],
            Self::All => AssetClass::ALL.to_vec(),
        }
    }
}
