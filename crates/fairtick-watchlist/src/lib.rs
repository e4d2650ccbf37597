//! # Fairtick Watchlist
//!
//! Durable, categorized symbol lists for fairtick.
//!
//! The store keeps three ordered lists (`stocks`, `etfs`, `crypto`) in a
//! single JSON document:
//!
//! ```json
//! { "stocks": ["AAPL", "MSFT"], "etfs": ["VOO"], "crypto": ["BTC-USD"] }
//! ```
//!
//! Files written by earlier releases hold a flat array of stock symbols;
//! those load into `stocks` and are rewritten in the categorized shape on the
//! next mutation.
//!
//! Persistence is best-effort. The in-memory list stays authoritative when a
//! write fails, and the failure is logged rather than surfaced as an error:
//!
//! ```rust,no_run
//! use fairtick_core::{AssetClass, Symbol};
//! use fairtick_watchlist::{AddOutcome, WatchlistStore};
//!
//! let mut store = WatchlistStore::open("tickers.json");
//! let symbol = Symbol::parse("BTC-USD").expect("valid symbol");
//! if let AddOutcome::Added(persisted) = store.add(AssetClass::Crypto, symbol) {
//!     println!("saved: {}", persisted.is_saved());
//! }
//! ```

mod document;
mod error;
mod store;

pub use document::{Watchlist, DEFAULT_STOCKS};
pub use error::WatchlistError;
pub use store::{AddOutcome, PersistOutcome, RemoveOutcome, WatchlistStore};
