use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use fairtick_core::{AssetClass, Symbol};

/// Stocks tracked when no watchlist file exists yet.
pub const DEFAULT_STOCKS: [&str; 10] = [
    "AAPL", "TSLA", "MSFT", "GOOGL", "AMZN", "META", "NVDA", "NFLX", "AMD", "INTC",
];

/// On-disk shapes accepted when loading.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StoredDocument {
    /// Flat array written by earlier releases; every entry is a stock.
    Legacy(Vec<Value>),
    Categorized(CategorizedDocument),
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CategorizedDocument {
    stocks: Vec<Value>,
    etfs: Vec<Value>,
    crypto: Vec<Value>,
}

/// Ordered, duplicate-free symbol lists per category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Watchlist {
    stocks: Vec<Symbol>,
    etfs: Vec<Symbol>,
    crypto: Vec<Symbol>,
}

impl Default for Watchlist {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Watchlist {
    pub fn empty() -> Self {
        Self {
            stocks: Vec::new(),
            etfs: Vec::new(),
            crypto: Vec::new(),
        }
    }

    /// Default stock list with empty ETF and crypto lists.
    pub fn defaults() -> Self {
        let mut watchlist = Self::empty();
        for raw in DEFAULT_STOCKS {
            if let Ok(symbol) = Symbol::parse(raw) {
                watchlist.insert(AssetClass::Equity, symbol);
            }
        }
        watchlist
    }

    /// Parse either the categorized document or the legacy flat array.
    ///
    /// Entries that are not valid symbols are skipped one by one.
    ///
    /// # Errors
    ///
    /// Fails when the input is not JSON or matches neither shape.
    pub fn from_json_str(input: &str) -> Result<Self, serde_json::Error> {
        let mut watchlist = Self::empty();
        match serde_json::from_str::<StoredDocument>(input)? {
            StoredDocument::Legacy(stocks) => {
                watchlist.extend_from_raw(AssetClass::Equity, stocks);
            }
            StoredDocument::Categorized(document) => {
                watchlist.extend_from_raw(AssetClass::Equity, document.stocks);
                watchlist.extend_from_raw(AssetClass::Etf, document.etfs);
                watchlist.extend_from_raw(AssetClass::Crypto, document.crypto);
            }
        }
        Ok(watchlist)
    }

    /// Categorized document as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn symbols(&self, asset_class: AssetClass) -> &[Symbol] {
        match asset_class {
            AssetClass::Equity => &self.stocks,
            AssetClass::Etf => &self.etfs,
            AssetClass::Crypto => &self.crypto,
        }
    }

    pub fn contains(&self, asset_class: AssetClass, symbol: &Symbol) -> bool {
        self.symbols(asset_class).contains(symbol)
    }

    /// Append `symbol` unless already tracked. Returns whether it was added.
    pub fn insert(&mut self, asset_class: AssetClass, symbol: Symbol) -> bool {
        if self.contains(asset_class, &symbol) {
            return false;
        }
        self.list_mut(asset_class).push(symbol);
        true
    }

    /// Remove every listed symbol. Returns how many were present.
    pub fn remove(&mut self, asset_class: AssetClass, symbols: &[Symbol]) -> usize {
        let list = self.list_mut(asset_class);
        let before = list.len();
        list.retain(|symbol| !symbols.contains(symbol));
        before - list.len()
    }

    pub fn len(&self) -> usize {
        self.stocks.len() + self.etfs.len() + self.crypto.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn list_mut(&mut self, asset_class: AssetClass) -> &mut Vec<Symbol> {
        match asset_class {
            AssetClass::Equity => &mut self.stocks,
            AssetClass::Etf => &mut self.etfs,
            AssetClass::Crypto => &mut self.crypto,
        }
    }

    fn extend_from_raw(&mut self, asset_class: AssetClass, entries: Vec<Value>) {
        for entry in entries {
            let parsed = entry.as_str().map(Symbol::parse);
            match parsed {
                Some(Ok(symbol)) => {
                    self.insert(asset_class, symbol);
                }
                Some(Err(error)) => {
                    warn!(
                        category = asset_class.category(),
                        %entry,
                        %error,
                        "skipping invalid watchlist symbol"
                    );
                }
                None => {
                    warn!(
                        category = asset_class.category(),
                        %entry,
                        "skipping non-string watchlist entry"
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols(list: &[Symbol]) -> Vec<&str> {
        list.iter().map(Symbol::as_str).collect()
    }

    #[test]
    fn legacy_array_becomes_stocks() {
        let watchlist = Watchlist::from_json_str(r#"["AAPL", "TSLA"]"#).expect("legacy");
        assert_eq!(symbols(watchlist.symbols(AssetClass::Equity)), ["AAPL", "TSLA"]);
        assert!(watchlist.symbols(AssetClass::Etf).is_empty());
        assert!(watchlist.symbols(AssetClass::Crypto).is_empty());
    }

    #[test]
    fn categorized_document_tolerates_missing_keys_and_bad_entries() {
        let watchlist = Watchlist::from_json_str(
            r#"{"stocks": ["msft", "MSFT", 42, "bad symbol"], "crypto": ["BTC-USD"]}"#,
        )
        .expect("categorized");
        assert_eq!(symbols(watchlist.symbols(AssetClass::Equity)), ["MSFT"]);
        assert!(watchlist.symbols(AssetClass::Etf).is_empty());
        assert_eq!(symbols(watchlist.symbols(AssetClass::Crypto)), ["BTC-USD"]);
    }

    #[test]
    fn rejects_documents_of_neither_shape() {
        assert!(Watchlist::from_json_str("\"AAPL\"").is_err());
        assert!(Watchlist::from_json_str("{not json").is_err());
    }

    #[test]
    fn insert_and_remove_keep_order_and_uniqueness() {
        let mut watchlist = Watchlist::empty();
        let voo = Symbol::parse("VOO").expect("valid");
        let qqq = Symbol::parse("QQQ").expect("valid");

        assert!(watchlist.insert(AssetClass::Etf, voo.clone()));
        assert!(watchlist.insert(AssetClass::Etf, qqq.clone()));
        assert!(!watchlist.insert(AssetClass::Etf, voo.clone()));
        assert_eq!(symbols(watchlist.symbols(AssetClass::Etf)), ["VOO", "QQQ"]);

        assert_eq!(watchlist.remove(AssetClass::Etf, &[voo, qqq.clone()]), 2);
        assert_eq!(watchlist.remove(AssetClass::Etf, &[qqq]), 0);
        assert!(watchlist.is_empty());
    }

    #[test]
    fn serializes_categorized_shape() {
        let json = Watchlist::defaults().to_json_pretty().expect("serialize");
        let value: Value = serde_json::from_str(&json).expect("json");
        assert_eq!(value["stocks"].as_array().map(Vec::len), Some(10));
        assert_eq!(value["etfs"], serde_json::json!([]));
        assert_eq!(value["crypto"], serde_json::json!([]));
    }
}
