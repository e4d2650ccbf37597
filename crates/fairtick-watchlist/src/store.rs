use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, error, warn};

use fairtick_core::{AssetClass, Symbol};

use crate::document::Watchlist;
use crate::error::WatchlistError;

/// Result of [`WatchlistStore::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added(PersistOutcome),
    AlreadyPresent,
}

/// Result of [`WatchlistStore::remove`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemoveOutcome {
    pub removed: usize,
    /// `None` when nothing changed and nothing was written.
    pub persist: Option<PersistOutcome>,
}

/// Whether a mutation reached disk.
///
/// A failed write never rolls back the in-memory change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistOutcome {
    Saved,
    Failed,
}

impl PersistOutcome {
    pub const fn is_saved(self) -> bool {
        matches!(self, Self::Saved)
    }
}

/// Watchlist bound to a JSON file.
#[derive(Debug, Clone)]
pub struct WatchlistStore {
    path: PathBuf,
    watchlist: Watchlist,
}

impl WatchlistStore {
    /// Load the watchlist at `path`.
    ///
    /// A missing, unreadable, or corrupt file yields the default watchlist;
    /// the file is not touched until the first mutation.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let watchlist = match fs::read_to_string(&path) {
            Ok(contents) => Watchlist::from_json_str(&contents).unwrap_or_else(|error| {
                warn!(path = %path.display(), %error, "watchlist file is corrupt; using defaults");
                Watchlist::defaults()
            }),
            Err(error) if error.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no watchlist file; using defaults");
                Watchlist::defaults()
            }
            Err(error) => {
                warn!(
                    path = %path.display(),
                    %error,
                    "watchlist file is unreadable; using defaults"
                );
                Watchlist::defaults()
            }
        };

        Self { path, watchlist }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn watchlist(&self) -> &Watchlist {
        &self.watchlist
    }

    pub fn symbols(&self, asset_class: AssetClass) -> &[Symbol] {
        self.watchlist.symbols(asset_class)
    }

    pub fn add(&mut self, asset_class: AssetClass, symbol: Symbol) -> AddOutcome {
        if !self.watchlist.insert(asset_class, symbol) {
            return AddOutcome::AlreadyPresent;
        }
        AddOutcome::Added(self.save())
    }

    /// Remove `symbols` from one category.
    ///
    /// Nothing is written when none of them were tracked.
    pub fn remove(&mut self, asset_class: AssetClass, symbols: &[Symbol]) -> RemoveOutcome {
        let removed = self.watchlist.remove(asset_class, symbols);
        let persist = (removed > 0).then(|| self.save());
        RemoveOutcome { removed, persist }
    }

    /// Best-effort persist; failures are logged, not returned.
    pub fn save(&self) -> PersistOutcome {
        match self.try_save() {
            Ok(()) => PersistOutcome::Saved,
            Err(err) => {
                error!(path = %self.path.display(), error = %err, "failed to save watchlist");
                PersistOutcome::Failed
            }
        }
    }

    /// Write the categorized document to a sibling temp file, then rename
    /// it over the target.
    pub fn try_save(&self) -> Result<(), WatchlistError> {
        let contents = self.watchlist.to_json_pretty()?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| WatchlistError::io(parent, e))?;
        }

        let temp_path = temp_sibling(&self.path);
        fs::write(&temp_path, contents).map_err(|e| WatchlistError::io(&temp_path, e))?;
        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            WatchlistError::io(&self.path, e)
        })
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "watchlist.json".into());
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_file_sits_next_to_target() {
        assert_eq!(
            temp_sibling(Path::new("/data/tickers.json")),
            PathBuf::from("/data/tickers.json.tmp")
        );
    }

    #[test]
    fn remove_of_untracked_symbol_writes_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("tickers.json");
        let mut store = WatchlistStore::open(&path);

        let outcome = store.remove(AssetClass::Crypto, &[Symbol::parse("BTC-USD").expect("valid")]);

        assert_eq!(outcome.removed, 0);
        assert_eq!(outcome.persist, None);
        assert!(!path.exists());
    }

    #[test]
    fn add_persists_categorized_document() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("tickers.json");
        let mut store = WatchlistStore::open(&path);

        let outcome = store.add(AssetClass::Etf, Symbol::parse("VOO").expect("valid"));

        assert_eq!(outcome, AddOutcome::Added(PersistOutcome::Saved));
        let reloaded = WatchlistStore::open(&path);
        assert_eq!(reloaded.watchlist(), store.watchlist());
        assert!(!temp_sibling(&path).exists());
    }
}
