//! JSON file-backed watch-list store.
//!
//! The backing file is a flat JSON object mapping symbol to target spend in
//! quote currency. A full overwrite happens on every save; the in-memory
//! mapping stays authoritative when a write fails.

use crate::error::StoreResult;
use rust_decimal::Decimal;
use sniper_core::WatchEntry;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default entry written when the watch-list file does not exist yet.
const DEFAULT_SYMBOL: &str = "NSGUSDT";
const DEFAULT_SPEND: Decimal = Decimal::from_parts(2, 0, 0, false, 0);

/// Watch-list store: symbol -> validated entry, backed by a JSON file.
#[derive(Debug)]
pub struct WatchlistStore {
    path: PathBuf,
    entries: HashMap<String, WatchEntry>,
}

impl WatchlistStore {
    /// Load the watch list from `path`.
    ///
    /// A missing file is replaced by a default single-entry file. Corrupt
    /// content is an error; callers fall back to an empty store rather than
    /// crash. Entries that fail validation (non-positive spend, empty
    /// symbol) are dropped with a warning.
    pub fn load(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            warn!(path = %path.display(), "Watch-list file not found, creating default");
            let mut store = Self {
                path,
                entries: HashMap::new(),
            };
            store.entries.insert(
                DEFAULT_SYMBOL.to_string(),
                WatchEntry::new(DEFAULT_SYMBOL, DEFAULT_SPEND)?,
            );
            store.save()?;
            return Ok(store);
        }

        let raw = std::fs::read_to_string(&path)?;
        let parsed: HashMap<String, Decimal> = serde_json::from_str(&raw)?;

        let mut entries = HashMap::with_capacity(parsed.len());
        for (symbol, spend) in parsed {
            match WatchEntry::new(&symbol, spend) {
                Ok(entry) => {
                    entries.insert(entry.symbol.clone(), entry);
                }
                Err(e) => {
                    warn!(%symbol, %spend, error = %e, "Dropping invalid watch-list entry");
                }
            }
        }

        info!(path = %path.display(), count = entries.len(), "Watch list loaded");
        Ok(Self { path, entries })
    }

    /// An empty store. Used as the fallback when the backing file is corrupt.
    pub fn empty(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            entries: HashMap::new(),
        }
    }

    /// Persist the full current mapping, overwriting prior content.
    pub fn save(&self) -> StoreResult<()> {
        // BTreeMap for a stable key order in the file
        let on_disk: BTreeMap<&str, Decimal> = self
            .entries
            .values()
            .map(|e| (e.symbol.as_str(), e.target_spend))
            .collect();
        let json = serde_json::to_string_pretty(&on_disk)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    /// Remove a symbol from the in-memory mapping and persist the result.
    ///
    /// The in-memory removal sticks even when the write fails; the running
    /// process must never act on the symbol again.
    pub fn remove_and_save(&mut self, symbol: &str) -> StoreResult<()> {
        self.entries.remove(symbol);
        self.save()
    }

    /// Whether `symbol` is still being watched.
    #[must_use]
    pub fn contains(&self, symbol: &str) -> bool {
        self.entries.contains_key(symbol)
    }

    /// Target spend for `symbol`, if watched.
    #[must_use]
    pub fn target_spend(&self, symbol: &str) -> Option<Decimal> {
        self.entries.get(symbol).map(|e| e.target_spend)
    }

    /// Snapshot of the watched symbols.
    #[must_use]
    pub fn symbols(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// All entries, for startup logging.
    pub fn entries(&self) -> impl Iterator<Item = &WatchEntry> {
        self.entries.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_creates_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snipe_config.json");

        let store = WatchlistStore::load(&path).unwrap();

        assert!(store.contains("NSGUSDT"));
        assert_eq!(store.target_spend("NSGUSDT"), Some(dec!(2)));
        // The default must have been persisted
        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: HashMap<String, Decimal> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.get("NSGUSDT"), Some(&dec!(2)));
    }

    #[test]
    fn test_load_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snipe_config.json");
        std::fs::write(&path, r#"{"ABCUSDT": 5.0, "XYZUSDT": 1.5}"#).unwrap();

        let store = WatchlistStore::load(&path).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.target_spend("ABCUSDT"), Some(dec!(5.0)));
        assert_eq!(store.target_spend("XYZUSDT"), Some(dec!(1.5)));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snipe_config.json");
        std::fs::write(&path, "not json at all {").unwrap();

        assert!(matches!(
            WatchlistStore::load(&path),
            Err(crate::StoreError::Corrupt(_))
        ));
    }

    #[test]
    fn test_invalid_entries_are_dropped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snipe_config.json");
        std::fs::write(&path, r#"{"ABCUSDT": 5.0, "BADUSDT": 0.0, "NEGUSDT": -1}"#).unwrap();

        let store = WatchlistStore::load(&path).unwrap();

        assert_eq!(store.len(), 1);
        assert!(store.contains("ABCUSDT"));
        assert!(!store.contains("BADUSDT"));
        assert!(!store.contains("NEGUSDT"));
    }

    #[test]
    fn test_remove_and_save_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snipe_config.json");
        std::fs::write(&path, r#"{"ABCUSDT": 5.0, "XYZUSDT": 1.5}"#).unwrap();

        let mut store = WatchlistStore::load(&path).unwrap();
        store.remove_and_save("ABCUSDT").unwrap();

        assert!(!store.contains("ABCUSDT"));
        let reloaded = WatchlistStore::load(&path).unwrap();
        assert!(!reloaded.contains("ABCUSDT"));
        assert!(reloaded.contains("XYZUSDT"));
    }

    #[test]
    fn test_remove_is_in_memory_even_if_save_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snipe_config.json");
        std::fs::write(&path, r#"{"ABCUSDT": 5.0}"#).unwrap();

        let mut store = WatchlistStore::load(&path).unwrap();
        // Make the write fail by replacing the file with a directory
        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir(&path).unwrap();

        assert!(store.remove_and_save("ABCUSDT").is_err());
        assert!(!store.contains("ABCUSDT"));
    }
}
