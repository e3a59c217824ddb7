//! Per-browser record of which short codes this browser created.
//!
//! The ledger only tracks ownership. Record contents always come from the
//! mapping store, so listing re-fetches by code every time.

pub mod cookie;

use thiserror::Error;
use tracing::{debug, error};

/// Name of the persistent slot holding the JSON list of owned codes.
pub const LEDGER_KEY: &str = "tinylink_my_codes";
pub const MAX_OWNED_URLS: usize = 11;
pub const NEAR_LIMIT: usize = 9;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("could not encode slot value: {0}")]
    Encoding(String),
}

/// A named, string-valued persistent slot store, the way a browser exposes one.
pub trait SlotStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

#[derive(Debug)]
pub struct Ledger<S> {
    storage: S,
}

impl<S: SlotStorage> Ledger<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Owned codes, newest first. A missing or unreadable slot reads as empty.
    pub fn list_codes(&self) -> Vec<String> {
        let stored = match self.storage.get_item(LEDGER_KEY) {
            Ok(Some(stored)) => stored,
            Ok(None) => return Vec::new(),
            Err(e) => {
                error!(error = %e, "Error reading owned codes");
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<String>>(&stored) {
            Ok(codes) => codes,
            Err(e) => {
                error!(error = %e, "Owned codes slot is not a JSON string list");
                Vec::new()
            }
        }
    }

    pub fn add_code(&mut self, code: &str) {
        let mut codes = self.list_codes();
        codes.insert(0, code.to_string());
        codes.truncate(MAX_OWNED_URLS);
        if let Err(e) = self.persist(&codes) {
            error!(error = %e, short_code = %code, "Error saving owned code");
            return;
        }
        debug!(short_code = %code, count = codes.len(), "Recorded owned code");
    }

    pub fn remove_code(&mut self, code: &str) {
        let mut codes = self.list_codes();
        codes.retain(|c| c != code);
        if let Err(e) = self.persist(&codes) {
            error!(error = %e, short_code = %code, "Error removing owned code");
        }
    }

    pub fn count(&self) -> usize {
        self.list_codes().len()
    }

    pub fn is_at_capacity(&self) -> bool {
        self.count() >= MAX_OWNED_URLS
    }

    pub fn is_near_limit(&self) -> bool {
        self.count() >= NEAR_LIMIT
    }

    fn persist(&mut self, codes: &[String]) -> Result<(), StorageError> {
        let encoded =
            serde_json::to_string(codes).map_err(|e| StorageError::Encoding(e.to_string()))?;
        self.storage.set_item(LEDGER_KEY, &encoded)
    }
}


#[cfg(test)]
mod tests {
    use super::{
        testing::{BrokenStorage, MemoryStorage},
        *,
    };

    fn ledger_with(codes: &[&str]) -> Ledger<MemoryStorage> {
        let mut storage = MemoryStorage::new();
        storage
            .set_item(LEDGER_KEY, &serde_json::to_string(codes).unwrap())
            .unwrap();
        Ledger::new(storage)
    }

    #[test]
    fn empty_ledger_lists_nothing() {
        let ledger = Ledger::new(MemoryStorage::new());
        assert!(ledger.list_codes().is_empty());
        assert_eq!(ledger.count(), 0);
        assert!(!ledger.is_at_capacity());
    }

    #[test]
    fn add_code_on_empty_ledger() {
        let mut ledger = Ledger::new(MemoryStorage::new());
        ledger.add_code("abc123");
        assert_eq!(ledger.list_codes(), vec!["abc123"]);
    }

    #[test]
    fn add_code_prepends() {
        let mut ledger = ledger_with(&["old111"]);
        ledger.add_code("new222");
        assert_eq!(ledger.list_codes(), vec!["new222", "old111"]);
    }

    #[test]
    fn twelfth_code_drops_the_oldest() {
        let codes: Vec<String> = (0..MAX_OWNED_URLS).map(|i| format!("code{:02}", i)).collect();
        let mut ledger = Ledger::new(MemoryStorage::new());
        for code in codes.iter().rev() {
            ledger.add_code(code);
        }
        assert_eq!(ledger.list_codes(), codes);
        assert!(ledger.is_at_capacity());

        ledger.add_code("fresh1");
        let listed = ledger.list_codes();
        assert_eq!(listed.len(), MAX_OWNED_URLS);
        assert_eq!(listed[0], "fresh1");
        assert_eq!(&listed[1..], &codes[..MAX_OWNED_URLS - 1]);
        assert!(!listed.contains(&codes[MAX_OWNED_URLS - 1]));
    }

    #[test]
    fn capacity_tracks_count() {
        let mut ledger = Ledger::new(MemoryStorage::new());
        for i in 0..15 {
            assert_eq!(ledger.is_at_capacity(), ledger.count() >= MAX_OWNED_URLS);
            assert_eq!(ledger.is_near_limit(), ledger.count() >= NEAR_LIMIT);
            ledger.add_code(&format!("code{:02}", i));
        }
        assert!(ledger.is_at_capacity());
    }

    #[test]
    fn remove_code_keeps_others_in_order() {
        let mut ledger = ledger_with(&["aaaaaa", "bbbbbb", "cccccc", "dddddd"]);
        ledger.remove_code("bbbbbb");
        assert_eq!(ledger.list_codes(), vec!["aaaaaa", "cccccc", "dddddd"]);
    }

    #[test]
    fn remove_code_removes_every_occurrence() {
        let mut ledger = ledger_with(&["aaaaaa", "bbbbbb", "aaaaaa"]);
        ledger.remove_code("aaaaaa");
        assert_eq!(ledger.list_codes(), vec!["bbbbbb"]);
    }

    #[test]
    fn remove_missing_code_is_a_no_op() {
        let mut ledger = ledger_with(&["aaaaaa"]);
        ledger.remove_code("zzzzzz");
        assert_eq!(ledger.list_codes(), vec!["aaaaaa"]);
    }

    #[test]
    fn corrupt_slot_reads_as_empty() {
        let mut storage = MemoryStorage::new();
        storage.set_item(LEDGER_KEY, "{not json").unwrap();
        let ledger = Ledger::new(storage);
        assert!(ledger.list_codes().is_empty());
    }

    #[test]
    fn read_failure_reads_as_empty() {
        let ledger = Ledger::new(BrokenStorage {
            value: Some(r#"["abc123"]"#.into()),
            fail_reads: true,
            fail_writes: false,
        });
        assert!(ledger.list_codes().is_empty());
        assert!(!ledger.is_at_capacity());
    }

    #[test]
    fn write_failure_leaves_stored_codes_alone() {
        let mut ledger = Ledger::new(BrokenStorage {
            value: Some(r#"["abc123"]"#.into()),
            fail_reads: false,
            fail_writes: true,
        });
        ledger.add_code("xyz789");
        ledger.remove_code("abc123");
        assert_eq!(ledger.list_codes(), vec!["abc123"]);
    }
}
