use tracing::{debug, error, instrument};

use crate::{
    db::store::MappingStore,
    ledger::{Ledger, SlotStorage},
    types::UrlDetailResponse,
};

/// This browser's short URLs, newest first. Store errors read as an empty list.
#[instrument(skip(store, ledger))]
pub async fn list<S: SlotStorage>(
    store: &dyn MappingStore,
    ledger: &Ledger<S>,
    base_url: &str,
) -> Vec<UrlDetailResponse> {
    let codes = ledger.list_codes();
    if codes.is_empty() {
        debug!("No owned codes, skipping store lookup");
        return Vec::new();
    }

    let mut rows = match store.select_by_codes(&codes).await {
        Ok(rows) => rows,
        Err(e) => {
            error!(error = %e, "Error fetching owned URLs");
            return Vec::new();
        }
    };
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    rows.into_iter()
        .map(|row| UrlDetailResponse::from_row(row, base_url))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::{db::memory::MemoryStore, ledger::testing::MemoryStorage};

    const BASE: &str = "http://short.test";

    #[tokio::test]
    async fn empty_ledger_skips_the_store() {
        let store = MemoryStore::new();
        let ledger = Ledger::new(MemoryStorage::new());

        assert!(list(&store, &ledger, BASE).await.is_empty());
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test]
    async fn lists_only_owned_codes_newest_first() {
        let store = MemoryStore::new();
        store.seed("first1", "https://one.example");
        store.seed("other1", "https://someone-else.example");
        store.seed("third3", "https://three.example");

        let mut ledger = Ledger::new(MemoryStorage::new());
        // ledger order differs from creation order on purpose
        ledger.add_code("third3");
        ledger.add_code("first1");

        let listed = list(&store, &ledger, BASE).await;
        let codes: Vec<_> = listed.iter().map(|u| u.code.as_str()).collect();
        assert_eq!(codes, vec!["third3", "first1"]);
        assert_eq!(listed[0].short_url, "http://short.test/third3");
        assert_eq!(listed[0].original_url, "https://three.example");
        assert_eq!(store.selects.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn owned_codes_missing_remotely_are_skipped() {
        let store = MemoryStore::new();
        store.seed("kept11", "https://kept.example");
        let mut ledger = Ledger::new(MemoryStorage::new());
        ledger.add_code("kept11");
        ledger.add_code("gone22");

        let listed = list(&store, &ledger, BASE).await;
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].code, "kept11");
    }

    #[tokio::test]
    async fn store_error_reads_as_empty() {
        let store = MemoryStore::failing();
        let mut ledger = Ledger::new(MemoryStorage::new());
        ledger.add_code("abc123");

        assert!(list(&store, &ledger, BASE).await.is_empty());
    }
}
