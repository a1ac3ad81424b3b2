//! Remote drive index lookups.
//!
//! [`SearchBackend`] is the seam between verification and the network. The
//! production implementation is [`graph::GraphSearch`]; [`MockSearch`] serves
//! canned candidates from memory for tests.

pub mod graph;

use crate::error::Error;
use crate::hasher::HashAlgorithm;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub use graph::GraphSearch;

/// An item returned by a remote name search, not yet verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteItem {
    pub name: String,
    pub id: String,
    pub size: Option<u64>,
    pub hashes: RemoteHashes,
}

/// Content hashes reported by the remote index, as hex strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteHashes {
    pub sha256: Option<String>,
    pub sha1: Option<String>,
}

impl RemoteItem {
    pub fn new(name: &str, id: &str, size: u64) -> Self {
        Self {
            name: name.to_string(),
            id: id.to_string(),
            size: Some(size),
            hashes: RemoteHashes::default(),
        }
    }

    pub fn with_sha256(mut self, hex: &str) -> Self {
        self.hashes.sha256 = Some(hex.to_string());
        self
    }

    pub fn with_sha1(mut self, hex: &str) -> Self {
        self.hashes.sha1 = Some(hex.to_string());
        self
    }
}

impl RemoteHashes {
    /// SHA-256 if present, else SHA-1, else nothing. Empty strings count as
    /// absent.
    pub fn preferred(&self) -> Option<(HashAlgorithm, &str)> {
        present(&self.sha256)
            .map(|hex| (HashAlgorithm::Sha256, hex))
            .or_else(|| present(&self.sha1).map(|hex| (HashAlgorithm::Sha1, hex)))
    }
}

fn present(hash: &Option<String>) -> Option<&str> {
    hash.as_deref().map(str::trim).filter(|hex| !hex.is_empty())
}

/// Looks up remote items by file name.
pub trait SearchBackend: Send + Sync {
    /// Return every remote item the index associates with `file_name`, in the
    /// order the index reports them.
    fn search(&self, file_name: &str) -> Result<Vec<RemoteItem>, Error>;
}

/// In-memory search backend.
#[derive(Debug, Clone, Default)]
pub struct MockSearch {
    items: Arc<Mutex<HashMap<String, Vec<RemoteItem>>>>,
    failures: Arc<Mutex<HashMap<String, String>>>,
    calls: Arc<AtomicUsize>,
}

impl MockSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_item(&self, file_name: &str, item: RemoteItem) {
        if let Ok(mut items) = self.items.lock() {
            items.entry(file_name.to_string()).or_default().push(item);
        }
    }

    /// Make searches for `file_name` fail with a search error.
    pub fn fail_on(&self, file_name: &str, message: &str) {
        if let Ok(mut failures) = self.failures.lock() {
            failures.insert(file_name.to_string(), message.to_string());
        }
    }

    /// Drop every item whose id matches, as if it were deleted remotely.
    pub fn remove_item(&self, id: &str) {
        if let Ok(mut items) = self.items.lock() {
            for list in items.values_mut() {
                list.retain(|item| item.id != id);
            }
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl SearchBackend for MockSearch {
    fn search(&self, file_name: &str) -> Result<Vec<RemoteItem>, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let failures = self
            .failures
            .lock()
            .map_err(|e| Error::Search { message: e.to_string(), status: None })?;
        if let Some(message) = failures.get(file_name) {
            return Err(Error::Search {
                message: message.clone(),
                status: None,
            });
        }

        let items = self
            .items
            .lock()
            .map_err(|e| Error::Search { message: e.to_string(), status: None })?;
        Ok(items.get(file_name).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferred_hash_is_sha256_when_both_present() {
        let item = RemoteItem::new("a.jpg", "1", 10)
            .with_sha256("AA")
            .with_sha1("bb");
        assert_eq!(
            item.hashes.preferred(),
            Some((HashAlgorithm::Sha256, "AA"))
        );
    }

    #[test]
    fn test_preferred_hash_falls_back_to_sha1() {
        let item = RemoteItem::new("a.jpg", "1", 10).with_sha1("bb");
        assert_eq!(item.hashes.preferred(), Some((HashAlgorithm::Sha1, "bb")));

        let blank_sha256 = RemoteItem::new("a.jpg", "1", 10)
            .with_sha256("")
            .with_sha1("bb");
        assert_eq!(
            blank_sha256.hashes.preferred(),
            Some((HashAlgorithm::Sha1, "bb"))
        );
    }

    #[test]
    fn test_preferred_hash_absent() {
        assert_eq!(RemoteHashes::default().preferred(), None);
    }

    #[test]
    fn test_mock_search_counts_calls_and_fails_on_request() {
        let mock = MockSearch::new();
        mock.add_item("a.jpg", RemoteItem::new("a.jpg", "1", 3));
        mock.fail_on("b.jpg", "boom");

        assert_eq!(mock.search("a.jpg").unwrap().len(), 1);
        assert!(mock.search("missing.jpg").unwrap().is_empty());
        assert!(matches!(mock.search("b.jpg"), Err(Error::Search { .. })));
        assert_eq!(mock.call_count(), 3);

        mock.remove_item("1");
        assert!(mock.search("a.jpg").unwrap().is_empty());
    }
}
