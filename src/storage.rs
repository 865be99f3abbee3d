// src/storage.rs - Client-local key-value storage and the cart repository

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::cart::{CartLine, CartRepository};
use crate::error::Result;

/// Fixed key the cart is persisted under
pub const CART_STORAGE_KEY: &str = "cart-storage";

pub type StorageArc = Arc<dyn StorageProvider>;

/// Key-value storage operations.
///
/// Calls are synchronous: cart mutations are applied atomically on the UI
/// thread and persist as a side effect, so the backing store must answer
/// without suspending (localStorage-like semantics). Durable adapters
/// queue their real I/O behind this interface.
pub trait StorageProvider: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
    fn set(&self, key: &str, value: &[u8]) -> Result<()>;
    fn delete(&self, key: &str) -> Result<()>;
    fn list_keys(&self, prefix: &str) -> Result<Vec<String>>;
    fn clear(&self) -> Result<()>;
}

/// In-memory storage provider
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageProvider for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.entries.write().insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.entries.write().remove(key);
        Ok(())
    }

    fn list_keys(&self, prefix: &str) -> Result<Vec<String>> {
        Ok(self
            .entries
            .read()
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }

    fn clear(&self) -> Result<()> {
        self.entries.write().clear();
        Ok(())
    }
}

/// Cart repository persisting lines as JSON under a fixed storage key
pub struct StoredCartRepository {
    storage: StorageArc,
    key: String,
}

impl StoredCartRepository {
    pub fn new(storage: StorageArc) -> Self {
        Self::with_key(storage, CART_STORAGE_KEY)
    }

    pub fn with_key(storage: StorageArc, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }
}

impl CartRepository for StoredCartRepository {
    fn load(&self) -> Result<Vec<CartLine>> {
        match self.storage.get(&self.key)? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, lines: &[CartLine]) -> Result<()> {
        let bytes = serde_json::to_vec(lines)?;
        self.storage.set(&self.key, &bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: &str, size: Option<&str>, color: Option<&str>) -> CartLine {
        CartLine {
            id: id.to_string(),
            name: format!("Product {id}"),
            price: 250.0,
            image: "img.png".to_string(),
            quantity: 2,
            size: size.map(str::to_string),
            color: color.map(str::to_string),
        }
    }

    #[test]
    fn test_round_trip_under_fixed_key() {
        let storage: StorageArc = Arc::new(MemoryStorage::new());
        let repo = StoredCartRepository::new(storage.clone());

        let lines = vec![
            line("A", Some("M"), Some("red")),
            // Size/color-less lines must survive losslessly too.
            line("B", None, None),
        ];
        repo.save(&lines).unwrap();

        assert!(storage.get(CART_STORAGE_KEY).unwrap().is_some());
        assert_eq!(repo.load().unwrap(), lines);
    }

    #[test]
    fn test_load_empty_storage() {
        let repo = StoredCartRepository::new(Arc::new(MemoryStorage::new()));
        assert!(repo.load().unwrap().is_empty());
    }

    #[test]
    fn test_load_corrupt_snapshot_errors() {
        let storage: StorageArc = Arc::new(MemoryStorage::new());
        storage.set(CART_STORAGE_KEY, b"not json").unwrap();
        let repo = StoredCartRepository::new(storage);
        assert!(repo.load().is_err());
    }
}
