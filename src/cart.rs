// src/cart.rs - Shopping cart store: line merging, totals, persistence

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::Money;

/// One cart line: a (product, size, color) grouping with an aggregate
/// quantity.
///
/// `price` is the effective unit price captured when the line was first
/// added; later catalog price changes never update it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: String,
    pub name: String,
    pub price: Money,
    pub image: String,
    pub quantity: u32,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl CartLine {
    fn matches(&self, id: &str, size: Option<&str>, color: Option<&str>) -> bool {
        self.id == id && self.size.as_deref() == size && self.color.as_deref() == color
    }
}

/// Durable persistence seam for the cart.
///
/// Injected into the store so unit tests can substitute an in-memory fake
/// and assert persistence calls without touching real storage.
pub trait CartRepository: Send + Sync {
    fn load(&self) -> Result<Vec<CartLine>>;
    fn save(&self, lines: &[CartLine]) -> Result<()>;
}

/// A repository that keeps nothing. Used where durability is not wanted.
#[derive(Debug, Default)]
pub struct NullCartRepository;

impl CartRepository for NullCartRepository {
    fn load(&self) -> Result<Vec<CartLine>> {
        Ok(Vec::new())
    }

    fn save(&self, _lines: &[CartLine]) -> Result<()> {
        Ok(())
    }
}

/// Shared cart store.
///
/// Cloning the handle shares the same underlying state, so the navbar
/// badge, cart drawer and product cards all observe one source of truth.
/// Mutations are synchronous and atomic with respect to each other; each
/// one persists the full cart through the injected repository. A failed
/// persist is logged and swallowed: the in-memory cart stays the
/// authority and the store never raises from a mutation.
#[derive(Clone)]
pub struct CartStore {
    lines: Arc<RwLock<Vec<CartLine>>>,
    repo: Arc<dyn CartRepository>,
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("lines", &self.lines.read().len())
            .finish()
    }
}

impl CartStore {
    /// Creates a store seeded from the repository's persisted contents.
    ///
    /// An unreadable snapshot degrades to an empty cart rather than
    /// failing startup.
    pub fn new(repo: Arc<dyn CartRepository>) -> Self {
        let lines = match repo.load() {
            Ok(lines) => lines,
            Err(e) => {
                tracing::warn!("failed to restore persisted cart: {}", e);
                Vec::new()
            }
        };

        Self {
            lines: Arc::new(RwLock::new(lines)),
            repo,
        }
    }

    /// Creates an in-memory-only store
    pub fn ephemeral() -> Self {
        Self::new(Arc::new(NullCartRepository))
    }

    /// Adds an item to the cart.
    ///
    /// A line with the same (id, size, color) triple absorbs the added
    /// quantity; its name, image and snapshot price are kept from the
    /// first add. Otherwise the item is appended as a new line.
    pub fn add_item(&self, item: CartLine) {
        {
            let mut lines = self.lines.write();
            match lines
                .iter_mut()
                .find(|l| l.matches(&item.id, item.size.as_deref(), item.color.as_deref()))
            {
                Some(existing) => existing.quantity += item.quantity,
                None => lines.push(item),
            }
        }
        self.persist();
    }

    /// Removes the line matching the exact (id, size, color) triple.
    /// No-op when nothing matches.
    pub fn remove_item(&self, id: &str, size: Option<&str>, color: Option<&str>) {
        {
            let mut lines = self.lines.write();
            lines.retain(|l| !l.matches(id, size, color));
        }
        self.persist();
    }

    /// Sets the matching line's quantity, floored at 1.
    ///
    /// Driving a line to zero is not possible through this call; use
    /// `remove_item` to delete a line.
    pub fn update_quantity(&self, id: &str, quantity: u32, size: Option<&str>, color: Option<&str>) {
        {
            let mut lines = self.lines.write();
            if let Some(line) = lines.iter_mut().find(|l| l.matches(id, size, color)) {
                line.quantity = quantity.max(1);
            }
        }
        self.persist();
    }

    /// Empties the cart
    pub fn clear(&self) {
        self.lines.write().clear();
        self.persist();
    }

    /// Snapshot of the lines in insertion order
    pub fn lines(&self) -> Vec<CartLine> {
        self.lines.read().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.read().is_empty()
    }

    /// Sum of quantities across all lines, derived fresh on every call
    pub fn total_items(&self) -> u32 {
        self.lines.read().iter().map(|l| l.quantity).sum()
    }

    /// Sum of price x quantity across all lines, derived fresh on every call
    pub fn total_price(&self) -> Money {
        self.lines
            .read()
            .iter()
            .map(|l| l.price * l.quantity as Money)
            .sum()
    }

    fn persist(&self) {
        let lines = self.lines.read();
        if let Err(e) = self.repo.save(&lines) {
            // Quota or serialization trouble must not break the cart.
            tracing::warn!("cart persistence failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn line(id: &str, size: &str, color: &str, price: Money, quantity: u32) -> CartLine {
        CartLine {
            id: id.to_string(),
            name: format!("Product {id}"),
            price,
            image: "img.png".to_string(),
            quantity,
            size: Some(size.to_string()),
            color: Some(color.to_string()),
        }
    }

    #[derive(Default)]
    struct CountingRepo {
        saves: AtomicUsize,
        saved: RwLock<Vec<CartLine>>,
    }

    impl CartRepository for CountingRepo {
        fn load(&self) -> Result<Vec<CartLine>> {
            Ok(self.saved.read().clone())
        }

        fn save(&self, lines: &[CartLine]) -> Result<()> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            *self.saved.write() = lines.to_vec();
            Ok(())
        }
    }

    struct FailingRepo;

    impl CartRepository for FailingRepo {
        fn load(&self) -> Result<Vec<CartLine>> {
            Ok(Vec::new())
        }

        fn save(&self, _lines: &[CartLine]) -> Result<()> {
            Err(Error::storage("cart-storage", "quota exceeded"))
        }
    }

    #[test]
    fn test_merge_same_key_keeps_first_price() {
        let cart = CartStore::ephemeral();
        cart.add_item(line("A", "M", "red", 100.0, 1));
        cart.add_item(line("A", "M", "red", 80.0, 2));

        let lines = cart.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].quantity, 3);
        assert_eq!(lines[0].price, 100.0);
    }

    #[test]
    fn test_different_variant_creates_new_line() {
        let cart = CartStore::ephemeral();
        cart.add_item(line("A", "M", "red", 100.0, 1));
        cart.add_item(line("A", "L", "red", 100.0, 1));
        cart.add_item(line("A", "M", "blue", 100.0, 1));

        assert_eq!(cart.lines().len(), 3);
    }

    #[test]
    fn test_quantity_floor() {
        let cart = CartStore::ephemeral();
        cart.add_item(line("A", "M", "red", 100.0, 5));
        cart.update_quantity("A", 0, Some("M"), Some("red"));
        assert_eq!(cart.lines()[0].quantity, 1);
    }

    #[test]
    fn test_update_quantity_unknown_key_is_noop() {
        let cart = CartStore::ephemeral();
        cart.add_item(line("A", "M", "red", 100.0, 2));
        cart.update_quantity("A", 7, Some("XL"), Some("red"));
        assert_eq!(cart.lines()[0].quantity, 2);
    }

    #[test]
    fn test_removal_is_exact_key() {
        let cart = CartStore::ephemeral();
        cart.add_item(line("A", "M", "red", 100.0, 1));
        cart.add_item(line("A", "M", "blue", 100.0, 1));

        cart.remove_item("A", Some("M"), Some("red"));
        let lines = cart.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].color.as_deref(), Some("blue"));

        // Removing a missing key is not an error
        cart.remove_item("A", Some("M"), Some("red"));
        assert_eq!(cart.lines().len(), 1);
    }

    #[test]
    fn test_derived_totals_recomputed() {
        let cart = CartStore::ephemeral();
        cart.add_item(line("A", "M", "red", 100.0, 2));
        cart.add_item(line("B", "L", "black", 50.0, 1));
        assert_eq!(cart.total_items(), 3);
        assert_eq!(cart.total_price(), 250.0);

        cart.update_quantity("B", 4, Some("L"), Some("black"));
        assert_eq!(cart.total_items(), 6);
        assert_eq!(cart.total_price(), 400.0);

        cart.clear();
        assert_eq!(cart.total_items(), 0);
        assert_eq!(cart.total_price(), 0.0);
    }

    #[test]
    fn test_every_mutation_persists() {
        let repo = Arc::new(CountingRepo::default());
        let cart = CartStore::new(repo.clone());

        cart.add_item(line("A", "M", "red", 100.0, 1));
        cart.update_quantity("A", 2, Some("M"), Some("red"));
        cart.remove_item("A", Some("M"), Some("red"));
        cart.clear();

        assert_eq!(repo.saves.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_persistence_failure_is_swallowed() {
        let cart = CartStore::new(Arc::new(FailingRepo));
        cart.add_item(line("A", "M", "red", 100.0, 1));
        // The in-memory cart is unaffected by the failed save.
        assert_eq!(cart.total_items(), 1);
    }

    #[test]
    fn test_restore_across_restart() {
        let repo = Arc::new(CountingRepo::default());
        {
            let cart = CartStore::new(repo.clone());
            cart.add_item(line("A", "M", "red", 100.0, 2));
        }
        let revived = CartStore::new(repo);
        assert_eq!(revived.total_items(), 2);
        assert_eq!(revived.lines()[0].price, 100.0);
    }

    #[test]
    fn test_shared_handle_is_single_source_of_truth() {
        let cart = CartStore::ephemeral();
        let badge_view = cart.clone();
        cart.add_item(line("A", "M", "red", 100.0, 1));
        assert_eq!(badge_view.total_items(), 1);
    }
}
