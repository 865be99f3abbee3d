// src/selection.rs - Product detail modal and in-progress variant selection

use std::sync::Arc;

use parking_lot::RwLock;

use crate::cart::{CartLine, CartStore};
use crate::model::Product;

/// The user's in-progress selection for the inspected product
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub image_index: usize,
    pub size: Option<String>,
    pub color: Option<String>,
    pub quantity: u32,
}

#[derive(Debug, Clone)]
struct Inspection {
    product: Product,
    selection: Selection,
}

/// Shared product-modal store.
///
/// Opening a product resets the selection to its defaults: first image,
/// first available size, first available color, quantity 1. Selection
/// changes only touch local state, never the underlying product.
#[derive(Debug, Clone, Default)]
pub struct ProductModal {
    inner: Arc<RwLock<Option<Inspection>>>,
}

impl ProductModal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self, product: Product) {
        let selection = Selection {
            image_index: 0,
            size: product.sizes.first().cloned(),
            color: product.colors.first().cloned(),
            quantity: 1,
        };
        *self.inner.write() = Some(Inspection { product, selection });
    }

    pub fn close(&self) {
        *self.inner.write() = None;
    }

    pub fn is_open(&self) -> bool {
        self.inner.read().is_some()
    }

    pub fn product(&self) -> Option<Product> {
        self.inner.read().as_ref().map(|i| i.product.clone())
    }

    pub fn selection(&self) -> Option<Selection> {
        self.inner.read().as_ref().map(|i| i.selection.clone())
    }

    /// Shows another image of the open product; out-of-range indices are
    /// ignored
    pub fn select_image(&self, index: usize) {
        if let Some(inspection) = self.inner.write().as_mut() {
            if index < inspection.product.images.len() {
                inspection.selection.image_index = index;
            }
        }
    }

    pub fn select_size(&self, size: impl Into<String>) {
        if let Some(inspection) = self.inner.write().as_mut() {
            inspection.selection.size = Some(size.into());
        }
    }

    pub fn select_color(&self, color: impl Into<String>) {
        if let Some(inspection) = self.inner.write().as_mut() {
            inspection.selection.color = Some(color.into());
        }
    }

    pub fn increment_quantity(&self) {
        if let Some(inspection) = self.inner.write().as_mut() {
            inspection.selection.quantity += 1;
        }
    }

    /// Steps the quantity down; decrementing below 1 is a no-op
    pub fn decrement_quantity(&self) {
        if let Some(inspection) = self.inner.write().as_mut() {
            if inspection.selection.quantity > 1 {
                inspection.selection.quantity -= 1;
            }
        }
    }

    /// Feeds the current selection into the cart at the product's
    /// effective price, then closes the modal.
    ///
    /// Returns false when no product is open.
    pub fn add_to_cart(&self, cart: &CartStore) -> bool {
        let line = {
            let guard = self.inner.read();
            let Some(inspection) = guard.as_ref() else {
                return false;
            };
            let product = &inspection.product;
            CartLine {
                id: product.id.clone(),
                name: product.name.clone(),
                price: product.effective_price(),
                image: product.primary_image().unwrap_or_default().to_string(),
                quantity: inspection.selection.quantity,
                size: inspection.selection.size.clone(),
                color: inspection.selection.color.clone(),
            }
        };
        cart.add_item(line);
        self.close();
        true
    }
}
