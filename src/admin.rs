// src/admin.rs - Back-office orchestration over the backend's write surface

use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::{BackendArc, ImageBucket};
use crate::error::{Error, Result};
use crate::model::{Brand, Category, ContactMessage, Customer, Order, OrderStatus, Product};
use crate::types::Money;

/// An image picked in the admin UI but not yet uploaded
#[derive(Debug, Clone, PartialEq)]
pub struct PendingImage {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Editable brand form; `id` is present when editing an existing brand
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BrandDraft {
    pub id: Option<String>,
    pub name: String,
    pub logo_url: String,
    pub default_image: Option<String>,
    pub promo_percentage: Option<f64>,
    pub description: Option<String>,
    #[serde(skip)]
    pub pending_logo: Option<PendingImage>,
}

impl BrandDraft {
    pub fn edit(brand: &Brand) -> Self {
        Self {
            id: Some(brand.id.clone()),
            name: brand.name.clone(),
            logo_url: brand.logo_url.clone(),
            default_image: brand.default_image.clone(),
            promo_percentage: brand.promo_percentage,
            description: brand.description.clone(),
            pending_logo: None,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("name", "Brand name is required"));
        }
        Ok(())
    }
}

/// Editable product form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub price: Money,
    pub discount_price: Option<Money>,
    pub stock: u32,
    pub images: Vec<String>,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
    pub category_id: String,
    pub brand_id: String,
    pub is_featured: bool,
    pub is_new_arrival: bool,
    pub is_promotion: bool,
    #[serde(skip)]
    pub pending_images: Vec<PendingImage>,
}

impl ProductDraft {
    pub fn edit(product: &Product) -> Self {
        Self {
            id: Some(product.id.clone()),
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            discount_price: product.discount_price,
            stock: product.stock,
            images: product.images.clone(),
            colors: product.colors.clone(),
            sizes: product.sizes.clone(),
            category_id: product.category_id.clone(),
            brand_id: product.brand_id.clone(),
            is_featured: product.is_featured,
            is_new_arrival: product.is_new_arrival,
            is_promotion: product.is_promotion,
            pending_images: Vec::new(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("name", "Product name is required"));
        }
        if self.price <= 0.0 {
            return Err(Error::validation("price", "Price must be positive"));
        }
        if self.category_id.is_empty() {
            return Err(Error::validation("category_id", "Category is required"));
        }
        if self.brand_id.is_empty() {
            return Err(Error::validation("brand_id", "Brand is required"));
        }
        Ok(())
    }
}

/// Visibility flags for the admin dialogs
#[derive(Debug, Clone, Default)]
pub struct AdminModals {
    inner: Arc<RwLock<ModalFlags>>,
}

#[derive(Debug, Default)]
struct ModalFlags {
    add_product_open: bool,
    add_brand_open: bool,
}

impl AdminModals {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_add_product(&self) {
        self.inner.write().add_product_open = true;
    }

    pub fn close_add_product(&self) {
        self.inner.write().add_product_open = false;
    }

    pub fn is_add_product_open(&self) -> bool {
        self.inner.read().add_product_open
    }

    pub fn open_add_brand(&self) {
        self.inner.write().add_brand_open = true;
    }

    pub fn close_add_brand(&self) {
        self.inner.write().add_brand_open = false;
    }

    pub fn is_add_brand_open(&self) -> bool {
        self.inner.read().add_brand_open
    }
}

/// Admin write orchestration.
///
/// Drafts validate synchronously before any network call; a draft that
/// fails validation never reaches the backend. Pending images upload
/// first so the saved record carries durable URLs only.
#[derive(Clone)]
pub struct AdminConsole {
    backend: BackendArc,
}

impl std::fmt::Debug for AdminConsole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConsole").finish()
    }
}

impl AdminConsole {
    pub fn new(backend: BackendArc) -> Self {
        Self { backend }
    }

    /// Creates or updates a brand, uploading a newly picked logo first
    pub async fn save_brand(&self, mut draft: BrandDraft) -> Result<Brand> {
        draft.validate()?;

        if let Some(logo) = draft.pending_logo.take() {
            let url = self
                .backend
                .upload_image(&logo.file_name, logo.bytes, ImageBucket::Brands)
                .await?;
            draft.logo_url = url;
        }

        let brand = Brand {
            id: draft.id.clone().unwrap_or_else(new_id),
            name: draft.name.trim().to_string(),
            logo_url: draft.logo_url,
            default_image: draft.default_image,
            promo_percentage: draft.promo_percentage,
            description: draft.description,
        };

        let saved = if draft.id.is_some() {
            self.backend.update_brand(brand).await?
        } else {
            self.backend.create_brand(brand).await?
        };
        tracing::info!(brand_id = %saved.id, "Saved brand");
        Ok(saved)
    }

    /// Creates or updates a product, uploading newly picked images first.
    ///
    /// Uploaded URLs are appended after the already-durable ones.
    pub async fn save_product(&self, mut draft: ProductDraft) -> Result<Product> {
        draft.validate()?;

        let mut images = std::mem::take(&mut draft.images);
        for image in draft.pending_images.drain(..) {
            let url = self
                .backend
                .upload_image(&image.file_name, image.bytes, ImageBucket::Products)
                .await?;
            images.push(url);
        }

        let brand = self
            .backend
            .fetch_brands()
            .await?
            .into_iter()
            .find(|b| b.id == draft.brand_id)
            .ok_or_else(|| Error::validation("brand_id", "Unknown brand"))?;

        let product = Product {
            id: draft.id.clone().unwrap_or_else(new_id),
            name: draft.name.trim().to_string(),
            description: draft.description,
            price: draft.price,
            discount_price: draft.discount_price,
            stock: draft.stock,
            images,
            colors: draft.colors,
            sizes: draft.sizes,
            category_id: draft.category_id,
            brand_id: draft.brand_id,
            brand,
            is_featured: draft.is_featured,
            is_new_arrival: draft.is_new_arrival,
            is_promotion: draft.is_promotion,
        };

        let saved = if draft.id.is_some() {
            self.backend.update_product(product).await?
        } else {
            self.backend.create_product(product).await?
        };
        tracing::info!(product_id = %saved.id, "Saved product");
        Ok(saved)
    }

    pub async fn delete_product(&self, id: &str) -> Result<()> {
        self.backend.delete_product(id).await
    }

    pub async fn delete_brand(&self, id: &str) -> Result<()> {
        self.backend.delete_brand(id).await
    }

    pub async fn save_category(&self, category: Category) -> Result<Category> {
        if category.name.trim().is_empty() {
            return Err(Error::validation("name", "Category name is required"));
        }
        if category.id.is_empty() {
            let category = Category {
                id: new_id(),
                ..category
            };
            self.backend.create_category(category).await
        } else {
            self.backend.update_category(category).await
        }
    }

    pub async fn delete_category(&self, id: &str) -> Result<()> {
        self.backend.delete_category(id).await
    }

    pub async fn orders(&self) -> Result<Vec<Order>> {
        self.backend.fetch_orders().await
    }

    pub async fn set_order_status(&self, id: &str, status: OrderStatus) -> Result<()> {
        self.backend.update_order_status(id, status).await?;
        tracing::info!(order_id = %id, ?status, "Updated order status");
        Ok(())
    }

    pub async fn customers(&self) -> Result<Vec<Customer>> {
        self.backend.fetch_customers().await
    }

    /// Upserts the customer record after a completed order, keyed by email
    pub async fn record_customer(&self, customer: Customer) -> Result<Customer> {
        if customer.email.trim().is_empty() {
            return Err(Error::validation("email", "Customer email is required"));
        }
        self.backend.upsert_customer(customer).await
    }

    pub async fn contact_messages(&self) -> Result<Vec<ContactMessage>> {
        self.backend.fetch_contact_messages().await
    }

    pub async fn delete_contact_message(&self, id: &str) -> Result<()> {
        self.backend.delete_contact_message(id).await
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}
