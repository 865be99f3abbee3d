// src/backend.rs - Contract for the hosted backend the storefront delegates to

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{
    AdminNotification, Brand, Category, ContactMessage, Customer, Order, OrderHeader, OrderLine,
    OrderStatus, Product,
};
use crate::types::Money;

/// Flat shipping fee applied when the configured value cannot be read
pub const DEFAULT_SHIPPING_FEE: Money = 150.0;

/// Object-storage bucket for uploaded images
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageBucket {
    Products,
    Brands,
}

/// Result of the backend's atomic order-placement procedure.
///
/// The readable id is the customer-facing payment reference, distinct from
/// the internal row id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedOrder {
    pub id: String,
    pub readable_id: String,
}

pub type BackendArc = Arc<dyn StoreBackend>;

/// The remote backend's query surface as the core needs it.
///
/// Collection reads return full collections; filtering, sorting and
/// pagination all happen client-side. `place_order` is a single opaque
/// atomic unit (order header plus its lines created together or not at
/// all) and is never partially retried by the client. Implementations are
/// expected to apply their own network timeout and report expiry as an
/// ordinary error.
#[async_trait]
pub trait StoreBackend: Send + Sync {
    async fn fetch_products(&self) -> Result<Vec<Product>>;
    async fn fetch_categories(&self) -> Result<Vec<Category>>;
    async fn fetch_brands(&self) -> Result<Vec<Brand>>;

    /// Places an order atomically, returning its identifiers
    async fn place_order(&self, header: OrderHeader, lines: Vec<OrderLine>)
        -> Result<PlacedOrder>;

    /// Reads the store-wide flat shipping fee; `None` when unconfigured
    async fn fetch_shipping_fee(&self) -> Result<Option<Money>>;

    /// Uploads an image and returns its durable public URL
    async fn upload_image(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        bucket: ImageBucket,
    ) -> Result<String>;

    // Admin catalog management
    async fn create_product(&self, product: Product) -> Result<Product>;
    async fn update_product(&self, product: Product) -> Result<Product>;
    async fn delete_product(&self, id: &str) -> Result<()>;
    async fn create_brand(&self, brand: Brand) -> Result<Brand>;
    async fn update_brand(&self, brand: Brand) -> Result<Brand>;
    async fn delete_brand(&self, id: &str) -> Result<()>;
    async fn create_category(&self, category: Category) -> Result<Category>;
    async fn update_category(&self, category: Category) -> Result<Category>;
    async fn delete_category(&self, id: &str) -> Result<()>;

    // Admin order management
    async fn fetch_orders(&self) -> Result<Vec<Order>>;
    async fn update_order_status(&self, id: &str, status: OrderStatus) -> Result<()>;

    // Customers
    async fn fetch_customers(&self) -> Result<Vec<Customer>>;
    async fn upsert_customer(&self, customer: Customer) -> Result<Customer>;

    // Contact messages
    async fn send_contact_message(&self, message: ContactMessage) -> Result<ContactMessage>;
    async fn fetch_contact_messages(&self) -> Result<Vec<ContactMessage>>;
    async fn delete_contact_message(&self, id: &str) -> Result<()>;

    // Admin notifications
    async fn fetch_notifications(&self) -> Result<Vec<AdminNotification>>;
    async fn mark_notification_read(&self, id: &str) -> Result<()>;
    async fn mark_all_notifications_read(&self) -> Result<()>;
    async fn delete_notification(&self, id: &str) -> Result<()>;
}

/// In-memory backend fake shared by the crate's unit tests
#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use parking_lot::RwLock;

    use super::*;
    use crate::error::{BackendOperation, Error};

    #[derive(Default)]
    pub(crate) struct InMemoryBackend {
        pub products: RwLock<Vec<Product>>,
        pub categories: RwLock<Vec<Category>>,
        pub brands: RwLock<Vec<Brand>>,
        pub orders: RwLock<Vec<Order>>,
        pub customers: RwLock<Vec<Customer>>,
        pub contact_messages: RwLock<Vec<ContactMessage>>,
        pub notifications: RwLock<Vec<AdminNotification>>,
        pub uploads: RwLock<Vec<(String, ImageBucket)>>,
        pub shipping_fee: RwLock<Option<Money>>,
        pub fail_place_order: AtomicBool,
        pub fail_shipping_fee: AtomicBool,
        pub place_order_calls: AtomicUsize,
        pub write_calls: AtomicUsize,
        order_seq: AtomicUsize,
    }

    impl InMemoryBackend {
        pub(crate) fn new() -> Arc<Self> {
            Arc::new(Self::default())
        }

        fn rejected(op: BackendOperation) -> Error {
            Error::backend(op, "backend unavailable")
        }
    }

    #[async_trait]
    impl StoreBackend for InMemoryBackend {
        async fn fetch_products(&self) -> Result<Vec<Product>> {
            Ok(self.products.read().clone())
        }

        async fn fetch_categories(&self) -> Result<Vec<Category>> {
            Ok(self.categories.read().clone())
        }

        async fn fetch_brands(&self) -> Result<Vec<Brand>> {
            Ok(self.brands.read().clone())
        }

        async fn place_order(
            &self,
            header: OrderHeader,
            lines: Vec<OrderLine>,
        ) -> Result<PlacedOrder> {
            self.place_order_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_place_order.load(Ordering::SeqCst) {
                return Err(Self::rejected(BackendOperation::PlaceOrder));
            }
            let seq = self.order_seq.fetch_add(1, Ordering::SeqCst) + 1;
            let placed = PlacedOrder {
                id: format!("ord-{seq}"),
                readable_id: format!("ORD-{seq:05}"),
            };
            self.orders.write().push(Order {
                id: placed.id.clone(),
                readable_id: placed.readable_id.clone(),
                header,
                items: lines,
                created_at: chrono::Utc::now(),
            });
            Ok(placed)
        }

        async fn fetch_shipping_fee(&self) -> Result<Option<Money>> {
            if self.fail_shipping_fee.load(Ordering::SeqCst) {
                return Err(Self::rejected(BackendOperation::Fetch));
            }
            Ok(*self.shipping_fee.read())
        }

        async fn upload_image(
            &self,
            file_name: &str,
            _bytes: Vec<u8>,
            bucket: ImageBucket,
        ) -> Result<String> {
            self.uploads.write().push((file_name.to_string(), bucket));
            Ok(format!("https://cdn.example/{file_name}"))
        }

        async fn create_product(&self, product: Product) -> Result<Product> {
            self.write_calls.fetch_add(1, Ordering::SeqCst);
            self.products.write().push(product.clone());
            Ok(product)
        }

        async fn update_product(&self, product: Product) -> Result<Product> {
            self.write_calls.fetch_add(1, Ordering::SeqCst);
            let mut products = self.products.write();
            if let Some(existing) = products.iter_mut().find(|p| p.id == product.id) {
                *existing = product.clone();
            }
            Ok(product)
        }

        async fn delete_product(&self, id: &str) -> Result<()> {
            self.products.write().retain(|p| p.id != id);
            Ok(())
        }

        async fn create_brand(&self, brand: Brand) -> Result<Brand> {
            self.write_calls.fetch_add(1, Ordering::SeqCst);
            self.brands.write().push(brand.clone());
            Ok(brand)
        }

        async fn update_brand(&self, brand: Brand) -> Result<Brand> {
            self.write_calls.fetch_add(1, Ordering::SeqCst);
            let mut brands = self.brands.write();
            if let Some(existing) = brands.iter_mut().find(|b| b.id == brand.id) {
                *existing = brand.clone();
            }
            Ok(brand)
        }

        async fn delete_brand(&self, id: &str) -> Result<()> {
            self.brands.write().retain(|b| b.id != id);
            Ok(())
        }

        async fn create_category(&self, category: Category) -> Result<Category> {
            self.categories.write().push(category.clone());
            Ok(category)
        }

        async fn update_category(&self, category: Category) -> Result<Category> {
            let mut categories = self.categories.write();
            if let Some(existing) = categories.iter_mut().find(|c| c.id == category.id) {
                *existing = category.clone();
            }
            Ok(category)
        }

        async fn delete_category(&self, id: &str) -> Result<()> {
            self.categories.write().retain(|c| c.id != id);
            Ok(())
        }

        async fn fetch_orders(&self) -> Result<Vec<Order>> {
            Ok(self.orders.read().clone())
        }

        async fn update_order_status(&self, id: &str, status: OrderStatus) -> Result<()> {
            let mut orders = self.orders.write();
            if let Some(order) = orders.iter_mut().find(|o| o.id == id) {
                order.header.status = status;
            }
            Ok(())
        }

        async fn fetch_customers(&self) -> Result<Vec<Customer>> {
            Ok(self.customers.read().clone())
        }

        async fn upsert_customer(&self, customer: Customer) -> Result<Customer> {
            let mut customers = self.customers.write();
            match customers.iter_mut().find(|c| c.email == customer.email) {
                Some(existing) => *existing = customer.clone(),
                None => customers.push(customer.clone()),
            }
            Ok(customer)
        }

        async fn send_contact_message(&self, message: ContactMessage) -> Result<ContactMessage> {
            self.contact_messages.write().push(message.clone());
            Ok(message)
        }

        async fn fetch_contact_messages(&self) -> Result<Vec<ContactMessage>> {
            Ok(self.contact_messages.read().clone())
        }

        async fn delete_contact_message(&self, id: &str) -> Result<()> {
            self.contact_messages.write().retain(|m| m.id != id);
            Ok(())
        }

        async fn fetch_notifications(&self) -> Result<Vec<AdminNotification>> {
            Ok(self.notifications.read().clone())
        }

        async fn mark_notification_read(&self, id: &str) -> Result<()> {
            let mut notifications = self.notifications.write();
            if let Some(n) = notifications.iter_mut().find(|n| n.id == id) {
                n.is_read = true;
            }
            Ok(())
        }

        async fn mark_all_notifications_read(&self) -> Result<()> {
            for n in self.notifications.write().iter_mut() {
                n.is_read = true;
            }
            Ok(())
        }

        async fn delete_notification(&self, id: &str) -> Result<()> {
            self.notifications.write().retain(|n| n.id != id);
            Ok(())
        }
    }
}
