// src/app.rs - Composition root wiring the storefront stores together

use std::sync::Arc;

use crate::admin::{AdminConsole, AdminModals};
use crate::backend::BackendArc;
use crate::cart::CartStore;
use crate::catalog::ShopSession;
use crate::checkout::CheckoutFlow;
use crate::config::StoreConfig;
use crate::error::Result;
use crate::notify::{NotificationCenter, NotificationHub};
use crate::selection::ProductModal;
use crate::status::StatusChannel;
use crate::storage::{StorageArc, StoredCartRepository};

/// One storefront instance: every shared store, wired once.
///
/// The handle is cheap to clone; all clones observe the same state. UI
/// surfaces take the pieces they need from here instead of constructing
/// their own, which is what keeps the cart, status overlay and checkout
/// stage consistent across the whole app.
#[derive(Clone)]
pub struct StoreApp {
    config: StoreConfig,
    backend: BackendArc,
    cart: CartStore,
    status: StatusChannel,
    product_modal: ProductModal,
    checkout: CheckoutFlow,
    notification_hub: NotificationHub,
    notification_center: NotificationCenter,
    admin: AdminConsole,
    admin_modals: AdminModals,
}

impl std::fmt::Debug for StoreApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreApp")
            .field("config", &self.config)
            .finish()
    }
}

impl StoreApp {
    /// Wires the app against a backend and a client-local storage provider
    pub fn new(config: StoreConfig, backend: BackendArc, storage: StorageArc) -> Result<Self> {
        config.validate()?;

        let repo = StoredCartRepository::with_key(storage, config.cart_storage_key.clone());
        let cart = CartStore::new(Arc::new(repo));
        let status = StatusChannel::new();
        let checkout = CheckoutFlow::new(
            Arc::clone(&backend),
            cart.clone(),
            status.clone(),
            &config,
        );
        let notification_center = NotificationCenter::new(Arc::clone(&backend));
        let admin = AdminConsole::new(Arc::clone(&backend));

        tracing::info!(
            page_size = config.page_size,
            cart_key = %config.cart_storage_key,
            "Storefront wired"
        );

        Ok(Self {
            config,
            backend,
            cart,
            status,
            product_modal: ProductModal::new(),
            checkout,
            notification_hub: NotificationHub::new(),
            notification_center,
            admin,
            admin_modals: AdminModals::new(),
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    pub fn backend(&self) -> &BackendArc {
        &self.backend
    }

    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub fn status(&self) -> &StatusChannel {
        &self.status
    }

    pub fn product_modal(&self) -> &ProductModal {
        &self.product_modal
    }

    pub fn checkout(&self) -> &CheckoutFlow {
        &self.checkout
    }

    pub fn notification_hub(&self) -> &NotificationHub {
        &self.notification_hub
    }

    pub fn notification_center(&self) -> &NotificationCenter {
        &self.notification_center
    }

    pub fn admin(&self) -> &AdminConsole {
        &self.admin
    }

    pub fn admin_modals(&self) -> &AdminModals {
        &self.admin_modals
    }

    /// Starts a shop-page visit: loads the catalog snapshot and category
    /// list, returning a session ready for URL seeding and filtering
    pub async fn shop_session(&self) -> Result<ShopSession> {
        let (products, categories) = futures::try_join!(
            self.backend.fetch_products(),
            self.backend.fetch_categories(),
        )?;
        tracing::debug!(products = products.len(), "Loaded shop catalog");
        Ok(ShopSession::new(products, categories).with_page_size(self.config.page_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::testing::InMemoryBackend;
    use crate::cart::CartLine;
    use crate::model::fixtures::product;
    use crate::storage::MemoryStorage;

    fn app_with_backend(backend: BackendArc) -> StoreApp {
        StoreApp::new(
            StoreConfig::default(),
            backend,
            Arc::new(MemoryStorage::new()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let app = app_with_backend(InMemoryBackend::new());
        let other = app.clone();

        app.cart().add_item(CartLine {
            id: "p-1".to_string(),
            name: "Runner".to_string(),
            price: 100.0,
            image: String::new(),
            quantity: 1,
            size: None,
            color: None,
        });

        assert_eq!(other.cart().total_items(), 1);
        app.status().show_status(crate::status::StatusKind::Loading, "Working", "");
        assert!(other.status().is_open());
    }

    #[tokio::test]
    async fn test_shop_session_uses_configured_page_size() {
        let backend = InMemoryBackend::new();
        {
            let mut products = backend.products.write();
            for i in 0..5 {
                products.push(product(&format!("p-{i}"), 100.0));
            }
        }

        let mut config = StoreConfig::default();
        config.page_size = 2;
        let app = StoreApp::new(
            config,
            backend,
            Arc::new(MemoryStorage::new()),
        )
        .unwrap();

        let session = app.shop_session().await.unwrap();
        let page = session.view();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_pages, 3);
    }

    #[tokio::test]
    async fn test_invalid_config_rejected_at_wiring() {
        let mut config = StoreConfig::default();
        config.page_size = 0;
        let result = StoreApp::new(
            config,
            InMemoryBackend::new(),
            Arc::new(MemoryStorage::new()),
        );
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_cart_restored_from_storage() {
        let storage: StorageArc = Arc::new(MemoryStorage::new());
        let backend: BackendArc = InMemoryBackend::new();

        let app = StoreApp::new(StoreConfig::default(), Arc::clone(&backend), storage.clone())
            .unwrap();
        app.cart().add_item(CartLine {
            id: "p-1".to_string(),
            name: "Runner".to_string(),
            price: 100.0,
            image: String::new(),
            quantity: 2,
            size: Some("42".to_string()),
            color: None,
        });
        drop(app);

        let revived = StoreApp::new(StoreConfig::default(), backend, storage).unwrap();
        assert_eq!(revived.cart().total_items(), 2);
    }
}
