// src/config.rs - Store-side configuration knobs

use serde::{Deserialize, Serialize};

use crate::backend::DEFAULT_SHIPPING_FEE;
use crate::catalog::{PRICE_CEILING, SHOP_PAGE_SIZE};
use crate::error::{Error, Result};
use crate::storage::CART_STORAGE_KEY;
use crate::types::Money;

/// Client-side configuration for the storefront core.
///
/// Everything here has a working default; deployments override via a JSON
/// document. Server-held settings (the live shipping fee) are fetched at
/// runtime and only fall back to these values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Products per shop page
    pub page_size: usize,
    /// Upper bound of the price filter slider
    pub price_ceiling: Money,
    /// Flat fee used when the server-held shipping fee cannot be read
    pub shipping_fee_fallback: Money,
    /// UX pacing delay before the checkout stage resets after an order
    /// submission resolves
    pub stage_reset_delay_ms: u64,
    /// Key the cart persists under in client-local storage
    pub cart_storage_key: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            page_size: SHOP_PAGE_SIZE,
            price_ceiling: PRICE_CEILING,
            shipping_fee_fallback: DEFAULT_SHIPPING_FEE,
            stage_reset_delay_ms: 1_000,
            cart_storage_key: CART_STORAGE_KEY.to_string(),
        }
    }
}

impl StoreConfig {
    /// Parses and validates a JSON configuration document
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::config("page_size must be at least 1"));
        }
        if self.price_ceiling <= 0.0 {
            return Err(Error::config("price_ceiling must be positive"));
        }
        if self.shipping_fee_fallback < 0.0 {
            return Err(Error::config("shipping_fee_fallback must not be negative"));
        }
        if self.cart_storage_key.is_empty() {
            return Err(Error::config("cart_storage_key must not be empty"));
        }
        Ok(())
    }

    pub fn stage_reset_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.stage_reset_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert_eq!(config.page_size, 16);
        assert_eq!(config.shipping_fee_fallback, 150.0);
        assert_eq!(config.cart_storage_key, "cart-storage");
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_json_overrides() {
        let config = StoreConfig::from_json(r#"{"pageSize": 8}"#);
        // Field names are snake_case on this struct; unknown keys ignored.
        assert_eq!(config.unwrap().page_size, 16);

        let config = StoreConfig::from_json(r#"{"page_size": 8, "stage_reset_delay_ms": 0}"#)
            .unwrap();
        assert_eq!(config.page_size, 8);
        assert_eq!(config.stage_reset_delay().as_millis(), 0);
        assert_eq!(config.price_ceiling, PRICE_CEILING);
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(StoreConfig::from_json(r#"{"page_size": 0}"#).is_err());
        assert!(StoreConfig::from_json(r#"{"cart_storage_key": ""}"#).is_err());
        assert!(StoreConfig::from_json(r#"{"shipping_fee_fallback": -5}"#).is_err());
    }
}
