// src/model.rs - Domain records mirrored from the remote backend

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Money;

/// A product as served by the catalog read API.
///
/// Read-only snapshot: the storefront never mutates products, it only
/// filters and displays them. Field names follow the backend's wire shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: Money,
    #[serde(default)]
    pub discount_price: Option<Money>,
    pub stock: u32,
    pub images: Vec<String>,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
    pub category_id: String,
    pub brand_id: String,
    pub brand: Brand,
    pub is_featured: bool,
    pub is_new_arrival: bool,
    pub is_promotion: bool,
}

impl Product {
    /// The price a unit actually sells for right now.
    ///
    /// The discount applies only while the promotion flag is set and the
    /// discount is strictly below the regular price; a missing or
    /// non-discounting value means no discount is applied.
    pub fn effective_price(&self) -> Money {
        if self.is_promotion {
            if let Some(discount) = self.discount_price {
                if discount < self.price {
                    return discount;
                }
            }
        }
        self.price
    }

    /// First image reference, used for cart thumbnails
    pub fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub id: String,
    pub name: String,
    pub logo_url: String,
    #[serde(default)]
    pub default_image: Option<String>,
    #[serde(default)]
    pub promo_percentage: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
}

/// Order header submitted to the backend's atomic order-placement procedure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderHeader {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub shipping_address: String,
    pub total: Money,
    pub shipping_fee: Money,
    pub status: OrderStatus,
}

/// One submitted order line: product id, quantity, and the unit price
/// captured at add-to-cart time. Catalog price drift is never re-applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: String,
    pub quantity: u32,
    pub price: Money,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl Default for OrderStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// Back-office view of a placed order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub readable_id: String,
    #[serde(flatten)]
    pub header: OrderHeader,
    pub items: Vec<OrderLine>,
    pub created_at: DateTime<Utc>,
}

/// Customer record upserted (keyed by email) after a successful order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub last_order_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContactStatus {
    Unread,
    Read,
    Replied,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub subject: Option<String>,
    pub message: String,
    pub status: ContactStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    Order,
    Contact,
}

/// Admin-facing notification row; new rows also arrive over the realtime
/// insert feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminNotification {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    #[serde(default)]
    pub reference_id: Option<String>,
    pub message: String,
    pub is_read: bool,
    #[serde(rename = "created_at")]
    pub created_at: DateTime<Utc>,
}
