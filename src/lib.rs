// src/lib.rs

//! Soleline - client-side storefront core for a sneaker and apparel shop
//!
//! The crate holds the stateful heart of the storefront: the persistent
//! cart, the catalog filter/sort/pagination engine, the checkout flow,
//! product-modal selection state, the status overlay, the admin console
//! and the notification feed. All durable data lives behind the
//! [`backend::StoreBackend`] seam; this crate never talks to a database
//! directly.

#![deny(unsafe_code)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::result_large_err)]

pub mod admin;
pub mod app;
pub mod backend;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod notify;
pub mod selection;
pub mod status;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use app::StoreApp;
pub use backend::{BackendArc, StoreBackend};
pub use cart::{CartLine, CartStore};
pub use catalog::{CatalogPage, ShopFilter, ShopSession, SortMode};
pub use checkout::{CheckoutFlow, CheckoutStage, PayerForm, SubmitOutcome};
pub use config::StoreConfig;
pub use error::{Error, ErrorKind, Result, ResultExt};
pub use status::{StatusChannel, StatusKind};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
