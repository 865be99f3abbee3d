// src/types.rs

use std::collections::HashMap;

/// Generic metadata map attached to errors and status reports
pub type Metadata = HashMap<String, serde_json::Value>;

/// Monetary amount in the store currency.
///
/// Mirrors the backend's numeric column; amounts are whole currency units,
/// not minor units.
pub type Money = f64;
