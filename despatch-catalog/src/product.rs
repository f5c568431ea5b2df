use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// A catalog product with per-country stock buckets.
///
/// Catalog CRUD is owned elsewhere; the core only reads products and
/// adjusts their stock when orders are delivered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    /// Stock per destination country code, e.g. "AE" → 120.
    pub country_stock: HashMap<String, i64>,
    /// Aggregate of all country buckets, kept in sync by mutations.
    pub stock_qty: i64,
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(name: String, price: f64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            price,
            country_stock: HashMap::new(),
            stock_qty: 0,
            in_stock: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_country_stock(&mut self, country: &str, qty: i64) {
        self.country_stock.insert(country.to_string(), qty.max(0));
        self.recompute_aggregate();
    }

    /// Decrement the given country bucket, clamped at zero. Returns the
    /// quantity actually removed.
    pub fn decrement_country_stock(&mut self, country: &str, qty: i64) -> i64 {
        let bucket = self.country_stock.entry(country.to_string()).or_insert(0);
        let removed = qty.min(*bucket).max(0);
        *bucket -= removed;
        self.recompute_aggregate();
        removed
    }

    fn recompute_aggregate(&mut self) {
        self.stock_qty = self.country_stock.values().sum();
        self.in_stock = self.stock_qty > 0;
        self.updated_at = Utc::now();
    }
}
