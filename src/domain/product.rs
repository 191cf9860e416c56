//! # Product Domain Model
//!
//! The catalog record managed by the product service plus its seed data.
//! Stock is an unsigned count, so a negative level is unrepresentable; the
//! stock-adjustment endpoint checks deltas before committing them.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::store::Record;

/// A catalog product record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier; seed records use small numeric strings, created
    /// records get a UUID
    pub id: String,

    /// Product name
    pub name: String,

    /// Free-form description; may be empty
    pub description: String,

    /// Unit price, never negative
    pub price: f64,

    /// Category name used for filtering and statistics
    pub category: String,

    /// Units on hand
    pub stock: u32,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp; absent until the record is first updated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Create a fresh product record with a generated id
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: f64,
        category: impl Into<String>,
        stock: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description: description.into(),
            price,
            category: category.into(),
            stock,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Stamp the record as modified now
    pub fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}

impl Record for Product {
    fn id(&self) -> &str {
        &self.id
    }
}

/// The records every product service instance starts with
pub fn seed_products() -> Vec<Product> {
    vec![
        Product {
            id: "1".to_string(),
            name: "Laptop Pro".to_string(),
            description: "High-performance laptop for professionals".to_string(),
            price: 1299.99,
            category: "electronics".to_string(),
            stock: 50,
            created_at: Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap(),
            updated_at: None,
        },
        Product {
            id: "2".to_string(),
            name: "Wireless Mouse".to_string(),
            description: "Ergonomic wireless mouse with long battery life".to_string(),
            price: 49.99,
            category: "electronics".to_string(),
            stock: 200,
            created_at: Utc.with_ymd_and_hms(2024, 1, 11, 9, 30, 0).unwrap(),
            updated_at: None,
        },
        Product {
            id: "3".to_string(),
            name: "Office Chair".to_string(),
            description: "Comfortable ergonomic office chair".to_string(),
            price: 299.99,
            category: "furniture".to_string(),
            stock: 30,
            created_at: Utc.with_ymd_and_hms(2024, 1, 12, 11, 15, 0).unwrap(),
            updated_at: None,
        },
        Product {
            id: "4".to_string(),
            name: "Standing Desk".to_string(),
            description: "Adjustable height standing desk".to_string(),
            price: 599.99,
            category: "furniture".to_string(),
            stock: 25,
            created_at: Utc.with_ymd_and_hms(2024, 1, 13, 14, 0, 0).unwrap(),
            updated_at: None,
        },
        Product {
            id: "5".to_string(),
            name: "Mechanical Keyboard".to_string(),
            description: "RGB mechanical keyboard with Cherry MX switches".to_string(),
            price: 149.99,
            category: "electronics".to_string(),
            stock: 100,
            created_at: Utc.with_ymd_and_hms(2024, 1, 14, 16, 45, 0).unwrap(),
            updated_at: None,
        },
    ]
}
