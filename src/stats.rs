//! # Statistics Module
//!
//! Derived, read-only views over store snapshots: collection totals, role
//! and category breakdowns, stock warnings, and the distinct category list.
//! Everything here is a pure function of the records passed in; nothing
//! reaches back into a store.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{Product, User, UserRole};

/// Aggregated view of the user collection
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    /// Number of user records
    pub total_users: usize,

    /// Record counts per role
    pub by_role: RoleBreakdown,

    /// The most recently created user, `null` for an empty collection
    ///
    /// On a creation-time tie the record stored first wins.
    pub last_created: Option<User>,
}

/// Per-role record counts
#[derive(Debug, Clone, Serialize)]
pub struct RoleBreakdown {
    pub admin: usize,
    pub user: usize,
}

impl UserStats {
    /// Compute statistics from a snapshot of the user collection
    pub fn compute(users: &[User]) -> Self {
        let mut last_created: Option<&User> = None;
        for user in users {
            let is_later = match last_created {
                Some(latest) => user.created_at > latest.created_at,
                None => true,
            };
            if is_later {
                last_created = Some(user);
            }
        }

        Self {
            total_users: users.len(),
            by_role: RoleBreakdown {
                admin: users.iter().filter(|u| u.role == UserRole::Admin).count(),
                user: users.iter().filter(|u| u.role == UserRole::User).count(),
            },
            last_created: last_created.cloned(),
        }
    }
}

/// Aggregated view of the product collection
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductStats {
    /// Number of product records
    pub total_products: usize,

    /// Inventory value, the sum of price times stock over all records
    pub total_value: f64,

    /// Record counts per category
    pub by_category: BTreeMap<String, usize>,

    /// Products with fewer than 10 units on hand (includes out-of-stock)
    pub low_stock: usize,

    /// Products with zero units on hand
    pub out_of_stock: usize,
}

impl ProductStats {
    /// Compute statistics from a snapshot of the product collection
    pub fn compute(products: &[Product]) -> Self {
        let mut by_category = BTreeMap::new();
        for product in products {
            *by_category.entry(product.category.clone()).or_insert(0) += 1;
        }

        Self {
            total_products: products.len(),
            total_value: products.iter().map(|p| p.price * p.stock as f64).sum(),
            by_category,
            low_stock: products.iter().filter(|p| p.stock < 10).count(),
            out_of_stock: products.iter().filter(|p| p.stock == 0).count(),
        }
    }
}

/// Distinct category names in order of first appearance
pub fn distinct_categories(products: &[Product]) -> Vec<String> {
    let mut categories: Vec<String> = Vec::new();
    for product in products {
        if !categories.contains(&product.category) {
            categories.push(product.category.clone());
        }
    }
    categories
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::seed_products;
    use crate::domain::user::seed_users;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_user_stats_over_seeds() {
        let stats = UserStats::compute(&seed_users());

        assert_eq!(stats.total_users, 3);
        assert_eq!(stats.by_role.admin, 1);
        assert_eq!(stats.by_role.user, 2);
        assert_eq!(stats.last_created.unwrap().name, "Bob Wilson");
    }

    #[test]
    fn test_user_stats_empty_collection_serializes_null_last_created() {
        let stats = UserStats::compute(&[]);
        assert_eq!(stats.total_users, 0);

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["byRole"]["admin"], 0);
        assert!(json["lastCreated"].is_null());
        assert!(json.as_object().unwrap().contains_key("lastCreated"));
    }

    #[test]
    fn test_last_created_tie_goes_to_first_stored() {
        let mut users = seed_users();
        let tie = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        users[0].created_at = tie;
        users[2].created_at = tie;

        let stats = UserStats::compute(&users);
        assert_eq!(stats.last_created.unwrap().id, "1");
    }

    #[test]
    fn test_product_stats_over_seeds() {
        let stats = ProductStats::compute(&seed_products());

        assert_eq!(stats.total_products, 5);
        assert!((stats.total_value - 113_995.95).abs() < 0.01);
        assert_eq!(stats.by_category.get("electronics"), Some(&3));
        assert_eq!(stats.by_category.get("furniture"), Some(&2));
        assert_eq!(stats.low_stock, 0);
        assert_eq!(stats.out_of_stock, 0);
    }

    #[test]
    fn test_stock_warnings() {
        let mut products = seed_products();
        products[0].stock = 0;
        products[1].stock = 5;

        let stats = ProductStats::compute(&products);
        // An out-of-stock product also counts as low stock.
        assert_eq!(stats.low_stock, 2);
        assert_eq!(stats.out_of_stock, 1);
    }

    #[test]
    fn test_product_stats_serializes_camel_case() {
        let json = serde_json::to_value(ProductStats::compute(&seed_products())).unwrap();
        assert!(json.get("totalProducts").is_some());
        assert!(json.get("totalValue").is_some());
        assert!(json.get("byCategory").is_some());
        assert!(json.get("lowStock").is_some());
        assert!(json.get("outOfStock").is_some());
    }

    #[test]
    fn test_distinct_categories_first_appearance_order() {
        assert_eq!(
            distinct_categories(&seed_products()),
            vec!["electronics", "furniture"]
        );

        let mut products = seed_products();
        products[0].category = "zeta".to_string();
        assert_eq!(
            distinct_categories(&products),
            vec!["zeta", "electronics", "furniture"]
        );

        assert!(distinct_categories(&[]).is_empty());
    }
}
