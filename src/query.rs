//! # Query Pipeline Module
//!
//! List-endpoint query options for the two backend services, applied as pure
//! functions over store snapshots in a fixed filter, then sort, then limit
//! order. The stored collection is never touched.
//!
//! Parsing is deliberately lenient: every option arrives as a raw string and
//! a value that does not parse simply leaves its filter switched off. A bad
//! query can narrow a listing, never fail it.

use std::cmp::Ordering;

use serde::Deserialize;

use crate::domain::{Product, User};

/// Query options for `GET /users`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserQuery {
    /// Keep only users whose role matches this value exactly
    pub role: Option<String>,

    /// Cap the number of returned records
    pub limit: Option<String>,
}

impl UserQuery {
    /// Run the pipeline over a snapshot of the user collection
    pub fn apply(&self, users: Vec<User>) -> Vec<User> {
        let mut result = users;

        if let Some(role) = non_empty(&self.role) {
            result.retain(|user| user.role.as_str() == role);
        }

        if let Some(limit) = parse_limit(&self.limit) {
            result.truncate(limit);
        }

        result
    }
}

/// Query options for `GET /products`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    /// Keep only products in this category
    pub category: Option<String>,

    /// Lower price bound, inclusive
    pub min_price: Option<String>,

    /// Upper price bound, inclusive
    pub max_price: Option<String>,

    /// When exactly `"true"`, keep only products with stock on hand
    pub in_stock: Option<String>,

    /// Sort specification, `field` or `field:direction`
    pub sort: Option<String>,

    /// Cap the number of returned records
    pub limit: Option<String>,
}

impl ProductQuery {
    /// Run the pipeline over a snapshot of the product collection
    ///
    /// Filters combine with AND; the sort is stable, so records that compare
    /// equal (and every record under an unrecognized sort field) keep their
    /// stored relative order.
    pub fn apply(&self, products: Vec<Product>) -> Vec<Product> {
        let mut result = products;

        if let Some(category) = non_empty(&self.category) {
            result.retain(|product| product.category == category);
        }

        if let Some(min_price) = parse_price(&self.min_price) {
            result.retain(|product| product.price >= min_price);
        }

        if let Some(max_price) = parse_price(&self.max_price) {
            result.retain(|product| product.price <= max_price);
        }

        if self.in_stock.as_deref() == Some("true") {
            result.retain(|product| product.stock > 0);
        }

        if let Some(sort) = non_empty(&self.sort) {
            let (field, direction) = match sort.split_once(':') {
                Some((field, direction)) => (field, direction),
                None => (sort, "asc"),
            };
            let descending = direction == "desc";

            result.sort_by(|a, b| {
                let ordering = compare_products(field, a, b);
                if descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }

        if let Some(limit) = parse_limit(&self.limit) {
            result.truncate(limit);
        }

        result
    }
}

/// Compare two products on a named sort field
///
/// Unrecognized fields compare `Equal`, which under a stable sort leaves the
/// listing in stored order.
fn compare_products(field: &str, a: &Product, b: &Product) -> Ordering {
    match field {
        "name" => a.name.cmp(&b.name),
        "price" => a.price.total_cmp(&b.price),
        "stock" => a.stock.cmp(&b.stock),
        "category" => a.category.cmp(&b.category),
        "createdAt" => a.created_at.cmp(&b.created_at),
        _ => Ordering::Equal,
    }
}

/// Treat an absent or empty option as switched off
fn non_empty(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().filter(|value| !value.is_empty())
}

/// Parse a price bound; anything that is not a finite number switches the
/// bound off
fn parse_price(raw: &Option<String>) -> Option<f64> {
    raw.as_deref()
        .and_then(|value| value.trim().parse::<f64>().ok())
        .filter(|value| value.is_finite())
}

/// Parse a result cap; a malformed or negative value switches the cap off
fn parse_limit(raw: &Option<String>) -> Option<usize> {
    raw.as_deref()
        .and_then(|value| value.trim().parse::<usize>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::seed_products;
    use crate::domain::user::seed_users;
    use crate::domain::UserRole;

    fn query(
        category: Option<&str>,
        min_price: Option<&str>,
        max_price: Option<&str>,
        in_stock: Option<&str>,
        sort: Option<&str>,
        limit: Option<&str>,
    ) -> ProductQuery {
        ProductQuery {
            category: category.map(String::from),
            min_price: min_price.map(String::from),
            max_price: max_price.map(String::from),
            in_stock: in_stock.map(String::from),
            sort: sort.map(String::from),
            limit: limit.map(String::from),
        }
    }

    #[test]
    fn test_category_filter() {
        let result = query(Some("furniture"), None, None, None, None, None).apply(seed_products());
        let names: Vec<_> = result.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Office Chair", "Standing Desk"]);
    }

    #[test]
    fn test_empty_category_is_ignored() {
        let result = query(Some(""), None, None, None, None, None).apply(seed_products());
        assert_eq!(result.len(), 5);
    }

    #[test]
    fn test_price_band() {
        let result =
            query(None, Some("100"), Some("600"), None, None, None).apply(seed_products());
        let names: Vec<_> = result.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Office Chair", "Standing Desk", "Mechanical Keyboard"]
        );
    }

    #[test]
    fn test_malformed_price_bound_is_ignored() {
        let result = query(None, Some("abc"), None, None, None, None).apply(seed_products());
        assert_eq!(result.len(), 5);

        let result = query(None, Some("NaN"), None, None, None, None).apply(seed_products());
        assert_eq!(result.len(), 5);
    }

    #[test]
    fn test_in_stock_only_filters_on_exact_true() {
        let mut products = seed_products();
        products[0].stock = 0;

        let filtered =
            query(None, None, None, Some("true"), None, None).apply(products.clone());
        assert_eq!(filtered.len(), 4);
        assert!(filtered.iter().all(|p| p.stock > 0));

        let unfiltered = query(None, None, None, Some("TRUE"), None, None).apply(products.clone());
        assert_eq!(unfiltered.len(), 5);

        let unfiltered = query(None, None, None, Some("1"), None, None).apply(products);
        assert_eq!(unfiltered.len(), 5);
    }

    #[test]
    fn test_sort_ascending_by_default() {
        let result = query(None, None, None, None, Some("price"), None).apply(seed_products());
        let prices: Vec<_> = result.iter().map(|p| p.price).collect();
        assert_eq!(prices, vec![49.99, 149.99, 299.99, 599.99, 1299.99]);
    }

    #[test]
    fn test_sort_descending() {
        let result =
            query(None, None, None, None, Some("name:desc"), None).apply(seed_products());
        let names: Vec<_> = result.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Wireless Mouse",
                "Standing Desk",
                "Office Chair",
                "Mechanical Keyboard",
                "Laptop Pro"
            ]
        );
    }

    #[test]
    fn test_unknown_sort_field_keeps_stored_order() {
        let result =
            query(None, None, None, None, Some("flavor:desc"), None).apply(seed_products());
        let ids: Vec<_> = result.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let mut products = seed_products();
        for product in &mut products {
            product.price = 10.0;
        }

        let result = query(None, None, None, None, Some("price"), None).apply(products);
        let ids: Vec<_> = result.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test_limit() {
        let result = query(None, None, None, None, None, Some("2")).apply(seed_products());
        assert_eq!(result.len(), 2);

        let result = query(None, None, None, None, None, Some("0")).apply(seed_products());
        assert!(result.is_empty());

        let result = query(None, None, None, None, None, Some("-1")).apply(seed_products());
        assert_eq!(result.len(), 5);

        let result = query(None, None, None, None, None, Some("abc")).apply(seed_products());
        assert_eq!(result.len(), 5);
    }

    #[test]
    fn test_full_pipeline_order() {
        let result = query(
            Some("electronics"),
            None,
            None,
            None,
            Some("price:desc"),
            Some("2"),
        )
        .apply(seed_products());

        let names: Vec<_> = result.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Laptop Pro", "Mechanical Keyboard"]);
    }

    #[test]
    fn test_user_role_filter_and_limit() {
        let all = UserQuery::default().apply(seed_users());
        assert_eq!(all.len(), 3);

        let admins = UserQuery {
            role: Some("admin".to_string()),
            limit: None,
        }
        .apply(seed_users());
        assert_eq!(admins.len(), 1);
        assert_eq!(admins[0].role, UserRole::Admin);

        let unknown = UserQuery {
            role: Some("superadmin".to_string()),
            limit: None,
        }
        .apply(seed_users());
        assert!(unknown.is_empty());

        let capped = UserQuery {
            role: None,
            limit: Some("2".to_string()),
        }
        .apply(seed_users());
        let ids: Vec<_> = capped.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }
}
