//! # Product Service
//!
//! The product catalog backend: CRUD over the in-memory product collection,
//! the filter/sort/limit listing pipeline, stock adjustments, category
//! listing, and catalog statistics.
//!
//! ## Endpoints
//! - `GET /products` with category/price/stock/sort/limit query options
//! - `POST /products`, `GET|PUT|DELETE /products/:id`
//! - `PATCH /products/:id/stock` for relative stock changes
//! - `GET /categories`, `GET /stats`, `GET /health`, `GET /`
//!
//! Updates run their field validation inside the store's draft closure, so
//! an unknown id always answers 404 before any payload problem is reported
//! and a failed validation leaves the stored record untouched.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, patch};
use axum::{Json, Router};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::core::error::{route_not_found, ServiceError, ServiceResult};
use crate::domain::product::{seed_products, Product};
use crate::observability::StartTime;
use crate::query::ProductQuery;
use crate::stats::{distinct_categories, ProductStats};
use crate::store::CollectionStore;

/// Shared state of the product service
#[derive(Clone)]
pub struct ProductServiceState {
    store: Arc<CollectionStore<Product>>,
    started_at: StartTime,
}

impl ProductServiceState {
    /// State seeded with the standard catalog records
    pub fn new() -> Self {
        Self::with_products(seed_products())
    }

    /// State holding the given product records
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            store: Arc::new(CollectionStore::seeded(products)),
            started_at: StartTime::now(),
        }
    }

    /// Number of product records currently stored
    pub fn product_count(&self) -> usize {
        self.store.len()
    }
}

impl Default for ProductServiceState {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the product service router
pub fn router(state: ProductServiceState) -> Router {
    Router::new()
        .route("/", get(service_info))
        .route("/health", get(health))
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/products/:id/stock", patch(adjust_stock))
        .route("/categories", get(categories))
        .route("/stats", get(stats))
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Payload for `POST /products`
#[derive(Debug, Deserialize)]
struct CreateProductPayload {
    name: Option<String>,
    description: Option<String>,
    price: Option<f64>,
    category: Option<String>,
    stock: Option<i64>,
}

/// Payload for `PUT /products/:id`
#[derive(Debug, Deserialize)]
struct UpdateProductPayload {
    name: Option<String>,
    description: Option<String>,
    price: Option<f64>,
    category: Option<String>,
    stock: Option<i64>,
}

/// Payload for `PATCH /products/:id/stock`
#[derive(Debug, Deserialize)]
struct StockPayload {
    quantity: Option<i64>,
}

/// `GET /` service descriptor
async fn service_info() -> Json<Value> {
    Json(json!({
        "service": "product-service",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health",
            "products": "/products",
            "categories": "/categories",
            "stats": "/stats",
        },
    }))
}

/// `GET /health` liveness payload
async fn health(State(state): State<ProductServiceState>) -> Json<Value> {
    Json(json!({
        "service": "product-service",
        "status": "healthy",
        "timestamp": Utc::now(),
        "uptime": state.started_at.uptime_secs(),
        "totalProducts": state.store.len(),
    }))
}

/// `GET /products` with the filter/sort/limit query pipeline
async fn list_products(
    State(state): State<ProductServiceState>,
    Query(query): Query<ProductQuery>,
) -> Json<Vec<Product>> {
    Json(query.apply(state.store.list()))
}

/// `GET /products/:id`
async fn get_product(
    State(state): State<ProductServiceState>,
    Path(id): Path<String>,
) -> ServiceResult<Json<Product>> {
    match state.store.get(&id) {
        Some(product) => Ok(Json(product)),
        None => Err(ServiceError::not_found("Product", id)),
    }
}

/// `POST /products`
async fn create_product(
    State(state): State<ProductServiceState>,
    Json(payload): Json<CreateProductPayload>,
) -> ServiceResult<(StatusCode, Json<Product>)> {
    let name = payload.name.unwrap_or_default();

    if name.is_empty() || payload.price.is_none() {
        return Err(ServiceError::validation("Name and price are required"));
    }
    let price = payload.price.unwrap_or_default();
    if price < 0.0 {
        return Err(ServiceError::validation("Price must be a positive number"));
    }
    let stock = parse_stock(payload.stock.unwrap_or(0))?;

    let description = payload.description.unwrap_or_default();
    let category = payload
        .category
        .filter(|category| !category.is_empty())
        .unwrap_or_else(|| "uncategorized".to_string());

    let product = Product::new(name, description, price, category, stock);
    let created = state.store.insert(product);

    info!(product_id = %created.id, "Created product");
    Ok((StatusCode::CREATED, Json(created)))
}

/// `PUT /products/:id` merge-style update
///
/// Absent fields keep their current values; an empty description is a valid
/// replacement while empty name and category are treated as absent.
async fn update_product(
    State(state): State<ProductServiceState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateProductPayload>,
) -> ServiceResult<Json<Product>> {
    let new_name = payload.name.filter(|name| !name.is_empty());
    let new_category = payload.category.filter(|category| !category.is_empty());

    let outcome = state.store.try_update(&id, |product| {
        if let Some(price) = payload.price {
            if price < 0.0 {
                return Err(ServiceError::validation("Price must be a positive number"));
            }
            product.price = price;
        }
        if let Some(raw) = payload.stock {
            product.stock = parse_stock(raw)?;
        }
        if let Some(name) = new_name {
            product.name = name;
        }
        if let Some(description) = payload.description {
            product.description = description;
        }
        if let Some(category) = new_category {
            product.category = category;
        }
        product.touch();
        Ok(())
    })?;

    match outcome {
        Some(product) => {
            info!(product_id = %product.id, "Updated product");
            Ok(Json(product))
        }
        None => Err(ServiceError::not_found("Product", id)),
    }
}

/// `DELETE /products/:id`
async fn delete_product(
    State(state): State<ProductServiceState>,
    Path(id): Path<String>,
) -> ServiceResult<Json<Value>> {
    match state.store.remove(&id) {
        Some(product) => {
            info!(product_id = %id, "Deleted product");
            Ok(Json(json!({
                "message": "Product deleted successfully",
                "product": product,
            })))
        }
        None => Err(ServiceError::not_found("Product", id)),
    }
}

/// `PATCH /products/:id/stock` relative stock adjustment
///
/// The quantity may be negative; a change that would take stock below zero
/// is rejected with the current stock level and the record stays unchanged.
async fn adjust_stock(
    State(state): State<ProductServiceState>,
    Path(id): Path<String>,
    Json(payload): Json<StockPayload>,
) -> ServiceResult<Json<Product>> {
    let outcome = state.store.try_update(&id, |product| {
        let quantity = payload
            .quantity
            .ok_or_else(|| ServiceError::validation("Quantity is required"))?;
        let new_stock = i64::from(product.stock).saturating_add(quantity);
        if new_stock < 0 {
            return Err(ServiceError::InsufficientStock {
                current_stock: product.stock,
                requested_change: quantity,
            });
        }
        product.stock = u32::try_from(new_stock)
            .map_err(|_| ServiceError::validation("Quantity out of range"))?;
        product.touch();
        Ok(())
    })?;

    match outcome {
        Some(product) => {
            info!(product_id = %product.id, stock = product.stock, "Adjusted product stock");
            Ok(Json(product))
        }
        None => Err(ServiceError::not_found("Product", id)),
    }
}

/// `GET /stats`
async fn stats(State(state): State<ProductServiceState>) -> Json<ProductStats> {
    Json(ProductStats::compute(&state.store.list()))
}

/// `GET /categories` distinct category names in first-seen order
async fn categories(State(state): State<ProductServiceState>) -> Json<Vec<String>> {
    Json(distinct_categories(&state.store.list()))
}

fn parse_stock(raw: i64) -> ServiceResult<u32> {
    u32::try_from(raw).map_err(|_| ServiceError::validation("Stock must be a non-negative integer"))
}
