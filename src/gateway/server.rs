//! # Gateway Server
//!
//! The gateway's router and request handlers. Client traffic on `/api/users`
//! and `/api/products` is relayed to the backend services path-by-path; the
//! gateway adds its own plumbing endpoints (`/`, `/health`) and the fan-out
//! endpoints assembled in [`crate::gateway::aggregator`].
//!
//! ## Relay behavior
//!
//! - Request bodies are forwarded byte-for-byte as JSON; query strings are
//!   not forwarded
//! - Success responses mirror the upstream's status and body
//! - Upstream error statuses surface as `{error, details}` with the same
//!   status code; unreachable backends answer 503

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use bytes::Bytes;
use chrono::Utc;
use reqwest::Method;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::config::GatewayConfig;
use crate::core::error::{route_not_found, ServiceResult};
use crate::gateway::aggregator::{self, Dashboard, ServiceDirectory};
use crate::gateway::upstream::{RelayedResponse, UpstreamClient};
use crate::observability::StartTime;

const USER_SERVICE: &str = "User service";
const PRODUCT_SERVICE: &str = "Product service";

/// Shared state of the gateway
#[derive(Clone)]
pub struct GatewayState {
    pub config: Arc<GatewayConfig>,
    pub upstream: UpstreamClient,
    started_at: StartTime,
}

impl GatewayState {
    /// State wrapping the given configuration with a fresh upstream client
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config: Arc::new(config),
            upstream: UpstreamClient::new(),
            started_at: StartTime::now(),
        }
    }

    async fn relay_users(
        &self,
        method: Method,
        path: &str,
        body: Option<Bytes>,
    ) -> ServiceResult<RelayedResponse> {
        let url = format!("{}{}", self.config.user_service_url, path);
        self.upstream.relay(USER_SERVICE, method, url, body).await
    }

    async fn relay_products(
        &self,
        method: Method,
        path: &str,
        body: Option<Bytes>,
    ) -> ServiceResult<RelayedResponse> {
        let url = format!("{}{}", self.config.product_service_url, path);
        self.upstream
            .relay(PRODUCT_SERVICE, method, url, body)
            .await
    }
}

/// Build the gateway router
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/", get(gateway_info))
        .route("/health", get(health))
        .route("/services", get(service_directory))
        .route("/api/dashboard", get(dashboard))
        .route("/api/users", get(list_users).post(create_user))
        .route(
            "/api/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/api/products", get(list_products).post(create_product))
        .route(
            "/api/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .fallback(route_not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// `GET /` welcome payload with the route map
async fn gateway_info() -> Json<Value> {
    Json(json!({
        "message": "Welcome to the Microservices API Gateway",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": "/health",
            "services": "/services",
            "users": "/api/users",
            "products": "/api/products",
            "dashboard": "/api/dashboard",
        },
    }))
}

/// `GET /health` liveness payload
///
/// Reports only the gateway's own health; backend reachability lives under
/// `/services`.
async fn health(State(state): State<GatewayState>) -> Json<Value> {
    Json(json!({
        "service": "api-gateway",
        "status": "healthy",
        "timestamp": Utc::now(),
        "uptime": state.started_at.uptime_secs(),
    }))
}

/// `GET /services` backend discovery directory
async fn service_directory(State(state): State<GatewayState>) -> Json<ServiceDirectory> {
    Json(aggregator::probe_services(&state.upstream, &state.config).await)
}

/// `GET /api/dashboard` cross-service summary
async fn dashboard(State(state): State<GatewayState>) -> Json<Dashboard> {
    Json(aggregator::aggregate_dashboard(&state.upstream, &state.config).await)
}

async fn list_users(State(state): State<GatewayState>) -> ServiceResult<RelayedResponse> {
    state.relay_users(Method::GET, "/users", None).await
}

async fn create_user(
    State(state): State<GatewayState>,
    body: Bytes,
) -> ServiceResult<RelayedResponse> {
    state.relay_users(Method::POST, "/users", Some(body)).await
}

async fn get_user(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> ServiceResult<RelayedResponse> {
    state
        .relay_users(Method::GET, &format!("/users/{id}"), None)
        .await
}

async fn update_user(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ServiceResult<RelayedResponse> {
    state
        .relay_users(Method::PUT, &format!("/users/{id}"), Some(body))
        .await
}

async fn delete_user(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> ServiceResult<RelayedResponse> {
    state
        .relay_users(Method::DELETE, &format!("/users/{id}"), None)
        .await
}

async fn list_products(State(state): State<GatewayState>) -> ServiceResult<RelayedResponse> {
    state.relay_products(Method::GET, "/products", None).await
}

async fn create_product(
    State(state): State<GatewayState>,
    body: Bytes,
) -> ServiceResult<RelayedResponse> {
    state
        .relay_products(Method::POST, "/products", Some(body))
        .await
}

async fn get_product(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> ServiceResult<RelayedResponse> {
    state
        .relay_products(Method::GET, &format!("/products/{id}"), None)
        .await
}

async fn update_product(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    body: Bytes,
) -> ServiceResult<RelayedResponse> {
    state
        .relay_products(Method::PUT, &format!("/products/{id}"), Some(body))
        .await
}

async fn delete_product(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
) -> ServiceResult<RelayedResponse> {
    state
        .relay_products(Method::DELETE, &format!("/products/{id}"), None)
        .await
}
