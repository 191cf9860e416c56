//! # Micromart Core Library
//!
//! Shared library for the micromart demo system: an API gateway fronting a
//! user service and a product service, each running as its own binary and
//! serving an in-memory collection.
//!
//! ## Architecture
//!
//! - `api-gateway` (port 3000) relays `/api/*` traffic to the backends and
//!   aggregates discovery and dashboard data
//! - `user-service` (port 3001) owns the user collection
//! - `product-service` (port 3002) owns the product catalog
//!
//! All three binaries are thin wrappers; routers, handlers, domain types,
//! and the storage layer live here so integration tests can exercise the
//! services in-process.

/// Error types and environment-driven configuration
pub mod core;

/// Domain records: users and products, with their seed data
pub mod domain;

/// Gateway server, upstream client, and aggregation endpoints
pub mod gateway;

/// Tracing setup and process start-time tracking
pub mod observability;

/// Listing query options: filtering, sorting, and limits
pub mod query;

/// Backend service routers and the shared serve/shutdown plumbing
pub mod services;

/// Statistics computed over the stored collections
pub mod stats;

/// Thread-safe in-memory collection storage
pub mod store;

/// Main error and result types used throughout the crate
pub use crate::core::error::{ServiceError, ServiceResult};

/// Configuration types read from the environment at startup
pub use crate::core::config::{GatewayConfig, ServerSettings};

/// Domain record types
pub use crate::domain::{Product, User, UserRole};

/// Storage primitive backing both backend services
pub use crate::store::CollectionStore;

/// Entry-point states for the three services
pub use crate::gateway::server::GatewayState;
pub use crate::services::products::ProductServiceState;
pub use crate::services::users::UserServiceState;
