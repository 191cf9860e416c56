//! # API Gateway
//!
//! The public entry point of the system. The gateway relays `/api/users`
//! and `/api/products` traffic to the backend services, probes their health
//! for service discovery, and aggregates cross-service dashboard data.

pub mod aggregator;
pub mod server;
pub mod upstream;

pub use server::{router, GatewayState};
pub use upstream::UpstreamClient;
