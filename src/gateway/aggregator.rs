//! # Aggregation Endpoints
//!
//! Payloads and assembly for the gateway's two fan-out endpoints: the
//! `/services` discovery directory and the `/api/dashboard` summary. Both
//! query the backend services concurrently and both always answer 200; a
//! backend being down shows up in the payload, not in the status code.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::join;

use crate::core::config::GatewayConfig;
use crate::gateway::upstream::{ProbeStatus, UpstreamClient};

/// Whether a backend answered the dashboard's data fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    Available,
    Unavailable,
}

/// One service's entry in the discovery directory
#[derive(Debug, Serialize)]
pub struct ServiceEntry {
    /// Base URL the gateway uses to reach the service
    pub url: String,
    /// Probe outcome; the gateway itself is always reported online
    pub status: ProbeStatus,
}

/// Payload of `GET /services`
#[derive(Debug, Serialize)]
pub struct ServiceDirectory {
    pub gateway: ServiceEntry,
    pub users: ServiceEntry,
    pub products: ServiceEntry,
}

/// One backend's section of the dashboard summary
#[derive(Debug, Serialize)]
pub struct DashboardEntry {
    /// Number of records the backend reported; zero when unavailable
    pub count: usize,
    pub status: Availability,
}

impl DashboardEntry {
    fn from_count(count: Option<usize>) -> Self {
        match count {
            Some(count) => Self {
                count,
                status: Availability::Available,
            },
            None => Self {
                count: 0,
                status: Availability::Unavailable,
            },
        }
    }
}

/// Payload of `GET /api/dashboard`
#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub users: DashboardEntry,
    pub products: DashboardEntry,
    pub timestamp: DateTime<Utc>,
}

/// Probe both backends concurrently and assemble the discovery directory
pub async fn probe_services(upstream: &UpstreamClient, config: &GatewayConfig) -> ServiceDirectory {
    let (users, products) = join!(
        upstream.probe_health(&config.user_service_url),
        upstream.probe_health(&config.product_service_url),
    );

    ServiceDirectory {
        gateway: ServiceEntry {
            url: config.public_url.clone(),
            status: ProbeStatus::Online,
        },
        users: ServiceEntry {
            url: config.user_service_url.clone(),
            status: users,
        },
        products: ServiceEntry {
            url: config.product_service_url.clone(),
            status: products,
        },
    }
}

/// Fetch both record counts concurrently and assemble the dashboard summary
///
/// A backend that cannot be reached contributes a zero count marked
/// unavailable; the other backend's data is still served.
pub async fn aggregate_dashboard(upstream: &UpstreamClient, config: &GatewayConfig) -> Dashboard {
    let (users, products) = join!(
        upstream.fetch_count(format!("{}/users", config.user_service_url)),
        upstream.fetch_count(format!("{}/products", config.product_service_url)),
    );

    Dashboard {
        users: DashboardEntry::from_count(users),
        products: DashboardEntry::from_count(products),
        timestamp: Utc::now(),
    }
}
