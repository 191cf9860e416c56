//! # Upstream HTTP Client
//!
//! The gateway's HTTP client for talking to the backend services. It covers
//! the three upstream call shapes the gateway makes:
//!
//! - `relay` forwards a client request and hands back the upstream's
//!   success response for mirroring
//! - `probe_health` checks a service's `/health` endpoint on a short
//!   timeout for the discovery endpoint
//! - `fetch_count` pulls a collection listing and reduces it to a record
//!   count for the dashboard
//!
//! reqwest and axum sit on different `http` major versions, so status codes
//! cross that boundary through their numeric value.

use std::time::Duration;

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::Value;
use tokio::time::timeout;
use tracing::{error, warn};

use crate::core::error::{ServiceError, ServiceResult};

/// How long a health probe may take before the service counts as offline
pub const HEALTH_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Overall timeout for forwarded requests and dashboard fetches
pub const UPSTREAM_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Result of probing a backend service's health endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    Online,
    Offline,
}

/// A successful upstream response, ready to mirror back to the client
#[derive(Debug)]
pub struct RelayedResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl IntoResponse for RelayedResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            self.body,
        )
            .into_response()
    }
}

/// HTTP client shared by all gateway handlers
///
/// Cloning is cheap; the inner reqwest client is reference-counted and
/// reuses its connection pool across clones.
#[derive(Clone)]
pub struct UpstreamClient {
    client: Client,
}

impl UpstreamClient {
    /// Build the client with the standard upstream timeout
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(UPSTREAM_REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self { client }
    }

    /// Forward a request to a backend service and return its success response
    ///
    /// A non-success answer from the upstream becomes an `Upstream` error
    /// carrying that status, so the client sees the upstream's code with the
    /// gateway's unavailability body. Calls that never produce a response
    /// (connection refused, timeout) report 503.
    pub async fn relay(
        &self,
        service: &'static str,
        method: Method,
        url: String,
        body: Option<Bytes>,
    ) -> ServiceResult<RelayedResponse> {
        let mut request = self.client.request(method, &url);
        if let Some(body) = body {
            request = request
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        let response = request.send().await.map_err(|err| {
            error!(service, %url, error = %err, "Upstream request failed");
            ServiceError::upstream(service, None, err.to_string())
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(service, %url, status = %status, "Upstream answered with error status");
            return Err(ServiceError::upstream(
                service,
                Some(mirror_status(status)),
                format!("Request failed with status code {}", status.as_u16()),
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| ServiceError::upstream(service, None, err.to_string()))?;

        Ok(RelayedResponse {
            status: mirror_status(status),
            body,
        })
    }

    /// Probe a service's `/health` endpoint on the short probe timeout
    pub async fn probe_health(&self, base_url: &str) -> ProbeStatus {
        let url = format!("{base_url}/health");

        match timeout(HEALTH_PROBE_TIMEOUT, self.client.get(&url).send()).await {
            Ok(Ok(response)) if response.status().is_success() => ProbeStatus::Online,
            Ok(Ok(response)) => {
                warn!(%url, status = %response.status(), "Health probe returned error status");
                ProbeStatus::Offline
            }
            Ok(Err(err)) => {
                warn!(%url, error = %err, "Health probe failed");
                ProbeStatus::Offline
            }
            Err(_) => {
                warn!(%url, "Health probe timed out");
                ProbeStatus::Offline
            }
        }
    }

    /// Fetch a collection listing and return how many records it holds
    ///
    /// Any failure along the way (connection, error status, non-array body)
    /// collapses to `None`; the dashboard reports the service unavailable.
    pub async fn fetch_count(&self, url: String) -> Option<usize> {
        let response = self.client.get(&url).send().await.ok()?;
        if !response.status().is_success() {
            return None;
        }

        let records: Vec<Value> = response.json().await.ok()?;
        Some(records.len())
    }
}

impl Default for UpstreamClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Carry a reqwest status over into the response-side `http` types
fn mirror_status(status: reqwest::StatusCode) -> StatusCode {
    StatusCode::from_u16(status.as_u16()).unwrap_or(StatusCode::SERVICE_UNAVAILABLE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_value(ProbeStatus::Online).unwrap(),
            serde_json::json!("online")
        );
        assert_eq!(
            serde_json::to_value(ProbeStatus::Offline).unwrap(),
            serde_json::json!("offline")
        );
    }

    #[test]
    fn test_mirror_status_keeps_the_numeric_code() {
        assert_eq!(
            mirror_status(reqwest::StatusCode::NOT_FOUND),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            mirror_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
