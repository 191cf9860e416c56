//! # Configuration Module
//!
//! Environment-driven settings for the three micromart services. Each binary
//! builds its settings once at startup and fails fast on invalid values.
//!
//! ## Key Features
//! - Typed settings structs with `Default` values matching the reference
//!   deployment (gateway on 3000, user service on 3001, product service on 3002)
//! - Environment variable overrides (`PORT`, `BIND_ADDRESS`,
//!   `USER_SERVICE_URL`, `PRODUCT_SERVICE_URL`, `GATEWAY_PUBLIC_URL`)
//! - Upstream URL validation with the `url` crate, with detailed error messages

use std::env;

use url::Url;

use crate::core::error::{ServiceError, ServiceResult};

/// Default port for the API gateway
pub const DEFAULT_GATEWAY_PORT: u16 = 3000;

/// Default port for the user service
pub const DEFAULT_USER_SERVICE_PORT: u16 = 3001;

/// Default port for the product service
pub const DEFAULT_PRODUCT_SERVICE_PORT: u16 = 3002;

/// Default upstream address of the user service (VM2 in the reference deployment)
pub const DEFAULT_USER_SERVICE_URL: &str = "http://10.0.0.20:3001";

/// Default upstream address of the product service (VM3 in the reference deployment)
pub const DEFAULT_PRODUCT_SERVICE_URL: &str = "http://10.0.0.30:3002";

/// Host under which the gateway announces itself (VM1 in the reference deployment)
const GATEWAY_PUBLIC_HOST: &str = "10.0.0.10";

/// Listener settings shared by every service binary
#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// Address the TCP listener binds to
    pub bind_address: String,

    /// Port the TCP listener binds to
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: DEFAULT_GATEWAY_PORT,
        }
    }
}

impl ServerSettings {
    /// Build listener settings from the environment
    ///
    /// Reads `BIND_ADDRESS` and `PORT`, falling back to `0.0.0.0` and the
    /// given per-service default port.
    pub fn from_env(default_port: u16) -> ServiceResult<Self> {
        let bind_address = env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0".to_string());

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|e| ServiceError::config(format!("Invalid PORT: {}", e)))?,
            Err(_) => default_port,
        };

        let settings = Self { bind_address, port };
        settings.validate()?;
        Ok(settings)
    }

    /// Validate the listener settings
    pub fn validate(&self) -> ServiceResult<()> {
        let mut errors = Vec::new();

        if self.bind_address.is_empty() {
            errors.push("bind_address cannot be empty".to_string());
        }

        if self.port == 0 {
            errors.push("port must be greater than 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::config(format!(
                "Configuration validation failed:\n{}",
                errors.join("\n")
            )))
        }
    }

    /// The `address:port` string handed to the TCP listener
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

/// Gateway configuration: listener settings plus the upstream service URLs
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Listener settings for the gateway itself
    pub server: ServerSettings,

    /// URL under which the gateway reports itself in the `/services` overview
    pub public_url: String,

    /// Base URL of the user service
    pub user_service_url: String,

    /// Base URL of the product service
    pub product_service_url: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            public_url: format!("http://{}:{}", GATEWAY_PUBLIC_HOST, DEFAULT_GATEWAY_PORT),
            user_service_url: DEFAULT_USER_SERVICE_URL.to_string(),
            product_service_url: DEFAULT_PRODUCT_SERVICE_URL.to_string(),
        }
    }
}

impl GatewayConfig {
    /// Build the gateway configuration from the environment
    ///
    /// Reads `USER_SERVICE_URL` and `PRODUCT_SERVICE_URL` for the upstream
    /// base URLs and `GATEWAY_PUBLIC_URL` for the advertised address; the
    /// latter defaults to the public host with whatever port was configured.
    pub fn from_env() -> ServiceResult<Self> {
        let server = ServerSettings::from_env(DEFAULT_GATEWAY_PORT)?;

        let user_service_url = service_url_from_env("USER_SERVICE_URL", DEFAULT_USER_SERVICE_URL)?;
        let product_service_url =
            service_url_from_env("PRODUCT_SERVICE_URL", DEFAULT_PRODUCT_SERVICE_URL)?;

        let public_url = match env::var("GATEWAY_PUBLIC_URL") {
            Ok(raw) => validated_url("GATEWAY_PUBLIC_URL", &raw)?,
            Err(_) => format!("http://{}:{}", GATEWAY_PUBLIC_HOST, server.port),
        };

        Ok(Self {
            server,
            public_url,
            user_service_url,
            product_service_url,
        })
    }
}

/// Read an upstream base URL from the environment, falling back to a default
fn service_url_from_env(var: &str, default: &str) -> ServiceResult<String> {
    match env::var(var) {
        Ok(raw) => validated_url(var, &raw),
        Err(_) => Ok(default.to_string()),
    }
}

/// Parse-check a URL value and normalize it for path concatenation
///
/// A trailing slash would double up when request paths are appended, so it
/// is stripped here.
fn validated_url(var: &str, raw: &str) -> ServiceResult<String> {
    Url::parse(raw)
        .map_err(|e| ServiceError::config(format!("Invalid {}: '{}' ({})", var, raw, e)))?;
    Ok(raw.trim_end_matches('/').to_string())
}
