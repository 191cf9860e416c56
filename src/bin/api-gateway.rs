//! # API Gateway Binary
//!
//! Runs the gateway on its own listener (port 3000 by default), fronting
//! the user and product services. All actual behavior lives in the library;
//! this binary wires configuration, logging, and the router together.

use tracing::info;

use micromart::core::config::GatewayConfig;
use micromart::gateway::{self, GatewayState};
use micromart::{observability, services, ServiceResult};

#[tokio::main]
async fn main() -> ServiceResult<()> {
    observability::init();

    let config = GatewayConfig::from_env()?;
    let settings = config.server.clone();

    info!("🚀 Starting API gateway v{}", env!("CARGO_PKG_VERSION"));
    info!("👥 User service at {}", config.user_service_url);
    info!("📦 Product service at {}", config.product_service_url);
    info!("🌐 Listening on {}", settings.addr());

    services::serve(gateway::router(GatewayState::new(config)), &settings).await
}
