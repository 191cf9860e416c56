//! # Product Service Binary
//!
//! Runs the product catalog service on its own listener (port 3002 by
//! default). All actual behavior lives in the library; this binary wires
//! configuration, logging, and the router together.

use tracing::info;

use micromart::core::config::{ServerSettings, DEFAULT_PRODUCT_SERVICE_PORT};
use micromart::services::products::{self, ProductServiceState};
use micromart::{observability, services, ServiceResult};

#[tokio::main]
async fn main() -> ServiceResult<()> {
    observability::init();

    let settings = ServerSettings::from_env(DEFAULT_PRODUCT_SERVICE_PORT)?;
    let state = ProductServiceState::new();

    info!("🚀 Starting product service v{}", env!("CARGO_PKG_VERSION"));
    info!("📦 Seeded {} products", state.product_count());
    info!("🌐 Listening on {}", settings.addr());

    services::serve(products::router(state), &settings).await
}
