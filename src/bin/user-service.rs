//! # User Service Binary
//!
//! Runs the user service on its own listener (port 3001 by default). All
//! actual behavior lives in the library; this binary wires configuration,
//! logging, and the router together.

use tracing::info;

use micromart::core::config::{ServerSettings, DEFAULT_USER_SERVICE_PORT};
use micromart::services::users::{self, UserServiceState};
use micromart::{observability, services, ServiceResult};

#[tokio::main]
async fn main() -> ServiceResult<()> {
    observability::init();

    let settings = ServerSettings::from_env(DEFAULT_USER_SERVICE_PORT)?;
    let state = UserServiceState::new();

    info!("🚀 Starting user service v{}", env!("CARGO_PKG_VERSION"));
    info!("👥 Seeded {} users", state.user_count());
    info!("🌐 Listening on {}", settings.addr());

    services::serve(users::router(state), &settings).await
}
