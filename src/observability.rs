//! # Observability Module
//!
//! Structured logging setup shared by the three service binaries, plus the
//! uptime marker reported by the `/health` endpoints.
//!
//! Log output is controlled by the environment: `RUST_LOG` selects the
//! filter (default `micromart=info,tower_http=info`) and `LOG_FORMAT=json`
//! switches from human-readable lines to JSON.

use std::time::Instant;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Initialize logging for a service binary
///
/// Called once at the top of `main`; panics if a global subscriber is
/// already installed.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "micromart=info,tower_http=info".into());

    let registry = tracing_subscriber::registry().with(filter);

    let json_output = std::env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json_output {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true).json())
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }
}

/// Process start marker used by health endpoints to report uptime
#[derive(Debug, Clone, Copy)]
pub struct StartTime(Instant);

impl StartTime {
    /// Capture the current instant as the process start
    pub fn now() -> Self {
        Self(Instant::now())
    }

    /// Seconds elapsed since the marker was captured
    pub fn uptime_secs(&self) -> f64 {
        self.0.elapsed().as_secs_f64()
    }
}

impl Default for StartTime {
    fn default() -> Self {
        Self::now()
    }
}
