//! Consulta — appointment lifecycle and availability engine for a
//! psychology practice.
//!
//! Core pieces:
//! - `availability` — weekly template of bookable start times (pure)
//! - `scheduling` — booking with conflict enforcement, the
//!   pending/confirmed/concluded/cancelled state machine, projections
//! - `billing` — capture-line token + flat session price
//! - `notifications` — psychologist messages with read/unread workflow
//! - `db` / `models` — SQLite persistence and entity types
//!
//! Patients and psychologists are externally owned; the engine only reads
//! them (plus seed inserts for callers and tests).

pub mod availability;
pub mod billing;
pub mod config;
pub mod db;
pub mod models;
pub mod notifications;
pub mod scheduling;

use tracing_subscriber::EnvFilter;

/// Initialize tracing with RUST_LOG or the crate default filter.
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init()
        .is_ok();
    if installed {
        tracing::info!("consulta engine v{}", config::APP_VERSION);
    }
}
