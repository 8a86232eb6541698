//! Crate-wide constants.

pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Flat per-session rate in cents (500.00). A per-service price table
/// would replace this constant without touching the generator contract.
pub const SESSION_PRICE_CENTS: i64 = 50_000;

/// Days after booking before the capture line falls due.
pub const CAPTURE_LINE_DUE_DAYS: i64 = 3;

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    "info,consulta=debug".to_string()
}
