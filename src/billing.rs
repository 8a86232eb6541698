//! Billing artifact generation — capture line + session price.
//!
//! The capture line is a display/reference token for payment, not a
//! cryptographic identifier: ten uniformly drawn decimal digits, with
//! repetition allowed. Collisions are statistically negligible at
//! practice booking volumes; a payment-reconciliation system would need
//! a uniqueness check on top.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config;

const CAPTURE_LINE_DIGITS: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingArtifact {
    pub capture_line: String,
    pub price_cents: i64,
}

/// Generate the billing artifact for a new appointment.
pub fn generate_artifact() -> BillingArtifact {
    let mut rng = rand::thread_rng();
    let capture_line: String = (0..CAPTURE_LINE_DIGITS)
        .map(|_| char::from_digit(rng.gen_range(0..10), 10).unwrap_or('0'))
        .collect();

    BillingArtifact {
        capture_line,
        price_cents: config::SESSION_PRICE_CENTS,
    }
}
