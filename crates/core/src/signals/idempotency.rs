//! Idempotency key computation for signal task deduplication.
//!
//! Task titles change with copy edits; matching on them produces false
//! negatives. The dedup contract is a uniqueness constraint on
//! (account, signal direction, symbol) among open tasks, so the key is a
//! stable fingerprint of exactly that tuple and nothing else.

use sha2::{Digest, Sha256};

use super::signals_model::SignalDirection;

/// Computes the composite task key for one (account, direction, symbol)
/// tuple. `loose_symbol` must already be in loose comparison form so every
/// spelling of the ticker lands on the same key.
pub fn compute_task_key(account_id: &str, direction: SignalDirection, loose_symbol: &str) -> String {
    let mut hasher = Sha256::new();

    hasher.update(account_id.as_bytes());
    hasher.update(b"|");
    hasher.update(direction.as_str().as_bytes());
    hasher.update(b"|");
    hasher.update(loose_symbol.as_bytes());

    hex::encode(hasher.finalize())
}
