//! Holdings registry trait.

use async_trait::async_trait;

use super::holdings_model::{NewHolding, UniversalHolding};
use crate::errors::Result;

/// Trait defining the contract for the holdings registry.
///
/// The registry is keyed by canonical ticker. Implementations must treat
/// `create` as an upsert on that key so the one-entry-per-ticker invariant
/// holds even under concurrent auto-adds.
#[async_trait]
pub trait HoldingRegistryTrait: Send + Sync {
    /// Looks up a registry entry by canonical ticker.
    fn by_ticker(&self, canonical_ticker: &str) -> Result<Option<UniversalHolding>>;

    /// Creates (or returns the existing) entry for the new holding's ticker.
    async fn create(&self, new_holding: NewHolding) -> Result<UniversalHolding>;
}
