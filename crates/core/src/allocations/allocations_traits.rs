//! Target allocation store trait.

use super::allocations_model::TargetAllocation;
use crate::accounts::AccountRef;
use crate::errors::Result;

/// Trait defining the contract for target-allocation reads.
pub trait TargetAllocationStoreTrait: Send + Sync {
    /// Target rows configured for one account.
    fn by_account(&self, account: &AccountRef) -> Result<Vec<TargetAllocation>>;

    /// Every target row across all accounts, for signal fan-out.
    fn all_targets(&self) -> Result<Vec<TargetAllocation>>;
}
