//! Account store trait.
//!
//! The store resolves account ids across the individual/corporate/joint
//! backing tables; the core never branches on the concrete table.

use super::accounts_model::{Account, RiskAllocation};
use crate::errors::Result;

/// Trait defining the contract for account lookups.
///
/// Implementations are storage-specific; the core only reads.
pub trait AccountStoreTrait: Send + Sync {
    /// Retrieves an account by its ID, whatever its legal shape.
    fn get_by_id(&self, account_id: &str) -> Result<Account>;

    /// Lists active accounts across all shapes.
    fn list_active(&self) -> Result<Vec<Account>>;

    /// Retrieves the advisor-configured risk ceilings for an account.
    fn risk_allocation(&self, account_id: &str) -> Result<RiskAllocation>;
}
