//! Accounts module - domain models and store traits.

mod accounts_model;
mod accounts_traits;

// Re-export the public interface
pub use accounts_model::{get_tolerances, Account, AccountKind, AccountRef, RiskAllocation, Tolerances};
pub use accounts_traits::AccountStoreTrait;
