//! Driftguard Core - domain entities, services, and traits.
//!
//! This crate contains the reconciliation-and-compliance business logic:
//! ticker normalization, actual-vs-target allocation reconciliation,
//! risk-category compliance checks, and signal-driven task generation.
//! It is storage- and transport-agnostic: persistence, task sinks, report
//! delivery, and quote feeds are traits implemented by collaborator crates.

pub mod accounts;
pub mod allocations;
pub mod compliance;
pub mod constants;
pub mod errors;
pub mod holdings;
pub mod positions;
pub mod quotes;
pub mod reconciliation;
pub mod signals;
pub mod symbols;
pub mod tasks;

// Re-export the types most callers need
pub use symbols::{SymbolNormalizer, SymbolRules};

// Re-export error types
pub use errors::Error;
pub use errors::Result;
