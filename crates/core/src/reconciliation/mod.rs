//! Reconciliation module - actual-vs-target comparison per account.

mod reconciliation_model;
mod reconciliation_service;

// Re-export the public interface
pub use reconciliation_model::{ReconciliationReport, ReconciliationRow, RowStatus, TradeAction};
pub use reconciliation_service::{reconcile, ReconciliationService};
