//! Compliance module - per-account risk-category ceiling checks.

mod compliance_model;
mod compliance_service;

// Re-export the public interface
pub use compliance_model::{
    AccountComplianceReport, CategoryWeight, ComplianceDetails, ComplianceResult,
};
pub use compliance_service::ComplianceService;
