//! Signals module - inbound buy/sell alerts and the task generator.

mod idempotency;
mod signals_model;
mod signals_service;
mod signals_service_tests;

// Re-export the public interface
pub use idempotency::compute_task_key;
pub use signals_model::{Signal, SignalDirection, SignalOutcome};
pub use signals_service::SignalService;
