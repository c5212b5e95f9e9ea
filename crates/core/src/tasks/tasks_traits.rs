//! Outbound sink traits for tasks and reports.

use async_trait::async_trait;

use super::tasks_model::{NewTask, Task};
use crate::accounts::Account;
use crate::errors::Result;
use crate::reconciliation::ReconciliationRow;

/// Trait defining the contract for the task sink.
#[async_trait]
pub trait TaskSinkTrait: Send + Sync {
    /// Finds the open task carrying an idempotency key, if any.
    fn find_open_by_key(&self, idempotency_key: &str) -> Result<Option<Task>>;

    /// Creates a task.
    async fn create(&self, new_task: NewTask) -> Result<Task>;
}

/// Trait defining the contract for reconciliation report delivery.
///
/// Implementations render and deliver the report (PDF, email, etc.).
/// Callers catch and log failures; a failed dispatch never aborts signal
/// processing.
#[async_trait]
pub trait ReportSinkTrait: Send + Sync {
    async fn send_reconciliation_report(
        &self,
        account: &Account,
        rows: &[ReconciliationRow],
        recipient: &str,
    ) -> Result<()>;
}
