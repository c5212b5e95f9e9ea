//! Task domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a task. Only `Open` tasks participate in signal
/// deduplication; completing or archiving a task frees its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Open,
    Completed,
    Archived,
}

/// Advisory follow-up work item created from a trading signal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub account_id: String,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    /// Fingerprint of (account, signal direction, symbol). At most one open
    /// task may carry a given key.
    pub idempotency_key: String,
    pub created_at: DateTime<Utc>,
}

/// Input model for creating a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub account_id: String,
    pub title: String,
    pub description: String,
    pub idempotency_key: String,
}
