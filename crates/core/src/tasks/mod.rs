//! Tasks module - advisory follow-up work items and outbound sinks.

mod tasks_model;
mod tasks_traits;

// Re-export the public interface
pub use tasks_model::{NewTask, Task, TaskStatus};
pub use tasks_traits::{ReportSinkTrait, TaskSinkTrait};
