//! Task record, store contract and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Store-assigned task identifier.
pub type TaskId = u64;

/// A single to-do entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier, assigned by the store.
    pub id: TaskId,
    /// Non-empty task text.
    pub description: String,
}

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The submitted description is empty after trimming.
    #[error("task description must not be empty")]
    EmptyDescription,

    /// Reading or writing the persistence file failed.
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The persistence file could not be encoded or decoded.
    #[error("store encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    /// The store cannot serve requests (e.g. a writer panicked mid-commit).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Short stable name of the failure kind, used as a span attribute.
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::EmptyDescription => "empty_description",
            StoreError::Io(_) => "io",
            StoreError::Encoding(_) => "encoding",
            StoreError::Unavailable(_) => "unavailable",
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence collaborator used by the to-do service.
///
/// Every method commits before returning. Implementations own their
/// locking; callers share a store through `Arc<dyn TaskStore>`.
pub trait TaskStore: Send + Sync {
    /// All tasks in insertion order.
    fn list_all(&self) -> StoreResult<Vec<Task>>;

    /// Insert a new task and return it with its assigned id.
    fn create(&self, description: &str) -> StoreResult<Task>;

    /// Remove the task with `id`, returning it, or `None` when absent.
    fn delete_by_id(&self, id: TaskId) -> StoreResult<Option<Task>>;
}
