//! Instrumented to-do operations.
//!
//! # Responsibilities
//! - Open one span and count one request per operation invocation
//! - Delegate the state change to the task store
//! - Record outcome facts on the span before it closes
//!
//! # Design Decisions
//! - The counter is incremented before the store is touched, so failed
//!   requests are counted too
//! - A missing delete target is a successful no-op, visible only through
//!   the `task_found` attribute
//! - Store failures set an error status and a `false` success attribute

use opentelemetry::Context;
use std::sync::Arc;
use thiserror::Error;

use crate::observability::attributes::{
    ADDED_TO_DB, DELETED_FROM_DB, TASKS_RETRIEVED_QUANTITY, TASK_DESCRIPTION, TASK_FOUND,
    TASK_ID, TASK_TO_DELETE,
};
use crate::observability::{Operation, OperationSpan, Telemetry};
use crate::store::{StoreError, Task, TaskId, TaskStore};

/// Errors surfaced to the HTTP layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The submitted description was rejected by the store.
    #[error("invalid task: {0}")]
    InvalidTask(#[source] StoreError),

    /// The store failed to serve the request.
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::EmptyDescription => ServiceError::InvalidTask(e),
            other => ServiceError::Store(other),
        }
    }
}

/// Result of a delete request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The task existed and was removed.
    Deleted(Task),
    /// No task had the requested id.
    NotFound,
}

/// The to-do operations, each wrapped in its own span.
#[derive(Clone)]
pub struct TodoService {
    store: Arc<dyn TaskStore>,
    telemetry: Arc<Telemetry>,
}

impl TodoService {
    pub fn new(store: Arc<dyn TaskStore>, telemetry: Arc<Telemetry>) -> Self {
        Self { store, telemetry }
    }

    pub fn telemetry(&self) -> &Arc<Telemetry> {
        &self.telemetry
    }

    /// List all tasks (`home-request`).
    pub fn list(&self, parent: Option<&Context>) -> Result<Vec<Task>, ServiceError> {
        let mut span = self.telemetry.begin(Operation::Home, parent);

        match self.store.list_all() {
            Ok(tasks) => {
                span.set(TASKS_RETRIEVED_QUANTITY, tasks.len());
                span.succeed();
                tracing::debug!(count = tasks.len(), "Listed tasks");
                Ok(tasks)
            }
            Err(e) => Err(record_failure(&mut span, e)),
        }
    }

    /// Add a task with `description` (`add-task`).
    pub fn add(&self, description: &str, parent: Option<&Context>) -> Result<Task, ServiceError> {
        let mut span = self.telemetry.begin(Operation::AddTask, parent);
        span.set(TASK_DESCRIPTION, description);

        match self.store.create(description) {
            Ok(task) => {
                span.set(ADDED_TO_DB, true);
                span.succeed();
                tracing::debug!(id = task.id, "Added task");
                Ok(task)
            }
            Err(e) => {
                span.set(ADDED_TO_DB, false);
                Err(record_failure(&mut span, e))
            }
        }
    }

    /// Delete the task with `id` (`delete-task`).
    ///
    /// The description is read only from a record the store returned.
    pub fn delete(&self, id: TaskId, parent: Option<&Context>) -> Result<DeleteOutcome, ServiceError> {
        let mut span = self.telemetry.begin(Operation::DeleteTask(id), parent);
        span.set(TASK_ID, id);

        match self.store.delete_by_id(id) {
            Ok(Some(task)) => {
                span.set(TASK_FOUND, true);
                span.set(TASK_TO_DELETE, task.description.as_str());
                span.set(DELETED_FROM_DB, true);
                span.succeed();
                tracing::debug!(id, "Deleted task");
                Ok(DeleteOutcome::Deleted(task))
            }
            Ok(None) => {
                span.set(TASK_FOUND, false);
                span.succeed();
                tracing::debug!(id, "Delete target not found");
                Ok(DeleteOutcome::NotFound)
            }
            Err(e) => {
                span.set(DELETED_FROM_DB, false);
                Err(record_failure(&mut span, e))
            }
        }
    }
}

fn record_failure(span: &mut OperationSpan, error: StoreError) -> ServiceError {
    tracing::warn!(
        operation = span.operation().span_name(),
        error = %error,
        "Task store operation failed"
    );
    span.fail(error.kind(), &error);
    ServiceError::from(error)
}
