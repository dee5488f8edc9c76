//! Route handlers. Each one maps to exactly one instrumented operation.
//!
//! The store may rewrite its persistence file on every mutation, so service
//! calls run on the blocking pool instead of a runtime worker.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::{Html, Redirect},
    Form,
};
use serde::Deserialize;

use crate::http::error::AppError;
use crate::http::server::AppState;
use crate::observability::extract_parent;
use crate::store::{StoreError, TaskId};
use crate::todo::{render_home, DeleteOutcome, ServiceError, TodoService};

/// Form body of `POST /add`.
#[derive(Debug, Deserialize)]
pub struct AddTaskForm {
    /// Missing field is treated as an empty description.
    #[serde(default)]
    pub task: String,
}

/// Run `call` against the service on the blocking pool.
async fn run_blocking<T, F>(todo: TodoService, call: F) -> Result<T, AppError>
where
    F: FnOnce(&TodoService) -> Result<T, ServiceError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || call(&todo))
        .await
        .map_err(|e| {
            AppError(ServiceError::Store(StoreError::Unavailable(format!(
                "store task failed: {e}"
            ))))
        })?
        .map_err(AppError::from)
}

/// `GET /`
pub async fn home(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>, AppError> {
    let parent = extract_parent(&headers);
    let tasks = run_blocking(state.todo, move |todo| todo.list(parent.as_ref())).await?;
    Ok(Html(render_home(&tasks)))
}

/// `POST /add`
pub async fn add_task(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<AddTaskForm>,
) -> Result<Redirect, AppError> {
    let parent = extract_parent(&headers);
    run_blocking(state.todo, move |todo| todo.add(&form.task, parent.as_ref())).await?;
    Ok(Redirect::to("/"))
}

/// `GET /delete/{id}`
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<TaskId>,
    headers: HeaderMap,
) -> Result<Redirect, AppError> {
    let parent = extract_parent(&headers);
    let outcome = run_blocking(state.todo, move |todo| todo.delete(id, parent.as_ref())).await?;
    if let DeleteOutcome::NotFound = outcome {
        tracing::info!(id, "Delete requested for unknown task");
    }
    Ok(Redirect::to("/"))
}
