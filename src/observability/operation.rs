//! Instrumented operations and their scoped spans.
//!
//! # Responsibilities
//! - Name each logical operation's span, HTTP method and endpoint label
//! - Hold the open span for the duration of one operation
//! - End the span exactly once on every exit path
//!
//! # Design Decisions
//! - The span ends when the guard drops: normal return, `?`, panic unwind
//!   and a cancelled future all release it
//! - Endpoint labels are the concrete request path, so a delete carries
//!   its id; `route` gives the matching router template

use std::borrow::Cow;

use opentelemetry::trace::{Span as _, Status};
use opentelemetry_sdk::trace::Span;

use crate::observability::attributes::{AttributeValue, ERROR_TYPE};
use crate::store::TaskId;

/// The logical operations the to-do service exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// List all tasks (`GET /`).
    Home,
    /// Add a task (`POST /add`).
    AddTask,
    /// Delete the task with the given id (`GET /delete/{id}`).
    DeleteTask(TaskId),
}

impl Operation {
    pub fn span_name(self) -> &'static str {
        match self {
            Operation::Home => "home-request",
            Operation::AddTask => "add-task",
            Operation::DeleteTask(_) => "delete-task",
        }
    }

    pub fn method(self) -> &'static str {
        match self {
            Operation::Home | Operation::DeleteTask(_) => "GET",
            Operation::AddTask => "POST",
        }
    }

    /// Endpoint label for the request counter.
    pub fn endpoint(self) -> Cow<'static, str> {
        match self {
            Operation::DeleteTask(id) => Cow::Owned(format!("/delete/{id}")),
            other => Cow::Borrowed(other.route()),
        }
    }

    /// Router template the operation is served under.
    pub fn route(self) -> &'static str {
        match self {
            Operation::Home => "/",
            Operation::AddTask => "/add",
            Operation::DeleteTask(_) => "/delete/{id}",
        }
    }
}

/// An open span for one operation invocation.
///
/// Created by [`Telemetry::begin`](crate::observability::Telemetry::begin).
pub struct OperationSpan {
    operation: Operation,
    span: Span,
}

impl OperationSpan {
    pub(crate) fn new(operation: Operation, span: Span) -> Self {
        Self { operation, span }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Record an attribute on the span.
    pub fn set(&mut self, key: &'static str, value: impl Into<AttributeValue>) {
        self.span.set_attribute(value.into().into_key_value(key));
    }

    /// Mark the operation as completed successfully.
    pub fn succeed(&mut self) {
        self.span.set_status(Status::Ok);
    }

    /// Mark the operation as failed with `error`.
    ///
    /// Records an exception event, the `error.type` attribute and an error
    /// status carrying the error message.
    pub fn fail<E>(&mut self, kind: &'static str, error: &E)
    where
        E: std::error::Error,
    {
        self.span.record_error(error);
        self.set(ERROR_TYPE, kind);
        self.span.set_status(Status::error(error.to_string()));
    }
}

impl Drop for OperationSpan {
    fn drop(&mut self) {
        self.span.end();
    }
}
