//! To-do domain subsystem.
//!
//! # Data Flow
//! ```text
//! http handler
//!     → service.rs (span + counter around the store call)
//!     → store (list / create / delete)
//!     → render.rs (list page) or redirect
//! ```

pub mod render;
pub mod service;

pub use render::render_home;
pub use service::{DeleteOutcome, ServiceError, TodoService};
