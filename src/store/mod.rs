//! Task persistence subsystem.
//!
//! # Responsibilities
//! - Assign ids and hold task records
//! - List, create and delete tasks, committing before returning
//! - Optionally persist to a JSON file across restarts
//!
//! # Design Decisions
//! - The to-do service depends only on the `TaskStore` trait
//! - Deleting an absent id is `Ok(None)`, not an error

pub mod memory;
pub mod types;

pub use memory::MemoryTaskStore;
pub use types::{StoreError, StoreResult, Task, TaskId, TaskStore};
