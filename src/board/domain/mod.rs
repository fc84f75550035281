//! Domain model for project boards.
//!
//! Board mutations are pure in-memory operations on [`Board`]; the
//! [`Project`] aggregate wraps them with activation checks and timestamps.
//! Nothing in this module performs I/O.

mod board;
mod column;
mod error;
mod project;
mod task;

pub use board::Board;
pub use column::{Column, ColumnPatch};
pub use error::{BoardDomainError, ParseTaskPriorityError};
pub use project::{Project, ProjectDraft, ProjectPatch};
pub use task::{Task, TaskDraft, TaskPatch, TaskPriority};
