//! In-memory adapters for project boards.

mod project;

pub use project::InMemoryProjectRepository;
