//! Project boards: columns, column order and tasks inside a project.
//!
//! A project embeds a kanban board made of three denormalized views: the
//! column list, the `order` list of column identifiers, and the flat task
//! list. Every operation here re-establishes the invariants that tie those
//! views together before the aggregate is persisted as a single document.
//! The module follows the same hexagonal split as the rest of the crate:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
