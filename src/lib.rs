//! Taskboard: consistency core for kanban project boards.
//!
//! This crate keeps a project's board (columns, column display order and
//! tasks) consistent across every mutation, and manages the workspaces that
//! own projects and decide who may be assigned work.
//!
//! # Architecture
//!
//! Taskboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence and collaborators
//! - **Adapters**: In-memory and `PostgreSQL` implementations of the ports
//! - **Services**: Load, mutate and save orchestration with optimistic
//!   concurrency
//!
//! # Modules
//!
//! - [`board`]: Projects, their columns, column order and tasks
//! - [`workspace`]: Workspaces, members and project ownership
//! - [`shared`]: Identifiers, revisions, partial-update patches, error kinds
//! - [`config`]: Service tunables

pub mod board;
pub mod config;
pub mod shared;
pub mod workspace;
