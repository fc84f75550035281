//! Port contracts for project boards.
//!
//! Ports define infrastructure-agnostic interfaces used by board services.

pub mod repository;
pub mod workspace;

pub use repository::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult};
pub use workspace::{
    MemberWorkspace, WorkspaceGateway, WorkspaceGatewayError, WorkspaceGatewayResult,
};
