//! Application services for workspace membership and project ownership.

mod workspace;

pub use workspace::{
    AddMemberRequest, CreateWorkspaceRequest, UpdateWorkspaceRequest, WorkspaceService,
    WorkspaceServiceError, WorkspaceServiceResult,
};
