//! Application services for project boards.

mod board;
mod requests;

pub use board::{
    AddedTask, AssignedTask, BoardServiceError, BoardServiceResult, MemberProject,
    ProjectBoardService,
};
pub use requests::{
    AddColumnRequest, AddTaskRequest, CreateProjectRequest, DeleteColumnRequest, MoveTaskRequest,
    ReorderColumnsRequest, UpdateColumnRequest, UpdateProjectRequest, UpdateTaskRequest,
};
