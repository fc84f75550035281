//! Parallel writers against one project must not lose updates.

use std::collections::HashSet;
use std::num::NonZeroU32;
use std::sync::Arc;

use super::helpers::{column_id, services_with};
use taskboard::board::services::AddTaskRequest;
use taskboard::config::BoardConfig;

const WRITERS: u32 = 8;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn parallel_task_additions_are_all_kept() -> Result<(), eyre::Report> {
    let attempts = NonZeroU32::new(WRITERS).ok_or_else(|| eyre::eyre!("writer count is zero"))?;
    let services = services_with(&BoardConfig::default().with_max_save_attempts(attempts));
    let (project, _) = services.project("Roadmap").await?;
    let project_ref = project.id().to_string();
    let todo = column_id(&project, "To Do")?.to_string();

    let mut handles = Vec::new();
    for index in 0..WRITERS {
        let boards = Arc::clone(&services.boards);
        let request = AddTaskRequest::new(&project_ref, &todo, format!("Task {index}"));
        handles.push(tokio::spawn(async move { boards.add_task(request).await }));
    }

    let mut added = HashSet::new();
    for handle in handles {
        let outcome = handle.await??;
        added.insert(outcome.task_id);
    }

    let stored = services.boards.get_project(&project_ref).await?;
    let column = stored
        .board()
        .column(column_id(&stored, "To Do")?)
        .ok_or_else(|| eyre::eyre!("To Do column missing"))?;
    let referenced: HashSet<_> = column.task_ids().iter().copied().collect();

    eyre::ensure!(added.len() == 8, "every writer should get its own task");
    eyre::ensure!(referenced == added, "column lost a concurrent update");
    eyre::ensure!(
        stored.board().tasks().len() == added.len(),
        "task list lost a concurrent update"
    );
    Ok(())
}
