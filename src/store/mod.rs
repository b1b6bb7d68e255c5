use crate::domain::{Board, Task};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// The five workflow stages, in on-screen order.
const DEFAULT_BOARDS: [(&str, &str); 5] = [
    ("backlog", "Backlog"),
    ("todo", "To do"),
    ("in progress", "In progress"),
    ("test", "Test"),
    ("done", "Done"),
];

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    #[error("board not found: {0}")]
    BoardNotFound(String),
    #[error("task not found: {0}")]
    TaskNotFound(Uuid),
    #[error("index {index} out of range for board {board_id} (len {len})")]
    IndexOutOfRange {
        board_id: String,
        index: usize,
        len: usize,
    },
}

/// Partial update for `update_task`. Absent fields are left untouched.
#[derive(Debug, Default, Clone)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub status: Option<String>,
}

/// Authoritative owner of the board/task sequences. Explicitly constructed
/// and passed by reference to the view layer; consumers detect changes by
/// comparing `revision()` and re-reading `boards()`.
pub struct TaskStore {
    boards: Vec<Board>,
    revision: u64,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    pub fn new() -> Self {
        Self {
            boards: DEFAULT_BOARDS
                .iter()
                .map(|(id, name)| Board::new(*id, *name))
                .collect(),
            revision: 0,
        }
    }

    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    pub fn board(&self, board_id: &str) -> Option<&Board> {
        self.boards.iter().find(|b| b.id == board_id)
    }

    /// Bumped exactly once per successful mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn snapshot_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.boards)
    }

    fn board_index(&self, board_id: &str) -> Result<usize, StoreError> {
        self.boards
            .iter()
            .position(|b| b.id == board_id)
            .ok_or_else(|| StoreError::BoardNotFound(board_id.to_string()))
    }

    /// Appends a new task to the named board and returns its generated id.
    pub fn add_task(&mut self, title: &str, board_id: &str) -> Result<Uuid, StoreError> {
        let board_idx = self.board_index(board_id)?;
        let task = Task::new(title, board_id);
        let task_id = task.id;

        self.boards[board_idx].tasks.push(task);
        self.revision += 1;
        debug!(%task_id, board_id, "added task");
        Ok(task_id)
    }

    /// Overwrites only the fields present in `patch`. Patching `status` to
    /// a different board id moves the task there (appended), so `status`
    /// always names the containing board.
    pub fn update_task(
        &mut self,
        task_id: Uuid,
        board_id: &str,
        patch: TaskPatch,
    ) -> Result<(), StoreError> {
        let board_idx = self.board_index(board_id)?;
        let task_idx = self.boards[board_idx]
            .tasks
            .iter()
            .position(|t| t.id == task_id)
            .ok_or(StoreError::TaskNotFound(task_id))?;

        if let Some(title) = patch.title {
            self.boards[board_idx].tasks[task_idx].title = title;
        }

        if let Some(status) = patch.status {
            if status != board_id {
                let dest_idx = self.board_index(&status)?;
                let mut task = self.boards[board_idx].tasks.remove(task_idx);
                task.status = status;
                self.boards[dest_idx].tasks.push(task);
            }
        }

        self.revision += 1;
        debug!(%task_id, board_id, "updated task");
        Ok(())
    }

    /// Hard removal by id. `deleted_at` marking is a caller concern; the
    /// views filter soft-deleted tasks when rendering.
    pub fn delete_task(&mut self, task_id: Uuid, board_id: &str) -> Result<(), StoreError> {
        let board_idx = self.board_index(board_id)?;
        let tasks = &mut self.boards[board_idx].tasks;
        let before = tasks.len();
        tasks.retain(|t| t.id != task_id);

        if tasks.len() == before {
            return Err(StoreError::TaskNotFound(task_id));
        }

        self.revision += 1;
        debug!(%task_id, board_id, "deleted task");
        Ok(())
    }

    /// Removes the task at `source_index` and reinserts it at
    /// `destination_index` within the same board. The destination is
    /// clamped to the post-removal length.
    pub fn reorder_tasks(
        &mut self,
        source_index: usize,
        destination_index: usize,
        board_id: &str,
    ) -> Result<(), StoreError> {
        let board_idx = self.board_index(board_id)?;
        let tasks = &mut self.boards[board_idx].tasks;

        if source_index >= tasks.len() {
            return Err(StoreError::IndexOutOfRange {
                board_id: board_id.to_string(),
                index: source_index,
                len: tasks.len(),
            });
        }

        let task = tasks.remove(source_index);
        let insert_pos = destination_index.min(tasks.len());
        tasks.insert(insert_pos, task);

        self.revision += 1;
        debug!(source_index, destination_index, board_id, "reordered tasks");
        Ok(())
    }

    /// Moves a task between boards: inserted at `destination_index` when
    /// given (clamped), appended otherwise. The moved task's `status` is
    /// set to the destination board id.
    pub fn transfer_task(
        &mut self,
        task_id: Uuid,
        source_board_id: &str,
        dest_board_id: &str,
        destination_index: Option<usize>,
    ) -> Result<(), StoreError> {
        let source_idx = self.board_index(source_board_id)?;
        let dest_idx = self.board_index(dest_board_id)?;
        let task_idx = self.boards[source_idx]
            .tasks
            .iter()
            .position(|t| t.id == task_id)
            .ok_or(StoreError::TaskNotFound(task_id))?;

        let mut task = self.boards[source_idx].tasks.remove(task_idx);
        task.status = dest_board_id.to_string();

        let dest_tasks = &mut self.boards[dest_idx].tasks;
        match destination_index {
            Some(index) => dest_tasks.insert(index.min(dest_tasks.len()), task),
            None => dest_tasks.push(task),
        }

        self.revision += 1;
        debug!(%task_id, source_board_id, dest_board_id, "transferred task");
        Ok(())
    }
}
