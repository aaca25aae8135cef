use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::debug;

use taskdeck_core::Filter;

use crate::storage::{Storage, StorageError};

const TASKS_KEY: &str = "tasks";
const FILTER_KEY: &str = "taskFilter";

/// A client-side task. Ids are creation timestamps in milliseconds, bumped
/// past the newest existing id when two tasks land in the same millisecond.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientTask {
    pub id: i64,
    pub text: String,
    pub completed: bool,
    pub created_at: String,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
}

/// What a UI layer renders: the filtered tasks, the empty-state message when
/// nothing passes the filter, and the running counts.
#[derive(Clone, Debug)]
pub struct TaskView {
    pub tasks: Vec<ClientTask>,
    pub empty_message: Option<&'static str>,
    pub counts: Counts,
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("task text must not be blank")]
    EmptyText,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// The client task store. Owns the task list and the current filter;
/// every mutation is written through to the injected storage before it
/// returns.
pub struct TaskStore {
    tasks: Vec<ClientTask>,
    filter: Filter,
    storage: Box<dyn Storage>,
}

impl TaskStore {
    /// Build a store from storage, reloading any persisted state. Malformed
    /// persisted JSON falls back to an empty list; an unknown persisted
    /// filter label falls back to `all`.
    pub fn new(storage: Box<dyn Storage>) -> Self {
        let tasks = storage
            .load(TASKS_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default();
        let filter = storage
            .load(FILTER_KEY)
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default();
        Self {
            tasks,
            filter,
            storage,
        }
    }

    /// Add a task. Blank or whitespace-only text is rejected and the store
    /// is left unchanged.
    pub fn add(&mut self, text: &str) -> Result<&ClientTask, ClientError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ClientError::EmptyText);
        }

        let task = ClientTask {
            id: self.next_id(),
            text: text.to_string(),
            completed: false,
            created_at: Utc::now().to_rfc3339(),
        };
        debug!(id = task.id, "task added");
        self.tasks.push(task);
        self.persist()?;
        Ok(self.tasks.last().expect("just pushed"))
    }

    /// Flip completion on the matching task. Returns false when no task has
    /// the given id.
    pub fn toggle(&mut self, id: i64) -> Result<bool, ClientError> {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.completed = !task.completed;
                self.persist()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove the matching task. Returns false when no task has the given
    /// id; other tasks and their order are untouched.
    pub fn delete(&mut self, id: i64) -> Result<bool, ClientError> {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// Record and persist the filter selection.
    pub fn set_filter(&mut self, filter: Filter) -> Result<(), ClientError> {
        self.filter = filter;
        self.storage.store(FILTER_KEY, filter.as_str())?;
        Ok(())
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    pub fn tasks(&self) -> &[ClientTask] {
        &self.tasks
    }

    /// Project the task list through the current filter.
    pub fn view(&self) -> TaskView {
        self.view_with(self.filter)
    }

    /// Project the task list through an explicit filter, preserving the
    /// original order.
    pub fn view_with(&self, filter: Filter) -> TaskView {
        let tasks: Vec<ClientTask> = self
            .tasks
            .iter()
            .filter(|t| filter.matches(t.completed))
            .cloned()
            .collect();
        let empty_message = if tasks.is_empty() {
            Some(empty_message(filter))
        } else {
            None
        };
        TaskView {
            tasks,
            empty_message,
            counts: self.counts(),
        }
    }

    pub fn counts(&self) -> Counts {
        let total = self.tasks.len();
        let completed = self.tasks.iter().filter(|t| t.completed).count();
        Counts {
            total,
            pending: total - completed,
            completed,
        }
    }

    fn next_id(&self) -> i64 {
        let candidate = Utc::now().timestamp_millis();
        match self.tasks.iter().map(|t| t.id).max() {
            Some(newest) if newest >= candidate => newest + 1,
            _ => candidate,
        }
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        let raw = serde_json::to_string(&self.tasks)
            .map_err(|e| StorageError::Write(e.to_string()))?;
        self.storage.store(TASKS_KEY, &raw)
    }
}

fn empty_message(filter: Filter) -> &'static str {
    match filter {
        Filter::All => "No tasks yet. Add one above!",
        Filter::Pending => "No pending tasks!",
        Filter::Completed => "No completed tasks!",
    }
}
