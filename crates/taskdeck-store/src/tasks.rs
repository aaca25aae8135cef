use rusqlite::{params, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use taskdeck_core::{Status, TaskDraft};

use crate::database::Database;
use crate::error::StoreError;

/// A stored task, serialized in the external camelCase shape.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRow {
    pub id: i64,
    pub title: String,
    pub status: Status,
    pub due_date: Option<String>,
    pub details: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl TaskRow {
    /// A draft carrying this row's current values, for merging partial
    /// updates over before re-validation.
    pub fn to_draft(&self) -> TaskDraft {
        TaskDraft {
            title: self.title.clone(),
            status: self.status,
            due_date: self.due_date.clone(),
            details: self.details.clone(),
        }
    }
}

const COLUMNS: &str = "id, title, status, due_date, details, created_at, updated_at";

fn row_to_task(row: &Row<'_>) -> Result<TaskRow, rusqlite::Error> {
    let status_raw: String = row.get(2)?;
    let status = status_raw.parse().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            rusqlite::types::Type::Text,
            format!("unknown status: {status_raw}").into(),
        )
    })?;
    Ok(TaskRow {
        id: row.get(0)?,
        title: row.get(1)?,
        status,
        due_date: row.get(3)?,
        details: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

/// Repository for the single `tasks` table.
pub struct TaskRepo {
    db: Database,
}

impl TaskRepo {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// List all tasks, newest id first.
    #[instrument(skip(self))]
    pub fn list(&self) -> Result<Vec<TaskRow>, StoreError> {
        self.db.with_conn(|conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {COLUMNS} FROM tasks ORDER BY id DESC"))?;
            let rows = stmt
                .query_map([], row_to_task)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Get a task by id.
    #[instrument(skip(self))]
    pub fn get(&self, id: i64) -> Result<TaskRow, StoreError> {
        self.db.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {COLUMNS} FROM tasks WHERE id = ?1"),
                [id],
                row_to_task,
            )
            .optional()?
            .ok_or_else(|| StoreError::NotFound(format!("task {id}")))
        })
    }

    /// Insert a validated draft and return the stored row.
    #[instrument(skip(self, draft), fields(title = draft.trimmed_title()))]
    pub fn create(&self, draft: &TaskDraft) -> Result<TaskRow, StoreError> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO tasks (title, status, due_date, details) VALUES (?1, ?2, ?3, ?4)",
                params![
                    draft.trimmed_title(),
                    draft.status.as_str(),
                    draft.due_date,
                    draft.details,
                ],
            )?;
            let id = conn.last_insert_rowid();
            conn.query_row(
                &format!("SELECT {COLUMNS} FROM tasks WHERE id = ?1"),
                [id],
                row_to_task,
            )
            .map_err(StoreError::from)
        })
    }

    /// Rewrite a row from a merged draft, refreshing `updated_at`.
    #[instrument(skip(self, draft))]
    pub fn update(&self, id: i64, draft: &TaskDraft) -> Result<TaskRow, StoreError> {
        self.db.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE tasks SET title = ?1, status = ?2, due_date = ?3, details = ?4,
                 updated_at = datetime('now') WHERE id = ?5",
                params![
                    draft.trimmed_title(),
                    draft.status.as_str(),
                    draft.due_date,
                    draft.details,
                    id,
                ],
            )?;
            if changed == 0 {
                return Err(StoreError::NotFound(format!("task {id}")));
            }
            conn.query_row(
                &format!("SELECT {COLUMNS} FROM tasks WHERE id = ?1"),
                [id],
                row_to_task,
            )
            .map_err(StoreError::from)
        })
    }

    /// Delete a task by id.
    #[instrument(skip(self))]
    pub fn delete(&self, id: i64) -> Result<(), StoreError> {
        self.db.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM tasks WHERE id = ?1", [id])?;
            if changed == 0 {
                return Err(StoreError::NotFound(format!("task {id}")));
            }
            Ok(())
        })
    }
}

impl Clone for TaskRepo {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_repo() -> TaskRepo {
        TaskRepo::new(Database::in_memory().unwrap())
    }

    fn draft(title: &str) -> TaskDraft {
        TaskDraft {
            title: title.to_string(),
            ..TaskDraft::default()
        }
    }

    #[test]
    fn create_defaults_to_todo() {
        let repo = test_repo();
        let task = repo.create(&draft("x")).unwrap();
        assert_eq!(task.status, Status::Todo);
        assert_eq!(task.title, "x");
        assert!(task.due_date.is_none());
        assert!(!task.created_at.is_empty());
        assert_eq!(task.created_at, task.updated_at);
    }

    #[test]
    fn create_trims_title() {
        let repo = test_repo();
        let task = repo.create(&draft("  trimmed  ")).unwrap();
        assert_eq!(task.title, "trimmed");
    }

    #[test]
    fn list_newest_first() {
        let repo = test_repo();
        let first = repo.create(&draft("first")).unwrap();
        let second = repo.create(&draft("second")).unwrap();
        let all = repo.list().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, second.id);
        assert_eq!(all[1].id, first.id);
    }

    #[test]
    fn get_missing_is_not_found() {
        let repo = test_repo();
        assert!(matches!(repo.get(999), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn update_merged_draft() {
        let repo = test_repo();
        let task = repo.create(&draft("before")).unwrap();

        let mut merged = task.to_draft();
        merged.status = Status::Done;
        merged.due_date = Some("2025-06-01".to_string());
        let updated = repo.update(task.id, &merged).unwrap();

        assert_eq!(updated.title, "before");
        assert_eq!(updated.status, Status::Done);
        assert_eq!(updated.due_date.as_deref(), Some("2025-06-01"));
    }

    #[test]
    fn update_missing_is_not_found() {
        let repo = test_repo();
        let result = repo.update(42, &draft("x"));
        assert!(matches!(result, Err(StoreError::NotFound(_))));
        assert!(repo.list().unwrap().is_empty());
    }

    #[test]
    fn delete_removes_exactly_one() {
        let repo = test_repo();
        let a = repo.create(&draft("a")).unwrap();
        let b = repo.create(&draft("b")).unwrap();
        let c = repo.create(&draft("c")).unwrap();

        repo.delete(b.id).unwrap();

        let remaining: Vec<i64> = repo.list().unwrap().iter().map(|t| t.id).collect();
        assert_eq!(remaining, vec![c.id, a.id]);
    }

    #[test]
    fn delete_missing_is_not_found() {
        let repo = test_repo();
        assert!(matches!(repo.delete(7), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn row_serializes_camel_case() {
        let repo = test_repo();
        let mut d = draft("x");
        d.due_date = Some("2025-01-01".to_string());
        let task = repo.create(&d).unwrap();

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["dueDate"], "2025-01-01");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("due_date").is_none());
    }
}
