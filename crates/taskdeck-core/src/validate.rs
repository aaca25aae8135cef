//! Declarative validation schema for task writes.
//!
//! The create and update paths both funnel through [`validate`] on a fully
//! merged [`TaskDraft`], so the constraints cannot drift between the two.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::status::Status;

/// Maximum title length in characters.
pub const TITLE_MAX: usize = 140;

/// A candidate task row, after merging request fields over any existing row
/// and before touching storage.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    pub status: Status,
    pub due_date: Option<String>,
    pub details: Option<String>,
}

impl TaskDraft {
    /// The title as stored: surrounding whitespace stripped.
    pub fn trimmed_title(&self) -> &str {
        self.title.trim()
    }
}

/// A single failed constraint. Messages match the wire-level error list.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Title is required")]
    TitleRequired,
    #[error("Title must be <= 140 chars")]
    TitleTooLong,
    #[error("Invalid status")]
    InvalidStatus,
    #[error("Invalid dueDate")]
    InvalidDueDate,
}

type Rule = fn(&TaskDraft) -> Option<ValidationError>;

/// Field → constraint table. Status is absent here: the [`Status`] type
/// makes an out-of-range value unrepresentable, so it is rejected when the
/// label is parsed at the boundary.
const RULES: &[Rule] = &[title_required, title_length, due_date_parses];

/// Check a draft against every rule, collecting all failures.
pub fn validate(draft: &TaskDraft) -> Result<(), Vec<ValidationError>> {
    let errors: Vec<ValidationError> = RULES.iter().filter_map(|rule| rule(draft)).collect();
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn title_required(draft: &TaskDraft) -> Option<ValidationError> {
    if draft.trimmed_title().is_empty() {
        Some(ValidationError::TitleRequired)
    } else {
        None
    }
}

fn title_length(draft: &TaskDraft) -> Option<ValidationError> {
    if draft.trimmed_title().chars().count() > TITLE_MAX {
        Some(ValidationError::TitleTooLong)
    } else {
        None
    }
}

fn due_date_parses(draft: &TaskDraft) -> Option<ValidationError> {
    let due = draft.due_date.as_deref()?;
    if parse_due_date(due) {
        None
    } else {
        Some(ValidationError::InvalidDueDate)
    }
}

/// Accept RFC 3339 timestamps or bare `YYYY-MM-DD` dates.
fn parse_due_date(s: &str) -> bool {
    DateTime::parse_from_rfc3339(s).is_ok() || NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}
