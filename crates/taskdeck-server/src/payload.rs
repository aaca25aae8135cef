//! Request body for task writes.
//!
//! Each field is a double `Option` so the merge can distinguish a field
//! absent from the JSON (keep the existing value) from an explicit `null`
//! (clear it). Both POST and PUT funnel through [`TaskPayload::into_draft`],
//! so the same validation schema applies to creates and partial updates.

use serde::{Deserialize, Deserializer};

use taskdeck_core::{validate, Status, TaskDraft, ValidationError};

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPayload {
    #[serde(default, deserialize_with = "double_option")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub status: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub details: Option<Option<String>>,
}

/// Wraps a present value (including `null`) in `Some`, so a missing field
/// stays distinguishable via `#[serde(default)]`.
fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}

impl TaskPayload {
    /// Merge this payload over an existing row (or over nothing, for a
    /// create) and validate the result. Absent fields keep the existing
    /// value; explicit nulls and empty strings clear nullable fields.
    pub fn into_draft(self, existing: Option<&TaskDraft>) -> Result<TaskDraft, Vec<ValidationError>> {
        let mut errors = Vec::new();

        let title = match self.title {
            Some(value) => value.unwrap_or_default(),
            None => existing.map(|e| e.title.clone()).unwrap_or_default(),
        };

        let status = match self.status {
            Some(label) => Status::from_label(normalize(label).as_deref()).unwrap_or_else(|e| {
                errors.push(e);
                Status::default()
            }),
            None => existing.map(|e| e.status).unwrap_or_default(),
        };

        let due_date = match self.due_date {
            Some(value) => normalize(value),
            None => existing.and_then(|e| e.due_date.clone()),
        };

        let details = match self.details {
            Some(value) => normalize(value),
            None => existing.and_then(|e| e.details.clone()),
        };

        let draft = TaskDraft {
            title,
            status,
            due_date,
            details,
        };

        if let Err(more) = validate(&draft) {
            errors.extend(more);
        }

        if errors.is_empty() {
            Ok(draft)
        } else {
            Err(errors)
        }
    }
}

/// Treat empty strings like absent optionals, as the original wire
/// contract does.
fn normalize(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> TaskPayload {
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn absent_and_null_are_distinct() {
        let p = parse(r#"{"title": "x"}"#);
        assert!(p.due_date.is_none());

        let p = parse(r#"{"title": "x", "dueDate": null}"#);
        assert_eq!(p.due_date, Some(None));

        let p = parse(r#"{"title": "x", "dueDate": "2025-01-01"}"#);
        assert_eq!(p.due_date, Some(Some("2025-01-01".to_string())));
    }

    #[test]
    fn create_with_title_only_defaults_status() {
        let draft = parse(r#"{"title": "x"}"#).into_draft(None).unwrap();
        assert_eq!(draft.title, "x");
        assert_eq!(draft.status, Status::Todo);
        assert!(draft.due_date.is_none());
    }

    #[test]
    fn create_without_title_fails() {
        let errs = parse("{}").into_draft(None).unwrap_err();
        assert_eq!(errs, vec![ValidationError::TitleRequired]);
    }

    #[test]
    fn unknown_status_rejected() {
        let errs = parse(r#"{"title": "x", "status": "archived"}"#)
            .into_draft(None)
            .unwrap_err();
        assert_eq!(errs, vec![ValidationError::InvalidStatus]);
    }

    #[test]
    fn null_status_falls_back_to_default() {
        let draft = parse(r#"{"title": "x", "status": null}"#)
            .into_draft(None)
            .unwrap();
        assert_eq!(draft.status, Status::Todo);
    }

    #[test]
    fn empty_due_date_treated_as_absent() {
        let draft = parse(r#"{"title": "x", "dueDate": ""}"#)
            .into_draft(None)
            .unwrap();
        assert!(draft.due_date.is_none());
    }

    #[test]
    fn merge_keeps_unspecified_fields() {
        let existing = TaskDraft {
            title: "keep".to_string(),
            status: Status::InProgress,
            due_date: Some("2025-02-02".to_string()),
            details: Some("notes".to_string()),
        };

        let draft = parse(r#"{"status": "done"}"#)
            .into_draft(Some(&existing))
            .unwrap();

        assert_eq!(draft.title, "keep");
        assert_eq!(draft.status, Status::Done);
        assert_eq!(draft.due_date.as_deref(), Some("2025-02-02"));
        assert_eq!(draft.details.as_deref(), Some("notes"));
    }

    #[test]
    fn merge_null_clears_nullable_fields() {
        let existing = TaskDraft {
            title: "keep".to_string(),
            status: Status::Todo,
            due_date: Some("2025-02-02".to_string()),
            details: Some("notes".to_string()),
        };

        let draft = parse(r#"{"dueDate": null, "details": null}"#)
            .into_draft(Some(&existing))
            .unwrap();

        assert!(draft.due_date.is_none());
        assert!(draft.details.is_none());
    }

    #[test]
    fn merge_null_title_fails_validation() {
        let existing = TaskDraft {
            title: "keep".to_string(),
            ..TaskDraft::default()
        };

        let errs = parse(r#"{"title": null}"#)
            .into_draft(Some(&existing))
            .unwrap_err();
        assert_eq!(errs, vec![ValidationError::TitleRequired]);
    }

    #[test]
    fn merged_draft_revalidated() {
        let existing = TaskDraft {
            title: "keep".to_string(),
            ..TaskDraft::default()
        };

        let errs = parse(r#"{"dueDate": "whenever"}"#)
            .into_draft(Some(&existing))
            .unwrap_err();
        assert_eq!(errs, vec![ValidationError::InvalidDueDate]);
    }
}
