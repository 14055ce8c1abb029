//! Field-level validation for task input.
//!
//! Both the task form (per keystroke and on submit) and the HTTP write path
//! run drafts through these checks, so the messages here are the ones users
//! actually see.

use chrono::{Local, NaiveDate};

use crate::task::{TaskDraft, TaskPatch};

pub const TITLE_MIN: usize = 3;
pub const TITLE_MAX: usize = 100;
pub const DESCRIPTION_MAX: usize = 500;

/// Validate a title after trimming. Required.
pub fn validate_title(value: &str) -> Result<(), String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err("Title is required".to_string());
    }
    let len = trimmed.chars().count();
    if len < TITLE_MIN {
        return Err(format!(
            "Title must be at least {TITLE_MIN} characters long"
        ));
    }
    if len > TITLE_MAX {
        return Err(format!("Title must be less than {TITLE_MAX} characters"));
    }
    Ok(())
}

/// Validate an optional description.
pub fn validate_description(value: &str) -> Result<(), String> {
    if value.chars().count() > DESCRIPTION_MAX {
        return Err(format!(
            "Description must be less than {DESCRIPTION_MAX} characters"
        ));
    }
    Ok(())
}

/// Validate a due date against the given "today" (date-only comparison).
pub fn validate_due(due: Option<NaiveDate>, today: NaiveDate) -> Result<(), String> {
    match due {
        Some(d) if d < today => Err("Due date cannot be in the past".to_string()),
        _ => Ok(()),
    }
}

/// Parse and validate raw due-date input from a form field. Empty input is a
/// valid "no due date".
pub fn parse_due_field(value: &str, today: NaiveDate) -> Result<Option<NaiveDate>, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let due = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map_err(|_| "Due date must be in YYYY-MM-DD format".to_string())?;
    validate_due(Some(due), today)?;
    Ok(Some(due))
}

/// Validate a full draft before submission. Returns every failing field so
/// the form can surface all problems at once.
pub fn validate_draft_at(draft: &TaskDraft, today: NaiveDate) -> Vec<String> {
    let mut errors = Vec::new();
    if let Err(e) = validate_title(&draft.title) {
        errors.push(e);
    }
    if let Some(description) = &draft.description {
        if let Err(e) = validate_description(description) {
            errors.push(e);
        }
    }
    if let Err(e) = validate_due(draft.due, today) {
        errors.push(e);
    }
    errors
}

/// Validate a draft against today at local midnight.
pub fn validate_draft(draft: &TaskDraft) -> Vec<String> {
    validate_draft_at(draft, Local::now().date_naive())
}

/// Validate the fields a patch actually sets. Due dates in the past are
/// allowed on update only if the patch does not touch the due date.
pub fn validate_patch_at(patch: &TaskPatch, today: NaiveDate) -> Vec<String> {
    let mut errors = Vec::new();
    if let Some(title) = &patch.title {
        if let Err(e) = validate_title(title) {
            errors.push(e);
        }
    }
    if let Some(description) = &patch.description {
        if let Err(e) = validate_description(description) {
            errors.push(e);
        }
    }
    if let Err(e) = validate_due(patch.due, today) {
        errors.push(e);
    }
    errors
}

/// Validate a patch against today at local midnight.
pub fn validate_patch(patch: &TaskPatch) -> Vec<String> {
    validate_patch_at(patch, Local::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{Priority, Status};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 25).unwrap()
    }

    #[test]
    fn two_character_title_is_rejected_three_accepted() {
        let err = validate_title("ab").unwrap_err();
        assert_eq!(err, "Title must be at least 3 characters long");
        assert!(validate_title("abc").is_ok());
    }

    #[test]
    fn title_is_trimmed_before_length_checks() {
        assert!(validate_title("   ").is_err());
        assert!(validate_title("  ok?  ").is_ok());
        let long = "x".repeat(101);
        assert_eq!(
            validate_title(&long).unwrap_err(),
            "Title must be less than 100 characters"
        );
        assert!(validate_title(&"x".repeat(100)).is_ok());
    }

    #[test]
    fn description_limit_is_five_hundred() {
        assert!(validate_description(&"d".repeat(500)).is_ok());
        assert!(validate_description(&"d".repeat(501)).is_err());
    }

    #[test]
    fn due_date_may_not_be_in_the_past() {
        let t = today();
        assert_eq!(
            validate_due(Some(t.pred_opt().unwrap()), t).unwrap_err(),
            "Due date cannot be in the past"
        );
        assert!(validate_due(Some(t), t).is_ok());
        assert!(validate_due(None, t).is_ok());
    }

    #[test]
    fn due_field_parses_iso_dates_and_accepts_empty() {
        let t = today();
        assert_eq!(parse_due_field("", t).unwrap(), None);
        assert_eq!(
            parse_due_field("2026-09-01", t).unwrap(),
            NaiveDate::from_ymd_opt(2026, 9, 1)
        );
        assert!(parse_due_field("tomorrow", t).is_err());
        assert!(parse_due_field("2020-01-01", t).is_err());
    }

    #[test]
    fn draft_validation_collects_every_failure() {
        let draft = TaskDraft {
            title: "ab".to_string(),
            description: Some("d".repeat(501)),
            status: Status::Todo,
            priority: Priority::Low,
            assignee: None,
            due: today().pred_opt(),
        };
        let errors = validate_draft_at(&draft, today());
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn patch_validation_only_checks_set_fields() {
        let patch = TaskPatch::status(Status::Done);
        assert!(validate_patch_at(&patch, today()).is_empty());

        let patch = TaskPatch {
            title: Some("ab".to_string()),
            ..TaskPatch::default()
        };
        assert_eq!(validate_patch_at(&patch, today()).len(), 1);
    }
}
