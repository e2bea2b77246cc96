use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

/// Input structure for creating a task.
///
/// Any other field in the request body (an `id`, a completion flag) is ignored:
/// identifiers are store-assigned and new tasks always start pending.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NewTask {
    /// Must be between 1 and 200 characters and not only whitespace.
    #[validate(length(min = 1, max = 200), custom = "not_blank")]
    pub title: String,

    /// Maximum length of 500 characters if provided.
    #[validate(length(max = 500))]
    pub description: Option<String>,
}

/// Input structure for updating a task. Replaces title, description and the
/// completion flag; the identifier and creation timestamp never change.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TaskUpdate {
    #[validate(length(min = 1, max = 200), custom = "not_blank")]
    pub title: String,

    #[validate(length(max = 500))]
    pub description: Option<String>,

    #[serde(default)]
    pub is_completed: bool,
}

/// Represents a task as stored and returned by the API.
///
/// `completed_at` is `Some` exactly when `is_completed` is true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Store-assigned identifier.
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub is_completed: bool,
    /// Set once, at creation.
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a pending task with the given identifier, created at `now`.
    pub fn new(id: i32, input: NewTask, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: input.title,
            description: input.description,
            is_completed: false,
            created_at: now,
            completed_at: None,
        }
    }

    /// Applies an update in place.
    ///
    /// A false→true flag change stamps `completed_at` with `now`, true→false clears
    /// it, and an unchanged flag leaves it as it was.
    pub fn apply_update(&mut self, update: TaskUpdate, now: DateTime<Utc>) {
        match (self.is_completed, update.is_completed) {
            (false, true) => self.completed_at = Some(now),
            (true, false) => self.completed_at = None,
            _ => {}
        }
        self.is_completed = update.is_completed;
        self.title = update.title;
        self.description = update.description;
    }
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("must not be blank".into());
        return Err(error);
    }
    Ok(())
}
