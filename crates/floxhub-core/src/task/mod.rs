//! Task records tracked on a worker's daily board.
//!
//! A [`Task`] is only ever built from a validated [`TaskRecord`] (or the
//! constructors below), so every `Task` in memory satisfies the invariants
//! `weight >= 0` and `duration_minutes >= 0` and has a well-formed deadline.
//! The only mutation after construction is the completion toggle, which is
//! crate-private and driven by the board.

pub mod source;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{BoardError, ValidationError};

/// Kind of work a task belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaskCategory {
    Frontend,
    Backend,
    Meeting,
    Admin,
    Planning,
}

impl TaskCategory {
    pub const ALL: [TaskCategory; 5] = [
        TaskCategory::Frontend,
        TaskCategory::Backend,
        TaskCategory::Meeting,
        TaskCategory::Admin,
        TaskCategory::Planning,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::Frontend => "FRONTEND",
            TaskCategory::Backend => "BACKEND",
            TaskCategory::Meeting => "MEETING",
            TaskCategory::Admin => "ADMIN",
            TaskCategory::Planning => "PLANNING",
        }
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskCategory {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        TaskCategory::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| BoardError::UnknownCategory(s.to_string()))
    }
}

/// Display priority. Never used for scoring.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "HIGH",
            Priority::Medium => "MEDIUM",
            Priority::Low => "LOW",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HIGH" => Ok(Priority::High),
            "MEDIUM" => Ok(Priority::Medium),
            "LOW" => Ok(Priority::Low),
            _ => Err(BoardError::UnknownPriority(s.to_string())),
        }
    }
}

/// Raw task record as supplied by a task source.
///
/// Numeric fields are signed and the deadline is a plain string so that a
/// bad record is reported as [`ValidationError::InvalidTaskShape`] instead of
/// an opaque deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskRecord {
    pub id: String,
    pub description: String,
    pub weight: i64,
    #[serde(default)]
    pub completed: bool,
    pub category: TaskCategory,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, alias = "durationMinutes")]
    pub duration_minutes: i64,
    /// ISO-8601 calendar date (`YYYY-MM-DD`).
    pub deadline: String,
}

/// One unit of trackable work.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "TaskRecord")]
pub struct Task {
    id: String,
    description: String,
    weight: u32,
    completed: bool,
    category: TaskCategory,
    priority: Priority,
    duration_minutes: u32,
    deadline: NaiveDate,
}

impl Task {
    /// Create an incomplete task with medium priority and no estimate.
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        weight: u32,
        category: TaskCategory,
        deadline: NaiveDate,
    ) -> Self {
        Task {
            id: id.into(),
            description: description.into(),
            weight,
            completed: false,
            category,
            priority: Priority::Medium,
            duration_minutes: 0,
            deadline,
        }
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration_minutes = minutes;
        self
    }

    /// Seed the initial completion flag (task sources only).
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn weight(&self) -> u32 {
        self.weight
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn category(&self) -> TaskCategory {
        self.category
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    pub fn deadline(&self) -> NaiveDate {
        self.deadline
    }

    /// Flip the completion flag and return the new value.
    ///
    /// No other field changes.
    pub(crate) fn toggle(&mut self) -> bool {
        self.completed = !self.completed;
        self.completed
    }
}

fn checked_u32(id: &str, field: &'static str, value: i64) -> Result<u32, ValidationError> {
    if value < 0 {
        return Err(ValidationError::shape(id, field, format!("must be >= 0, got {value}")));
    }
    u32::try_from(value).map_err(|_| {
        ValidationError::shape(id, field, format!("must be <= {}, got {value}", u32::MAX))
    })
}

impl TryFrom<TaskRecord> for Task {
    type Error = ValidationError;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        let id = record.id.trim();
        if id.is_empty() {
            return Err(ValidationError::shape(&record.id, "id", "must not be empty"));
        }
        let weight = checked_u32(id, "weight", record.weight)?;
        let duration_minutes = checked_u32(id, "duration_minutes", record.duration_minutes)?;
        let deadline = NaiveDate::parse_from_str(record.deadline.trim(), "%Y-%m-%d").map_err(|e| {
            ValidationError::shape(
                id,
                "deadline",
                format!("must be an ISO-8601 date, got '{}' ({e})", record.deadline),
            )
        })?;

        Ok(Task {
            id: id.to_string(),
            description: record.description,
            weight,
            completed: record.completed,
            category: record.category,
            priority: record.priority,
            duration_minutes,
            deadline,
        })
    }
}

impl From<Task> for TaskRecord {
    fn from(task: Task) -> Self {
        TaskRecord {
            id: task.id,
            description: task.description,
            weight: i64::from(task.weight),
            completed: task.completed,
            category: task.category,
            priority: task.priority,
            duration_minutes: i64::from(task.duration_minutes),
            deadline: task.deadline.format("%Y-%m-%d").to_string(),
        }
    }
}
