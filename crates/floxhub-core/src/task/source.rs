//! Task sources that seed a board.
//!
//! The board only ever sees validated [`Task`] values. Sources parse raw
//! [`TaskRecord`]s and reject the whole batch on the first bad record, so a
//! malformed seed fails when the board is loaded rather than during scoring.

use chrono::NaiveDate;
use std::path::{Path, PathBuf};

use super::{Priority, Task, TaskCategory, TaskRecord};
use crate::error::Result;

/// Supplies the initial ordered task list for one actor/day.
pub trait TaskSource {
    fn load(&self) -> Result<Vec<Task>>;
}

/// Parse a JSON array of task records, validating each one.
pub fn parse_tasks(json: &str) -> Result<Vec<Task>> {
    let records: Vec<TaskRecord> = serde_json::from_str(json)?;
    let tasks = records
        .into_iter()
        .map(Task::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tasks)
}

/// JSON file on disk holding an array of task records.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TaskSource for JsonFileSource {
    fn load(&self) -> Result<Vec<Task>> {
        let content = std::fs::read_to_string(&self.path)?;
        let tasks = parse_tasks(&content)?;
        tracing::debug!(path = %self.path.display(), count = tasks.len(), "loaded task seed");
        Ok(tasks)
    }
}

/// The built-in intern demo day.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoDay;

/// Baseline score the demo day starts from (task 2 is already done).
pub const DEMO_INITIAL_SCORE: u64 = 30;

/// Display ceiling used by the demo dashboard.
pub const DEMO_MAX_SCORE: u64 = 500;

/// Actor the demo day belongs to.
pub const DEMO_ACTOR_ID: &str = "intern-001";

impl TaskSource for DemoDay {
    fn load(&self) -> Result<Vec<Task>> {
        Ok(demo_tasks())
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

/// Five tasks for Wednesday 2024-10-24.
pub fn demo_tasks() -> Vec<Task> {
    vec![
        Task::new(
            "1",
            "Update technical documentation",
            50,
            TaskCategory::Frontend,
            date(2024, 10, 24),
        )
            .with_priority(Priority::Medium)
            .with_duration(45),
        Task::new("2", "Review PR #442", 30, TaskCategory::Frontend, date(2024, 10, 24))
            .with_priority(Priority::High)
            .with_duration(20)
            .with_completed(true),
        Task::new("3", "Daily Scrum Team Alpha", 20, TaskCategory::Meeting, date(2024, 10, 25))
            .with_priority(Priority::Low)
            .with_duration(15),
        Task::new(
            "4",
            "Configure environment variables",
            100,
            TaskCategory::Backend,
            date(2024, 10, 23),
        )
            .with_priority(Priority::High)
            .with_duration(60),
        Task::new("5", "Sync with manager", 15, TaskCategory::Admin, date(2024, 10, 24))
            .with_priority(Priority::Medium)
            .with_duration(30),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, ValidationError};
    use std::io::Write;

    #[test]
    fn demo_day_matches_baseline() {
        let tasks = DemoDay.load().unwrap();
        assert_eq!(tasks.len(), 5);
        let done: u64 = tasks
            .iter()
            .filter(|t| t.is_completed())
            .map(|t| u64::from(t.weight()))
            .sum();
        assert_eq!(done, DEMO_INITIAL_SCORE);
    }

    #[test]
    fn parse_rejects_whole_batch_on_bad_record() {
        let json = r#"[
            {"id":"a","description":"ok","weight":5,"category":"ADMIN","deadline":"2024-10-24"},
            {"id":"b","description":"bad","weight":-3,"category":"ADMIN","deadline":"2024-10-24"}
        ]"#;
        let err = parse_tasks(json).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::InvalidTaskShape {
                ref id,
                field: "weight",
                ..
            }) if id == "b"
        ));
    }

    #[test]
    fn parse_rejects_unknown_category() {
        let json = r#"[{"id":"a","description":"x","weight":5,"category":"DESIGN","deadline":"2024-10-24"}]"#;
        assert!(matches!(parse_tasks(json), Err(CoreError::Json(_))));
    }

    #[test]
    fn json_file_source_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id":"x","description":"Deploy","weight":10,"category":"BACKEND","priority":"LOW","durationMinutes":5,"deadline":"2024-11-01"}}]"#
        )
        .unwrap();

        let tasks = JsonFileSource::new(file.path()).load().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].priority(), Priority::Low);
        assert_eq!(tasks[0].duration_minutes(), 5);
    }

    #[test]
    fn missing_file_is_io_error() {
        let source = JsonFileSource::new("/definitely/not/here.json");
        assert!(matches!(source.load(), Err(CoreError::Io(_))));
    }
}
