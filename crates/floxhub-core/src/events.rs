use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Every state change of a session produces an Event.
/// The display layer drains them after each action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TaskCompleted {
        task_id: String,
        at: DateTime<Utc>,
    },
    /// A completed task was unchecked. Score is not reduced.
    TaskReopened {
        task_id: String,
        at: DateTime<Utc>,
    },
    ScoreGained {
        task_id: String,
        points: u32,
        score: u64,
        at: DateTime<Utc>,
    },
    ShiftStarted {
        at: DateTime<Utc>,
    },
    ShiftEnded {
        at: DateTime<Utc>,
    },
}
