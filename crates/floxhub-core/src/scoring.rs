//! Engagement scoring engine.
//!
//! Pure point arithmetic for the daily board:
//!
//! ```text
//! points(task)             = task.weight
//! session(tasks, idle_min) = max(0, round(Σ weight − idle_min × IDLE_PENALTY_RATE))
//! ```
//!
//! Rounding is to nearest with ties away from zero ([`f64::round`]).
//! Forwarding deltas to the backing store lives in [`crate::sync`].

use serde::{Deserialize, Serialize};

use crate::task::Task;

/// Points lost per idle minute.
pub const IDLE_PENALTY_RATE: f64 = 0.5;

/// Emitted exactly once per genuine incomplete -> complete transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreGainEvent {
    pub task_id: String,
    pub points: u32,
}

/// Points awarded for completing `task`.
///
/// Does not look at the completion flag; callers only invoke it on a real
/// completion edge.
pub fn points_for_task(task: &Task) -> u32 {
    task.weight()
}

/// Session score for a set of completed tasks and accumulated idle time.
pub fn session_score<'a, I>(completed_tasks: I, idle_minutes: u32) -> u64
where
    I: IntoIterator<Item = &'a Task>,
{
    session_score_from_weights(completed_tasks.into_iter().map(points_for_task), idle_minutes)
}

/// Same formula as [`session_score`], over raw weights.
pub fn session_score_from_weights<I>(weights: I, idle_minutes: u32) -> u64
where
    I: IntoIterator<Item = u32>,
{
    let task_points: u64 = weights.into_iter().map(u64::from).sum();
    let idle_penalty = f64::from(idle_minutes) * IDLE_PENALTY_RATE;
    let raw = (task_points as f64 - idle_penalty).round();
    if raw <= 0.0 {
        0
    } else {
        raw as u64
    }
}

/// Running total for one actor's session.
///
/// `max_score` is a display ceiling only: the score may exceed it and the
/// percentage saturates at 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreState {
    score: u64,
    max_score: u64,
}

impl ScoreState {
    pub fn new(initial_score: u64, max_score: u64) -> Self {
        Self {
            score: initial_score,
            max_score,
        }
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn max_score(&self) -> u64 {
        self.max_score
    }

    /// Add a gain to the running total and return the new score.
    ///
    /// There is no inverse: reopening a task never claws points back.
    pub fn apply(&mut self, gain: &ScoreGainEvent) -> u64 {
        self.score = self.score.saturating_add(u64::from(gain.points));
        self.score
    }

    /// Share of the ceiling reached, rounded, clamped to 0..=100.
    pub fn percentage(&self) -> u8 {
        if self.max_score == 0 {
            return if self.score > 0 { 100 } else { 0 };
        }
        let pct = (self.score as f64 / self.max_score as f64 * 100.0).round();
        pct.min(100.0) as u8
    }

    /// Points left before the ceiling, never negative.
    pub fn remaining(&self) -> u64 {
        self.max_score.saturating_sub(self.score)
    }
}
