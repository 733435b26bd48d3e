//! Actor session: board, running score and background sync wired together.
//!
//! The session is the single owner of the task list and the score. A
//! completion is applied to the local score synchronously, before the sync
//! to the store is even spawned, so the actor sees progress immediately
//! whether or not the store is reachable.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::board::{CategoryFilter, CompletionCount, SortKey, TaskBoard};
use crate::error::BoardError;
use crate::events::Event;
use crate::scoring::{session_score, ScoreGainEvent, ScoreState};
use crate::sync::{SyncDispatcher, SyncReport, Syncer};
use crate::task::Task;

/// Check-in state for the working day. Does not affect scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Shift {
    pub checked_in: bool,
    pub last_change_at: Option<DateTime<Utc>>,
}

/// Everything the display layer needs after an action.
#[derive(Debug, Clone, Serialize)]
pub struct DisplaySnapshot {
    pub actor_id: String,
    pub filter: CategoryFilter,
    pub sort: SortKey,
    pub tasks: Vec<Task>,
    pub completion: CompletionCount,
    /// The filter hid every task of a non-empty board.
    pub no_match: bool,
    pub score: u64,
    pub max_score: u64,
    pub percentage: u8,
    pub remaining: u64,
    pub shift: Shift,
    pub pending_syncs: usize,
}

pub struct Session<S> {
    id: Uuid,
    actor_id: String,
    board: TaskBoard,
    score: ScoreState,
    dispatcher: SyncDispatcher<S>,
    shift: Shift,
    events: Vec<Event>,
}

impl<S: Syncer> Session<S> {
    pub fn new(
        actor_id: impl Into<String>,
        board: TaskBoard,
        score: ScoreState,
        dispatcher: SyncDispatcher<S>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            actor_id: actor_id.into(),
            board,
            score,
            dispatcher,
            shift: Shift::default(),
            events: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn actor_id(&self) -> &str {
        &self.actor_id
    }

    pub fn board(&self) -> &TaskBoard {
        &self.board
    }

    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    pub fn shift(&self) -> &Shift {
        &self.shift
    }

    pub fn dispatcher(&self) -> &SyncDispatcher<S> {
        &self.dispatcher
    }

    /// Toggle a task and apply the score effect.
    ///
    /// On completion the gain is added to the score and one background sync
    /// of exactly that gain is started. Reopening a task changes nothing but
    /// the flag. Zero-point completions are not synced.
    ///
    /// # Errors
    /// Returns [`BoardError::TaskNotFound`] for an unknown id; nothing
    /// changes and nothing is synced.
    pub fn toggle_task(&mut self, id: &str) -> Result<Option<ScoreGainEvent>, BoardError> {
        let gain = self.board.toggle_task(id)?;
        let at = Utc::now();

        match &gain {
            Some(gain) => {
                let score = self.score.apply(gain);
                self.events.push(Event::TaskCompleted {
                    task_id: gain.task_id.clone(),
                    at,
                });
                self.events.push(Event::ScoreGained {
                    task_id: gain.task_id.clone(),
                    points: gain.points,
                    score,
                    at,
                });
                tracing::info!(
                    session = %self.id,
                    actor_id = %self.actor_id,
                    task_id = %gain.task_id,
                    points = gain.points,
                    score,
                    "task completed"
                );
                if gain.points > 0 {
                    self.dispatcher.dispatch(&self.actor_id, gain.points);
                }
            }
            None => {
                self.events.push(Event::TaskReopened {
                    task_id: id.to_string(),
                    at,
                });
                tracing::info!(session = %self.id, task_id = %id, "task reopened, score kept");
            }
        }

        Ok(gain)
    }

    pub fn set_filter(&mut self, filter: CategoryFilter) {
        self.board.set_filter(filter);
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.board.set_sort(sort);
    }

    /// Session score over the tasks currently completed on the board.
    ///
    /// `idle_minutes` is measured outside the session.
    pub fn session_score(&self, idle_minutes: u32) -> u64 {
        session_score(
            self.board.tasks().iter().filter(|t| t.is_completed()),
            idle_minutes,
        )
    }

    /// Flip check-in / check-out and return the new state.
    pub fn toggle_shift(&mut self) -> Shift {
        let at = Utc::now();
        self.shift.checked_in = !self.shift.checked_in;
        self.shift.last_change_at = Some(at);
        self.events.push(if self.shift.checked_in {
            Event::ShiftStarted { at }
        } else {
            Event::ShiftEnded { at }
        });
        self.shift
    }

    /// Take the events recorded since the last call.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn snapshot(&self) -> DisplaySnapshot {
        let tasks: Vec<Task> = self.board.visible().into_iter().cloned().collect();
        DisplaySnapshot {
            actor_id: self.actor_id.clone(),
            filter: self.board.filter(),
            sort: self.board.sort_key(),
            no_match: tasks.is_empty() && !self.board.is_empty(),
            tasks,
            completion: self.board.completion_count(),
            score: self.score.score(),
            max_score: self.score.max_score(),
            percentage: self.score.percentage(),
            remaining: self.score.remaining(),
            shift: self.shift,
            pending_syncs: self.dispatcher.in_flight(),
        }
    }

    /// Wait for every background sync started so far.
    pub async fn flush_syncs(&mut self) -> SyncReport {
        self.dispatcher.drain().await
    }
}
