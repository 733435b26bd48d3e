//! # Floxhub Core Library
//!
//! Engagement tracking for the Floxhub management dashboard. A worker's day
//! is a board of weighted tasks; completing a task earns its weight in
//! points, which are added to a running score and forwarded to the backing
//! store in the background.
//!
//! ## Architecture
//!
//! - **Task board**: ordered task list with completion toggling and a lazily
//!   derived filtered/sorted view
//! - **Scoring**: pure point arithmetic (task points, session score with idle
//!   penalty, display percentage)
//! - **Sync**: pluggable [`Syncer`] capability driven by a fire-and-forget
//!   dispatcher with a bounded timeout
//! - **Session**: single owner of board, score and dispatcher for one actor
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`TaskBoard`]: board state and views
//! - [`ScoreState`]: running score
//! - [`Session`]: toggle -> score -> sync wiring
//! - [`Config`]: application configuration management

pub mod board;
pub mod error;
pub mod events;
pub mod scoring;
pub mod session;
pub mod storage;
pub mod sync;
pub mod task;

pub use board::{apply_filter, apply_sort, CategoryFilter, CompletionCount, SortKey, TaskBoard};
pub use error::{BoardError, ConfigError, CoreError, ValidationError};
pub use events::Event;
pub use scoring::{
    points_for_task, session_score, session_score_from_weights, ScoreGainEvent, ScoreState,
    IDLE_PENALTY_RATE,
};
pub use session::{DisplaySnapshot, Session, Shift};
pub use storage::Config;
pub use sync::{
    ConfiguredSyncer, HttpSyncer, LogSyncer, MemorySyncer, SyncDispatcher, SyncError, SyncOutcome,
    SyncReport, Syncer,
};
pub use task::source::{DemoDay, JsonFileSource, TaskSource};
pub use task::{Priority, Task, TaskCategory, TaskRecord};
