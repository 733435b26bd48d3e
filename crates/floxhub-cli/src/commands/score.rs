//! Score calculation commands for CLI.

use clap::Subcommand;
use floxhub_core::{session_score_from_weights, Config, ScoreState, IDLE_PENALTY_RATE};

#[derive(Subcommand)]
pub enum ScoreAction {
    /// Session score for completed task weights and idle time
    Session {
        /// Weight of a completed task (repeatable)
        #[arg(long = "weight")]
        weights: Vec<u32>,
        /// Idle minutes
        #[arg(long, default_value_t = 0)]
        idle: u32,
    },
    /// Display percentage of a score against its ceiling
    Progress {
        score: u64,
        /// Score ceiling (default: score.max_score)
        #[arg(long)]
        max: Option<u64>,
    },
}

pub fn run(action: ScoreAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ScoreAction::Session { weights, idle } => {
            let task_points: u64 = weights.iter().map(|&w| u64::from(w)).sum();
            let score = session_score_from_weights(weights, idle);
            let output = serde_json::json!({
                "task_points": task_points,
                "idle_minutes": idle,
                "idle_penalty_rate": IDLE_PENALTY_RATE,
                "score": score,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        ScoreAction::Progress { score, max } => {
            let state = ScoreState::new(score, max.unwrap_or(config.score.max_score));
            let output = serde_json::json!({
                "score": state.score(),
                "max_score": state.max_score(),
                "percentage": state.percentage(),
                "remaining": state.remaining(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}
