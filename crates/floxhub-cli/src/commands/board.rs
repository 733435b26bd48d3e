//! Task board commands for CLI.

use clap::{Args, Subcommand};
use floxhub_core::task::source::{DEMO_ACTOR_ID, DEMO_INITIAL_SCORE};
use floxhub_core::{
    CategoryFilter, Config, ConfiguredSyncer, DemoDay, JsonFileSource, ScoreGainEvent, ScoreState,
    Session, SortKey, SyncDispatcher, SyncReport, TaskBoard,
};
use std::path::PathBuf;

#[derive(Args)]
pub struct ViewArgs {
    /// JSON file with the day's tasks (default: built-in demo day)
    #[arg(long)]
    tasks: Option<PathBuf>,
    /// Category filter: ALL, FRONTEND, BACKEND, MEETING, ADMIN, PLANNING
    #[arg(long, default_value = "ALL")]
    filter: CategoryFilter,
    /// Sort key: WEIGHT, DEADLINE, STATUS
    #[arg(long, default_value = "DEADLINE")]
    sort: SortKey,
    /// Starting score (default: demo baseline, or score.initial_score)
    #[arg(long)]
    initial_score: Option<u64>,
    /// Idle minutes to report a session score for
    #[arg(long)]
    idle: Option<u32>,
    /// Also list visible task ids grouped HIGH, MEDIUM, LOW
    #[arg(long)]
    by_priority: bool,
}

#[derive(Subcommand)]
pub enum BoardAction {
    /// Print the filtered and sorted board
    Show {
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Toggle tasks in order and sync completions
    Toggle {
        /// Task IDs
        #[arg(required = true)]
        ids: Vec<String>,
        #[command(flatten)]
        view: ViewArgs,
        /// Check in before toggling
        #[arg(long)]
        check_in: bool,
    },
}

pub async fn run(action: BoardAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        BoardAction::Show { view } => {
            let mut session = open_session(&view, config)?;
            print_session(&mut session, &view, Vec::new(), None)?;
        }
        BoardAction::Toggle { ids, view, check_in } => {
            let mut session = open_session(&view, config)?;
            if check_in {
                session.toggle_shift();
            }

            let mut gains = Vec::new();
            for id in &ids {
                match session.toggle_task(id) {
                    Ok(Some(gain)) => gains.push(gain),
                    Ok(None) => {}
                    Err(e) => eprintln!("warning: {e}"),
                }
            }

            let report = session.flush_syncs().await;
            print_session(&mut session, &view, gains, Some(report))?;
        }
    }
    Ok(())
}

fn open_session(
    view: &ViewArgs,
    config: &Config,
) -> Result<Session<ConfiguredSyncer>, Box<dyn std::error::Error>> {
    let (board, baseline, actor_id) = match &view.tasks {
        Some(path) => (
            TaskBoard::from_source(&JsonFileSource::new(path))?,
            config.score.initial_score,
            config.sync.actor_id.clone(),
        ),
        None => (
            TaskBoard::from_source(&DemoDay)?,
            DEMO_INITIAL_SCORE,
            DEMO_ACTOR_ID.to_string(),
        ),
    };

    let dispatcher = SyncDispatcher::new(config.sync.build_syncer()?, config.sync.timeout());
    let score = ScoreState::new(view.initial_score.unwrap_or(baseline), config.score.max_score);
    let mut session = Session::new(actor_id, board, score, dispatcher);
    session.set_filter(view.filter);
    session.set_sort(view.sort);
    Ok(session)
}

fn print_session(
    session: &mut Session<ConfiguredSyncer>,
    view: &ViewArgs,
    gains: Vec<ScoreGainEvent>,
    sync: Option<SyncReport>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut output = serde_json::json!({
        "board": session.snapshot(),
        "events": session.drain_events(),
    });
    if !gains.is_empty() {
        output["gains"] = serde_json::to_value(&gains)?;
    }
    if let Some(report) = sync {
        output["sync"] = serde_json::to_value(report)?;
    }
    if let Some(idle) = view.idle {
        output["session_score"] = session.session_score(idle).into();
    }
    if view.by_priority {
        let groups: Vec<serde_json::Value> = session
            .board()
            .group_by_priority()
            .into_iter()
            .map(|(priority, tasks)| {
                let ids: Vec<&str> = tasks.iter().map(|t| t.id()).collect();
                serde_json::json!({ "priority": priority, "tasks": ids })
            })
            .collect();
        output["by_priority"] = groups.into();
    }
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
