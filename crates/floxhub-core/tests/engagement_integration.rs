//! Integration tests for the task board, scoring and score sync.

use chrono::NaiveDate;
use floxhub_core::{
    session_score, BoardError, CategoryFilter, DemoDay, Event, MemorySyncer, ScoreState, Session,
    SortKey, SyncDispatcher, Task, TaskBoard, TaskCategory, TaskSource,
};
use std::time::Duration;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn ids<'a>(tasks: &[&'a Task]) -> Vec<&'a str> {
    tasks.iter().map(|t| t.id()).collect()
}

#[test]
fn test_double_toggle_emits_single_gain() {
    let mut board = TaskBoard::new(vec![Task::new(
        "1",
        "Write release notes",
        40,
        TaskCategory::Admin,
        date("2024-10-24"),
    )])
    .unwrap();

    let first = board.toggle_task("1").unwrap();
    let second = board.toggle_task("1").unwrap();

    assert_eq!(first.map(|g| g.points), Some(40));
    assert_eq!(second, None);
    assert!(!board.get("1").unwrap().is_completed());
}

#[tokio::test]
async fn test_double_toggle_keeps_score() {
    let store = MemorySyncer::new();
    let board =
        TaskBoard::new(vec![Task::new("1", "x", 40, TaskCategory::Admin, date("2024-10-24"))])
            .unwrap();
    let mut session = Session::new(
        "actor",
        board,
        ScoreState::new(0, 100),
        SyncDispatcher::new(store.clone(), Duration::from_secs(5)),
    );

    session.toggle_task("1").unwrap();
    session.toggle_task("1").unwrap();
    session.flush_syncs().await;

    assert_eq!(session.score().score(), 40);
    assert_eq!(store.calls(), vec![("actor".to_string(), 40)]);
}

#[tokio::test]
async fn test_completions_accumulate_sum_of_weights() {
    let store = MemorySyncer::new();
    let board = TaskBoard::from_source(&DemoDay).unwrap();
    let mut session = Session::new(
        "intern-001",
        board,
        ScoreState::new(0, 500),
        SyncDispatcher::new(store.clone(), Duration::from_secs(5)),
    );

    for id in ["1", "3", "4", "5"] {
        assert!(session.toggle_task(id).unwrap().is_some());
    }
    let report = session.flush_syncs().await;

    assert_eq!(session.score().score(), 50 + 20 + 100 + 15);
    assert_eq!(report.delivered, 4);
    assert_eq!(store.total_for("intern-001"), 185);
}

#[test]
fn test_filter_and_sort_are_repeatable() {
    let board = TaskBoard::from_source(&DemoDay).unwrap();
    let filter = CategoryFilter::Only(TaskCategory::Frontend);

    let first: Vec<Task> = board.view(filter, SortKey::Weight).into_iter().cloned().collect();
    let second: Vec<Task> = board.view(filter, SortKey::Weight).into_iter().cloned().collect();

    assert_eq!(first, second);
    assert_eq!(board.tasks(), DemoDay.load().unwrap().as_slice());
}

#[test]
fn test_weight_sort_is_stable() {
    let board = TaskBoard::new(vec![
        Task::new("1", "a", 10, TaskCategory::Frontend, date("2024-10-24")),
        Task::new("2", "b", 10, TaskCategory::Frontend, date("2024-10-23")),
        Task::new("3", "c", 20, TaskCategory::Frontend, date("2024-10-25")),
    ])
    .unwrap();

    assert_eq!(ids(&board.view(CategoryFilter::All, SortKey::Weight)), ["3", "1", "2"]);
}

#[test]
fn test_session_score_formula() {
    let done = [
        Task::new("a", "a", 50, TaskCategory::Backend, date("2024-10-24")),
        Task::new("b", "b", 30, TaskCategory::Backend, date("2024-10-24")),
    ];
    assert_eq!(session_score(&done, 20), 70);

    let small = [Task::new("c", "c", 5, TaskCategory::Backend, date("2024-10-24"))];
    assert_eq!(session_score(&small, 100), 0);
}

#[tokio::test]
async fn test_end_to_end_completion_syncs_once() {
    let store = MemorySyncer::new();
    let board = TaskBoard::new(vec![
        Task::new("T1", "Open task", 50, TaskCategory::Frontend, date("2024-10-24")),
        Task::new("T2", "Done task", 30, TaskCategory::Frontend, date("2024-10-24"))
            .with_completed(true),
    ])
    .unwrap();
    let mut session = Session::new(
        "actor",
        board,
        ScoreState::new(30, 500),
        SyncDispatcher::new(store.clone(), Duration::from_secs(5)),
    );

    let gain = session.toggle_task("T1").unwrap().unwrap();
    assert_eq!(gain.points, 50);
    assert_eq!(session.score().score(), 80);

    session.flush_syncs().await;
    assert_eq!(store.calls(), vec![("actor".to_string(), 50)]);
    assert!(session.board().get("T2").unwrap().is_completed());

    let events = session.drain_events();
    assert_eq!(events.len(), 2);
    assert!(matches!(&events[1], Event::ScoreGained { points: 50, score: 80, .. }));
}

#[tokio::test]
async fn test_unknown_task_is_reported() {
    let mut session = Session::new(
        "actor",
        TaskBoard::from_source(&DemoDay).unwrap(),
        ScoreState::new(30, 500),
        SyncDispatcher::new(MemorySyncer::new(), Duration::from_secs(5)),
    );
    assert_eq!(
        session.toggle_task("missing"),
        Err(BoardError::TaskNotFound("missing".to_string()))
    );
}

#[tokio::test]
async fn test_concurrent_syncs_all_land() {
    let store = MemorySyncer::new().with_delay(Duration::from_millis(10));
    let mut session = Session::new(
        "intern-001",
        TaskBoard::from_source(&DemoDay).unwrap(),
        ScoreState::new(30, 500),
        SyncDispatcher::new(store.clone(), Duration::from_secs(5)),
    );

    session.toggle_task("1").unwrap();
    session.toggle_task("4").unwrap();
    session.toggle_task("3").unwrap();
    assert_eq!(session.snapshot().pending_syncs, 3);

    session.flush_syncs().await;
    assert_eq!(store.total_for("intern-001"), 170);
    assert_eq!(session.snapshot().percentage, 40);
}

#[tokio::test]
async fn test_dropped_session_still_delivers_sync() {
    let store = MemorySyncer::new().with_delay(Duration::from_millis(20));
    let mut session = Session::new(
        "intern-001",
        TaskBoard::from_source(&DemoDay).unwrap(),
        ScoreState::new(30, 500),
        SyncDispatcher::new(store.clone(), Duration::from_secs(5)),
    );

    session.toggle_task("1").unwrap();
    drop(session);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(store.calls(), vec![("intern-001".to_string(), 50)]);
    assert_eq!(store.total_for("intern-001"), 50);
}
