//! Daily task board for a single actor.
//!
//! The board owns the ordered task list and the current filter/sort
//! selection. The visible view (filter first, then a stable sort over the
//! filtered subsequence) is derived lazily and cached; every mutation of the
//! tasks, the filter or the sort key drops the cache, so the view can never
//! drift from the list it was derived from.
//!
//! ```text
//!   INCOMPLETE ──toggle──> COMPLETE      (emits ScoreGainEvent)
//!   COMPLETE   ──toggle──> INCOMPLETE    (emits nothing, score untouched)
//! ```

use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{BoardError, Result, ValidationError};
use crate::scoring::{points_for_task, ScoreGainEvent};
use crate::task::source::TaskSource;
use crate::task::{Priority, Task, TaskCategory};

/// Category filter for the visible view.
///
/// Serialized as `ALL` or the category name, the same spelling [`FromStr`]
/// accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(TaskCategory),
}

impl CategoryFilter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => task.category() == *category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str("ALL"),
            CategoryFilter::Only(category) => category.fmt(f),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("ALL") {
            return Ok(CategoryFilter::All);
        }
        s.parse().map(CategoryFilter::Only)
    }
}

impl From<CategoryFilter> for String {
    fn from(filter: CategoryFilter) -> Self {
        filter.to_string()
    }
}

impl TryFrom<String> for CategoryFilter {
    type Error = BoardError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Sort key for the visible view. All orders are stable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortKey {
    /// Heaviest first.
    Weight,
    /// Earliest deadline first.
    #[default]
    Deadline,
    /// Open tasks before completed ones.
    Status,
}

impl SortKey {
    pub fn compare(&self, a: &Task, b: &Task) -> Ordering {
        match self {
            SortKey::Weight => b.weight().cmp(&a.weight()),
            SortKey::Deadline => a.deadline().cmp(&b.deadline()),
            SortKey::Status => a.is_completed().cmp(&b.is_completed()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Weight => "WEIGHT",
            SortKey::Deadline => "DEADLINE",
            SortKey::Status => "STATUS",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "WEIGHT" => Ok(SortKey::Weight),
            "DEADLINE" => Ok(SortKey::Deadline),
            "STATUS" => Ok(SortKey::Status),
            _ => Err(BoardError::UnknownSortKey(s.to_string())),
        }
    }
}

/// Subsequence of `tasks` matching `filter`, in board order.
pub fn apply_filter(tasks: &[Task], filter: CategoryFilter) -> Vec<&Task> {
    tasks.iter().filter(|t| filter.matches(t)).collect()
}

/// New view of `tasks` ordered by `key`. The input is left untouched.
pub fn apply_sort<'a>(tasks: &[&'a Task], key: SortKey) -> Vec<&'a Task> {
    let mut sorted = tasks.to_vec();
    // slice::sort_by is stable
    sorted.sort_by(|a, b| key.compare(a, b));
    sorted
}

/// Progress over the whole board, independent of the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionCount {
    pub completed: usize,
    pub total: usize,
}

impl CompletionCount {
    pub fn as_tuple(&self) -> (usize, usize) {
        (self.completed, self.total)
    }
}

/// Ordered task list for one actor on one day.
#[derive(Debug, Clone)]
pub struct TaskBoard {
    tasks: Vec<Task>,
    filter: CategoryFilter,
    sort: SortKey,
    revision: u64,
    /// Indices into `tasks` for the current (filter, sort) view.
    view: OnceCell<Vec<usize>>,
}

impl TaskBoard {
    /// Build a board from validated tasks.
    ///
    /// # Errors
    /// Returns [`ValidationError::DuplicateId`] if two tasks share an id.
    pub fn new(tasks: Vec<Task>) -> Result<Self, ValidationError> {
        let mut seen = HashSet::with_capacity(tasks.len());
        for task in &tasks {
            if !seen.insert(task.id()) {
                return Err(ValidationError::DuplicateId(task.id().to_string()));
            }
        }

        Ok(Self {
            tasks,
            filter: CategoryFilter::default(),
            sort: SortKey::default(),
            revision: 0,
            view: OnceCell::new(),
        })
    }

    /// Load and validate a board from a task source.
    pub fn from_source(source: &impl TaskSource) -> Result<Self> {
        let tasks = source.load()?;
        Ok(Self::new(tasks)?)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id() == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Bumped on every task mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn filter(&self) -> CategoryFilter {
        self.filter
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort
    }

    /// Flip completion of the task with `id`.
    ///
    /// Returns a gain event only on the incomplete -> complete edge.
    ///
    /// # Errors
    /// Returns [`BoardError::TaskNotFound`] and leaves the board untouched
    /// when no task has that id.
    pub fn toggle_task(&mut self, id: &str) -> Result<Option<ScoreGainEvent>, BoardError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id() == id)
            .ok_or_else(|| BoardError::TaskNotFound(id.to_string()))?;

        let now_completed = task.toggle();
        let gain = now_completed.then(|| ScoreGainEvent {
            task_id: task.id().to_string(),
            points: points_for_task(task),
        });

        self.revision += 1;
        self.view.take();

        tracing::debug!(
            task_id = %id,
            completed = now_completed,
            revision = self.revision,
            "task toggled"
        );
        Ok(gain)
    }

    pub fn set_filter(&mut self, filter: CategoryFilter) {
        if self.filter != filter {
            self.filter = filter;
            self.view.take();
        }
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        if self.sort != sort {
            self.sort = sort;
            self.view.take();
        }
    }

    /// Filtered and sorted view for the current selection.
    pub fn visible(&self) -> Vec<&Task> {
        let indices = self.view.get_or_init(|| {
            let mut indices: Vec<usize> = self
                .tasks
                .iter()
                .enumerate()
                .filter(|(_, t)| self.filter.matches(t))
                .map(|(i, _)| i)
                .collect();
            indices.sort_by(|&a, &b| self.sort.compare(&self.tasks[a], &self.tasks[b]));
            tracing::debug!(
                filter = %self.filter,
                sort = %self.sort,
                revision = self.revision,
                matched = indices.len(),
                "view recomputed"
            );
            indices
        });
        indices.iter().map(|&i| &self.tasks[i]).collect()
    }

    /// One-off view for an arbitrary selection; does not touch the cache.
    pub fn view(&self, filter: CategoryFilter, sort: SortKey) -> Vec<&Task> {
        apply_sort(&apply_filter(&self.tasks, filter), sort)
    }

    pub fn completion_count(&self) -> CompletionCount {
        CompletionCount {
            completed: self.tasks.iter().filter(|t| t.is_completed()).count(),
            total: self.tasks.len(),
        }
    }

    /// Visible tasks grouped HIGH, MEDIUM, LOW; empty groups are omitted.
    pub fn group_by_priority(&self) -> Vec<(Priority, Vec<&Task>)> {
        let visible = self.visible();
        [Priority::High, Priority::Medium, Priority::Low]
            .into_iter()
            .filter_map(|priority| {
                let group: Vec<&Task> = visible
                    .iter()
                    .copied()
                    .filter(|t| t.priority() == priority)
                    .collect();
                (!group.is_empty()).then_some((priority, group))
            })
            .collect()
    }
}
