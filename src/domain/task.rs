use super::enums::{Priority, TaskStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Opaque task identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Uuid);

impl TaskId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, enough to address a task from the command line
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a task is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunState {
    NotStarted,
    /// Running since the most recent transition into InProgress
    Running { since: DateTime<Utc> },
    Paused,
    Completed { at: DateTime<Utc> },
}

/// A span during which the task was paused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BreakInterval {
    Open { start: DateTime<Utc> },
    Closed { start: DateTime<Utc>, end: DateTime<Utc> },
}

impl BreakInterval {
    pub fn start(&self) -> DateTime<Utc> {
        match self {
            Self::Open { start } | Self::Closed { start, .. } => *start,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }

    /// Whole seconds of a closed break; open breaks count as zero
    pub fn closed_secs(&self) -> u64 {
        match self {
            Self::Open { .. } => 0,
            Self::Closed { start, end } => whole_secs_between(*start, *end),
        }
    }
}

/// Whole seconds from `from` to `to`, floored, never negative
pub fn whole_secs_between(from: DateTime<Utc>, to: DateTime<Utc>) -> u64 {
    u64::try_from(to.signed_duration_since(from).num_seconds()).unwrap_or(0)
}

/// Validation errors for new task input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("task title cannot be empty")]
    EmptyTitle,
    #[error("estimated time must be at least one minute")]
    ZeroEstimate,
}

/// User input for a new task, before it reaches the lifecycle controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub estimated_minutes: u32,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>, estimated_minutes: u32) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            estimated_minutes,
            priority: Priority::default(),
            due_date: None,
            tags: Vec::new(),
        }
    }

    /// Check the draft and normalize title and tags
    pub fn validate(mut self) -> Result<Self, DraftError> {
        self.title = self.title.trim().to_string();
        if self.title.is_empty() {
            return Err(DraftError::EmptyTitle);
        }
        if self.estimated_minutes == 0 {
            return Err(DraftError::ZeroEstimate);
        }
        self.description = self.description.trim().to_string();
        let mut tags: Vec<String> = self
            .tags
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        tags.sort();
        tags.dedup();
        self.tags = tags;
        Ok(self)
    }
}

/// One tracked work item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub estimated_minutes: u32,
    pub priority: Priority,
    pub state: RunState,
    /// First transition into InProgress; never reset
    pub started_at: Option<DateTime<Utc>>,
    /// Whole seconds of work folded in at pause/complete
    pub active_secs: u64,
    #[serde(default)]
    pub breaks: Vec<BreakInterval>,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Build a NotStarted task from a validated draft
    pub fn from_draft(draft: TaskDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: TaskId::new(),
            title: draft.title,
            description: draft.description,
            estimated_minutes: draft.estimated_minutes,
            priority: draft.priority,
            state: RunState::NotStarted,
            started_at: None,
            active_secs: 0,
            breaks: Vec::new(),
            due_date: draft.due_date,
            tags: draft.tags.into_iter().collect(),
            created_at: now,
        }
    }

    pub fn status(&self) -> TaskStatus {
        match self.state {
            RunState::NotStarted => TaskStatus::NotStarted,
            RunState::Running { .. } => TaskStatus::InProgress,
            RunState::Paused => TaskStatus::Paused,
            RunState::Completed { .. } => TaskStatus::Completed,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, RunState::Running { .. })
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.state, RunState::Completed { .. })
    }

    pub fn completion_time(&self) -> Option<DateTime<Utc>> {
        match self.state {
            RunState::Completed { at } => Some(at),
            _ => None,
        }
    }

    /// Start of the open break, if the task is currently on a break
    pub fn last_paused_at(&self) -> Option<DateTime<Utc>> {
        match self.breaks.last() {
            Some(BreakInterval::Open { start }) => Some(*start),
            _ => None,
        }
    }

    pub fn estimated_secs(&self) -> i64 {
        i64::from(self.estimated_minutes) * 60
    }

    /// Estimated seconds minus folded active seconds; negative means overtime
    pub fn remaining_secs(&self) -> i64 {
        self.estimated_secs() - self.active_secs_signed()
    }

    pub fn active_secs_signed(&self) -> i64 {
        i64::try_from(self.active_secs).unwrap_or(i64::MAX)
    }

    /// Sum of closed break intervals in whole seconds
    pub fn break_secs(&self) -> u64 {
        self.breaks.iter().map(BreakInterval::closed_secs).sum()
    }

    /// Seconds of the in-flight span, not yet folded into `active_secs`
    pub fn unfolded_secs(&self, now: DateTime<Utc>) -> u64 {
        match self.state {
            RunState::Running { since } => whole_secs_between(since, now),
            _ => 0,
        }
    }

    pub fn is_over_estimate(&self) -> bool {
        self.remaining_secs() < 0
    }

    /// Move into InProgress. Returns false when the transition is meaningless.
    pub fn begin(&mut self, now: DateTime<Utc>) -> bool {
        match self.state {
            RunState::NotStarted | RunState::Paused => {
                if self.started_at.is_none() {
                    self.started_at = Some(now);
                }
                self.close_open_break(now);
                self.state = RunState::Running { since: now };
                true
            }
            RunState::Running { .. } | RunState::Completed { .. } => false,
        }
    }

    /// Fold the running span and open a break. Only valid from InProgress.
    pub fn pause(&mut self, now: DateTime<Utc>) -> bool {
        if !self.is_running() {
            return false;
        }
        self.fold_running_span(now);
        self.breaks.push(BreakInterval::Open { start: now });
        self.state = RunState::Paused;
        true
    }

    /// Finish the task. A second call is a no-op.
    pub fn complete(&mut self, now: DateTime<Utc>) -> bool {
        if self.is_completed() {
            return false;
        }
        self.fold_running_span(now);
        self.close_open_break(now);
        self.state = RunState::Completed { at: now };
        true
    }

    fn fold_running_span(&mut self, now: DateTime<Utc>) {
        let extra = self.unfolded_secs(now);
        self.active_secs = self.active_secs.saturating_add(extra);
    }

    fn close_open_break(&mut self, now: DateTime<Utc>) {
        if let Some(last) = self.breaks.last_mut() {
            if let BreakInterval::Open { start } = *last {
                // Clock skew must not produce an interval that ends before it starts
                let end = now.max(start);
                *last = BreakInterval::Closed { start, end };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap()
    }

    fn sample_task() -> Task {
        let draft = TaskDraft::new("Write report", 10).validate().unwrap();
        Task::from_draft(draft, t0())
    }

    #[test]
    fn test_draft_validation() {
        assert_eq!(TaskDraft::new("   ", 5).validate(), Err(DraftError::EmptyTitle));
        assert_eq!(TaskDraft::new("Title", 0).validate(), Err(DraftError::ZeroEstimate));

        let mut draft = TaskDraft::new("  Title  ", 5);
        draft.tags = vec!["b".into(), " a ".into(), "b".into(), "".into()];
        let draft = draft.validate().unwrap();
        assert_eq!(draft.title, "Title");
        assert_eq!(draft.tags, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_new_task_is_not_started() {
        let task = sample_task();
        assert_eq!(task.status(), TaskStatus::NotStarted);
        assert_eq!(task.active_secs, 0);
        assert!(task.breaks.is_empty());
        assert!(task.started_at.is_none());
        assert_eq!(task.remaining_secs(), 600);
    }

    #[test]
    fn test_begin_sets_started_at_once() {
        let mut task = sample_task();
        assert!(task.begin(t0()));
        assert_eq!(task.started_at, Some(t0()));

        task.pause(t0() + Duration::seconds(10));
        task.begin(t0() + Duration::seconds(20));
        assert_eq!(task.started_at, Some(t0()));
        assert_eq!(task.state, RunState::Running { since: t0() + Duration::seconds(20) });
    }

    #[test]
    fn test_pause_only_from_running() {
        let mut task = sample_task();
        assert!(!task.pause(t0()));
        assert_eq!(task.status(), TaskStatus::NotStarted);
        assert!(task.breaks.is_empty());
    }

    #[test]
    fn test_pause_folds_and_opens_break() {
        let mut task = sample_task();
        task.begin(t0());
        let paused_at = t0() + Duration::milliseconds(30_900);
        assert!(task.pause(paused_at));

        // 30.9s truncates to 30
        assert_eq!(task.active_secs, 30);
        assert_eq!(task.breaks, vec![BreakInterval::Open { start: paused_at }]);
        assert_eq!(task.last_paused_at(), Some(paused_at));
    }

    #[test]
    fn test_resume_closes_break() {
        let mut task = sample_task();
        task.begin(t0());
        task.pause(t0() + Duration::seconds(30));
        task.begin(t0() + Duration::seconds(90));

        assert_eq!(task.last_paused_at(), None);
        assert_eq!(task.break_secs(), 60);
        assert_eq!(task.active_secs, 30);
    }

    #[test]
    fn test_multiple_cycles_use_latest_resume() {
        let mut task = sample_task();
        task.begin(t0());
        task.pause(t0() + Duration::seconds(100));
        task.begin(t0() + Duration::seconds(200));
        task.pause(t0() + Duration::seconds(250));
        task.begin(t0() + Duration::seconds(400));
        task.pause(t0() + Duration::seconds(410));

        // 100 + 50 + 10, never measured from started_at
        assert_eq!(task.active_secs, 160);
        assert_eq!(task.break_secs(), 100 + 150);
        assert_eq!(task.breaks.len(), 3);
        assert!(task.breaks[2].is_open());
    }

    #[test]
    fn test_complete_from_paused_closes_break() {
        let mut task = sample_task();
        task.begin(t0());
        task.pause(t0() + Duration::seconds(60));
        let done_at = t0() + Duration::seconds(100);
        assert!(task.complete(done_at));

        assert_eq!(task.active_secs, 60);
        assert_eq!(task.completion_time(), Some(done_at));
        assert_eq!(task.break_secs(), 40);
        assert!(task.breaks.iter().all(|b| !b.is_open()));
    }

    #[test]
    fn test_completed_is_terminal() {
        let mut task = sample_task();
        task.complete(t0());
        assert!(!task.begin(t0() + Duration::seconds(5)));
        assert!(!task.pause(t0() + Duration::seconds(5)));
        assert!(!task.complete(t0() + Duration::seconds(5)));
        assert_eq!(task.completion_time(), Some(t0()));
        assert!(task.started_at.is_none());
    }

    #[test]
    fn test_clock_going_backwards_never_decreases_active_time() {
        let mut task = sample_task();
        task.begin(t0());
        task.pause(t0() - Duration::seconds(30));
        assert_eq!(task.active_secs, 0);
    }

    #[test]
    fn test_short_id_is_prefix() {
        let task = sample_task();
        let full = task.id.to_string().replace('-', "");
        assert!(full.starts_with(&task.id.short()));
        assert_eq!(task.id.short().len(), 8);
    }
}
