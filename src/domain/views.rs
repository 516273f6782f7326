use super::enums::{Priority, TaskStatus};
use super::task::Task;

/// Presentation-only filter over the task list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    /// None shows every status
    pub status: Option<TaskStatus>,
    /// None shows every priority
    pub priority: Option<Priority>,
    pub search: String,
}

impl TaskFilter {
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.priority.is_none() && self.search.trim().is_empty()
    }

    /// Check a single task against status, priority and search term
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(status) = self.status {
            if task.status() != status {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if task.priority != priority {
                return false;
            }
        }

        let term = self.search.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        task.title.to_lowercase().contains(&term)
            || task.description.to_lowercase().contains(&term)
            || task.tags.iter().any(|tag| tag.to_lowercase().contains(&term))
    }

    /// Short summary for the list pane title, e.g. "status=Paused search=doc"
    pub fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(status) = self.status {
            parts.push(format!("status={}", status.label()));
        }
        if let Some(priority) = self.priority {
            parts.push(format!("priority={}", priority.label()));
        }
        if !self.search.trim().is_empty() {
            parts.push(format!("search={}", self.search.trim()));
        }
        parts.join(" ")
    }
}

/// Display order of status groups: running work first, finished work last
fn group_rank(status: TaskStatus) -> u8 {
    match status {
        TaskStatus::InProgress => 0,
        TaskStatus::Paused => 1,
        TaskStatus::NotStarted => 2,
        TaskStatus::Completed => 3,
    }
}

/// Filter the tasks and group them by status, keeping creation order inside a group
pub fn visible_tasks<'a>(tasks: &'a [Task], filter: &TaskFilter) -> Vec<&'a Task> {
    let mut rows: Vec<&Task> = tasks.iter().filter(|t| filter.matches(t)).collect();
    rows.sort_by_key(|t| (group_rank(t.status()), t.created_at));
    rows
}

/// Format seconds as HH:MM:SS
pub fn format_hms(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

/// Format a countdown value; negative values are shown as overtime with a leading '+'
pub fn format_countdown(remaining: i64) -> String {
    if remaining < 0 {
        format!("+{}", format_hms(remaining.unsigned_abs()))
    } else {
        format_hms(remaining.unsigned_abs())
    }
}

/// Format seconds as "Xh Ym" (omits 0 values)
pub fn format_duration(seconds: u64) -> String {
    let total_minutes = seconds / 60;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours > 0 && minutes > 0 {
        format!("{}h {}m", hours, minutes)
    } else if hours > 0 {
        format!("{}h", hours)
    } else {
        format!("{}m", minutes)
    }
}

/// Get status badge text
pub fn status_badge(task: &Task) -> &'static str {
    match task.status() {
        TaskStatus::InProgress => "⏱ RUNNING",
        TaskStatus::Paused => "⏸ PAUSED",
        TaskStatus::NotStarted => "○ TODO",
        TaskStatus::Completed => "✓ DONE",
    }
}

/// Elapsed over estimate, clamped to [0, 1] for gauges
pub fn progress_ratio(elapsed: i64, estimated_secs: i64) -> f64 {
    if estimated_secs <= 0 {
        return 1.0;
    }
    (elapsed as f64 / estimated_secs as f64).clamp(0.0, 1.0)
}
