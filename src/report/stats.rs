use crate::domain::Task;
use std::collections::BTreeMap;

/// Totals over the whole task store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    /// Sum of estimates, in minutes
    pub total_estimated_minutes: u64,
    /// Sum of folded active time, in seconds
    pub total_active_secs: u64,
    /// Sum of closed breaks, in seconds; open breaks count as zero
    pub total_break_secs: u64,
    /// Tasks whose active time exceeds their estimate
    pub over_estimate_tasks: usize,
}

impl TaskStats {
    /// Completed share in whole percent, rounded
    pub fn completion_rate(&self) -> u32 {
        if self.total_tasks == 0 {
            return 0;
        }
        let rate = (self.completed_tasks as f64 / self.total_tasks as f64) * 100.0;
        rate.round() as u32
    }
}

/// Per-tag statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagStats {
    pub task_count: usize,
    pub completed_count: usize,
    pub active_secs: u64,
    pub estimated_minutes: u64,
}

/// Recompute totals from scratch
pub fn calculate_stats(tasks: &[Task]) -> TaskStats {
    let mut stats = TaskStats {
        total_tasks: tasks.len(),
        ..TaskStats::default()
    };

    for task in tasks {
        if task.is_completed() {
            stats.completed_tasks += 1;
        }
        stats.total_estimated_minutes += u64::from(task.estimated_minutes);
        stats.total_active_secs += task.active_secs;
        stats.total_break_secs += task.break_secs();
        if task.is_over_estimate() {
            stats.over_estimate_tasks += 1;
        }
    }

    stats
}

/// Calculate per-tag statistics
pub fn calculate_tag_stats(tasks: &[Task]) -> BTreeMap<String, TagStats> {
    let mut tag_map: BTreeMap<String, TagStats> = BTreeMap::new();

    for task in tasks {
        for tag in &task.tags {
            let entry = tag_map.entry(tag.clone()).or_default();
            entry.task_count += 1;
            entry.active_secs += task.active_secs;
            entry.estimated_minutes += u64::from(task.estimated_minutes);
            if task.is_completed() {
                entry.completed_count += 1;
            }
        }
    }

    tag_map
}
