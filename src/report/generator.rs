use crate::domain::{format_duration, format_hms, visible_tasks, Task, TaskFilter, TaskStatus};
use crate::persistence::{atomic_write, report_file};
use crate::report::stats::{calculate_stats, calculate_tag_stats};
use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use std::path::PathBuf;

/// Format percentage with 1 decimal place
fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

/// Render the markdown report for the given tasks
pub fn render_report(tasks: &[Task], generated_at: DateTime<Local>) -> String {
    let stats = calculate_stats(tasks);
    let tag_stats = calculate_tag_stats(tasks);

    let mut report = String::new();

    report.push_str(&format!("# Task Report - {}\n\n", generated_at.format("%Y-%m-%d %H:%M")));

    // Summary Section
    report.push_str("## Summary\n\n");
    report.push_str(&format!(
        "- **Total Tasks:** {} ({} completed, {}%)\n",
        stats.total_tasks,
        stats.completed_tasks,
        stats.completion_rate()
    ));
    report.push_str(&format!(
        "- **Time Planned:** {}\n",
        format_hms(stats.total_estimated_minutes * 60)
    ));
    report.push_str(&format!("- **Time Spent:** {}\n", format_hms(stats.total_active_secs)));
    report.push_str(&format!("- **Break Time:** {}\n", format_hms(stats.total_break_secs)));

    let focus_share = if stats.total_active_secs + stats.total_break_secs > 0 {
        (stats.total_active_secs as f64 / (stats.total_active_secs + stats.total_break_secs) as f64) * 100.0
    } else {
        0.0
    };
    report.push_str(&format!("- **Focus Share:** {}\n", format_percent(focus_share)));
    report.push_str(&format!(
        "- **Over Estimate:** {} task(s)\n\n",
        stats.over_estimate_tasks
    ));

    // Task table
    if !tasks.is_empty() {
        report.push_str("## Tasks\n\n");
        report.push_str("| Task | Status | Priority | Estimate | Spent | Breaks |\n");
        report.push_str("|------|--------|----------|----------|-------|--------|\n");
        for task in visible_tasks(tasks, &TaskFilter::default()) {
            report.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} |\n",
                task.title.replace('|', "/"),
                task.status().label(),
                task.priority.label(),
                format_duration(task.estimated_secs().unsigned_abs()),
                format_hms(task.active_secs),
                task.breaks.len(),
            ));
        }
        report.push('\n');
    }

    // Tags
    if !tag_stats.is_empty() {
        report.push_str("## Tags\n\n");
        for (tag, tag_stat) in &tag_stats {
            report.push_str(&format!(
                "- **#{}:** {} task(s), {} done, {} spent of {} planned\n",
                tag,
                tag_stat.task_count,
                tag_stat.completed_count,
                format_duration(tag_stat.active_secs),
                format_duration(tag_stat.estimated_minutes * 60),
            ));
        }
        report.push('\n');
    }

    // Completed
    let mut completed: Vec<&Task> = tasks.iter().filter(|t| t.status() == TaskStatus::Completed).collect();
    completed.sort_by_key(|t| t.completion_time());
    if !completed.is_empty() {
        report.push_str("## Completed\n\n");
        for task in completed {
            let finished = task
                .completion_time()
                .map(|at: DateTime<Utc>| at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default();
            report.push_str(&format!("- {} ({}, {})\n", task.title, finished, format_hms(task.active_secs)));
        }
    }

    report
}

/// Write the report to `output_path`, or to the data directory by default
pub fn generate_report(tasks: &[Task], output_path: Option<PathBuf>) -> Result<PathBuf> {
    let now = Local::now();
    let path = match output_path {
        Some(path) => path,
        None => report_file(now.date_naive())?,
    };
    atomic_write(&path, &render_report(tasks, now))?;
    tracing::info!(path = %path.display(), "report written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskDraft;
    use chrono::{Duration, TimeZone};

    #[test]
    fn test_render_report_sections() {
        let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let mut draft = TaskDraft::new("Write | docs", 30);
        draft.tags = vec!["writing".to_string()];
        let mut task = Task::from_draft(draft.validate().unwrap(), t0);
        task.begin(t0);
        task.pause(t0 + Duration::seconds(600));
        task.begin(t0 + Duration::seconds(660));
        task.complete(t0 + Duration::seconds(1260));

        let report = render_report(&[task], Local::now());
        assert!(report.contains("## Summary"));
        assert!(report.contains("- **Total Tasks:** 1 (1 completed, 100%)"));
        assert!(report.contains("- **Time Spent:** 00:20:00"));
        assert!(report.contains("- **Break Time:** 00:01:00"));
        assert!(report.contains("| Write / docs | Completed |"));
        assert!(report.contains("#writing"));
        assert!(report.contains("## Completed"));
    }

    #[test]
    fn test_render_report_empty() {
        let report = render_report(&[], Local::now());
        assert!(report.contains("- **Total Tasks:** 0 (0 completed, 0%)"));
        assert!(!report.contains("## Tasks"));
    }

    #[test]
    fn test_generate_report_to_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.md");
        let written = generate_report(&[], Some(path.clone())).unwrap();
        assert_eq!(written, path);
        assert!(std::fs::read_to_string(path).unwrap().starts_with("# Task Report"));
    }
}
