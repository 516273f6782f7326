use crate::app::AppState;
use crate::clock::Clock;
use crate::domain::{format_countdown, format_duration, format_hms, progress_ratio, Task};
use crate::ticker::LiveCounters;
use crate::ui::styles::{
    border_style, default_style, gauge_style, over_estimate_style, priority_style, running_style, status_style,
    title_style,
};
use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

/// Render the live timer for the active task, or details of the selected one
pub fn render_timer_pane<C: Clock>(f: &mut Frame, app: &AppState<C>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style())
        .title(Span::styled(" Timer ", title_style()));

    let (task, live) = match (app.controller.active_task(), app.controller.live_counters()) {
        (Some(task), Some(counters)) => (Some(task), Some(counters)),
        _ => (app.selected_task(), None),
    };

    let Some(task) = task else {
        let empty = Paragraph::new("No task selected").block(block);
        f.render_widget(empty, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Gauge
            Constraint::Min(0),    // Text lines
        ])
        .split(block.inner(area));
    f.render_widget(block, area);

    let elapsed = live.map(|c| c.elapsed).unwrap_or_else(|| task.active_secs_signed());
    let ratio = progress_ratio(elapsed, task.estimated_secs());
    let gauge = Gauge::default()
        .gauge_style(gauge_style())
        .ratio(ratio)
        .label(format!("{:.0}%", ratio * 100.0));
    f.render_widget(gauge, chunks[0]);

    let paragraph = Paragraph::new(timer_lines(task, live)).wrap(Wrap { trim: false });
    f.render_widget(paragraph, chunks[1]);
}

fn timer_lines(task: &Task, live: Option<LiveCounters>) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    lines.push(Line::from(vec![
        Span::styled("Task:      ", title_style()),
        Span::raw(task.title.clone()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Status:    ", title_style()),
        Span::styled(task.status().label(), status_style(task.status())),
        Span::raw("  "),
        Span::styled(task.priority.label(), priority_style(task.priority)),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Estimate:  ", title_style()),
        Span::raw(format_duration(task.estimated_secs().unsigned_abs())),
    ]));

    match live {
        Some(counters) => {
            lines.push(Line::from(vec![
                Span::styled("Elapsed:   ", title_style()),
                Span::styled(format_hms(counters.elapsed.max(0) as u64), running_style()),
            ]));
            let (label, style) = if counters.is_overtime() {
                ("Overtime:  ", over_estimate_style())
            } else {
                ("Remaining: ", default_style())
            };
            lines.push(Line::from(vec![
                Span::styled(label, title_style()),
                Span::styled(format_countdown(counters.remaining), style),
            ]));
        }
        None => {
            lines.push(Line::from(vec![
                Span::styled("Spent:     ", title_style()),
                Span::raw(format_hms(task.active_secs)),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Breaks:    ", title_style()),
                Span::raw(format!("{} ({})", task.breaks.len(), format_hms(task.break_secs()))),
            ]));
        }
    }

    if let Some(due) = task.due_date {
        lines.push(Line::from(vec![
            Span::styled("Due:       ", title_style()),
            Span::raw(due.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()),
        ]));
    }
    if !task.description.is_empty() {
        lines.push(Line::raw(task.description.clone()));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskDraft;
    use chrono::Utc;

    fn text(lines: &[Line]) -> String {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_live_lines_show_countdown() {
        let task = Task::from_draft(TaskDraft::new("Focus", 10), Utc::now());
        let live = LiveCounters {
            elapsed: 61,
            remaining: 539,
        };
        let rendered = text(&timer_lines(&task, Some(live)));
        assert!(rendered.contains("Elapsed:   00:01:01"));
        assert!(rendered.contains("Remaining: 00:08:59"));
    }

    #[test]
    fn test_live_lines_show_overtime() {
        let task = Task::from_draft(TaskDraft::new("Focus", 10), Utc::now());
        let live = LiveCounters {
            elapsed: 650,
            remaining: -50,
        };
        let rendered = text(&timer_lines(&task, Some(live)));
        assert!(rendered.contains("Overtime:  +00:00:50"));
    }

    #[test]
    fn test_idle_lines_show_spent_and_breaks() {
        let mut draft = TaskDraft::new("Idle", 10);
        draft.description = "with notes".to_string();
        let task = Task::from_draft(draft.validate().unwrap(), Utc::now());
        let rendered = text(&timer_lines(&task, None));
        assert!(rendered.contains("Spent:     00:00:00"));
        assert!(rendered.contains("Breaks:    0 (00:00:00)"));
        assert!(rendered.contains("with notes"));
    }
}
