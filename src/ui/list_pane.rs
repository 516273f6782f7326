use crate::app::{AppState, Focus};
use crate::clock::Clock;
use crate::domain::{format_duration, format_hms, status_badge, Task};
use crate::ticker::LiveCounters;
use crate::ui::styles::{
    border_style, focused_border_style, over_estimate_style, priority_style, selected_style, status_style,
    tag_style, title_style,
};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

/// Render the task list pane
pub fn render_list_pane<C: Clock>(f: &mut Frame, app: &AppState<C>, area: Rect) {
    let rows = app.visible();
    let active = app.controller.active_task_id();
    let counters = app.controller.live_counters();

    let items: Vec<ListItem> = rows
        .iter()
        .map(|task| {
            let live = if Some(task.id) == active { counters } else { None };
            ListItem::new(create_task_line(task, live))
        })
        .collect();

    let total = app.controller.tasks().len();
    let mut title = format!(" Tasks ({}/{}) ", rows.len(), total);
    if !app.filter.is_empty() {
        title = format!(" Tasks ({}/{}) [{}] ", rows.len(), total, app.filter.describe());
    }

    let border = if app.focus == Focus::Tasks {
        focused_border_style()
    } else {
        border_style()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(Span::styled(title, title_style())),
        )
        .highlight_style(selected_style());

    let mut state = ListState::default();
    if !rows.is_empty() {
        state.select(Some(app.selected_index));
    }
    f.render_stateful_widget(list, area, &mut state);
}

/// Create a single line for a task
/// Format: ⏱ RUNNING  ! Write proposal  00:12:40 / 1h 30m  [work]
fn create_task_line(task: &Task, live: Option<LiveCounters>) -> Line<'static> {
    let mut spans = Vec::new();

    let status = task.status();
    spans.push(Span::styled(format!("{:<10}", status_badge(task)), status_style(status)));
    spans.push(Span::styled(
        format!("{} ", task.priority.badge()),
        priority_style(task.priority),
    ));
    spans.push(Span::raw(task.title.clone()));
    spans.push(Span::raw("  ".to_string()));

    // Running tasks show the live counter, everything else the folded time
    let elapsed = live.map(|c| c.elapsed.max(0) as u64).unwrap_or(task.active_secs);
    let over = live.map(|c| c.is_overtime()).unwrap_or_else(|| task.is_over_estimate());
    let time_str = format!(
        "{} / {}",
        format_hms(elapsed),
        format_duration(task.estimated_secs().unsigned_abs())
    );
    if over {
        spans.push(Span::styled(time_str, over_estimate_style()));
    } else {
        spans.push(Span::raw(time_str));
    }

    for tag in &task.tags {
        spans.push(Span::raw(" ".to_string()));
        spans.push(Span::styled(format!("[{}]", tag), tag_style()));
    }

    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskDraft;
    use chrono::Utc;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_create_task_line() {
        let mut draft = TaskDraft::new("Test task", 90);
        draft.tags = vec!["work".to_string()];
        let task = Task::from_draft(draft.validate().unwrap(), Utc::now());
        let text = line_text(&create_task_line(&task, None));

        assert!(text.contains("TODO"));
        assert!(text.contains("Test task"));
        assert!(text.contains("00:00:00 / 1h 30m"));
        assert!(text.contains("[work]"));
    }

    #[test]
    fn test_create_task_line_uses_live_counters() {
        let task = Task::from_draft(TaskDraft::new("Live", 1), Utc::now());
        let live = LiveCounters {
            elapsed: 75,
            remaining: -15,
        };
        let line = create_task_line(&task, Some(live));
        assert!(line_text(&line).contains("00:01:15 / 1m"));
        assert!(line.spans.iter().any(|s| s.style == over_estimate_style()));
    }
}
