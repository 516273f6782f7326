use crate::app::AppState;
use crate::clock::Clock;
use crate::domain::format_hms;
use crate::report::TaskStats;
use crate::ui::styles::{border_style, done_style, over_estimate_style, title_style};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render totals over the whole store
pub fn render_stats_pane<C: Clock>(f: &mut Frame, app: &AppState<C>, area: Rect) {
    let stats = app.controller.stats();
    let notifications = if app.controller.notifications_enabled() {
        "on"
    } else {
        "off"
    };

    let mut lines = stats_lines(&stats);
    lines.push(Line::from(vec![
        Span::styled("Alerts:    ", title_style()),
        Span::raw(notifications),
    ]));

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style())
            .title(Span::styled(" Stats ", title_style())),
    );
    f.render_widget(paragraph, area);
}

fn stats_lines(stats: &TaskStats) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Tasks:     ", title_style()),
            Span::raw(format!("{} total", stats.total_tasks)),
        ]),
        Line::from(vec![
            Span::styled("Completed: ", title_style()),
            Span::styled(
                format!("{} ({}%)", stats.completed_tasks, stats.completion_rate()),
                done_style(),
            ),
        ]),
        Line::from(vec![
            Span::styled("Planned:   ", title_style()),
            Span::raw(format_hms(stats.total_estimated_minutes * 60)),
        ]),
        Line::from(vec![
            Span::styled("Spent:     ", title_style()),
            Span::raw(format_hms(stats.total_active_secs)),
        ]),
        Line::from(vec![
            Span::styled("Breaks:    ", title_style()),
            Span::raw(format_hms(stats.total_break_secs)),
        ]),
    ];

    if stats.over_estimate_tasks > 0 {
        lines.push(Line::from(vec![
            Span::styled("Over est:  ", title_style()),
            Span::styled(format!("{} task(s)", stats.over_estimate_tasks), over_estimate_style()),
        ]));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_lines() {
        let stats = TaskStats {
            total_tasks: 4,
            completed_tasks: 1,
            total_estimated_minutes: 90,
            total_active_secs: 3725,
            total_break_secs: 85,
            over_estimate_tasks: 0,
        };
        let lines = stats_lines(&stats);
        let text: Vec<String> = lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();

        assert_eq!(lines.len(), 5);
        assert_eq!(text[1], "Completed: 1 (25%)");
        assert_eq!(text[2], "Planned:   01:30:00");
        assert_eq!(text[3], "Spent:     01:02:05");
        assert_eq!(text[4], "Breaks:    00:01:25");
    }

    #[test]
    fn test_over_estimate_line_only_when_needed() {
        let stats = TaskStats {
            over_estimate_tasks: 2,
            ..TaskStats::default()
        };
        assert_eq!(stats_lines(&stats).len(), 6);
    }
}
