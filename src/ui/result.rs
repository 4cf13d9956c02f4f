use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState};
use ratatui::Frame;

use crate::state::AppState;
use crate::timer::split_minutes;

pub fn draw_summary(f: &mut Frame, area: Rect, state: &AppState) {
    let Some(outcome) = state.outcome.as_ref() else {
        return;
    };

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(""));

    if state.session.auto_submitted {
        lines.push(Line::from(Span::styled(
            "  ⏰ Time expired — the exam was submitted automatically.",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(vec![
        Span::styled(
            format!("  Score: {} / {}", outcome.total, outcome.max_total),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  ({}%)", outcome.percent()),
            Style::default().fg(Color::Green),
        ),
    ]));
    lines.push(Line::from(format!(
        "  Correct: {}    Wrong: {}",
        outcome.correct_count(),
        outcome.wrong_count()
    )));

    let (min, sec) = split_minutes(state.elapsed_secs);
    lines.push(Line::from(format!("  Time spent: {} min {} sec", min, sec)));
    lines.push(Line::from(""));

    if !state.topics.is_empty() {
        lines.push(Line::from(Span::styled(
            "  By topic",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(
            format!(
                "  {:<28} {:>8} {:>8} {:>8}",
                "Topic", "Correct", "Total", "Score"
            ),
            Style::default().fg(Color::DarkGray),
        )));
        for t in &state.topics {
            lines.push(Line::from(format!(
                "  {:<28} {:>8} {:>8} {:>8}",
                t.topic, t.correct, t.total, t.score
            )));
        }
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        "  Weakest topics first: revisit anything below 70%.",
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("  v", Style::default().fg(Color::Cyan)),
        Span::raw(" review answers    "),
        Span::styled("c", Style::default().fg(Color::Cyan)),
        Span::raw(" save CSV    "),
        Span::styled("p", Style::default().fg(Color::Cyan)),
        Span::raw(" save report"),
    ]));

    let total_lines = lines.len();
    let visible = area.height as usize;
    let max_scroll = total_lines.saturating_sub(visible);
    let scroll = state.result_scroll.min(max_scroll);

    let visible_lines: Vec<Line> = lines.into_iter().skip(scroll).collect();
    let widget = Paragraph::new(visible_lines);
    f.render_widget(widget, area);

    if total_lines > visible {
        let mut scrollbar_state = ScrollbarState::new(max_scroll)
            .position(scroll)
            .viewport_content_length(visible);
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight);
        f.render_stateful_widget(scrollbar, area, &mut scrollbar_state);
    }
}
