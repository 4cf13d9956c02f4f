use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::model::{EXAM_DURATION_MIN, TOTAL_QUESTIONS};
use crate::state::AppState;

pub fn draw_variant_select(f: &mut Frame, area: Rect, state: &AppState) {
    let mut lines: Vec<Line> = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Math Mock Exam",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!(
            "{} questions · {} minutes · auto-submit on expiry",
            TOTAL_QUESTIONS, EXAM_DURATION_MIN
        )),
        Line::from(format!(
            "Student: {}    Class: {}",
            state.student.username, state.student.classroom
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Pick a variant",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    for (i, &variant) in state.variants.iter().enumerate() {
        let count = state.bank.variant_len(variant);
        let is_current = i == state.variant_cursor;
        let cursor = if is_current { "▸ " } else { "  " };
        let style = if is_current {
            Style::default()
                .fg(Color::White)
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let warn = if count < TOTAL_QUESTIONS {
            format!("  ⚠ only {} questions", count)
        } else {
            String::new()
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{}Variant {}", cursor, variant), style),
            Span::styled(warn, Style::default().fg(Color::Yellow)),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Before you start: pen and paper ready, calculator allowed,",
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(Span::styled(
        "the countdown cannot be paused once a variant begins.",
        Style::default().fg(Color::DarkGray),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("[Enter]", Style::default().fg(Color::Green)),
        Span::raw(" Start    "),
        Span::styled("[Ctrl+Q]", Style::default().fg(Color::DarkGray)),
        Span::raw(" Quit"),
    ]));

    let block = Block::default().borders(Borders::ALL);
    let widget = Paragraph::new(lines)
        .block(block)
        .alignment(ratatui::layout::Alignment::Center);
    f.render_widget(widget, area);
}
