use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState};
use ratatui::Frame;

use crate::model::QuestionKind;
use crate::state::{AppState, Screen};

/// Wrap text to fit within `width` columns, breaking at word boundaries.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 || text.is_empty() {
        return vec![text.to_string()];
    }

    let mut result = Vec::new();
    for raw_line in text.split('\n') {
        let mut line = String::new();
        for word in raw_line.split(' ') {
            if line.is_empty() {
                line = word.to_string();
            } else if line.chars().count() + 1 + word.chars().count() <= width {
                line.push(' ');
                line.push_str(word);
            } else {
                result.push(line);
                line = word.to_string();
            }
        }
        result.push(line);
    }
    result
}

pub fn draw_question(f: &mut Frame, area: Rect, state: &AppState) {
    let Some(q) = state.current_question() else {
        return;
    };
    let review = state.screen == Screen::Results;
    let wrap_width = (area.width as usize).saturating_sub(6);

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(
            format!("  Question {} of {}", q.qnum, state.active_rows.len()),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("   {} · {}  [{} pt]", q.topic, q.difficulty, q.score),
            Style::default().fg(Color::DarkGray),
        ),
    ]));
    lines.push(Line::from(""));

    for l in wrap_text(&q.prompt, wrap_width) {
        lines.push(Line::from(format!("  {}", l)));
    }
    lines.push(Line::from(""));

    match q.kind {
        QuestionKind::Mcq => {
            for choice in &q.options {
                let selected = state.is_choice_selected(q.qnum, choice.label);
                let marker = if selected { "(●)" } else { "( )" };
                let style = if selected {
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                let text_width = wrap_width.saturating_sub(8);
                let wrapped = wrap_text(&choice.text, text_width.max(8));
                for (i, part) in wrapped.iter().enumerate() {
                    let line = if i == 0 {
                        Line::from(Span::styled(
                            format!("  {} {}. {}", marker, choice.label, part),
                            style,
                        ))
                    } else {
                        Line::from(Span::styled(format!("         {}", part), style))
                    };
                    lines.push(line);
                }
            }
        }
        QuestionKind::Num => {
            let box_width = wrap_width.clamp(12, 32);
            let shown = if review {
                state.session.answer(q.qnum).unwrap_or("").to_string()
            } else {
                // Cursor marker inside the input box.
                let mut s = state.text_input.clone();
                let at = state.text_cursor.min(s.len());
                s.insert(at, '█');
                s
            };
            let shown: String = shown.chars().take(box_width.saturating_sub(4)).collect();
            lines.push(Line::from(format!("  ┌{}┐", "─".repeat(box_width - 2))));
            lines.push(Line::from(vec![
                Span::raw("  │ "),
                Span::styled(
                    format!("{:<w$}", shown, w = box_width - 4),
                    Style::default().fg(Color::Cyan),
                ),
                Span::raw(" │"),
            ]));
            lines.push(Line::from(format!("  └{}┘", "─".repeat(box_width - 2))));
            lines.push(Line::from(Span::styled(
                "  Decimal answers accept either , or . as the separator.",
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    if review {
        lines.push(Line::from(""));
        if let Some(detail) = state.detail_for(q.qnum) {
            let verdict = if detail.is_correct {
                Span::styled(
                    format!("  ✓ Correct  (+{} pt)", detail.score),
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Span::styled(
                    "  ✗ Wrong  (+0 pt)".to_string(),
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )
            };
            lines.push(Line::from(verdict));

            let expected = match q.tolerance {
                Some(tol) if q.kind == QuestionKind::Num => {
                    format!("  Correct answer: {} (± {})", detail.correct, tol)
                }
                _ => format!("  Correct answer: {}", detail.correct),
            };
            lines.push(Line::from(Span::styled(
                expected,
                Style::default().fg(Color::Yellow),
            )));
        }
        if !q.solution.is_empty() {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "  Solution",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            )));
            for l in wrap_text(&q.solution, wrap_width) {
                lines.push(Line::from(format!("  {}", l)));
            }
        }
    }

    let total_lines = lines.len();
    let visible = area.height as usize;
    let max_scroll = total_lines.saturating_sub(visible);
    let scroll = state.question_scroll.min(max_scroll);

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
