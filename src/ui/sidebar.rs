use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState};
use ratatui::Frame;

use crate::state::{AppState, Screen};

const STATUS_ROWS: usize = 3; // 1 separator + 2 count lines

/// First visible list index that keeps the current question in view.
fn scroll_offset(current: usize, question_height: usize) -> usize {
    if question_height == 0 || current < question_height {
        0
    } else {
        current + 1 - question_height
    }
}

pub fn draw_sidebar(f: &mut Frame, area: Rect, state: &AppState) {
    let mut lines: Vec<Line> = Vec::new();

    let inner_height = area.height.saturating_sub(2) as usize;
    let inner_width = area.width.saturating_sub(1) as usize; // -1 for right border
    let question_height = inner_height.saturating_sub(STATUS_ROWS);
    let current = state.current_question;
    let total = state.active_rows.len();
    let review = state.screen == Screen::Results;

    let scroll_offset = scroll_offset(current, question_height);

    let topic_max_len = (area.width as usize).saturating_sub(10);

    for (qi, q) in state.active_rows.iter().enumerate().skip(scroll_offset) {
        if lines.len() >= question_height {
            break;
        }

        let (icon, color) = if review {
            match state.detail_for(q.qnum).map(|d| d.is_correct) {
                Some(true) => ("✓", Color::Green),
                _ => ("✗", Color::Red),
            }
        } else if state.is_answered(q.qnum) {
            ("●", Color::LightBlue)
        } else {
            ("○", Color::DarkGray)
        };

        let is_current = qi == current && (review && state.review_mode || !review);
        let style = if is_current {
            Style::default()
                .fg(Color::White)
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        let topic: String = q.topic.chars().take(topic_max_len).collect();

        lines.push(Line::from(vec![
            Span::styled(if is_current { " ▸ " } else { "   " }.to_string(), style),
            Span::styled(
                format!("{} ", icon),
                Style::default().fg(color).bg(if is_current {
                    Color::DarkGray
                } else {
                    Color::Reset
                }),
            ),
            Span::styled(format!("{:>2}. ", q.qnum), style),
            Span::styled(topic, style),
        ]));
    }

    while lines.len() < question_height {
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        "─".repeat(inner_width),
        Style::default().fg(Color::DarkGray),
    )));

    if review {
        let (correct, wrong) = state
            .outcome
            .as_ref()
            .map(|o| (o.correct_count(), o.wrong_count()))
            .unwrap_or((0, 0));
        lines.push(Line::from(Span::styled(
            format!("  ✓ {:>2} correct", correct),
            Style::default().fg(Color::Green),
        )));
        lines.push(Line::from(Span::styled(
            format!("  ✗ {:>2} wrong", wrong),
            Style::default().fg(Color::Red),
        )));
    } else {
        let answered = state.answered_count();
        lines.push(Line::from(Span::styled(
            format!("  ● {:>2} answered", answered),
            Style::default().fg(Color::LightBlue),
        )));
        lines.push(Line::from(Span::styled(
            format!("  ○ {:>2} unanswered", total.saturating_sub(answered)),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let block = Block::default()
        .borders(Borders::RIGHT)
        .title(format!(" {} Questions ", total))
        .title_style(Style::default().add_modifier(Modifier::BOLD));

    let widget = Paragraph::new(lines).block(block);
    f.render_widget(widget, area);

    if total > question_height {
        let scrollbar_area = Rect {
            x: area.x,
            y: area.y + 1,
            width: area.width,
            height: question_height as u16,
        };
        let mut scrollbar_state = ScrollbarState::new(total.saturating_sub(1))
            .position(current)
            .viewport_content_length(3);
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight);
        f.render_stateful_widget(scrollbar, scrollbar_area, &mut scrollbar_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_tracks_the_current_question() {
        // Everything fits: no scrolling.
        assert_eq!(scroll_offset(0, 10), 0);
        assert_eq!(scroll_offset(9, 10), 0);
        // Past the viewport: the current row becomes the last visible one.
        assert_eq!(scroll_offset(10, 10), 1);
        assert_eq!(scroll_offset(39, 10), 30);
        // Degenerate viewport.
        assert_eq!(scroll_offset(5, 0), 0);
    }
}
