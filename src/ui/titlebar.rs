use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::state::{AppState, Screen};
use crate::timer::format_remaining;

pub fn draw_titlebar(f: &mut Frame, area: Rect, state: &AppState) {
    let title_text = if state.session.active_variant > 0 {
        format!("[ Math Mock Exam — Variant {} ]", state.session.active_variant)
    } else {
        "[ Math Mock Exam ]".to_string()
    };

    let timer_text = match (&state.screen, state.remaining_seconds) {
        (Screen::Working, Some(secs)) => {
            let formatted = format!(" {} remaining ", format_remaining(secs));
            if secs <= 120 {
                Span::styled(
                    formatted,
                    Style::default()
                        .fg(Color::White)
                        .bg(Color::Red)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Span::styled(formatted, Style::default().fg(Color::Rgb(200, 200, 120)))
            }
        }
        (Screen::Results, _) => {
            let label = if state.session.auto_submitted {
                " time expired — auto-submitted "
            } else {
                " submitted "
            };
            Span::styled(label, Style::default().fg(Color::Green))
        }
        _ => Span::raw(""),
    };

    let title_span = Span::styled(
        title_text.clone(),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    );

    // Center the title, keep the timer flush right.
    let available = area.width as usize;
    let title_len = title_text.chars().count();
    let timer_len = timer_text.content.chars().count();
    let center_pad = available.saturating_sub(title_len) / 2;
    let right_pad = available.saturating_sub(center_pad + title_len + timer_len);

    let line = Line::from(vec![
        Span::raw(" ".repeat(center_pad)),
        title_span,
        Span::raw(" ".repeat(right_pad)),
        timer_text,
    ]);

    let widget = Paragraph::new(line)
        .style(Style::default().bg(Color::DarkGray))
        .alignment(Alignment::Left);
    f.render_widget(widget, area);
}
