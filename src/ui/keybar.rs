use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::model::QuestionKind;
use crate::state::{AppState, Screen};

pub fn draw_keybar(f: &mut Frame, area: Rect, state: &AppState) {
    let bindings: Vec<(&str, &str)> = match state.screen {
        Screen::VariantSelect => vec![
            ("↑/↓", "variant"),
            ("Enter", "start"),
            ("?", "help"),
            ("Ctrl+Q", "quit"),
        ],
        Screen::Working => {
            let numeric = state
                .current_question()
                .map(|q| q.kind == QuestionKind::Num)
                .unwrap_or(false);
            if numeric {
                vec![
                    ("0-9 . ,", "answer"),
                    ("←/→", "cursor"),
                    ("↑/↓", "prev/next"),
                    ("PgUp/PgDn", "jump 5"),
                    ("Ctrl+S", "submit"),
                    ("Ctrl+R", "restart"),
                    ("Ctrl+Q", "quit"),
                ]
            } else {
                vec![
                    ("a-d", "answer"),
                    ("arrows", "prev/next"),
                    ("PgUp/PgDn", "jump 5"),
                    ("Home/End", "first/last"),
                    ("Ctrl+S", "submit"),
                    ("Ctrl+R", "restart"),
                    ("Ctrl+Q", "quit"),
                ]
            }
        }
        Screen::Results => {
            if state.review_mode {
                vec![
                    ("↑/↓", "prev/next"),
                    ("v", "summary"),
                    ("c", "save CSV"),
                    ("p", "save report"),
                    ("r", "restart"),
                    ("q", "quit"),
                ]
            } else {
                vec![
                    ("↑/↓", "scroll"),
                    ("v", "review answers"),
                    ("c", "save CSV"),
                    ("p", "save report"),
                    ("r", "restart"),
                    ("q", "quit"),
                ]
            }
        }
    };

    let mut spans: Vec<Span> = vec![Span::raw(" ")];
    for (i, (key, action)) in bindings.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("   "));
        }
        spans.push(Span::styled(
            key.to_string(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!(" {}", action)));
    }

    let line = Line::from(spans);
    let widget = Paragraph::new(line).style(Style::default().bg(Color::Rgb(20, 20, 20)));
    f.render_widget(widget, area);
}
