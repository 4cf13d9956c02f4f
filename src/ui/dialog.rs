use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::state::{AppState, Dialog};

pub fn draw_dialog(f: &mut Frame, area: Rect, state: &AppState) {
    let Some(dialog) = state.top_dialog() else {
        return;
    };

    match dialog {
        Dialog::ConfirmSubmit => draw_confirm_submit(f, area, state),
        Dialog::ConfirmQuit => draw_confirm_quit(f, area),
        Dialog::ConfirmRestart => draw_confirm_restart(f, area),
        Dialog::TimeUp => draw_time_up(f, area),
        Dialog::Help => draw_help(f, area),
        Dialog::Notice(msg) => draw_notice(f, area, msg),
    }
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}

fn draw_confirm_submit(f: &mut Frame, area: Rect, state: &AppState) {
    let unanswered = state.active_rows.len().saturating_sub(state.answered_count());

    let mut lines: Vec<Line> = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Submit this variant?",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];

    if unanswered > 0 {
        lines.push(Line::from(format!(
            "   {} questions are not answered.",
            unanswered
        )));
        lines.push(Line::from(""));
    }

    lines.push(Line::from(vec![
        Span::styled("   [Enter] Confirm", Style::default().fg(Color::Green)),
        Span::raw("    "),
        Span::styled("[Esc] Cancel", Style::default().fg(Color::DarkGray)),
    ]));
    lines.push(Line::from(""));

    render_box(f, area, lines, 42, Color::Yellow, None);
}

fn draw_confirm_quit(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Quit?",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("   The current exam will be discarded."),
        Line::from(""),
        Line::from(vec![
            Span::styled("   [Enter] Confirm", Style::default().fg(Color::Green)),
            Span::raw("    "),
            Span::styled("[Esc] Cancel", Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(""),
    ];

    render_box(f, area, lines, 42, Color::Yellow, None);
}

fn draw_confirm_restart(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Start over?",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("   Answers and the timer are reset, and"),
        Line::from("   you return to variant selection."),
        Line::from(""),
        Line::from(vec![
            Span::styled("   [Enter] Confirm", Style::default().fg(Color::Green)),
            Span::raw("    "),
            Span::styled("[Esc] Cancel", Style::default().fg(Color::DarkGray)),
        ]),
        Line::from(""),
    ];

    render_box(f, area, lines, 44, Color::Yellow, None);
}

fn draw_time_up(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   ⏰  TIME IS UP",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("   The 100 minutes have expired and your"),
        Line::from("   answers were submitted automatically."),
        Line::from(""),
        Line::from(Span::styled(
            "          [Enter] See results",
            Style::default().fg(Color::Green),
        )),
        Line::from(""),
    ];

    render_box(f, area, lines, 44, Color::Red, None);
}

fn draw_notice(f: &mut Frame, area: Rect, msg: &str) {
    let lines = vec![
        Line::from(""),
        Line::from(format!("   {}", msg)),
        Line::from(""),
        Line::from(Span::styled(
            "          [Enter] OK",
            Style::default().fg(Color::Green),
        )),
        Line::from(""),
    ];

    let width = (msg.chars().count() as u16 + 8).clamp(30, area.width);
    render_box(f, area, lines, width, Color::Cyan, None);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "   Key Bindings",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("   arrows     Previous/Next question"),
        Line::from("   PgUp/PgDn  Jump 5 questions"),
        Line::from("   Home/End   First/Last question"),
        Line::from("   a-d        Pick a choice"),
        Line::from("   0-9 . , -  Type a numeric answer"),
        Line::from("   Ctrl+S     Submit the variant"),
        Line::from("   Ctrl+R     Restart (back to variants)"),
        Line::from("   Ctrl+Q     Quit"),
        Line::from("   v          Review answers (results)"),
        Line::from("   c / p      Save CSV / text report"),
        Line::from("   ?          This help"),
        Line::from("   Esc        Close dialog"),
        Line::from(""),
        Line::from(Span::styled(
            "        [Esc] Close",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];

    render_box(f, area, lines, 46, Color::Cyan, Some(" Help "));
}

fn render_box(
    f: &mut Frame,
    area: Rect,
    lines: Vec<Line>,
    width: u16,
    border: Color,
    title: Option<&str>,
) {
    let rect = centered_rect(width, lines.len() as u16 + 2, area);
    f.render_widget(Clear, rect);
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));
    if let Some(t) = title {
        block = block.title(t);
    }
    let widget = Paragraph::new(lines).block(block);
    f.render_widget(widget, rect);
}
