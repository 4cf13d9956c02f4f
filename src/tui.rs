use std::fs;
use std::io;
use std::time::Duration;

use chrono::Utc;
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::CrosstermBackend;
use ratatui::Terminal;

use crate::model::QuestionKind;
use crate::report;
use crate::session::SessionStatus;
use crate::state::*;

pub fn run_tui(mut state: AppState) -> Result<(), String> {
    enable_raw_mode().map_err(|e| format!("Cannot enable raw mode: {}", e))?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)
        .map_err(|e| format!("Cannot enter alternate screen: {}", e))?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal =
        Terminal::new(backend).map_err(|e| format!("Cannot create terminal: {}", e))?;

    let result = main_loop(&mut terminal, &mut state);

    // Restore terminal
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();

    result
}

fn main_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
) -> Result<(), String> {
    loop {
        // The countdown has no thread of its own: every pass re-derives the
        // remaining time and converts an expired clock into a submission.
        check_expiry(state, Utc::now());

        terminal
            .draw(|f| crate::ui::draw(f, state))
            .map_err(|e| format!("Draw error: {}", e))?;

        if state.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(100)).map_err(|e| format!("Poll error: {}", e))? {
            if let Event::Key(key) = event::read().map_err(|e| format!("Read error: {}", e))? {
                handle_key(key, state)?;
            }
        }
    }

    Ok(())
}

fn check_expiry(state: &mut AppState, now: chrono::DateTime<Utc>) {
    if state.screen != Screen::Working || state.session.submitted {
        return;
    }
    state.remaining_seconds = Some(state.session.remaining_secs(now));
    if state.session.status(now) == SessionStatus::Submitted {
        state.save_current_text_input();
        state.session.tick(now);
        state.finalize_submit(now);
        // Any confirm dialog left open belongs to the expired exam.
        state.dialog_stack.clear();
        state.push_dialog(Dialog::TimeUp);
    }
}

fn handle_key(key: KeyEvent, state: &mut AppState) -> Result<(), String> {
    if state.has_dialog() {
        return handle_dialog_key(key, state);
    }

    match state.screen {
        Screen::VariantSelect => handle_variant_key(key, state),
        Screen::Working => handle_working_key(key, state),
        Screen::Results => handle_results_key(key, state),
    }
}

fn handle_variant_key(key: KeyEvent, state: &mut AppState) -> Result<(), String> {
    match key.code {
        KeyCode::Up => {
            state.variant_cursor = state.variant_cursor.saturating_sub(1);
        }
        KeyCode::Down => {
            if state.variant_cursor + 1 < state.variants.len() {
                state.variant_cursor += 1;
            }
        }
        KeyCode::Enter => {
            state.start_selected_variant(Utc::now());
        }
        KeyCode::Char('?') => {
            state.push_dialog(Dialog::Help);
        }
        KeyCode::Char('q') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            state.should_quit = true;
        }
        _ => {}
    }
    Ok(())
}

fn handle_working_key(key: KeyEvent, state: &mut AppState) -> Result<(), String> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('q') => {
                state.push_dialog(Dialog::ConfirmQuit);
            }
            KeyCode::Char('s') => {
                state.save_current_text_input();
                state.push_dialog(Dialog::ConfirmSubmit);
            }
            KeyCode::Char('r') => {
                state.push_dialog(Dialog::ConfirmRestart);
            }
            _ => {}
        }
        return Ok(());
    }

    let numeric = state
        .current_question()
        .map(|q| q.kind == QuestionKind::Num)
        .unwrap_or(false);

    if numeric {
        handle_numeric_key(key, state);
    } else {
        handle_choice_key(key, state);
    }
    Ok(())
}

fn handle_choice_key(key: KeyEvent, state: &mut AppState) {
    match key.code {
        KeyCode::Up | KeyCode::Left => navigate_prev(state),
        KeyCode::Down | KeyCode::Right => navigate_next(state),
        KeyCode::Char('?') => {
            state.push_dialog(Dialog::Help);
        }
        KeyCode::Char(c) if c.is_ascii_alphabetic() => {
            let idx = (c.to_ascii_lowercase() as u8 - b'a') as usize;
            let count = state
                .current_question()
                .map(|q| q.options.len())
                .unwrap_or(0);
            if idx < count {
                state.select_choice(idx);
            }
        }
        _ => handle_page_keys(key, state),
    }
}

fn handle_numeric_key(key: KeyEvent, state: &mut AppState) {
    match key.code {
        // Digits, decimal separators and a sign make up a numeric answer.
        KeyCode::Char(c) if c.is_ascii_digit() || matches!(c, '.' | ',' | '-' | '+') => {
            state.text_input.insert(state.text_cursor, c);
            state.text_cursor += 1;
        }
        KeyCode::Backspace => {
            if state.text_cursor > 0 {
                state.text_cursor -= 1;
                state.text_input.remove(state.text_cursor);
            }
        }
        KeyCode::Delete => {
            if state.text_cursor < state.text_input.len() {
                state.text_input.remove(state.text_cursor);
            }
        }
        KeyCode::Left => {
            state.text_cursor = state.text_cursor.saturating_sub(1);
        }
        KeyCode::Right => {
            if state.text_cursor < state.text_input.len() {
                state.text_cursor += 1;
            }
        }
        KeyCode::Home => {
            state.text_cursor = 0;
        }
        KeyCode::End => {
            state.text_cursor = state.text_input.len();
        }
        KeyCode::Enter | KeyCode::Down => {
            state.save_current_text_input();
            navigate_next(state);
        }
        KeyCode::Up => {
            state.save_current_text_input();
            navigate_prev(state);
        }
        KeyCode::Char('?') => {
            state.push_dialog(Dialog::Help);
        }
        KeyCode::PageUp | KeyCode::PageDown => handle_page_keys(key, state),
        _ => {}
    }
}

fn handle_results_key(key: KeyEvent, state: &mut AppState) -> Result<(), String> {
    match key.code {
        KeyCode::Char('v') => {
            state.review_mode = !state.review_mode;
            state.question_scroll = 0;
        }
        KeyCode::Char('c') => {
            let notice = match export_results_csv(state) {
                Ok(name) => format!("Results saved to {}", name),
                Err(e) => e,
            };
            state.push_dialog(Dialog::Notice(notice));
        }
        KeyCode::Char('p') => {
            let notice = match export_report(state) {
                Ok(name) => format!("Report saved to {}", name),
                Err(e) => e,
            };
            state.push_dialog(Dialog::Notice(notice));
        }
        KeyCode::Char('r') => {
            state.push_dialog(Dialog::ConfirmRestart);
        }
        KeyCode::Char('q') | KeyCode::Char('Q') => {
            state.should_quit = true;
        }
        KeyCode::Char('?') => {
            state.push_dialog(Dialog::Help);
        }
        KeyCode::Up => {
            if state.review_mode {
                navigate_prev(state);
            } else {
                state.result_scroll = state.result_scroll.saturating_sub(1);
            }
        }
        KeyCode::Down => {
            if state.review_mode {
                navigate_next(state);
            } else {
                state.result_scroll += 1;
            }
        }
        KeyCode::PageUp | KeyCode::PageDown | KeyCode::Home | KeyCode::End => {
            if state.review_mode {
                handle_page_keys(key, state);
            }
        }
        _ => {}
    }
    Ok(())
}

fn handle_page_keys(key: KeyEvent, state: &mut AppState) {
    let total = state.active_rows.len();
    match key.code {
        KeyCode::PageUp => {
            let new_idx = state.current_question.saturating_sub(5);
            state.navigate_to(new_idx);
        }
        KeyCode::PageDown => {
            let new_idx = (state.current_question + 5).min(total.saturating_sub(1));
            state.navigate_to(new_idx);
        }
        KeyCode::Home => {
            state.navigate_to(0);
        }
        KeyCode::End => {
            if total > 0 {
                state.navigate_to(total - 1);
            }
        }
        _ => {}
    }
}

fn navigate_prev(state: &mut AppState) {
    if state.current_question > 0 {
        state.navigate_to(state.current_question - 1);
    }
}

fn navigate_next(state: &mut AppState) {
    if state.current_question + 1 < state.active_rows.len() {
        state.navigate_to(state.current_question + 1);
    }
}

fn handle_dialog_key(key: KeyEvent, state: &mut AppState) -> Result<(), String> {
    let dialog = state.top_dialog().cloned();
    match dialog {
        Some(Dialog::ConfirmSubmit) => match key.code {
            KeyCode::Enter => {
                state.pop_dialog();
                state.finalize_submit(Utc::now());
            }
            KeyCode::Esc => {
                state.pop_dialog();
            }
            _ => {}
        },
        Some(Dialog::ConfirmQuit) => match key.code {
            KeyCode::Enter => {
                state.pop_dialog();
                state.should_quit = true;
            }
            KeyCode::Esc => {
                state.pop_dialog();
            }
            _ => {}
        },
        Some(Dialog::ConfirmRestart) => match key.code {
            KeyCode::Enter => {
                state.pop_dialog();
                state.screen = Screen::VariantSelect;
                state.remaining_seconds = None;
                state.review_mode = false;
            }
            KeyCode::Esc => {
                state.pop_dialog();
            }
            _ => {}
        },
        Some(Dialog::TimeUp) | Some(Dialog::Notice(_)) => match key.code {
            KeyCode::Enter | KeyCode::Esc => {
                state.pop_dialog();
            }
            _ => {}
        },
        Some(Dialog::Help) => match key.code {
            KeyCode::Esc | KeyCode::Char('?') => {
                state.pop_dialog();
            }
            _ => {}
        },
        None => {}
    }
    Ok(())
}

fn export_results_csv(state: &AppState) -> Result<String, String> {
    let outcome = state
        .outcome
        .as_ref()
        .ok_or_else(|| "Nothing to export yet".to_string())?;
    let bytes = report::results_csv_bytes(&state.student, &state.timestamp(), &outcome.details)?;
    let name = format!("result_variant{}.csv", state.session.active_variant);
    let path = state.out_dir.join(&name);
    fs::write(&path, bytes).map_err(|e| format!("Cannot write {}: {}", path.display(), e))?;
    Ok(name)
}

fn export_report(state: &AppState) -> Result<String, String> {
    let outcome = state
        .outcome
        .as_ref()
        .ok_or_else(|| "Nothing to export yet".to_string())?;
    let summary = report::build_summary(outcome, state.topics.clone(), state.elapsed_secs);
    let text = report::render_report(
        &state.student,
        state.session.active_variant,
        &state.timestamp(),
        &summary,
        &outcome.details,
    );
    let name = format!("report_variant{}.txt", state.session.active_variant);
    let path = state.out_dir.join(&name);
    fs::write(&path, text).map_err(|e| format!("Cannot write {}: {}", path.display(), e))?;
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use chrono::Duration as ChronoDuration;

    use crate::demo::{generate_demo_bank, DEFAULT_SEED};
    use crate::report::StudentInfo;

    fn new_state() -> AppState {
        AppState::new(
            generate_demo_bank(DEFAULT_SEED),
            StudentInfo {
                username: "student".to_string(),
                classroom: "12A".to_string(),
            },
            PathBuf::from("."),
        )
    }

    #[test]
    fn expiry_replaces_open_dialogs_with_time_up() {
        let mut state = new_state();
        state.start_selected_variant(Utc::now() - ChronoDuration::minutes(101));
        state.push_dialog(Dialog::ConfirmSubmit);

        check_expiry(&mut state, Utc::now());

        assert_eq!(state.screen, Screen::Results);
        assert_eq!(state.dialog_stack, vec![Dialog::TimeUp]);
        assert!(state.session.auto_submitted);
        let first_finish = state.finished_at;

        // A later pass must not re-grade or move the finish timestamp.
        check_expiry(&mut state, Utc::now());
        assert_eq!(state.dialog_stack, vec![Dialog::TimeUp]);
        assert_eq!(state.finished_at, first_finish);
    }

    #[test]
    fn expiry_leaves_a_running_exam_alone() {
        let mut state = new_state();
        state.start_selected_variant(Utc::now());
        check_expiry(&mut state, Utc::now());
        assert_eq!(state.screen, Screen::Working);
        assert!(state.dialog_stack.is_empty());
        assert!(!state.session.submitted);
    }
}
