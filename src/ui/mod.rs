pub mod dialog;
pub mod keybar;
pub mod layout;
pub mod question;
pub mod result;
pub mod sidebar;
pub mod titlebar;
pub mod variant;

use ratatui::Frame;

use crate::state::{AppState, Screen};

pub fn draw(f: &mut Frame, state: &AppState) {
    let area = f.area();

    match state.screen {
        Screen::VariantSelect => {
            variant::draw_variant_select(f, area, state);
        }
        Screen::Working => {
            draw_working(f, area, state);
        }
        Screen::Results => {
            draw_results(f, area, state);
        }
    }

    if state.has_dialog() {
        dialog::draw_dialog(f, area, state);
    }
}

fn draw_working(f: &mut Frame, area: ratatui::layout::Rect, state: &AppState) {
    let layout = layout::compute_layout(area);

    titlebar::draw_titlebar(f, layout.titlebar, state);
    sidebar::draw_sidebar(f, layout.sidebar, state);
    question::draw_question(f, layout.main, state);
    keybar::draw_keybar(f, layout.keybar, state);
}

fn draw_results(f: &mut Frame, area: ratatui::layout::Rect, state: &AppState) {
    let layout = layout::compute_layout(area);

    titlebar::draw_titlebar(f, layout.titlebar, state);
    sidebar::draw_sidebar(f, layout.sidebar, state);
    if state.review_mode {
        question::draw_question(f, layout.main, state);
    } else {
        result::draw_summary(f, layout.main, state);
    }
    keybar::draw_keybar(f, layout.keybar, state);
}
