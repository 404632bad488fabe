use ratatui::{
    prelude::*,
    widgets::{Block, Borders},
};

use super::businesses_screen::business_table;
use crate::session::AdminSession;
use crate::state::{AdminState, InputMode};
use crate::ui::{
    components::{empty_state, filter_input, help_bar, login_form, screen_title},
    layouts, theme,
};

pub fn render(f: &mut Frame, state: &AdminState, session: Option<&AdminSession>) {
    let Some(session) = session else {
        let (title_area, content_area, help_area) = layouts::screen_layout(f.area());
        screen_title::render_screen_title(f, title_area, "Admin", None, &state.loading);
        login_form::render(f, content_area, &state.login);
        help_bar::render_help_bar(f, help_area, help_bar::HELP_TEXT_LOGIN);
        return;
    };

    let (title_area, filter_area, content_area, help_area) =
        layouts::screen_layout_with_filter(f.area());

    let title = format!("Admin ({})", session.email);
    let status = state
        .error
        .as_deref()
        .map(|error| (error, theme::error_style()));
    screen_title::render_screen_title(f, title_area, &title, status, &state.loading);

    filter_input::render_search_input(
        f,
        filter_area,
        &state.search_query,
        state.input_mode == InputMode::Search,
    );

    render_content(f, content_area, state);
    help_bar::render_help_bar(f, help_area, help_bar::HELP_TEXT_ADMIN);
}

fn render_content(f: &mut Frame, area: Rect, state: &AdminState) {
    if state.collection.is_empty() {
        if state.loading.is_loading() {
            empty_state::render_empty_state(f, area, "All businesses", "Loading...", None);
        } else {
            empty_state::render_empty_state(
                f,
                area,
                "All businesses",
                "No businesses yet",
                Some("Press n to add one"),
            );
        }
        return;
    }

    let visible = state.visible();
    if visible.is_empty() {
        empty_state::render_empty_state(f, area, "All businesses", "No businesses match", None);
        return;
    }

    let table = business_table(&visible)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("All businesses ({})", visible.len())),
        )
        .row_highlight_style(theme::selection_style());

    f.render_stateful_widget(table, area, &mut state.table_state.borrow_mut());
}
