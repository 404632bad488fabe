pub mod components;
pub mod layouts;
pub mod screens;
pub mod theme;

use crate::log_buffer::LogBuffer;
use crate::state::{AppState, InputMode};
use ratatui::Frame;
use screens::*;

/// Pure render dispatcher - routes to appropriate screen renderer
///
/// Application state is never mutated here; components only record where
/// they were drawn so pointer events can be hit-tested afterwards.
pub fn render_app(f: &mut Frame, state: &AppState, log_buffer: &LogBuffer) {
    match state.current_screen() {
        Screen::Businesses(businesses_state) => {
            businesses_screen::render(f, businesses_state);
        }
        Screen::Admin(admin_state) => {
            admin_screen::render(f, admin_state, state.session.as_ref());

            if admin_state.input_mode == InputMode::DeleteConfirmation {
                if let Some(business) = admin_state
                    .delete_confirmation
                    .and_then(|id| admin_state.collection.get(id))
                {
                    components::delete_confirmation::render_delete_confirmation(f, business);
                }
            }
        }
        Screen::Logs(logs_state) => {
            logs_screen::render(f, logs_state, log_buffer);
        }
    }

    if let Some(form) = state.form() {
        components::business_form::render(f, form);
    }

    // Render help popup on top if visible
    if state.help_visible {
        components::help_popup::render_help_popup(f, state.current_screen(), state.is_admin());
    }
}
