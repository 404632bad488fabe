use crate::events::AppCommand;
use crate::input::{Key, KeyEvent, PointerEvent, PointerKind};
use crate::state::autocomplete::SuggestionField;
use crate::state::form::{BusinessFormState, FormField};
use crate::state::*;
use crate::ui::screens::Screen;

/// Map user input (KeyEvent) to AppCommand based on current UI state
/// Returns None if the key should be ignored
pub fn handle_key_input(event: KeyEvent, state: &AppState) -> Option<AppCommand> {
    let key = event.key;

    // Priority 1: Business form (highest priority)
    if let Some(form) = state.form() {
        return handle_business_form_keys(event, form);
    }

    // Priority 2: Delete confirmation popup
    if let Screen::Admin(admin_state) = state.current_screen() {
        if admin_state.input_mode == InputMode::DeleteConfirmation {
            return handle_delete_confirmation_keys(key, admin_state);
        }
    }

    // Priority 3: Login form while no admin session exists
    if let Screen::Admin(_) = state.current_screen() {
        if !state.is_admin() {
            return handle_login_keys(key);
        }
    }

    // Priority 4: Text entry modes on list screens
    match state.current_screen().input_mode() {
        InputMode::Search => {
            return match key {
                Key::Enter => Some(AppCommand::ExitSearchMode),
                Key::Backspace => Some(AppCommand::DeleteSearchChar),
                Key::Char(c) => Some(AppCommand::AppendSearchChar(c)),
                Key::Esc => Some(AppCommand::ClearSearch),
                _ => None,
            };
        }
        InputMode::CategoryFilter => return handle_category_filter_keys(key),
        _ => {}
    }

    // Priority 5: Check if we're currently showing the help popup
    // This must come before screen-specific Esc handling so help popup takes precedence
    if state.help_visible {
        return match key {
            Key::Char('?') | Key::Esc => Some(AppCommand::ToggleHelp),
            Key::Char('q') => Some(AppCommand::Quit),
            _ => None,
        };
    }

    // Priority 6: Screen-specific Esc handling (clear search when not typing)
    match state.current_screen() {
        Screen::Businesses(_) | Screen::Admin(_) if matches!(key, Key::Esc) => {
            return Some(AppCommand::ClearSearch);
        }
        _ => {}
    }

    // Handle multi-key sequences
    if let Some(pending) = state.pending_key {
        return match (pending, key) {
            // 'g' followed by 'g' -> navigate to top of table
            ('g', Key::Char('g')) => Some(AppCommand::NavigateToTop),
            // 'g' followed by 'l' -> go to logs
            ('g', Key::Char('l')) => Some(AppCommand::NavigateToLogs),
            // 'g' followed by 'a' -> go to admin
            ('g', Key::Char('a')) => Some(AppCommand::OpenAdmin),
            // Any other key clears the pending key
            _ => Some(AppCommand::ClearPendingKey),
        };
    }

    match (state.current_screen(), key) {
        // Global help toggle
        (_, Key::Char('?')) => Some(AppCommand::ToggleHelp),

        // Global quit command
        (_, Key::Char('q')) => Some(AppCommand::Quit),

        // Multi-key sequence initiator: 'g' sets pending key
        (_, Key::Char('g')) => Some(AppCommand::SetPendingKey('g')),

        // Navigate to bottom: 'G' (Shift+g)
        (_, Key::Char('G')) => Some(AppCommand::NavigateToBottom),

        // Global back navigation (left/h)
        (_, Key::Left | Key::Char('h')) => Some(AppCommand::NavigateBack),

        // Public directory
        (Screen::Businesses(..), Key::Char('/')) => Some(AppCommand::EnterSearchMode),
        (Screen::Businesses(..), Key::Char('f')) => Some(AppCommand::OpenCategoryFilter),
        (Screen::Businesses(..), Key::Char('n')) => Some(AppCommand::OpenBusinessForm),
        (Screen::Businesses(..), Key::Char('a')) => Some(AppCommand::OpenAdmin),
        (Screen::Businesses(..), Key::Char('r')) => Some(AppCommand::LoadBusinesses),
        (Screen::Businesses(..), Key::Up | Key::Char('k')) => Some(AppCommand::SelectPrevious),
        (Screen::Businesses(..), Key::Down | Key::Char('j')) => Some(AppCommand::SelectNext),

        // Admin dashboard (logged in)
        (Screen::Admin(..), Key::Char('/')) => Some(AppCommand::EnterSearchMode),
        (Screen::Admin(..), Key::Char('n')) => Some(AppCommand::OpenBusinessForm),
        (Screen::Admin(admin_state), Key::Char('e') | Key::Enter) => admin_state
            .selected_business()
            .map(|business| AppCommand::EditBusiness {
                business_id: business.id,
            }),
        (Screen::Admin(admin_state), Key::Char('d')) => admin_state
            .selected_business()
            .map(|business| AppCommand::InitiateDelete {
                business_id: business.id,
            }),
        (Screen::Admin(..), Key::Char('L')) => Some(AppCommand::Logout),
        (Screen::Admin(..), Key::Char('r')) => Some(AppCommand::LoadBusinesses),
        (Screen::Admin(..), Key::Up | Key::Char('k')) => Some(AppCommand::SelectPrevious),
        (Screen::Admin(..), Key::Down | Key::Char('j')) => Some(AppCommand::SelectNext),

        // Logs screen
        (Screen::Logs(..), Key::Up | Key::Char('k')) => Some(AppCommand::ScrollLogsUp),
        (Screen::Logs(..), Key::Down | Key::Char('j')) => Some(AppCommand::ScrollLogsDown),
        (Screen::Logs(..), Key::PageUp) => Some(AppCommand::ScrollLogsPageUp),
        (Screen::Logs(..), Key::PageDown) => Some(AppCommand::ScrollLogsPageDown),
        (Screen::Logs(..), Key::Char('t')) => Some(AppCommand::ScrollLogsToTop),
        (Screen::Logs(..), Key::Char('b')) => Some(AppCommand::ScrollLogsToBottom),

        _ => None,
    }
}

fn handle_business_form_keys(event: KeyEvent, form: &BusinessFormState) -> Option<AppCommand> {
    let key = event.key;

    // Ctrl+L to clear current field
    if event.modifiers.ctrl && matches!(key, Key::Char('l')) {
        return Some(AppCommand::ClearFormField);
    }

    let suggestions_open = form
        .focused_autocomplete()
        .is_some_and(|autocomplete| autocomplete.is_open());

    match key {
        // Escape closes the suggestion list first, then the form
        Key::Esc => match form.focus.suggestion_field() {
            Some(field) if suggestions_open => Some(AppCommand::CloseSuggestions { field }),
            _ => Some(AppCommand::CloseBusinessForm),
        },

        Key::Tab => Some(AppCommand::NavigateFormField { forward: true }),
        Key::BackTab => Some(AppCommand::NavigateFormField { forward: false }),

        Key::Backspace => Some(AppCommand::DeleteFormChar),

        Key::Up if suggestions_open => Some(AppCommand::MoveSuggestionHighlight { up: true }),
        Key::Down if suggestions_open => Some(AppCommand::MoveSuggestionHighlight { up: false }),

        // With the list open Enter only ever picks a suggestion
        Key::Enter if suggestions_open => form
            .focused_autocomplete()
            .filter(|autocomplete| autocomplete.has_highlight())
            .map(|_| AppCommand::CommitSuggestion),
        Key::Enter => Some(AppCommand::SubmitBusinessForm),

        Key::Char(c) if c != '\0' => Some(AppCommand::AppendFormChar(c)),

        _ => None,
    }
}

fn handle_category_filter_keys(key: Key) -> Option<AppCommand> {
    match key {
        Key::Esc => Some(AppCommand::CloseCategoryFilter),
        Key::Tab | Key::BackTab => Some(AppCommand::BlurCategoryFilter),
        Key::Enter => Some(AppCommand::CommitCategory),
        Key::Up => Some(AppCommand::MoveCategoryHighlight { up: true }),
        Key::Down => Some(AppCommand::MoveCategoryHighlight { up: false }),
        Key::Backspace => Some(AppCommand::DeleteCategoryChar),
        Key::Char(c) if c != '\0' => Some(AppCommand::AppendCategoryChar(c)),
        _ => None,
    }
}

fn handle_delete_confirmation_keys(key: Key, admin_state: &AdminState) -> Option<AppCommand> {
    match key {
        Key::Char('y') | Key::Char('Y') | Key::Enter => admin_state
            .delete_confirmation
            .map(|business_id| AppCommand::ConfirmDelete { business_id }),
        Key::Char('n') | Key::Char('N') | Key::Esc => Some(AppCommand::CancelDelete),
        _ => None,
    }
}

fn handle_login_keys(key: Key) -> Option<AppCommand> {
    match key {
        Key::Esc => Some(AppCommand::NavigateBack),
        Key::Tab | Key::BackTab | Key::Up | Key::Down => Some(AppCommand::SwitchLoginField),
        Key::Enter => Some(AppCommand::SubmitLogin),
        Key::Backspace => Some(AppCommand::DeleteLoginChar),
        Key::Char(c) if c != '\0' => Some(AppCommand::AppendLoginChar(c)),
        _ => None,
    }
}

/// Map a pointer event to an AppCommand using the areas the last frame
/// declared for each interactive component.
pub fn handle_pointer_input(event: PointerEvent, state: &AppState) -> Option<AppCommand> {
    if let Some(form) = state.form() {
        return handle_form_pointer(event, form);
    }

    match state.current_screen() {
        Screen::Businesses(s) => handle_category_pointer(event, s),
        _ => None,
    }
}

fn handle_form_pointer(event: PointerEvent, form: &BusinessFormState) -> Option<AppCommand> {
    let PointerEvent { kind, column, row } = event;
    let open = form.open_autocomplete();

    if let Some(field) = open {
        if let Some(index) = form.autocomplete(field).boundary.item_at(column, row) {
            return Some(match kind {
                PointerKind::Down => AppCommand::CommitSuggestionAt { field, index },
                PointerKind::Moved => AppCommand::HoverSuggestion { field, index },
            });
        }
    }

    if kind != PointerKind::Down {
        return None;
    }

    // Clicking an input moves focus there
    let clicked_input = [SuggestionField::FieldOfWork, SuggestionField::City]
        .into_iter()
        .find(|&sf| {
            form.autocomplete(sf)
                .boundary
                .anchor()
                .is_some_and(|area| contains(area, column, row))
        });
    if let Some(sf) = clicked_input {
        let field = FormField::from(sf);
        if form.focus != field {
            return Some(AppCommand::FocusFormField(field));
        }
    }

    if let Some(field) = open {
        if !form.autocomplete(field).boundary.contains(column, row) {
            return Some(AppCommand::CloseSuggestions { field });
        }
    }

    if form.boundary.anchor().is_some() && !form.boundary.contains(column, row) {
        return Some(AppCommand::CloseBusinessForm);
    }

    None
}

fn handle_category_pointer(event: PointerEvent, s: &BusinessesState) -> Option<AppCommand> {
    let PointerEvent { kind, column, row } = event;
    let boundary = &s.category.boundary;

    if s.category.is_open() {
        if let Some(index) = boundary.item_at(column, row) {
            return Some(match kind {
                PointerKind::Down => AppCommand::CommitCategoryAt { index },
                PointerKind::Moved => AppCommand::HoverCategory { index },
            });
        }
        if kind == PointerKind::Down && !boundary.contains(column, row) {
            return Some(AppCommand::CloseCategoryFilter);
        }
        return None;
    }

    match kind {
        PointerKind::Down if boundary.contains(column, row) => Some(AppCommand::OpenCategoryFilter),
        _ => None,
    }
}

fn contains(area: ratatui::layout::Rect, column: u16, row: u16) -> bool {
    area.contains(ratatui::layout::Position::new(column, row))
}
