use crate::background::{data_loader::DataLoader, BackgroundTaskManager};
use crate::events::{AppCommand, BlurTarget, Effect};
use crate::state::autocomplete::{SuggestionField, AUTOCOMPLETE_BLUR_GRACE, DROPDOWN_BLUR_GRACE};
use crate::state::form::{BusinessFormState, FormMode, PendingBlur};
use crate::state::validators::validate_business_form;
use crate::state::*;
use crate::suggestions::engine::InputOutcome;
use crate::ui::screens::Screen;
use directory_api::endpoints::businesses::BusinessUpdate;
use secrecy::SecretString;

const LOG_PAGE_SIZE: usize = 20;

/// Execute a command: apply it to the state, then run the side effects it asked for
pub fn execute_command(
    command: AppCommand,
    state: &mut AppState,
    task_manager: &mut BackgroundTaskManager,
    data_loader: &DataLoader,
) {
    for effect in apply_command(command, state) {
        run_effect(effect, task_manager, data_loader);
    }
}

fn run_effect(effect: Effect, task_manager: &mut BackgroundTaskManager, data_loader: &DataLoader) {
    let loader = data_loader.clone();
    match effect {
        Effect::LoadBusinesses => {
            task_manager.spawn_load_task("businesses".to_string(), async move {
                loader.load_businesses().await;
            });
        }

        Effect::CreateBusiness { business } => {
            task_manager.spawn_load_task("create-business".to_string(), async move {
                loader.create_business(business).await;
            });
        }

        Effect::UpdateBusiness {
            token,
            business_id,
            update,
        } => {
            task_manager.spawn_load_task(format!("update-business-{}", business_id), async move {
                loader.update_business(token, business_id, update).await;
            });
        }

        Effect::DeleteBusiness { token, business_id } => {
            task_manager.spawn_load_task(format!("delete-business-{}", business_id), async move {
                loader.delete_business(token, business_id).await;
            });
        }

        Effect::Login { email, password } => {
            task_manager.spawn_load_task("login".to_string(), async move {
                loader.login(email, password).await;
            });
        }

        Effect::ClearSession => data_loader.clear_session(),

        Effect::ScheduleSuggestionPass { field, pass } => {
            let key = field.debounce_key();
            match field {
                SuggestionField::City => {
                    task_manager.debounce(key, pass.delay, async move {
                        loader.city_suggestions(pass.generation, pass.query).await;
                    });
                }
                SuggestionField::FieldOfWork => {
                    task_manager.debounce(key, pass.delay, async move {
                        loader.suggestion_pass_due(field, pass.generation);
                    });
                }
            }
        }

        Effect::CancelSuggestionPass { field } => task_manager.cancel_debounce(field.debounce_key()),

        Effect::ScheduleBlur {
            target,
            token,
            grace,
        } => {
            task_manager.debounce(target.task_key(), grace, async move {
                loader.blur_elapsed(target, token);
            });
        }
    }
}

/// Pure state transition for a command. Returns the side effects to run.
///
/// Tests call this directly and inspect the returned effects instead of
/// spawning anything.
pub fn apply_command(command: AppCommand, state: &mut AppState) -> Vec<Effect> {
    // Save whether we're setting a pending key (we don't want to clear it in that case)
    let is_setting_pending_key = matches!(command, AppCommand::SetPendingKey(_));
    let mut effects = Vec::new();

    match command {
        AppCommand::SelectNext => match state.current_screen_mut() {
            Screen::Businesses(s) => s.select_next(),
            Screen::Admin(s) => s.select_next(),
            Screen::Logs(_) => {}
        },

        AppCommand::SelectPrevious => match state.current_screen_mut() {
            Screen::Businesses(s) => s.select_prev(),
            Screen::Admin(s) => s.select_prev(),
            Screen::Logs(_) => {}
        },

        AppCommand::NavigateToTop => match state.current_screen_mut() {
            Screen::Businesses(s) => s.select_top(),
            Screen::Admin(s) => s.select_top(),
            Screen::Logs(logs_state) => {
                logs_state.scroll_offset = logs_state.total_entries.saturating_sub(1);
            }
        },

        AppCommand::NavigateToBottom => match state.current_screen_mut() {
            Screen::Businesses(s) => s.select_bottom(),
            Screen::Admin(s) => s.select_bottom(),
            Screen::Logs(logs_state) => logs_state.scroll_offset = 0,
        },

        AppCommand::NavigateBack => {
            let had_form = state.form().is_some();
            if state.navigate_back() && had_form {
                cancel_suggestion_passes(&mut effects);
            }
        }

        AppCommand::LoadBusinesses => {
            match state.current_screen_mut() {
                Screen::Businesses(s) => {
                    tracing::debug!("Refreshing businesses screen");
                    s.loading = LoadingState::loading();
                    s.notice = None;
                }
                Screen::Admin(s) => {
                    tracing::debug!("Refreshing admin screen");
                    s.loading = LoadingState::loading();
                    s.error = None;
                }
                Screen::Logs(_) => {}
            }
            effects.push(Effect::LoadBusinesses);
        }

        // Free-text search
        AppCommand::EnterSearchMode => set_list_input_mode(state, InputMode::Search),

        AppCommand::ExitSearchMode => {
            // Keep search_query intact - filter remains active
            set_list_input_mode(state, InputMode::Normal)
        }

        AppCommand::AppendSearchChar(c) => edit_search(state, |query| query.push(c)),

        AppCommand::DeleteSearchChar => edit_search(state, |query| {
            query.pop();
        }),

        AppCommand::ClearSearch => {
            edit_search(state, String::clear);
            set_list_input_mode(state, InputMode::Normal);
        }

        // Field-of-work dropdown
        AppCommand::OpenCategoryFilter => {
            if let Some(s) = current_businesses(state) {
                s.category.open(s.collection.fields().load());
                s.input_mode = InputMode::CategoryFilter;
            }
        }

        AppCommand::CloseCategoryFilter => {
            if let Some(s) = current_businesses(state) {
                s.category.close();
                s.input_mode = InputMode::Normal;
            }
        }

        AppCommand::BlurCategoryFilter => {
            if let Some(s) = current_businesses(state) {
                s.input_mode = InputMode::Normal;
                if s.category.is_open() {
                    effects.push(Effect::ScheduleBlur {
                        target: BlurTarget::CategoryFilter,
                        token: s.category.blur(),
                        grace: DROPDOWN_BLUR_GRACE,
                    });
                }
            }
        }

        AppCommand::AppendCategoryChar(c) => {
            if let Some(s) = current_businesses(state) {
                s.category.push_char(c, s.collection.fields().load());
                reset_selection(s);
            }
        }

        AppCommand::DeleteCategoryChar => {
            if let Some(s) = current_businesses(state) {
                s.category.pop_char(s.collection.fields().load());
                reset_selection(s);
            }
        }

        AppCommand::MoveCategoryHighlight { up } => {
            if let Some(s) = current_businesses(state) {
                if up {
                    s.category.move_up();
                } else {
                    s.category.move_down();
                }
            }
        }

        AppCommand::HoverCategory { index } => {
            if let Some(s) = current_businesses(state) {
                s.category.highlight(index);
            }
        }

        AppCommand::CommitCategory => {
            if let Some(s) = current_businesses(state) {
                if let Some(field) = s.category.commit() {
                    tracing::debug!("Filtering by field of work {:?}", field);
                    s.input_mode = InputMode::Normal;
                    reset_selection(s);
                }
            }
        }

        AppCommand::CommitCategoryAt { index } => {
            if let Some(s) = current_businesses(state) {
                if s.category.commit_at(index).is_some() {
                    s.input_mode = InputMode::Normal;
                    reset_selection(s);
                }
            }
        }

        // Business form
        AppCommand::OpenBusinessForm => match state.current_screen_mut() {
            Screen::Businesses(s) => {
                s.notice = None;
                s.category.close();
                s.form = Some(BusinessFormState::create());
                s.input_mode = InputMode::BusinessForm;
            }
            Screen::Admin(s) => {
                s.form = Some(BusinessFormState::create());
                s.input_mode = InputMode::BusinessForm;
            }
            Screen::Logs(_) => {}
        },

        AppCommand::EditBusiness { business_id } => {
            let logged_in = state.is_admin();
            if let Screen::Admin(s) = state.current_screen_mut() {
                let form = match s.collection.get(business_id) {
                    Some(business) if logged_in => Some(BusinessFormState::edit(business)),
                    Some(_) => {
                        tracing::warn!("Edit requested without an admin session");
                        None
                    }
                    None => {
                        tracing::warn!("Business {} not found for editing", business_id);
                        None
                    }
                };
                if form.is_some() {
                    tracing::debug!("Editing business {}", business_id);
                    s.form = form;
                    s.input_mode = InputMode::BusinessForm;
                }
            }
        }

        AppCommand::CloseBusinessForm => {
            let closed = match state.current_screen_mut() {
                Screen::Businesses(s) => {
                    s.input_mode = InputMode::Normal;
                    s.form.take()
                }
                Screen::Admin(s) => {
                    s.input_mode = InputMode::Normal;
                    s.form.take()
                }
                Screen::Logs(_) => None,
            };
            if let Some(mut form) = closed {
                form.teardown();
                cancel_suggestion_passes(&mut effects);
            }
        }

        AppCommand::NavigateFormField { forward } => {
            if let Some((form, fields)) = state.form_context_mut() {
                let next = if forward {
                    form.focus.next()
                } else {
                    form.focus.prev()
                };
                let blurred = form.set_focus(next, fields.load());
                schedule_blur(blurred, &mut effects);
            }
        }

        AppCommand::FocusFormField(field) => {
            if let Some((form, fields)) = state.form_context_mut() {
                let blurred = form.set_focus(field, fields.load());
                schedule_blur(blurred, &mut effects);
            }
        }

        AppCommand::AppendFormChar(c) => {
            if let Some(form) = state.current_screen_mut().form_mut() {
                suggestion_effects(form.type_char(c), &mut effects);
            }
        }

        AppCommand::DeleteFormChar => {
            if let Some(form) = state.current_screen_mut().form_mut() {
                suggestion_effects(form.delete_char(), &mut effects);
            }
        }

        AppCommand::ClearFormField => {
            if let Some(form) = state.current_screen_mut().form_mut() {
                suggestion_effects(form.clear_focused(), &mut effects);
            }
        }

        AppCommand::MoveSuggestionHighlight { up } => {
            if let Some(form) = state.current_screen_mut().form_mut() {
                if let Some(field) = form.open_autocomplete() {
                    let autocomplete = form.autocomplete_mut(field);
                    if up {
                        autocomplete.move_up();
                    } else {
                        autocomplete.move_down();
                    }
                }
            }
        }

        AppCommand::HoverSuggestion { field, index } => {
            if let Some(form) = state.current_screen_mut().form_mut() {
                form.autocomplete_mut(field).highlight(index);
            }
        }

        AppCommand::CommitSuggestion => {
            if let Some(form) = state.current_screen_mut().form_mut() {
                if let Some(change) = form.commit_suggestion() {
                    tracing::debug!("{:?} set to {:?}", change.field, change.value);
                    if let Some(field) = change.field.suggestion_field() {
                        effects.push(Effect::CancelSuggestionPass { field });
                    }
                }
            }
        }

        AppCommand::CommitSuggestionAt { field, index } => {
            if let Some(form) = state.current_screen_mut().form_mut() {
                if form.commit_suggestion_at(field, index).is_some() {
                    effects.push(Effect::CancelSuggestionPass { field });
                }
            }
        }

        AppCommand::CloseSuggestions { field } => {
            if let Some(form) = state.current_screen_mut().form_mut() {
                form.autocomplete_mut(field).close();
                effects.push(Effect::CancelSuggestionPass { field });
            }
        }

        AppCommand::SubmitBusinessForm => {
            let token = state.session.as_ref().map(|session| session.token.clone());
            if let Some(form) = state.current_screen_mut().form_mut() {
                if let Some(effect) = submit_form(form, token) {
                    cancel_suggestion_passes(&mut effects);
                    effects.push(effect);
                }
            }
        }

        // Admin
        AppCommand::OpenAdmin => {
            if !matches!(state.current_screen(), Screen::Admin(_)) {
                let logged_in = state.is_admin();
                let loading = if logged_in {
                    LoadingState::loading()
                } else {
                    LoadingState::NotStarted
                };
                state.navigate_to(Screen::Admin(Box::new(AdminState {
                    loading,
                    ..Default::default()
                })));
                if logged_in {
                    effects.push(Effect::LoadBusinesses);
                }
            }
        }

        AppCommand::AppendLoginChar(c) => {
            if let Screen::Admin(s) = state.current_screen_mut() {
                s.login.focused_value_mut().push(c);
                s.login.error = None;
            }
        }

        AppCommand::DeleteLoginChar => {
            if let Screen::Admin(s) = state.current_screen_mut() {
                s.login.focused_value_mut().pop();
            }
        }

        AppCommand::SwitchLoginField => {
            if let Screen::Admin(s) = state.current_screen_mut() {
                s.login.focus = match s.login.focus {
                    LoginField::Email => LoginField::Password,
                    LoginField::Password => LoginField::Email,
                };
            }
        }

        AppCommand::SubmitLogin => {
            if let Screen::Admin(s) = state.current_screen_mut() {
                let login = &mut s.login;
                let email = login.email.trim().to_string();
                if login.submitting {
                    tracing::debug!("Login already in flight");
                } else if email.is_empty() || login.password.is_empty() {
                    login.error = Some("Email and password are required".to_string());
                } else {
                    login.submitting = true;
                    login.error = None;
                    effects.push(Effect::Login {
                        email,
                        password: SecretString::from(login.password.clone()),
                    });
                }
            }
        }

        AppCommand::Logout => {
            tracing::info!("Logging out");
            state.session = None;
            effects.push(Effect::ClearSession);
            if matches!(state.current_screen(), Screen::Admin(_)) {
                let had_form = state.form().is_some();
                state.navigate_back();
                if had_form {
                    cancel_suggestion_passes(&mut effects);
                }
            }
        }

        AppCommand::InitiateDelete { business_id } => {
            if let Screen::Admin(s) = state.current_screen_mut() {
                s.delete_confirmation = Some(business_id);
                s.input_mode = InputMode::DeleteConfirmation;
            }
        }

        AppCommand::ConfirmDelete { business_id } => {
            match state.session.as_ref().map(|session| session.token.clone()) {
                Some(token) => effects.push(Effect::DeleteBusiness { token, business_id }),
                None => {
                    if let Screen::Admin(s) = state.current_screen_mut() {
                        s.delete_confirmation = None;
                        s.input_mode = InputMode::Normal;
                    }
                }
            }
        }

        AppCommand::CancelDelete => {
            if let Screen::Admin(s) = state.current_screen_mut() {
                s.delete_confirmation = None;
                s.input_mode = InputMode::Normal;
            }
        }

        AppCommand::ToggleHelp => {
            state.help_visible = !state.help_visible;
        }

        AppCommand::NavigateToLogs => {
            // Navigate to logs screen (no logging to avoid feedback loop)
            state.navigate_to(Screen::Logs(LogsState::default()));
        }

        AppCommand::ScrollLogsUp => {
            if let Screen::Logs(logs_state) = state.current_screen_mut() {
                // Scroll up means going back in time (increase offset)
                if logs_state.scroll_offset < logs_state.total_entries.saturating_sub(1) {
                    logs_state.scroll_offset += 1;
                }
            }
        }

        AppCommand::ScrollLogsDown => {
            if let Screen::Logs(logs_state) = state.current_screen_mut() {
                logs_state.scroll_offset = logs_state.scroll_offset.saturating_sub(1);
            }
        }

        AppCommand::ScrollLogsPageUp => {
            if let Screen::Logs(logs_state) = state.current_screen_mut() {
                logs_state.scroll_offset = (logs_state.scroll_offset + LOG_PAGE_SIZE)
                    .min(logs_state.total_entries.saturating_sub(1));
            }
        }

        AppCommand::ScrollLogsPageDown => {
            if let Screen::Logs(logs_state) = state.current_screen_mut() {
                logs_state.scroll_offset = logs_state.scroll_offset.saturating_sub(LOG_PAGE_SIZE);
            }
        }

        AppCommand::ScrollLogsToTop => {
            if let Screen::Logs(logs_state) = state.current_screen_mut() {
                logs_state.scroll_offset = logs_state.total_entries.saturating_sub(1);
            }
        }

        AppCommand::ScrollLogsToBottom => {
            if let Screen::Logs(logs_state) = state.current_screen_mut() {
                logs_state.scroll_offset = 0;
            }
        }

        AppCommand::SetPendingKey(c) => {
            state.pending_key = Some(c);
        }

        AppCommand::ClearPendingKey => {
            state.pending_key = None;
        }

        AppCommand::Quit => {
            state.should_quit = true;
        }
    }

    // Clear pending key after any command except SetPendingKey
    // This ensures multi-key sequences are properly reset after completion
    if !is_setting_pending_key && state.pending_key.is_some() {
        state.pending_key = None;
    }

    effects
}

/// Validates and, if clean, marks the form as submitting. Drafts are written
/// back first so whatever is on screen is what gets sent.
fn submit_form(form: &mut BusinessFormState, token: Option<SecretString>) -> Option<Effect> {
    if form.submitting {
        return None;
    }
    form.flush_drafts();
    form.submit_error = None;

    let business = match validate_business_form(form) {
        Ok(business) => business,
        Err(errors) => {
            tracing::debug!("Form has {} invalid fields", errors.len());
            form.errors = errors;
            return None;
        }
    };
    form.errors = Default::default();

    let effect = match form.mode {
        FormMode::Create => Effect::CreateBusiness { business },
        FormMode::Edit(business_id) => match token {
            Some(token) => Effect::UpdateBusiness {
                token,
                business_id,
                update: BusinessUpdate::from(business),
            },
            None => {
                form.submit_error = Some("Log in to edit businesses".to_string());
                return None;
            }
        },
    };
    form.submitting = true;
    Some(effect)
}

fn suggestion_effects(outcome: Option<(SuggestionField, InputOutcome)>, effects: &mut Vec<Effect>) {
    match outcome {
        Some((field, InputOutcome::Scheduled(pass))) => {
            effects.push(Effect::ScheduleSuggestionPass { field, pass })
        }
        Some((field, InputOutcome::Suppressed)) => {
            effects.push(Effect::CancelSuggestionPass { field })
        }
        None => {}
    }
}

fn schedule_blur(blurred: Option<PendingBlur>, effects: &mut Vec<Effect>) {
    if let Some(PendingBlur { field, token }) = blurred {
        effects.push(Effect::ScheduleBlur {
            target: BlurTarget::Suggestions(field),
            token,
            grace: AUTOCOMPLETE_BLUR_GRACE,
        });
    }
}

fn cancel_suggestion_passes(effects: &mut Vec<Effect>) {
    for field in [SuggestionField::FieldOfWork, SuggestionField::City] {
        effects.push(Effect::CancelSuggestionPass { field });
    }
}

fn current_businesses(state: &mut AppState) -> Option<&mut BusinessesState> {
    match state.current_screen_mut() {
        Screen::Businesses(s) => Some(s.as_mut()),
        _ => None,
    }
}

fn set_list_input_mode(state: &mut AppState, mode: InputMode) {
    match state.current_screen_mut() {
        Screen::Businesses(s) => s.input_mode = mode,
        Screen::Admin(s) => s.input_mode = mode,
        Screen::Logs(_) => {}
    }
}

fn edit_search(state: &mut AppState, edit: impl FnOnce(&mut String)) {
    match state.current_screen_mut() {
        Screen::Businesses(s) => {
            edit(&mut s.search_query);
            reset_selection(s.as_mut());
        }
        Screen::Admin(s) => {
            edit(&mut s.search_query);
            reset_selection(s.as_mut());
        }
        Screen::Logs(_) => {}
    }
}

/// The visible rows changed; go back to the first one
fn reset_selection<S: Scrollable>(screen: &mut S) {
    screen.table_state().borrow_mut().select(Some(0));
    screen.clamp_selection();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::AdminSession;
    use crate::state::form::{FieldChange, FormField};
    use crate::state::reducer::reduce_data_event;
    use crate::events::DataEvent;
    use chrono::{TimeZone, Utc};
    use directory_api::endpoints::businesses::{Business, NewBusiness};
    use std::time::Duration;

    fn business(name: &str, field_of_work: &str, created_secs: i64) -> Business {
        Business::from_new(
            NewBusiness::new(name, "050-1234567", field_of_work).city("Haifa"),
            Utc.timestamp_opt(created_secs, 0).unwrap(),
        )
    }

    fn loaded_state() -> AppState {
        let mut state = AppState::new();
        reduce_data_event(
            &mut state,
            DataEvent::BusinessesLoaded {
                businesses: vec![
                    business("Dana's Bakery", "Baker", 30),
                    business("Pipe Pros", "Plumber", 20),
                    business("Bread & Co", "Baker", 10),
                ],
            },
        );
        state
    }

    fn businesses(state: &AppState) -> &BusinessesState {
        match state.current_screen() {
            Screen::Businesses(s) => s,
            _ => panic!("Expected businesses screen"),
        }
    }

    fn form(state: &AppState) -> &BusinessFormState {
        state.form().expect("form should be open")
    }

    // ========================================================================
    // Search and category
    // ========================================================================

    #[test]
    fn test_search_narrows_and_resets_selection() {
        let mut state = loaded_state();
        apply_command(AppCommand::SelectNext, &mut state);
        apply_command(AppCommand::EnterSearchMode, &mut state);
        for c in "bread".chars() {
            apply_command(AppCommand::AppendSearchChar(c), &mut state);
        }

        let s = businesses(&state);
        assert_eq!(s.visible().len(), 1);
        assert_eq!(s.table_state.borrow().selected(), Some(0));
        assert_eq!(s.input_mode, InputMode::Search);
    }

    #[test]
    fn test_clear_search_returns_to_normal_mode() {
        let mut state = loaded_state();
        apply_command(AppCommand::EnterSearchMode, &mut state);
        apply_command(AppCommand::AppendSearchChar('x'), &mut state);
        apply_command(AppCommand::ClearSearch, &mut state);

        let s = businesses(&state);
        assert!(s.search_query.is_empty());
        assert_eq!(s.input_mode, InputMode::Normal);
        assert_eq!(s.visible().len(), 3);
    }

    #[test]
    fn test_category_commit_filters_list() {
        let mut state = loaded_state();
        apply_command(AppCommand::OpenCategoryFilter, &mut state);
        assert_eq!(businesses(&state).category.options().len(), 2);

        apply_command(AppCommand::MoveCategoryHighlight { up: false }, &mut state);
        apply_command(AppCommand::CommitCategory, &mut state);

        let s = businesses(&state);
        assert_eq!(s.category.selected(), "Baker");
        assert_eq!(s.input_mode, InputMode::Normal);
        assert_eq!(s.visible().len(), 2);
    }

    #[test]
    fn test_category_blur_schedules_grace_period() {
        let mut state = loaded_state();
        apply_command(AppCommand::OpenCategoryFilter, &mut state);
        let effects = apply_command(AppCommand::BlurCategoryFilter, &mut state);

        assert!(matches!(
            effects.as_slice(),
            [Effect::ScheduleBlur {
                target: BlurTarget::CategoryFilter,
                grace,
                ..
            }] if *grace == Duration::from_millis(150)
        ));
        assert!(businesses(&state).category.is_open());
    }

    // ========================================================================
    // Business form
    // ========================================================================

    #[test]
    fn test_typing_in_city_schedules_debounced_pass() {
        let mut state = loaded_state();
        apply_command(AppCommand::OpenBusinessForm, &mut state);
        apply_command(AppCommand::FocusFormField(FormField::City), &mut state);

        let effects = apply_command(AppCommand::AppendFormChar('H'), &mut state);
        assert!(matches!(
            effects.as_slice(),
            [Effect::CancelSuggestionPass {
                field: SuggestionField::City
            }]
        ));

        let effects = apply_command(AppCommand::AppendFormChar('a'), &mut state);
        match effects.as_slice() {
            [Effect::ScheduleSuggestionPass { field, pass }] => {
                assert_eq!(*field, SuggestionField::City);
                assert_eq!(pass.query, "Ha");
                assert_eq!(pass.delay, Duration::from_millis(300));
            }
            other => panic!("unexpected effects: {:?}", other),
        }
    }

    #[test]
    fn test_leaving_suggestion_field_schedules_blur() {
        let mut state = loaded_state();
        apply_command(AppCommand::OpenBusinessForm, &mut state);
        apply_command(AppCommand::FocusFormField(FormField::FieldOfWork), &mut state);
        apply_command(AppCommand::AppendFormChar('B'), &mut state);

        let effects = apply_command(AppCommand::NavigateFormField { forward: true }, &mut state);
        assert!(matches!(
            effects.as_slice(),
            [Effect::ScheduleBlur {
                target: BlurTarget::Suggestions(SuggestionField::FieldOfWork),
                grace,
                ..
            }] if *grace == Duration::from_millis(200)
        ));
        assert_eq!(form(&state).focus, FormField::City);
        assert_eq!(form(&state).value(FormField::FieldOfWork), "B");
    }

    #[test]
    fn test_submit_with_missing_fields_sets_errors() {
        let mut state = loaded_state();
        apply_command(AppCommand::OpenBusinessForm, &mut state);
        let effects = apply_command(AppCommand::SubmitBusinessForm, &mut state);

        assert!(effects.is_empty());
        let form = form(&state);
        assert_eq!(form.errors.get(FormField::Name), Some("Name is required"));
        assert!(!form.submitting);
    }

    #[test]
    fn test_submit_valid_form_creates_business() {
        let mut state = loaded_state();
        apply_command(AppCommand::OpenBusinessForm, &mut state);
        for c in "Yoga Place".chars() {
            apply_command(AppCommand::AppendFormChar(c), &mut state);
        }
        apply_command(AppCommand::NavigateFormField { forward: true }, &mut state);
        for c in "052-1111111".chars() {
            apply_command(AppCommand::AppendFormChar(c), &mut state);
        }
        apply_command(AppCommand::NavigateFormField { forward: true }, &mut state);
        for c in "Yoga".chars() {
            apply_command(AppCommand::AppendFormChar(c), &mut state);
        }

        let effects = apply_command(AppCommand::SubmitBusinessForm, &mut state);
        let created = effects.iter().find_map(|effect| match effect {
            Effect::CreateBusiness { business } => Some(business),
            _ => None,
        });
        let created = created.expect("expected a create effect");
        assert_eq!(created.name, "Yoga Place");
        assert_eq!(created.field_of_work, "Yoga");
        assert!(form(&state).submitting);

        // A second Enter while in flight does nothing
        assert!(apply_command(AppCommand::SubmitBusinessForm, &mut state).is_empty());
    }

    #[test]
    fn test_close_form_cancels_pending_passes() {
        let mut state = loaded_state();
        apply_command(AppCommand::OpenBusinessForm, &mut state);
        let effects = apply_command(AppCommand::CloseBusinessForm, &mut state);

        assert_eq!(effects.len(), 2);
        assert!(state.form().is_none());
        assert_eq!(businesses(&state).input_mode, InputMode::Normal);
    }

    #[test]
    fn test_edit_without_session_is_refused() {
        let mut state = loaded_state();
        let target = businesses(&state).collection.businesses()[0].clone();
        state.session = Some(AdminSession::new("admin@example.com", "token"));
        apply_command(AppCommand::OpenAdmin, &mut state);
        apply_command(
            AppCommand::EditBusiness {
                business_id: target.id,
            },
            &mut state,
        );
        // The admin screen loads its own copy; nothing to edit yet
        assert!(state.form().is_none());

        reduce_data_event(
            &mut state,
            DataEvent::BusinessesLoaded {
                businesses: vec![target.clone()],
            },
        );
        apply_command(
            AppCommand::EditBusiness {
                business_id: target.id,
            },
            &mut state,
        );
        let form = state.current_screen_mut().form_mut().expect("edit form");
        form.apply(FieldChange::new(FormField::Notes, "Closed Fridays"));

        state.session = None;
        let effects = apply_command(AppCommand::SubmitBusinessForm, &mut state);
        assert!(effects.is_empty());
        assert_eq!(
            form_submit_error(&state),
            Some("Log in to edit businesses")
        );
    }

    fn form_submit_error(state: &AppState) -> Option<&str> {
        state.form().and_then(|form| form.submit_error.as_deref())
    }

    // ========================================================================
    // Admin
    // ========================================================================

    #[test]
    fn test_open_admin_with_session_loads_businesses() {
        let mut state = AppState::new();
        state.session = Some(AdminSession::new("admin@example.com", "token"));
        let effects = apply_command(AppCommand::OpenAdmin, &mut state);

        assert!(matches!(effects.as_slice(), [Effect::LoadBusinesses]));
        assert!(matches!(state.current_screen(), Screen::Admin(s) if s.loading.is_loading()));
    }

    #[test]
    fn test_login_requires_both_fields() {
        let mut state = AppState::new();
        apply_command(AppCommand::OpenAdmin, &mut state);
        apply_command(AppCommand::AppendLoginChar('a'), &mut state);
        let effects = apply_command(AppCommand::SubmitLogin, &mut state);

        assert!(effects.is_empty());
        match state.current_screen() {
            Screen::Admin(s) => assert!(s.login.error.is_some()),
            _ => panic!("Expected admin screen"),
        }
    }

    #[test]
    fn test_logout_clears_session_and_leaves_admin() {
        let mut state = AppState::new();
        state.session = Some(AdminSession::new("admin@example.com", "token"));
        apply_command(AppCommand::OpenAdmin, &mut state);
        let effects = apply_command(AppCommand::Logout, &mut state);

        assert!(effects.iter().any(|e| matches!(e, Effect::ClearSession)));
        assert!(state.session.is_none());
        assert!(matches!(state.current_screen(), Screen::Businesses(_)));
    }

    #[test]
    fn test_pending_key_cleared_after_other_command() {
        let mut state = AppState::new();
        apply_command(AppCommand::SetPendingKey('g'), &mut state);
        assert_eq!(state.pending_key, Some('g'));
        apply_command(AppCommand::NavigateToTop, &mut state);
        assert_eq!(state.pending_key, None);
    }
}
