use super::autocomplete::SuggestionField;
use super::{AppState, InputMode, LoadingState, Scrollable};
use crate::events::{BlurTarget, DataEvent};
use crate::state::form::FormMode;
use crate::ui::screens::Screen;

/// Pure state transition function for data events
pub fn reduce_data_event(state: &mut AppState, event: DataEvent) {
    match event {
        // Business collection loaded from API
        DataEvent::BusinessesLoaded { businesses } => {
            tracing::debug!("Applying {} businesses", businesses.len());
            for screen in state.history.iter_mut() {
                match screen {
                    Screen::Businesses(s) => {
                        s.collection.replace_all(businesses.clone());
                        s.loading = LoadingState::Loaded;
                        s.clamp_selection();
                    }
                    Screen::Admin(s) => {
                        s.collection.replace_all(businesses.clone());
                        s.loading = LoadingState::Loaded;
                        s.clamp_selection();
                    }
                    Screen::Logs(_) => {}
                }
            }
        }

        DataEvent::LoadError { error } => {
            for screen in state.history.iter_mut() {
                match screen {
                    Screen::Businesses(s) if s.loading.is_loading() => {
                        s.loading = LoadingState::Error(error.clone());
                    }
                    Screen::Admin(s) if s.loading.is_loading() => {
                        s.loading = LoadingState::Error(error.clone());
                    }
                    _ => {}
                }
            }
        }

        // Submission
        DataEvent::BusinessCreated { business } => {
            tracing::info!("Business {} added", business.id);
            let name = business.name.clone();
            for collection in state.collections_mut() {
                collection.prepend(business.clone());
            }
            close_submitted_form(state, |mode| mode == FormMode::Create);
            if let Some(s) = state.businesses_screen_mut() {
                s.notice = Some(format!("Added \"{}\"", name));
                s.clamp_selection();
            }
        }

        DataEvent::BusinessCreateFailed { error } => {
            tracing::error!("Failed to add business: {}", error);
            fail_submission(state, error);
        }

        DataEvent::BusinessUpdated { business } => {
            tracing::info!("Business {} updated", business.id);
            let business_id = business.id;
            for collection in state.collections_mut() {
                collection.replace(business.clone());
            }
            close_submitted_form(state, |mode| mode == FormMode::Edit(business_id));
        }

        DataEvent::BusinessUpdateFailed { business_id, error } => {
            tracing::error!("Failed to update business {}: {}", business_id, error);
            fail_submission(state, error);
        }

        // Deletion
        DataEvent::BusinessDeleted { business_id } => {
            tracing::info!("Business {} deleted", business_id);
            for collection in state.collections_mut() {
                collection.remove(business_id);
            }
            for screen in state.history.iter_mut() {
                match screen {
                    Screen::Businesses(s) => s.clamp_selection(),
                    Screen::Admin(s) => {
                        if s.delete_confirmation == Some(business_id) {
                            s.delete_confirmation = None;
                            s.input_mode = InputMode::Normal;
                        }
                        s.clamp_selection();
                    }
                    Screen::Logs(_) => {}
                }
            }
        }

        DataEvent::BusinessDeleteFailed { business_id, error } => {
            tracing::error!("Failed to delete business {}: {}", business_id, error);
            if let Some(s) = state.admin_screen_mut() {
                s.delete_confirmation = None;
                s.input_mode = InputMode::Normal;
                s.error = Some(format!("Failed to delete business: {}", error));
            }
        }

        // Admin session
        DataEvent::LoggedIn { session } => {
            tracing::info!("Logged in as {}", session.email);
            state.session = Some(session);
            if let Some(s) = state.admin_screen_mut() {
                s.login = Default::default();
                s.error = None;
                s.loading = LoadingState::loading();
            }
        }

        DataEvent::LoginFailed { error } => {
            tracing::warn!("Login failed: {}", error);
            if let Some(s) = state.admin_screen_mut() {
                s.login.submitting = false;
                s.login.password.clear();
                s.login.error = Some(error);
            }
        }

        DataEvent::SessionVerified { session } => {
            tracing::debug!("Stored session for {} is valid", session.email);
            state.session = Some(session);
        }

        DataEvent::SessionExpired => {
            tracing::warn!("Admin session expired");
            state.session = None;
            if let Some(s) = state.admin_screen_mut() {
                if let Some(mut form) = s.form.take() {
                    form.teardown();
                }
                s.delete_confirmation = None;
                s.input_mode = InputMode::Normal;
                s.login.submitting = false;
                s.login.error = Some("Session expired, please log in again".to_string());
            }
        }

        // Suggestions
        DataEvent::CityLookupStarted { generation } => {
            if let Some((form, _)) = state.form_context_mut() {
                form.autocomplete_mut(SuggestionField::City)
                    .begin_lookup(generation);
            }
        }

        DataEvent::SuggestionsReady {
            field,
            generation,
            candidates,
            pool_loaded,
        } => match state.form_context_mut() {
            Some((form, _)) => {
                form.autocomplete_mut(field)
                    .apply_pass(generation, candidates, pool_loaded);
            }
            None => tracing::debug!("Suggestions for {:?} arrived after the form closed", field),
        },

        DataEvent::SuggestionPassDue { field, generation } => {
            if let Some((form, fields)) = state.form_context_mut() {
                form.autocomplete_mut(field).run_pass(generation, fields.load());
            }
        }

        DataEvent::BlurGraceElapsed { target, token } => match target {
            BlurTarget::Suggestions(field) => {
                if let Some((form, _)) = state.form_context_mut() {
                    form.autocomplete_mut(field).on_blur_elapsed(token);
                }
            }
            BlurTarget::CategoryFilter => {
                if let Some(s) = state.businesses_screen_mut() {
                    s.category.on_blur_elapsed(token);
                }
            }
        },
    }
}

/// Closes the current screen's form if it was waiting on this submission
fn close_submitted_form(state: &mut AppState, matches_mode: impl Fn(FormMode) -> bool) {
    let screen = state.current_screen_mut();
    let submitted = screen
        .form()
        .is_some_and(|form| form.submitting && matches_mode(form.mode));
    if !submitted {
        return;
    }

    match screen {
        Screen::Businesses(s) => {
            if let Some(mut form) = s.form.take() {
                form.teardown();
            }
            s.input_mode = InputMode::Normal;
        }
        Screen::Admin(s) => {
            if let Some(mut form) = s.form.take() {
                form.teardown();
            }
            s.input_mode = InputMode::Normal;
        }
        Screen::Logs(_) => {}
    }
}

fn fail_submission(state: &mut AppState, error: String) {
    if let Some(form) = state.current_screen_mut().form_mut() {
        form.submitting = false;
        form.submit_error = Some(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::AdminSession;
    use crate::state::form::{BusinessFormState, FormField};
    use crate::state::AdminState;
    use crate::suggestions::{engine::InputOutcome, Candidate};
    use chrono::Utc;
    use directory_api::endpoints::businesses::{Business, NewBusiness};

    fn business(name: &str, field_of_work: &str) -> Business {
        Business::from_new(NewBusiness::new(name, "050", field_of_work), Utc::now())
    }

    fn businesses_screen(state: &mut AppState) -> &mut crate::state::BusinessesState {
        state.businesses_screen_mut().unwrap()
    }

    fn open_form(state: &mut AppState) {
        let screen = businesses_screen(state);
        screen.form = Some(BusinessFormState::create());
        screen.input_mode = InputMode::BusinessForm;
    }

    // ========================================================================
    // Collection events
    // ========================================================================

    #[test]
    fn test_loaded_businesses_reach_every_list_screen() {
        let mut state = AppState::new();
        state.navigate_to(Screen::Admin(Box::default()));

        reduce_data_event(
            &mut state,
            DataEvent::BusinessesLoaded {
                businesses: vec![business("Cohen", "Plumber")],
            },
        );

        let screen = businesses_screen(&mut state);
        assert_eq!(screen.loading, LoadingState::Loaded);
        assert_eq!(screen.collection.businesses().len(), 1);
        assert_eq!(screen.table_state.borrow().selected(), Some(0));
        assert_eq!(state.admin_screen_mut().unwrap().collection.businesses().len(), 1);
    }

    #[test]
    fn test_load_error_marks_loading_screen() {
        let mut state = AppState::new();
        businesses_screen(&mut state).loading = LoadingState::loading();
        reduce_data_event(
            &mut state,
            DataEvent::LoadError {
                error: "connection refused".to_string(),
            },
        );
        assert_eq!(
            businesses_screen(&mut state).loading,
            LoadingState::Error("connection refused".to_string())
        );
    }

    #[test]
    fn test_created_business_is_prepended_and_form_closed() {
        let mut state = AppState::new();
        reduce_data_event(
            &mut state,
            DataEvent::BusinessesLoaded {
                businesses: vec![business("Cohen", "Plumber")],
            },
        );
        open_form(&mut state);
        businesses_screen(&mut state).form.as_mut().unwrap().submitting = true;

        reduce_data_event(
            &mut state,
            DataEvent::BusinessCreated {
                business: business("Levi", "Welder"),
            },
        );

        let screen = businesses_screen(&mut state);
        assert!(screen.form.is_none());
        assert_eq!(screen.input_mode, InputMode::Normal);
        assert_eq!(screen.collection.businesses()[0].name, "Levi");
        assert_eq!(screen.collection.fields().len(), 2);
        assert!(screen.notice.is_some());
    }

    #[test]
    fn test_failed_submission_keeps_form_open() {
        let mut state = AppState::new();
        open_form(&mut state);
        businesses_screen(&mut state).form.as_mut().unwrap().submitting = true;

        reduce_data_event(
            &mut state,
            DataEvent::BusinessCreateFailed {
                error: "(500 Internal Server Error) boom".to_string(),
            },
        );

        let form = businesses_screen(&mut state).form.as_ref().unwrap();
        assert!(!form.submitting);
        assert_eq!(
            form.submit_error.as_deref(),
            Some("(500 Internal Server Error) boom")
        );
    }

    #[test]
    fn test_deleted_business_leaves_admin_list() {
        let mut state = AppState::new();
        let doomed = business("Cohen", "Plumber");
        let business_id = doomed.id;
        state.navigate_to(Screen::Admin(Box::new(AdminState {
            delete_confirmation: Some(business_id),
            input_mode: InputMode::DeleteConfirmation,
            ..Default::default()
        })));
        reduce_data_event(
            &mut state,
            DataEvent::BusinessesLoaded {
                businesses: vec![doomed],
            },
        );

        reduce_data_event(&mut state, DataEvent::BusinessDeleted { business_id });

        let admin = state.admin_screen_mut().unwrap();
        assert!(admin.collection.is_empty());
        assert_eq!(admin.delete_confirmation, None);
        assert_eq!(admin.input_mode, InputMode::Normal);
        assert!(businesses_screen(&mut state).collection.is_empty());
    }

    // ========================================================================
    // Session events
    // ========================================================================

    #[test]
    fn test_session_expiry_returns_to_login() {
        let mut state = AppState::new();
        state.session = Some(AdminSession::new("admin@example.com", "t"));
        state.navigate_to(Screen::Admin(Box::new(AdminState {
            form: Some(BusinessFormState::create()),
            input_mode: InputMode::BusinessForm,
            ..Default::default()
        })));

        reduce_data_event(&mut state, DataEvent::SessionExpired);

        assert!(state.session.is_none());
        let admin = state.admin_screen_mut().unwrap();
        assert!(admin.form.is_none());
        assert!(admin.login.error.is_some());
    }

    // ========================================================================
    // Suggestion events
    // ========================================================================

    #[test]
    fn test_field_pass_filters_loaded_pool() {
        let mut state = AppState::new();
        reduce_data_event(
            &mut state,
            DataEvent::BusinessesLoaded {
                businesses: vec![business("A", "Plumber"), business("B", "Electrician")],
            },
        );
        open_form(&mut state);

        let generation = {
            let (form, fields) = state.form_context_mut().unwrap();
            form.set_focus(FormField::FieldOfWork, fields.load());
            match form.type_char('p') {
                Some((_, InputOutcome::Scheduled(pass))) => pass.generation,
                other => panic!("unexpected outcome: {other:?}"),
            }
        };

        reduce_data_event(
            &mut state,
            DataEvent::SuggestionPassDue {
                field: SuggestionField::FieldOfWork,
                generation,
            },
        );

        let form = state.form().unwrap();
        let autocomplete = form.autocomplete(SuggestionField::FieldOfWork);
        assert!(autocomplete.is_open());
        assert_eq!(autocomplete.suggestions(), [Candidate::new("Plumber")]);
    }

    #[test]
    fn test_stale_city_result_is_ignored() {
        let mut state = AppState::new();
        open_form(&mut state);
        let generations: Vec<u64> = {
            let (form, fields) = state.form_context_mut().unwrap();
            form.set_focus(FormField::City, fields.load());
            "Hai"
                .chars()
                .filter_map(|c| match form.type_char(c) {
                    Some((_, InputOutcome::Scheduled(pass))) => Some(pass.generation),
                    _ => None,
                })
                .collect()
        };
        assert_eq!(generations.len(), 2);

        reduce_data_event(
            &mut state,
            DataEvent::SuggestionsReady {
                field: SuggestionField::City,
                generation: generations[0],
                candidates: vec![Candidate::new("Haifa")],
                pool_loaded: true,
            },
        );
        assert!(state
            .form()
            .unwrap()
            .autocomplete(SuggestionField::City)
            .suggestions()
            .is_empty());

        reduce_data_event(
            &mut state,
            DataEvent::CityLookupStarted {
                generation: generations[1],
            },
        );
        assert!(state.form().unwrap().autocomplete(SuggestionField::City).is_loading());
    }

    #[test]
    fn test_category_blur_closes_dropdown() {
        let mut state = AppState::new();
        let token = {
            let screen = businesses_screen(&mut state);
            screen.category.open(&[Candidate::new("Plumber")]);
            screen.category.blur()
        };

        reduce_data_event(
            &mut state,
            DataEvent::BlurGraceElapsed {
                target: BlurTarget::CategoryFilter,
                token,
            },
        );
        assert!(!businesses_screen(&mut state).category.is_open());
    }
}
