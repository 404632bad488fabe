pub mod autocomplete;
pub mod category_filter;
pub mod form;
pub mod list_filter;
pub mod reducer;
pub mod selection;
pub mod validators;

use crate::session::AdminSession;
use crate::suggestions::fields::FieldOfWorkSource;
use crate::ui::screens::Screen;
use category_filter::CategoryFilterState;
use directory_api::endpoints::{businesses::Business, BusinessId};
use form::BusinessFormState;
use ratatui::widgets::TableState;
use std::cell::RefCell;
use throbber_widgets_tui::ThrobberState;

/// Represents loading state separate from data state
#[derive(Default, Debug, Clone, PartialEq)]
pub enum LoadingState {
    #[default]
    NotStarted,
    Loading(ThrobberState),
    Loaded,
    Error(String),
}

impl LoadingState {
    pub fn loading() -> Self {
        Self::Loading(ThrobberState::default())
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading(_))
    }
}

/// Represents input mode for screens that support editing
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    #[default]
    Normal,
    Search,
    CategoryFilter,
    BusinessForm,
    DeleteConfirmation,
}

pub struct AppState {
    // Navigation stack
    pub history: Vec<Screen>,

    // Logged-in admin, if any
    pub session: Option<AdminSession>,

    // UI state
    pub help_visible: bool,
    pub pending_key: Option<char>,

    // System
    pub should_quit: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            history: vec![Screen::Businesses(Box::default())],
            session: None,
            help_visible: false,
            pending_key: None,
            should_quit: false,
        }
    }

    /// Get the current screen (last in navigation stack)
    pub fn current_screen(&self) -> &Screen {
        self.history
            .last()
            .expect("Navigation stack should never be empty")
    }

    /// Get mutable reference to current screen
    pub fn current_screen_mut(&mut self) -> &mut Screen {
        self.history
            .last_mut()
            .expect("Navigation stack should never be empty")
    }

    /// Navigate to a new screen (push to stack)
    pub fn navigate_to(&mut self, screen: Screen) {
        tracing::debug!(
            "Navigating to new screen, stack depth: {} -> {}",
            self.history.len(),
            self.history.len() + 1
        );
        self.history.push(screen);
    }

    /// Navigate back (pop from stack)
    /// Returns true if navigation succeeded, false if already at root
    pub fn navigate_back(&mut self) -> bool {
        if self.history.len() > 1 {
            tracing::debug!(
                "Navigating back, stack depth: {} -> {}",
                self.history.len(),
                self.history.len() - 1
            );
            if let Some(mut screen) = self.history.pop() {
                if let Some(form) = screen.form_mut() {
                    form.teardown();
                }
            }
            true
        } else {
            tracing::debug!("Cannot navigate back, already at root screen");
            false
        }
    }

    pub fn loading_state(&mut self) -> Option<&mut ThrobberState> {
        let loading = match self.current_screen_mut() {
            Screen::Businesses(state) => &mut state.loading,
            Screen::Admin(state) => &mut state.loading,
            Screen::Logs(_) => return None,
        };
        match loading {
            LoadingState::Loading(throbber_state) => Some(throbber_state),
            _ => None,
        }
    }

    /// The businesses screen, wherever it sits in the stack
    pub fn businesses_screen_mut(&mut self) -> Option<&mut BusinessesState> {
        self.history.iter_mut().find_map(|screen| match screen {
            Screen::Businesses(state) => Some(state.as_mut()),
            _ => None,
        })
    }

    pub fn admin_screen_mut(&mut self) -> Option<&mut AdminState> {
        self.history.iter_mut().find_map(|screen| match screen {
            Screen::Admin(state) => Some(state.as_mut()),
            _ => None,
        })
    }

    /// Every loaded copy of the business collection
    pub fn collections_mut(&mut self) -> impl Iterator<Item = &mut BusinessCollection> {
        self.history.iter_mut().filter_map(|screen| match screen {
            Screen::Businesses(state) => Some(&mut state.collection),
            Screen::Admin(state) => Some(&mut state.collection),
            Screen::Logs(_) => None,
        })
    }

    /// The open form on the current screen, with the field-of-work pool it
    /// suggests from
    pub fn form_context_mut(&mut self) -> Option<(&mut BusinessFormState, &FieldOfWorkSource)> {
        match self.current_screen_mut() {
            Screen::Businesses(state) => {
                let state = state.as_mut();
                state.form.as_mut().map(|form| (form, &state.collection.fields))
            }
            Screen::Admin(state) => {
                let state = state.as_mut();
                state.form.as_mut().map(|form| (form, &state.collection.fields))
            }
            Screen::Logs(_) => None,
        }
    }

    pub fn form(&self) -> Option<&BusinessFormState> {
        self.current_screen().form()
    }

    pub fn is_admin(&self) -> bool {
        self.session.is_some()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Loaded records plus the field-of-work pool derived from them.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct BusinessCollection {
    businesses: Vec<Business>,
    fields: FieldOfWorkSource,
}

impl BusinessCollection {
    /// Replaces everything; records are kept newest first.
    pub fn replace_all(&mut self, mut businesses: Vec<Business>) {
        businesses.sort();
        self.fields = FieldOfWorkSource::from_businesses(&businesses);
        self.businesses = businesses;
    }

    pub fn prepend(&mut self, business: Business) {
        self.fields.insert(&business.field_of_work);
        self.businesses.retain(|b| b.id != business.id);
        self.businesses.insert(0, business);
    }

    pub fn replace(&mut self, business: Business) {
        self.fields.insert(&business.field_of_work);
        if let Some(existing) = self.businesses.iter_mut().find(|b| b.id == business.id) {
            *existing = business;
        }
    }

    pub fn remove(&mut self, business_id: BusinessId) -> bool {
        let before = self.businesses.len();
        self.businesses.retain(|b| b.id != business_id);
        self.businesses.len() != before
    }

    pub fn get(&self, business_id: BusinessId) -> Option<&Business> {
        self.businesses.iter().find(|b| b.id == business_id)
    }

    pub fn businesses(&self) -> &[Business] {
        &self.businesses
    }

    pub fn fields(&self) -> &FieldOfWorkSource {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.businesses.is_empty()
    }
}

/// Public listing
#[derive(Default, Debug, Clone)]
pub struct BusinessesState {
    pub collection: BusinessCollection,
    pub loading: LoadingState,
    pub table_state: RefCell<TableState>,
    pub input_mode: InputMode,
    pub search_query: String,
    pub category: CategoryFilterState,
    pub form: Option<BusinessFormState>,
    /// One-line confirmation shown after a submission
    pub notice: Option<String>,
}

impl BusinessesState {
    pub fn visible(&self) -> Vec<&Business> {
        list_filter::apply(
            self.collection.businesses(),
            &self.search_query,
            self.category.selected(),
        )
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub enum LoginField {
    #[default]
    Email,
    Password,
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct LoginFormState {
    pub email: String,
    pub password: String,
    pub focus: LoginField,
    pub error: Option<String>,
    pub submitting: bool,
}

impl LoginFormState {
    pub fn focused_value_mut(&mut self) -> &mut String {
        match self.focus {
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
        }
    }
}

/// Admin panel: login form until a session exists, then the full list
#[derive(Default, Debug, Clone)]
pub struct AdminState {
    pub login: LoginFormState,
    pub collection: BusinessCollection,
    pub loading: LoadingState,
    pub table_state: RefCell<TableState>,
    pub input_mode: InputMode,
    pub search_query: String,
    pub form: Option<BusinessFormState>,
    pub delete_confirmation: Option<BusinessId>,
    pub error: Option<String>,
}

impl AdminState {
    pub fn visible(&self) -> Vec<&Business> {
        list_filter::apply(self.collection.businesses(), &self.search_query, "")
    }
}

#[derive(Default, Debug, Clone)]
pub struct LogsState {
    pub scroll_offset: usize,
    pub total_entries: usize,
}

pub trait Scrollable {
    fn num_items(&self) -> usize;
    fn table_state(&self) -> &RefCell<TableState>;

    fn select_prev(&mut self) {
        let mut table_state = self.table_state().borrow_mut();
        if self.num_items() > 0 {
            if table_state.selected().unwrap_or(0) == 0 {
                table_state.select_last();
            } else {
                table_state.scroll_up_by(1)
            }
        }
    }

    fn select_next(&mut self) {
        let num_items = self.num_items();
        let mut table_state = self.table_state().borrow_mut();
        if num_items > 0 {
            if table_state.selected().unwrap_or(num_items - 1) == num_items - 1 {
                table_state.select_first();
            } else {
                table_state.scroll_down_by(1)
            }
        }
    }

    fn select_top(&mut self) {
        if self.num_items() > 0 {
            self.table_state().borrow_mut().select(Some(0));
        }
    }

    fn select_bottom(&mut self) {
        let num_items = self.num_items();
        if num_items > 0 {
            self.table_state().borrow_mut().select(Some(num_items - 1));
        }
    }

    /// Keeps the row selection inside the visible rows after they change
    fn clamp_selection(&mut self) {
        let num_items = self.num_items();
        let mut table_state = self.table_state().borrow_mut();
        match (num_items, table_state.selected()) {
            (0, _) => table_state.select(None),
            (n, Some(i)) if i >= n => table_state.select(Some(n - 1)),
            (_, None) => table_state.select(Some(0)),
            _ => {}
        }
    }
}

impl Scrollable for BusinessesState {
    fn num_items(&self) -> usize {
        self.visible().len()
    }

    fn table_state(&self) -> &RefCell<TableState> {
        &self.table_state
    }
}

impl Scrollable for AdminState {
    fn num_items(&self) -> usize {
        self.visible().len()
    }

    fn table_state(&self) -> &RefCell<TableState> {
        &self.table_state
    }
}

impl AdminState {
    pub fn selected_business(&self) -> Option<&Business> {
        let index = self.table_state.borrow().selected()?;
        self.visible().get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use directory_api::endpoints::businesses::NewBusiness;

    fn business(name: &str, field_of_work: &str, created_secs: i64) -> Business {
        Business::from_new(
            NewBusiness::new(name, "050", field_of_work),
            Utc.timestamp_opt(created_secs, 0).unwrap(),
        )
    }

    // ========================================================================
    // Business collection
    // ========================================================================

    #[test]
    fn test_replace_all_sorts_newest_first_and_builds_pool() {
        let mut collection = BusinessCollection::default();
        collection.replace_all(vec![
            business("Old", "Plumber", 10),
            business("New", "Baker", 20),
        ]);
        assert_eq!(collection.businesses()[0].name, "New");
        assert_eq!(collection.fields().len(), 2);
    }

    #[test]
    fn test_prepend_adds_new_field_to_pool() {
        let mut collection = BusinessCollection::default();
        collection.replace_all(vec![business("Old", "Plumber", 10)]);
        collection.prepend(business("Fresh", "Welder", 30));

        assert_eq!(collection.businesses()[0].name, "Fresh");
        let labels: Vec<_> = collection.fields().load().iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["Plumber", "Welder"]);
    }

    #[test]
    fn test_replace_and_remove_by_id() {
        let mut collection = BusinessCollection::default();
        let original = business("Cohen", "Plumber", 10);
        let id = original.id;
        collection.replace_all(vec![original.clone()]);

        let mut updated = original;
        updated.city = "Haifa".to_string();
        collection.replace(updated);
        assert_eq!(collection.get(id).unwrap().city, "Haifa");

        assert!(collection.remove(id));
        assert!(!collection.remove(id));
        assert!(collection.is_empty());
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    #[test]
    fn test_root_screen_cannot_be_popped() {
        let mut state = AppState::new();
        assert!(!state.navigate_back());
        state.navigate_to(Screen::Logs(LogsState::default()));
        assert!(state.navigate_back());
        assert!(matches!(state.current_screen(), Screen::Businesses(_)));
    }

    #[test]
    fn test_selection_clamps_to_visible_rows() {
        let mut screen = BusinessesState::default();
        screen.collection.replace_all(vec![
            business("Cohen", "Plumber", 10),
            business("Levi", "Electrician", 20),
        ]);
        screen.select_bottom();
        assert_eq!(screen.table_state.borrow().selected(), Some(1));

        screen.search_query = "cohen".to_string();
        screen.clamp_selection();
        assert_eq!(screen.table_state.borrow().selected(), Some(0));

        screen.search_query = "nobody".to_string();
        screen.clamp_selection();
        assert_eq!(screen.table_state.borrow().selected(), None);
    }
}
