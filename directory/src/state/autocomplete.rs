use std::cell::Cell;
use std::time::Duration;

use ratatui::layout::{Position, Rect};

use super::selection::{Navigation, Selection};
use crate::suggestions::engine::{EngineConfig, FilterEngine, InputOutcome};
use crate::suggestions::{filter_candidates, Candidate, MAX_SUGGESTIONS};

/// Grace period between losing focus and closing an autocomplete, so a click
/// on a suggestion still lands.
pub const AUTOCOMPLETE_BLUR_GRACE: Duration = Duration::from_millis(200);

/// Same, for the category dropdown on the businesses screen.
pub const DROPDOWN_BLUR_GRACE: Duration = Duration::from_millis(150);

/// Form inputs that offer suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SuggestionField {
    FieldOfWork,
    City,
}

impl SuggestionField {
    pub fn engine_config(self) -> EngineConfig {
        match self {
            Self::FieldOfWork => EngineConfig::field_of_work(),
            Self::City => EngineConfig::city(),
        }
    }

    /// Key of the debounced filter pass in the task manager.
    pub fn debounce_key(self) -> &'static str {
        match self {
            Self::FieldOfWork => "suggest-field-of-work",
            Self::City => "suggest-city",
        }
    }

    pub fn blur_key(self) -> &'static str {
        match self {
            Self::FieldOfWork => "blur-field-of-work",
            Self::City => "blur-city",
        }
    }
}

/// Screen region owned by an open suggestion list: the input line it is
/// anchored to plus the list itself. Declared while rendering, read when a
/// pointer event arrives.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionBoundary {
    anchor: Cell<Option<Rect>>,
    list: Cell<Option<Rect>>,
    /// Index of the item on the list's first line.
    first_item: Cell<usize>,
}

impl InteractionBoundary {
    pub fn declare(&self, anchor: Rect, list: Option<Rect>) {
        self.declare_scrolled(anchor, list, 0);
    }

    /// Like [`InteractionBoundary::declare`] for a list scrolled past its
    /// first `first_item` entries.
    pub fn declare_scrolled(&self, anchor: Rect, list: Option<Rect>, first_item: usize) {
        self.anchor.set(Some(anchor));
        self.list.set(list);
        self.first_item.set(first_item);
    }

    pub fn reset(&self) {
        self.anchor.set(None);
        self.list.set(None);
        self.first_item.set(0);
    }

    pub fn anchor(&self) -> Option<Rect> {
        self.anchor.get()
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        let position = Position::new(column, row);
        [self.anchor.get(), self.list.get()]
            .into_iter()
            .flatten()
            .any(|area| area.contains(position))
    }

    /// Row offset of a pointer inside the bordered list, if it is on an item line.
    pub fn item_at(&self, column: u16, row: u16) -> Option<usize> {
        let list = self.list.get()?;
        let inner = Rect::new(
            list.x.saturating_add(1),
            list.y.saturating_add(1),
            list.width.saturating_sub(2),
            list.height.saturating_sub(2),
        );
        inner
            .contains(Position::new(column, row))
            .then(|| self.first_item.get() + usize::from(row - inner.y))
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionStatus {
    #[default]
    Idle,
    /// The pool is still being fetched for the pending pass.
    Loading,
    /// A pass ran against a loaded pool and matched nothing.
    NoResults,
}

/// One autocomplete input: a local draft of the query, the debounce engine
/// deciding when to filter, and the selection over the latest suggestion set.
///
/// The owning form keeps the committed value; this state only hands values
/// back through [`AutocompleteState::commit`] and friends.
#[derive(Debug, Clone, PartialEq)]
pub struct AutocompleteState {
    field: SuggestionField,
    draft: String,
    engine: FilterEngine,
    selection: Selection<Candidate>,
    status: SuggestionStatus,
    focused: bool,
    blur_counter: u64,
    pending_blur: Option<u64>,
    pub boundary: InteractionBoundary,
}

impl AutocompleteState {
    pub fn new(field: SuggestionField) -> Self {
        Self {
            field,
            draft: String::new(),
            engine: FilterEngine::new(field.engine_config()),
            selection: Selection::new(Navigation::Saturating),
            status: SuggestionStatus::Idle,
            focused: false,
            blur_counter: 0,
            pending_blur: None,
            boundary: InteractionBoundary::default(),
        }
    }

    pub fn with_value(field: SuggestionField, value: &str) -> Self {
        let mut state = Self::new(field);
        state.draft = value.to_string();
        state
    }

    pub fn field(&self) -> SuggestionField {
        self.field
    }

    pub fn query(&self) -> &str {
        &self.draft
    }

    /// The owning value changed from outside; start over from it.
    pub fn sync_value(&mut self, value: &str) {
        if self.draft == value {
            return;
        }
        self.draft = value.to_string();
        self.engine.cancel();
        self.selection.clear();
        self.status = SuggestionStatus::Idle;
    }

    pub fn on_input(&mut self, text: impl Into<String>) -> InputOutcome {
        self.draft = text.into();
        let outcome = self.engine.on_input(&self.draft);
        match outcome {
            InputOutcome::Suppressed => {
                self.selection.clear();
                self.status = SuggestionStatus::Idle;
            }
            InputOutcome::Scheduled(_) => self.selection.reset_highlight(),
        }
        outcome
    }

    /// The pass for `generation` is waiting on the pool.
    pub fn begin_lookup(&mut self, generation: u64) {
        if self.engine.is_current(generation) {
            self.status = SuggestionStatus::Loading;
        }
    }

    /// Applies the result of a finished pass. Stale or cancelled passes are
    /// dropped and leave the state untouched.
    pub fn apply_pass(
        &mut self,
        generation: u64,
        mut candidates: Vec<Candidate>,
        pool_loaded: bool,
    ) -> bool {
        if !self.engine.accept(generation) {
            tracing::debug!(
                "Dropping stale {:?} suggestions (generation {})",
                self.field,
                generation
            );
            return false;
        }

        candidates.truncate(MAX_SUGGESTIONS);
        self.status = if candidates.is_empty() && pool_loaded {
            SuggestionStatus::NoResults
        } else {
            SuggestionStatus::Idle
        };

        let has_items = !candidates.is_empty();
        self.selection.set_items(candidates);
        if has_items {
            self.selection.open();
        } else {
            self.selection.close();
        }
        true
    }

    /// Runs a due pass against an in-memory pool.
    pub fn run_pass(&mut self, generation: u64, pool: &[Candidate]) -> bool {
        let candidates = filter_candidates(pool, &self.draft);
        self.apply_pass(generation, candidates, !pool.is_empty())
    }

    /// Focus reopens an existing suggestion set. With an in-memory pool and no
    /// set yet, the current draft is filtered straight away.
    pub fn on_focus(&mut self, pool: Option<&[Candidate]>) {
        self.focused = true;
        self.pending_blur = None;

        if !self.selection.is_empty() {
            self.selection.open();
            return;
        }

        if let Some(pool) = pool {
            if self.engine.meets_minimum(&self.draft) {
                let candidates = filter_candidates(pool, &self.draft);
                if !candidates.is_empty() {
                    self.selection.set_items(candidates);
                    self.selection.open();
                }
            }
        }
    }

    /// Starts the blur grace period. The returned token must come back through
    /// [`AutocompleteState::on_blur_elapsed`].
    pub fn blur(&mut self) -> u64 {
        self.focused = false;
        self.blur_counter += 1;
        self.pending_blur = Some(self.blur_counter);
        self.blur_counter
    }

    pub fn on_blur_elapsed(&mut self, token: u64) -> bool {
        if self.pending_blur != Some(token) || self.focused {
            return false;
        }
        self.pending_blur = None;
        self.engine.cancel();
        self.selection.close();
        self.status = SuggestionStatus::Idle;
        true
    }

    /// Closes without committing.
    pub fn close(&mut self) {
        self.engine.cancel();
        self.selection.close();
        self.status = SuggestionStatus::Idle;
    }

    pub fn move_up(&mut self) {
        self.selection.move_up();
    }

    pub fn move_down(&mut self) {
        self.selection.move_down();
    }

    pub fn highlight(&mut self, index: usize) {
        self.selection.highlight(index);
    }

    pub fn commit(&mut self) -> Option<String> {
        let candidate = self.selection.commit()?;
        Some(self.finish_commit(candidate))
    }

    pub fn commit_at(&mut self, index: usize) -> Option<String> {
        let candidate = self.selection.commit_at(index)?;
        Some(self.finish_commit(candidate))
    }

    fn finish_commit(&mut self, candidate: Candidate) -> String {
        self.engine.cancel();
        self.status = SuggestionStatus::Idle;
        self.pending_blur = None;
        self.draft = candidate.label;
        self.draft.clone()
    }

    /// The input is going away: nothing scheduled may land afterwards.
    pub fn teardown(&mut self) {
        self.engine.cancel();
        self.selection.clear();
        self.status = SuggestionStatus::Idle;
        self.focused = false;
        self.pending_blur = None;
        self.boundary.reset();
    }

    pub fn suggestions(&self) -> &[Candidate] {
        self.selection.items()
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.selection.highlighted()
    }

    pub fn has_highlight(&self) -> bool {
        self.is_open() && self.selection.highlighted().is_some()
    }

    pub fn is_open(&self) -> bool {
        self.selection.is_open()
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_loading(&self) -> bool {
        self.status == SuggestionStatus::Loading
    }

    pub fn shows_no_results(&self) -> bool {
        self.status == SuggestionStatus::NoResults
    }

    pub fn status(&self) -> SuggestionStatus {
        self.status
    }

    pub fn pending_generation(&self) -> Option<u64> {
        self.engine.pending_generation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(labels: &[&str]) -> Vec<Candidate> {
        labels.iter().copied().map(Candidate::from).collect()
    }

    fn scheduled_generation(outcome: InputOutcome) -> u64 {
        match outcome {
            InputOutcome::Scheduled(pass) => pass.generation,
            InputOutcome::Suppressed => panic!("expected a scheduled pass"),
        }
    }

    fn labels(state: &AutocompleteState) -> Vec<&str> {
        state.suggestions().iter().map(|c| c.label.as_str()).collect()
    }

    // ========================================================================
    // Filter passes
    // ========================================================================

    #[test]
    fn test_short_query_clears_suggestions() {
        let mut state = AutocompleteState::new(SuggestionField::City);
        let generation = scheduled_generation(state.on_input("Ha"));
        state.run_pass(generation, &pool(&["Haifa"]));
        assert!(state.is_open());

        assert_eq!(state.on_input("H"), InputOutcome::Suppressed);
        assert!(state.suggestions().is_empty());
        assert!(!state.is_open());
        assert_eq!(state.pending_generation(), None);
    }

    #[test]
    fn test_city_pass_keeps_source_order() {
        let mut state = AutocompleteState::new(SuggestionField::City);
        let generation = scheduled_generation(state.on_input("tel"));
        state.run_pass(generation, &pool(&["Tel Aviv", "Telz Stone", "Haifa"]));

        assert_eq!(labels(&state), vec!["Tel Aviv", "Telz Stone"]);
        assert!(state.is_open());
        assert_eq!(state.highlighted(), None);
    }

    #[test]
    fn test_stale_pass_is_dropped() {
        let mut state = AutocompleteState::new(SuggestionField::FieldOfWork);
        let first = scheduled_generation(state.on_input("P"));
        let second = scheduled_generation(state.on_input("Pl"));

        assert!(!state.run_pass(first, &pool(&["Plumber", "Painter"])));
        assert!(state.suggestions().is_empty());
        assert!(state.run_pass(second, &pool(&["Plumber", "Painter"])));
        assert_eq!(labels(&state), vec!["Plumber"]);
    }

    #[test]
    fn test_oversized_result_is_capped() {
        let mut state = AutocompleteState::new(SuggestionField::City);
        let generation = scheduled_generation(state.on_input("kf"));
        let candidates = (0..20).map(|i| Candidate::new(format!("Kfar {i}"))).collect();
        state.apply_pass(generation, candidates, true);
        assert_eq!(state.suggestions().len(), MAX_SUGGESTIONS);
    }

    #[test]
    fn test_no_results_is_distinct_from_loading() {
        let mut state = AutocompleteState::new(SuggestionField::City);
        let generation = scheduled_generation(state.on_input("zz"));
        state.begin_lookup(generation);
        assert!(state.is_loading());
        assert!(!state.shows_no_results());

        state.apply_pass(generation, Vec::new(), true);
        assert!(!state.is_loading());
        assert!(state.shows_no_results());
        assert!(!state.is_open());
    }

    #[test]
    fn test_failed_pool_shows_nothing() {
        let mut state = AutocompleteState::new(SuggestionField::City);
        let generation = scheduled_generation(state.on_input("Haifa"));
        state.begin_lookup(generation);
        state.apply_pass(generation, Vec::new(), false);
        assert_eq!(state.status(), SuggestionStatus::Idle);
        assert!(state.suggestions().is_empty());
    }

    #[test]
    fn test_new_result_resets_highlight() {
        let mut state = AutocompleteState::new(SuggestionField::FieldOfWork);
        let pool = pool(&["Plumber", "Painter", "Pilot"]);
        let generation = scheduled_generation(state.on_input("p"));
        state.run_pass(generation, &pool);
        state.move_down();
        state.move_down();
        assert_eq!(state.highlighted(), Some(1));

        let generation = scheduled_generation(state.on_input("pi"));
        assert_eq!(state.highlighted(), None);
        state.run_pass(generation, &pool);
        assert_eq!(state.highlighted(), None);
    }

    // ========================================================================
    // Commit and close
    // ========================================================================

    #[test]
    fn test_commit_writes_label_and_closes() {
        let mut state = AutocompleteState::new(SuggestionField::City);
        let generation = scheduled_generation(state.on_input("ha"));
        state.run_pass(generation, &pool(&["Haifa", "Hadera"]));
        state.move_down();
        state.move_down();

        assert_eq!(state.commit().as_deref(), Some("Hadera"));
        assert_eq!(state.query(), "Hadera");
        assert!(!state.is_open());
        assert!(state.suggestions().is_empty());
    }

    #[test]
    fn test_commit_at_clicked_row() {
        let mut state = AutocompleteState::new(SuggestionField::City);
        let generation = scheduled_generation(state.on_input("ha"));
        state.run_pass(generation, &pool(&["Haifa", "Hadera"]));

        assert_eq!(state.commit_at(0).as_deref(), Some("Haifa"));
        assert_eq!(state.commit_at(0), None);
    }

    #[test]
    fn test_escape_closes_without_commit() {
        let mut state = AutocompleteState::new(SuggestionField::City);
        let generation = scheduled_generation(state.on_input("ha"));
        state.run_pass(generation, &pool(&["Haifa"]));
        state.move_down();

        state.close();
        assert!(!state.is_open());
        assert_eq!(state.query(), "ha");
        assert_eq!(state.commit(), None);
    }

    #[test]
    fn test_focus_reopens_existing_set() {
        let mut state = AutocompleteState::new(SuggestionField::City);
        state.on_focus(None);
        let generation = scheduled_generation(state.on_input("ha"));
        state.run_pass(generation, &pool(&["Haifa"]));
        state.close();

        state.on_focus(None);
        assert!(state.is_open());
    }

    #[test]
    fn test_focus_filters_in_memory_pool() {
        let mut state = AutocompleteState::with_value(SuggestionField::FieldOfWork, "elec");
        state.on_focus(Some(&pool(&["Electrician", "Plumber"])));
        assert_eq!(labels(&state), vec!["Electrician"]);
        assert!(state.is_open());
    }

    #[test]
    fn test_blur_closes_after_grace_only_for_latest_token() {
        let mut state = AutocompleteState::new(SuggestionField::City);
        state.on_focus(None);
        let generation = scheduled_generation(state.on_input("ha"));
        state.run_pass(generation, &pool(&["Haifa"]));

        let first = state.blur();
        state.on_focus(None);
        let second = state.blur();

        assert!(!state.on_blur_elapsed(first));
        assert!(state.is_open());
        assert!(state.on_blur_elapsed(second));
        assert!(!state.is_open());
    }

    #[test]
    fn test_click_during_grace_still_commits() {
        let mut state = AutocompleteState::new(SuggestionField::City);
        state.on_focus(None);
        let generation = scheduled_generation(state.on_input("ha"));
        state.run_pass(generation, &pool(&["Haifa"]));

        let token = state.blur();
        assert_eq!(state.commit_at(0).as_deref(), Some("Haifa"));
        assert!(!state.on_blur_elapsed(token));
    }

    #[test]
    fn test_teardown_rejects_pending_pass() {
        let mut state = AutocompleteState::new(SuggestionField::City);
        let generation = scheduled_generation(state.on_input("Haifa"));
        state.teardown();

        assert!(!state.run_pass(generation, &pool(&["Haifa"])));
        assert!(state.suggestions().is_empty());
        assert!(!state.is_open());
    }

    #[test]
    fn test_sync_value_replaces_draft() {
        let mut state = AutocompleteState::new(SuggestionField::City);
        let generation = scheduled_generation(state.on_input("ha"));
        state.sync_value("Eilat");
        assert_eq!(state.query(), "Eilat");
        assert!(!state.run_pass(generation, &pool(&["Haifa"])));
    }

    // ========================================================================
    // Interaction boundary
    // ========================================================================

    #[test]
    fn test_boundary_covers_anchor_and_list() {
        let boundary = InteractionBoundary::default();
        assert!(!boundary.contains(5, 5));

        boundary.declare(Rect::new(10, 4, 20, 1), Some(Rect::new(10, 5, 20, 5)));
        assert!(boundary.contains(10, 4));
        assert!(boundary.contains(29, 9));
        assert!(!boundary.contains(30, 9));
        assert!(!boundary.contains(10, 10));

        boundary.reset();
        assert!(!boundary.contains(10, 4));
    }

    #[test]
    fn test_boundary_maps_rows_to_items() {
        let boundary = InteractionBoundary::default();
        boundary.declare(Rect::new(10, 4, 20, 1), Some(Rect::new(10, 5, 20, 5)));

        // Border rows are not items
        assert_eq!(boundary.item_at(15, 5), None);
        assert_eq!(boundary.item_at(15, 6), Some(0));
        assert_eq!(boundary.item_at(15, 8), Some(2));
        assert_eq!(boundary.item_at(15, 9), None);
        assert_eq!(boundary.item_at(10, 6), None);
    }

    #[test]
    fn test_scrolled_boundary_offsets_items() {
        let boundary = InteractionBoundary::default();
        boundary.declare_scrolled(Rect::new(0, 0, 20, 3), Some(Rect::new(0, 3, 20, 5)), 7);
        assert_eq!(boundary.item_at(2, 4), Some(7));
        assert_eq!(boundary.item_at(2, 6), Some(9));

        boundary.reset();
        assert_eq!(boundary.item_at(2, 4), None);
        assert!(!boundary.contains(2, 1));
    }
}
