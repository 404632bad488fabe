use super::autocomplete::InteractionBoundary;
use super::selection::{Navigation, Selection};
use crate::suggestions::Candidate;

/// Searchable field-of-work dropdown above the business list.
///
/// `selected` is the active category ("" for all fields). The search text only
/// narrows the option list; clearing it selects all fields.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryFilterState {
    search: String,
    selected: String,
    selection: Selection<String>,
    blur_counter: u64,
    pending_blur: Option<u64>,
    pub boundary: InteractionBoundary,
}

impl Default for CategoryFilterState {
    fn default() -> Self {
        Self {
            search: String::new(),
            selected: String::new(),
            selection: Selection::new(Navigation::Wrapping),
            blur_counter: 0,
            pending_blur: None,
            boundary: InteractionBoundary::default(),
        }
    }
}

impl CategoryFilterState {
    pub fn open(&mut self, pool: &[Candidate]) {
        self.pending_blur = None;
        self.refresh(pool);
        self.selection.open();
    }

    /// Rebuilds the option list from the pool. Unlike form suggestions this
    /// list is not capped.
    pub fn refresh(&mut self, pool: &[Candidate]) {
        let needle = self.search.to_lowercase();
        let options = pool
            .iter()
            .map(|candidate| candidate.label.clone())
            .filter(|label| label.to_lowercase().contains(&needle))
            .collect();
        self.selection.set_items(options);
    }

    pub fn set_search(&mut self, text: impl Into<String>, pool: &[Candidate]) {
        self.search = text.into();
        if self.search.is_empty() {
            self.selected.clear();
        }
        self.refresh(pool);
        if !self.selection.is_open() {
            self.selection.open();
        }
    }

    pub fn push_char(&mut self, c: char, pool: &[Candidate]) {
        let mut search = std::mem::take(&mut self.search);
        search.push(c);
        self.set_search(search, pool);
    }

    /// Backspace. On an empty search it drops the active category instead.
    pub fn pop_char(&mut self, pool: &[Candidate]) {
        let mut search = std::mem::take(&mut self.search);
        search.pop();
        self.set_search(search, pool);
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
        let field = self.selection.commit()?;
        Some(self.finish_commit(field))
    }

    pub fn commit_at(&mut self, index: usize) -> Option<String> {
        let field = self.selection.commit_at(index)?;
        Some(self.finish_commit(field))
    }

    fn finish_commit(&mut self, field: String) -> String {
        self.selected = field.clone();
        self.search.clear();
        self.pending_blur = None;
        field
    }

    /// Closes without changing the active category.
    pub fn close(&mut self) {
        self.search.clear();
        self.pending_blur = None;
        self.selection.close();
    }

    pub fn blur(&mut self) -> u64 {
        self.blur_counter += 1;
        self.pending_blur = Some(self.blur_counter);
        self.blur_counter
    }

    pub fn on_blur_elapsed(&mut self, token: u64) -> bool {
        if self.pending_blur != Some(token) {
            return false;
        }
        self.close();
        true
    }

    /// What the input line shows: the search text while typing, otherwise the
    /// active category.
    pub fn display_value(&self) -> &str {
        if self.selection.is_open() && !self.search.is_empty() {
            &self.search
        } else {
            &self.selected
        }
    }

    pub fn selected(&self) -> &str {
        &self.selected
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Marks the active category in the option list, unless the user is typing.
    pub fn is_selected(&self, field: &str) -> bool {
        self.search.is_empty() && self.selected == field
    }

    pub fn options(&self) -> &[String] {
        self.selection.items()
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.selection.highlighted()
    }

    pub fn is_open(&self) -> bool {
        self.selection.is_open()
    }
}
