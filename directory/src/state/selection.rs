/// How arrow keys behave at the ends of the list.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Down stops at the last item; up from the first clears the highlight.
    #[default]
    Saturating,
    /// Down from the last goes to the first; up from the first (or from no
    /// highlight) goes to the last.
    Wrapping,
}

/// Open/closed state and highlighted index over a suggestion set.
///
/// The highlight is always `None` or a valid index into `items`, and is
/// reset whenever the items are replaced.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<T> {
    items: Vec<T>,
    open: bool,
    highlighted: Option<usize>,
    navigation: Navigation,
}

impl<T: Clone> Default for Selection<T> {
    fn default() -> Self {
        Self::new(Navigation::default())
    }
}

impl<T: Clone> Selection<T> {
    pub fn new(navigation: Navigation) -> Self {
        Self {
            items: Vec::new(),
            open: false,
            highlighted: None,
            navigation,
        }
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn highlighted_item(&self) -> Option<&T> {
        self.highlighted.and_then(|i| self.items.get(i))
    }

    /// Replaces the items. The open flag is left to the caller.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.highlighted = None;
    }

    pub fn open(&mut self) {
        self.open = true;
        self.highlighted = None;
    }

    /// Closes without committing; the items stay so focus can reopen them.
    pub fn close(&mut self) {
        self.open = false;
        self.highlighted = None;
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.close();
    }

    pub fn reset_highlight(&mut self) {
        self.highlighted = None;
    }

    pub fn move_down(&mut self) {
        if !self.open || self.items.is_empty() {
            return;
        }
        let last = self.items.len() - 1;
        self.highlighted = Some(match (self.highlighted, self.navigation) {
            (None, _) => 0,
            (Some(i), _) if i < last => i + 1,
            (Some(_), Navigation::Saturating) => last,
            (Some(_), Navigation::Wrapping) => 0,
        });
    }

    pub fn move_up(&mut self) {
        if !self.open || self.items.is_empty() {
            return;
        }
        let last = self.items.len() - 1;
        self.highlighted = match (self.highlighted, self.navigation) {
            (Some(i), _) if i > 0 => Some(i - 1),
            (_, Navigation::Saturating) => None,
            (_, Navigation::Wrapping) => Some(last),
        };
    }

    /// Pointer hover. Out-of-range indices are ignored.
    pub fn highlight(&mut self, index: usize) {
        if self.open && index < self.items.len() {
            self.highlighted = Some(index);
        }
    }

    /// Commits the highlighted item: returns it and leaves the selection
    /// empty and closed.
    pub fn commit(&mut self) -> Option<T> {
        let index = self.highlighted?;
        self.commit_at(index)
    }

    pub fn commit_at(&mut self, index: usize) -> Option<T> {
        if !self.open {
            return None;
        }
        let item = self.items.get(index).cloned()?;
        self.clear();
        Some(item)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_selection(navigation: Navigation, items: &[&str]) -> Selection<String> {
        let mut selection = Selection::new(navigation);
        selection.set_items(items.iter().map(|s| s.to_string()).collect());
        selection.open();
        selection
    }

    #[test]
    fn test_default_is_closed_and_saturating() {
        let mut selection: Selection<String> = Selection::default();
        assert!(!selection.is_open());
        assert!(selection.is_empty());
        selection.set_items(vec!["a".to_string()]);
        selection.open();
        selection.move_down();
        selection.move_down();
        assert_eq!(selection.highlighted(), Some(0));
    }

    #[test]
    fn test_saturating_down_stops_at_last() {
        let mut selection = open_selection(Navigation::Saturating, &["a", "b", "c"]);
        selection.move_down();
        assert_eq!(selection.highlighted(), Some(0));
        selection.move_down();
        selection.move_down();
        selection.move_down();
        assert_eq!(selection.highlighted(), Some(2));
    }

    #[test]
    fn test_saturating_up_from_first_clears_highlight() {
        let mut selection = open_selection(Navigation::Saturating, &["a", "b"]);
        selection.move_down();
        selection.move_up();
        assert_eq!(selection.highlighted(), None);
        selection.move_up();
        assert_eq!(selection.highlighted(), None);
    }

    #[test]
    fn test_wrapping_navigation() {
        let mut selection = open_selection(Navigation::Wrapping, &["a", "b", "c"]);
        selection.move_up();
        assert_eq!(selection.highlighted(), Some(2));
        selection.move_down();
        assert_eq!(selection.highlighted(), Some(0));
        selection.move_up();
        assert_eq!(selection.highlighted(), Some(2));
        selection.move_up();
        assert_eq!(selection.highlighted(), Some(1));
    }

    #[test]
    fn test_navigation_ignored_while_closed_or_empty() {
        let mut closed = Selection::<String>::new(Navigation::Saturating);
        closed.set_items(vec!["a".to_string()]);
        closed.move_down();
        assert_eq!(closed.highlighted(), None);

        let mut empty = open_selection(Navigation::Wrapping, &[]);
        empty.move_down();
        empty.move_up();
        assert_eq!(empty.highlighted(), None);
    }

    #[test]
    fn test_replacing_items_resets_highlight() {
        let mut selection = open_selection(Navigation::Saturating, &["a", "b", "c"]);
        selection.move_down();
        selection.move_down();
        selection.set_items(vec!["x".to_string()]);
        assert_eq!(selection.highlighted(), None);
        assert!(selection.highlighted_item().is_none());
    }

    #[test]
    fn test_commit_returns_item_and_closes() {
        let mut selection = open_selection(Navigation::Saturating, &["Haifa", "Hadera"]);
        selection.move_down();
        selection.move_down();

        assert_eq!(selection.commit().as_deref(), Some("Hadera"));
        assert!(!selection.is_open());
        assert!(selection.is_empty());
        assert_eq!(selection.highlighted(), None);
    }

    #[test]
    fn test_commit_without_highlight_does_nothing() {
        let mut selection = open_selection(Navigation::Saturating, &["Haifa"]);
        assert_eq!(selection.commit(), None);
        assert!(selection.is_open());
    }

    #[test]
    fn test_hover_and_click_bounds() {
        let mut selection = open_selection(Navigation::Saturating, &["a", "b"]);
        selection.highlight(5);
        assert_eq!(selection.highlighted(), None);
        selection.highlight(1);
        assert_eq!(selection.highlighted(), Some(1));

        assert_eq!(selection.commit_at(7), None);
        assert_eq!(selection.commit_at(0).as_deref(), Some("a"));
    }

    #[test]
    fn test_close_keeps_items_for_reopen() {
        let mut selection = open_selection(Navigation::Saturating, &["a"]);
        selection.move_down();
        selection.close();
        assert_eq!(selection.highlighted(), None);
        assert_eq!(selection.len(), 1);
        selection.open();
        assert!(selection.is_open());
    }
}
