use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem},
    Frame,
};

use crate::state::autocomplete::{AutocompleteState, SuggestionStatus};
use crate::suggestions::Candidate;
use crate::ui::{layouts, theme};

/// A text input with a suggestion dropdown overlay.
///
/// The input line and the dropdown are drawn in two steps so a form can paint
/// every input first and the open dropdown last, on top of everything else.
pub struct AutocompleteInput<'a> {
    /// The current draft
    pub value: &'a str,
    /// Placeholder text when value is empty
    pub placeholder: &'a str,
    /// Whether the input is focused
    pub is_focused: bool,
    /// Suggestions to show in the dropdown
    pub items: &'a [Candidate],
    /// Currently highlighted suggestion
    pub highlighted: Option<usize>,
    pub open: bool,
    pub status: SuggestionStatus,
}

impl<'a> AutocompleteInput<'a> {
    pub fn new(value: &'a str, placeholder: &'a str) -> Self {
        Self {
            value,
            placeholder,
            is_focused: false,
            items: &[],
            highlighted: None,
            open: false,
            status: SuggestionStatus::Idle,
        }
    }

    /// Everything the widget shows, taken from one autocomplete's state
    pub fn from_state(state: &'a AutocompleteState, placeholder: &'a str) -> Self {
        Self {
            value: state.query(),
            placeholder,
            is_focused: state.is_focused(),
            items: state.suggestions(),
            highlighted: state.highlighted(),
            open: state.is_open(),
            status: state.status(),
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.is_focused = focused;
        self
    }

    /// Render the input line
    pub fn render_input(&self, f: &mut Frame, area: Rect) {
        let (text, style) = if self.value.is_empty() {
            (self.placeholder, theme::muted_style())
        } else if self.is_focused {
            (self.value, theme::form_field_focused_style())
        } else {
            (self.value, theme::form_field_style())
        };

        f.render_widget(Clear, area);
        let mut spans = vec![Span::styled(text, style)];
        if self.is_focused {
            spans.push(Span::styled("▏", theme::form_field_focused_style()));
        }
        f.render_widget(Line::from(spans), area);
    }

    /// Status line shown in place of suggestions while nothing is listed
    fn status_line(&self) -> Option<&'static str> {
        if self.open || !self.is_focused {
            return None;
        }
        match self.status {
            SuggestionStatus::Idle => None,
            SuggestionStatus::Loading => Some("Loading..."),
            SuggestionStatus::NoResults => Some("No results"),
        }
    }

    /// Render the dropdown below `anchor` (or above it when it does not fit in
    /// `bounds`). Returns the area it took, if anything was drawn.
    pub fn render_dropdown(&self, f: &mut Frame, anchor: Rect, bounds: Rect) -> Option<Rect> {
        let status = self.status_line();
        let rows = if self.open {
            self.items.len()
        } else {
            usize::from(status.is_some())
        };
        let dropdown_area = layouts::dropdown_area(anchor, rows, bounds)?;

        f.render_widget(Clear, dropdown_area);

        let list_items: Vec<ListItem> = match status {
            Some(text) => vec![ListItem::new(Span::styled(text, theme::muted_style()))],
            None => self
                .items
                .iter()
                .enumerate()
                .map(|(i, candidate)| {
                    let style = if self.highlighted == Some(i) {
                        theme::selection_style()
                    } else {
                        Style::default()
                    };
                    let mut spans = vec![Span::styled(candidate.label.as_str(), style)];
                    if let Some(secondary) = &candidate.secondary_label {
                        spans.push(Span::styled(format!("  {}", secondary), theme::muted_style()));
                    }
                    ListItem::new(Line::from(spans))
                })
                .collect(),
        };

        let list = List::new(list_items).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme::muted_style()),
        );

        f.render_widget(list, dropdown_area);
        Some(dropdown_area)
    }
}
