//! Free-text search input shown above the business lists.

use ratatui::prelude::Rect;
use ratatui::{
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::theme;

/// Render the search input with the current query.
///
/// While the query is empty and the input is idle a muted placeholder is shown.
pub fn render_search_input(f: &mut Frame, area: Rect, query: &str, active: bool) {
    let input = if query.is_empty() && !active {
        Paragraph::new("Search by name, field, city or notes").style(theme::muted_style())
    } else {
        Paragraph::new(query).style(theme::loading_style())
    };

    let title = if active {
        "Search (Enter: keep, Esc: clear)"
    } else {
        "Search (/)"
    };

    f.render_widget(
        input.block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme::input_border_style(active))
                .title(title),
        ),
        area,
    );
}
