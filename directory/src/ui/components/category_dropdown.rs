//! Searchable field-of-work filter on the businesses screen.

use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

use crate::state::category_filter::CategoryFilterState;
use crate::ui::theme;

const ALL_FIELDS: &str = "All fields";

/// Render the closed input box. `active` marks keyboard focus.
pub fn render_input(f: &mut Frame, area: Rect, category: &CategoryFilterState, active: bool) {
    let value = category.display_value();
    let text = if value.is_empty() {
        Span::styled(ALL_FIELDS, theme::muted_style())
    } else {
        Span::styled(value, theme::loading_style())
    };
    let arrow = if category.is_open() { " ▴" } else { " ▾" };

    let input = Paragraph::new(Line::from(vec![text, Span::styled(arrow, theme::muted_style())]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme::input_border_style(active))
                .title("Field of work (f)"),
        );
    f.render_widget(input, area);
}

/// Render the option list under `anchor` when open and declare both areas for
/// pointer hit-testing. Call after everything it may cover has been drawn.
pub fn render_options(f: &mut Frame, anchor: Rect, category: &CategoryFilterState) {
    if !category.is_open() {
        category.boundary.declare(anchor, None);
        return;
    }

    let options = category.options();
    let space = f.area().bottom().saturating_sub(anchor.bottom());
    let visible = options.len().max(1).min(usize::from(space.saturating_sub(2)));
    if visible == 0 {
        category.boundary.declare(anchor, None);
        return;
    }

    let first = match category.highlighted() {
        Some(index) if index >= visible => index + 1 - visible,
        _ => 0,
    };
    let height = u16::try_from(visible).unwrap_or(u16::MAX) + 2;
    let area = Rect::new(anchor.x, anchor.bottom(), anchor.width, height);

    let items: Vec<ListItem> = if options.is_empty() {
        vec![ListItem::new(Span::styled(
            "No matching fields",
            theme::muted_style(),
        ))]
    } else {
        options
            .iter()
            .enumerate()
            .skip(first)
            .take(visible)
            .map(|(i, option)| {
                let style = if category.highlighted() == Some(i) {
                    theme::selection_style()
                } else {
                    Style::default()
                };
                let marker = if category.is_selected(option) { "✓ " } else { "  " };
                ListItem::new(Line::from(vec![
                    Span::styled(marker, theme::success_style()),
                    Span::styled(option.as_str(), style),
                ]))
            })
            .collect()
    };

    f.render_widget(Clear, area);
    f.render_widget(
        List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme::accent_border_style()),
        ),
        area,
    );
    category.boundary.declare_scrolled(anchor, Some(area), first);
}
