use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Row, Table},
};

use directory_api::endpoints::businesses::Business;

use crate::state::{BusinessesState, InputMode, LoadingState};
use crate::ui::{
    components::{category_dropdown, empty_state, filter_input, help_bar, screen_title},
    layouts, theme,
};

pub fn render(f: &mut Frame, state: &BusinessesState) {
    let (title_area, filter_area, content_area, help_area) =
        layouts::screen_layout_with_filter(f.area());
    let (search_area, category_area) = layouts::filter_bar(filter_area);

    let notice = state
        .notice
        .as_deref()
        .map(|notice| (notice, theme::success_style()));
    screen_title::render_screen_title(
        f,
        title_area,
        "Community Business Directory",
        notice,
        &state.loading,
    );

    filter_input::render_search_input(
        f,
        search_area,
        &state.search_query,
        state.input_mode == InputMode::Search,
    );
    category_dropdown::render_input(
        f,
        category_area,
        &state.category,
        state.input_mode == InputMode::CategoryFilter,
    );

    render_content(f, content_area, state);
    help_bar::render_help_bar(f, help_area, help_bar::HELP_TEXT_BUSINESSES);

    // Drawn last: the open list covers the table
    category_dropdown::render_options(f, category_area, &state.category);
}

fn render_content(f: &mut Frame, area: Rect, state: &BusinessesState) {
    if state.collection.is_empty() {
        match &state.loading {
            LoadingState::Loading(..) => {
                empty_state::render_empty_state(
                    f,
                    area,
                    "Businesses",
                    "Loading businesses...",
                    None,
                );
            }
            LoadingState::Error(message) => {
                empty_state::render_error_state(f, area, "Businesses", message);
            }
            _ => empty_state::render_empty_state(
                f,
                area,
                "Businesses",
                "No businesses yet",
                Some("Press n to add the first one"),
            ),
        }
        return;
    }

    let visible = state.visible();
    if visible.is_empty() {
        empty_state::render_empty_state(
            f,
            area,
            "Businesses",
            "No businesses match",
            Some("Esc clears the search"),
        );
        return;
    }

    let filtered = !state.search_query.is_empty() || !state.category.selected().is_empty();
    let title = if filtered {
        format!(
            "Businesses ({} of {})",
            visible.len(),
            state.collection.businesses().len()
        )
    } else {
        format!("Businesses ({})", visible.len())
    };

    let table = business_table(&visible)
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(theme::selection_style());

    f.render_stateful_widget(table, area, &mut state.table_state.borrow_mut());
}

/// Columns shared by the public listing and the admin panel
pub fn business_table<'a>(businesses: &[&'a Business]) -> Table<'a> {
    let header = Row::new(vec![
        Cell::from("Name"),
        Cell::from("Field of work"),
        Cell::from("City"),
        Cell::from("Phone"),
        Cell::from("Notes"),
    ])
    .style(theme::header_style())
    .underlined();

    let rows: Vec<Row> = businesses
        .iter()
        .map(|business| {
            Row::new(vec![
                Cell::from(business.name.as_str()),
                Cell::from(business.field_of_work.as_str()),
                Cell::from(business.city.as_str()),
                Cell::from(business.phone.as_str()),
                Cell::from(business.notes.as_str()).style(theme::help_text_style()),
            ])
        })
        .collect();

    Table::new(
        rows,
        [
            Constraint::Percentage(22),
            Constraint::Percentage(18),
            Constraint::Percentage(15),
            Constraint::Percentage(15),
            Constraint::Percentage(30),
        ],
    )
    .header(header)
}
