//! Popup for submitting a new business or editing one from the admin panel.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::autocomplete_input::AutocompleteInput;
use super::popup;
use crate::state::autocomplete::SuggestionField;
use crate::state::form::{BusinessFormState, FormField};
use crate::ui::{layouts, theme};

fn placeholder(field: FormField) -> &'static str {
    match field {
        FormField::Name => "Business name",
        FormField::Phone => "050-1234567",
        FormField::FieldOfWork => "e.g. Plumber",
        FormField::City => "Start typing a city",
        FormField::Notes => "Anything customers should know",
    }
}

pub fn render(f: &mut Frame, form: &BusinessFormState) {
    let title = if form.is_edit() {
        " Edit business "
    } else {
        " Add a business "
    };
    let popup = popup::render_popup_frame(
        f,
        f.area(),
        layouts::popup_sizes::FORM,
        title,
        theme::info_border_style(),
    );
    form.boundary.declare(popup.outer, None);

    let mut constraints: Vec<Constraint> = FormField::ALL
        .iter()
        .map(|_| Constraint::Length(theme::FORM_FIELD_HEIGHT))
        .collect();
    constraints.push(Constraint::Length(1)); // submit status
    constraints.push(Constraint::Min(0));
    constraints.push(Constraint::Length(1)); // hints

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(1)
        .constraints(constraints)
        .split(popup.inner);

    let mut anchors = Vec::new();
    for (field, area) in FormField::ALL.into_iter().zip(rows.iter()) {
        let input_area = render_field(f, form, field, *area);
        if let Some(sf) = field.suggestion_field() {
            anchors.push((sf, input_area));
        }
    }

    render_status(f, form, rows[FormField::ALL.len()]);

    let hints = if form.open_autocomplete().is_some() {
        "↑/↓: choose | Enter: pick | Esc: close list"
    } else {
        "Tab: next field | Enter: submit | Ctrl+L: clear field | Esc: cancel"
    };
    f.render_widget(
        Paragraph::new(hints).style(theme::help_text_style()),
        rows[rows.len() - 1],
    );

    // Dropdowns go last so they sit on top of the fields below them
    for (sf, anchor) in anchors {
        render_suggestions(f, form, sf, anchor);
    }
}

/// Label, input line and error line. Returns the input line area.
fn render_field(f: &mut Frame, form: &BusinessFormState, field: FormField, area: Rect) -> Rect {
    let [label_area, input_area, error_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

    let focused = form.focus == field;
    let label_style = if focused {
        theme::header_style()
    } else {
        theme::form_field_style()
    };
    f.render_widget(Span::styled(field.label(), label_style), label_area);

    let mut input = match field.suggestion_field() {
        Some(sf) => AutocompleteInput::from_state(form.autocomplete(sf), placeholder(field)),
        None => AutocompleteInput::new(form.value(field), placeholder(field)),
    };
    input = input.focused(focused);
    input.render_input(f, input_area);

    if let Some(error) = form.errors.get(field) {
        f.render_widget(Span::styled(error, theme::error_style()), error_area);
    }

    input_area
}

fn render_status(f: &mut Frame, form: &BusinessFormState, area: Rect) {
    let line = if form.submitting {
        Line::from(Span::styled("Saving...", theme::loading_style()))
    } else if let Some(error) = &form.submit_error {
        Line::from(Span::styled(error.as_str(), theme::error_style()))
    } else if !form.errors.is_empty() {
        Line::from(Span::styled(
            format!("Fix {} field(s) before submitting", form.errors.len()),
            theme::error_style(),
        ))
    } else {
        return;
    };
    f.render_widget(Paragraph::new(line), area);
}

fn render_suggestions(f: &mut Frame, form: &BusinessFormState, sf: SuggestionField, anchor: Rect) {
    let state = form.autocomplete(sf);
    let field = FormField::from(sf);
    let list = AutocompleteInput::from_state(state, placeholder(field))
        .focused(form.focus == field)
        .render_dropdown(f, anchor, f.area());
    state.boundary.declare(anchor, list);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::form::FieldChange;
    use crate::suggestions::Candidate;
    use crate::testing::buffer_lines;
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(form: &BusinessFormState) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(80, 40)).unwrap();
        terminal.draw(|f| render(f, form)).unwrap();
        buffer_lines(terminal.backend().buffer())
    }

    #[test]
    fn test_form_declares_its_areas() {
        let form = BusinessFormState::create();
        let lines = draw(&form);

        assert!(lines.iter().any(|l| l.contains("Add a business")));
        assert!(lines.iter().any(|l| l.contains("Field of work *")));
        let outer = form.boundary.anchor().unwrap();
        let city = form
            .autocomplete(SuggestionField::City)
            .boundary
            .anchor()
            .unwrap();
        assert!(outer.contains(city.as_position()));
    }

    #[test]
    fn test_field_errors_are_shown() {
        let mut form = BusinessFormState::create();
        form.errors.insert(FormField::Phone, "Phone is required");
        let lines = draw(&form);
        assert!(lines.iter().any(|l| l.contains("Phone is required")));
    }

    #[test]
    fn test_open_suggestions_render_over_the_form() {
        let mut form = BusinessFormState::create();
        let pool = [Candidate::new("Baker"), Candidate::new("Barber")];
        form.apply(FieldChange::new(FormField::FieldOfWork, "Ba"));
        form.set_focus(FormField::FieldOfWork, &pool);

        let lines = draw(&form);
        assert!(lines.iter().any(|l| l.contains("Barber")));

        let boundary = &form.autocomplete(SuggestionField::FieldOfWork).boundary;
        let anchor = boundary.anchor().unwrap();
        assert_eq!(boundary.item_at(anchor.x + 1, anchor.y + 2), Some(0));
    }
}
