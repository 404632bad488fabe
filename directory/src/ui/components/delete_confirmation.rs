use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use directory_api::endpoints::businesses::Business;

use crate::ui::{layouts, theme};

/// Render a confirmation popup for deleting a business
pub fn render_delete_confirmation(f: &mut Frame, business: &Business) {
    let inner = super::popup::render_popup_frame(
        f,
        f.area(),
        layouts::popup_sizes::SMALL,
        " Confirm Delete ",
        theme::danger_border_style(),
    )
    .inner;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1), // Question
            Constraint::Length(1), // Business summary
            Constraint::Length(1), // Empty line
            Constraint::Length(1), // Instructions
        ])
        .split(inner);

    let warning = Paragraph::new("Delete this business permanently?")
        .style(theme::loading_style().add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    f.render_widget(warning, chunks[0]);

    let summary = Paragraph::new(format!("{} ({})", business.name, business.field_of_work))
        .style(theme::title_style())
        .alignment(Alignment::Center);
    f.render_widget(summary, chunks[1]);

    let instructions = Line::from(vec![
        Span::styled(
            "[Y]es ",
            Style::default()
                .fg(theme::COLOR_ERROR)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("/ "),
        Span::styled(
            "[N]o ",
            Style::default()
                .fg(theme::COLOR_SUCCESS)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("/ "),
        Span::styled("[Esc]", Style::default().fg(theme::COLOR_HELP_TEXT)),
        Span::raw(" Cancel"),
    ]);
    let instructions_para = Paragraph::new(instructions).alignment(Alignment::Center);
    f.render_widget(instructions_para, chunks[3]);
}
