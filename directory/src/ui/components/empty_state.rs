//! Placeholder shown in place of a list that has nothing to display.

use ratatui::prelude::Rect;
use ratatui::{
    layout::Alignment,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::theme;

/// Render a centered message inside a titled block.
///
/// # Arguments
/// * `title` - The block title (e.g., "Businesses")
/// * `message` - The message to display (e.g., "No businesses yet")
/// * `hint` - Optional hint text below the message
pub fn render_empty_state(
    f: &mut Frame,
    area: Rect,
    title: &str,
    message: &str,
    hint: Option<&str>,
) {
    render_centered(f, area, title, message, theme::loading_style(), hint);
}

/// Same frame, for a failed first load.
pub fn render_error_state(f: &mut Frame, area: Rect, title: &str, message: &str) {
    render_centered(
        f,
        area,
        title,
        message,
        theme::error_style(),
        Some("Press r to retry"),
    );
}

fn render_centered(
    f: &mut Frame,
    area: Rect,
    title: &str,
    message: &str,
    style: Style,
    hint: Option<&str>,
) {
    let mut lines = vec![Line::from(""), Line::from(Span::styled(message, style))];
    if let Some(hint) = hint {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(hint, theme::help_text_style())));
    }

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(title));

    f.render_widget(paragraph, area);
}
