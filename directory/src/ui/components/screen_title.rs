//! Shared screen title component with loading indicator.

use ratatui::prelude::Rect;
use ratatui::{
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::state::LoadingState;
use crate::ui::{layouts, theme};

/// Render a screen title with an optional status message after it and the
/// loading spinner in the top-right corner.
pub fn render_screen_title(
    f: &mut Frame,
    area: Rect,
    title: &str,
    status: Option<(&str, ratatui::style::Style)>,
    loading_state: &LoadingState,
) {
    let (title_area, indicator_area) = layouts::title_with_loading(area);

    let mut spans = vec![Span::styled(title, theme::title_style())];
    if let Some((message, style)) = status {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(message, style));
    } else if let LoadingState::Error(message) = loading_state {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(message.as_str(), theme::error_style()));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), title_area);

    super::loading_indicator::render_loading_indicator(f, indicator_area, loading_state);
}
