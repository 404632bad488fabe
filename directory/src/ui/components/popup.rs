//! Shared popup/modal base component.

use ratatui::prelude::Rect;
use ratatui::{
    layout::Alignment,
    style::Style,
    widgets::{Block, Borders, Clear},
    Frame,
};

use crate::ui::layouts;

/// Where a popup was drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopupArea {
    /// The whole popup, border included
    pub outer: Rect,
    /// Where popup content should be rendered
    pub inner: Rect,
}

/// Render a popup frame and return its areas.
///
/// This handles:
/// - Centering the popup
/// - Clearing the background
/// - Drawing the border with title
///
/// # Arguments
/// * `size` - Tuple of (width_percent, height_percent)
/// * `title` - The popup title
/// * `border_style` - Style for the border (use theme::danger_border_style(), etc.)
pub fn render_popup_frame(
    f: &mut Frame,
    parent_area: Rect,
    size: (u16, u16),
    title: &str,
    border_style: Style,
) -> PopupArea {
    let area = layouts::centered_popup(size.0, size.1, parent_area);

    // Clear the background
    f.render_widget(Clear, area);

    // Create and render the border
    let block = Block::default()
        .title(title)
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(border_style);

    let inner = block.inner(area);
    f.render_widget(block, area);

    PopupArea { outer: area, inner }
}
