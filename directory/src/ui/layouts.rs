//! Reusable layout builders for consistent screen structure.
//!
//! These functions provide standard layouts that all screens should use
//! to ensure consistent margins, spacing, and element positioning.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

use super::theme::{
    DROPDOWN_MAX_ROWS, FILTER_BAR_HEIGHT, HELP_BAR_HEIGHT, SCREEN_MARGIN, TITLE_HEIGHT,
};

/// Standard screen layout with title, content area, and help bar.
///
/// Returns a tuple of (title_area, content_area, help_area)
pub fn screen_layout(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(SCREEN_MARGIN)
        .constraints([
            Constraint::Length(TITLE_HEIGHT),
            Constraint::Min(5),
            Constraint::Length(HELP_BAR_HEIGHT),
        ])
        .split(area);

    (chunks[0], chunks[1], chunks[2])
}

/// Screen layout with the filter bar between title and content.
///
/// Returns a tuple of (title_area, filter_area, content_area, help_area)
pub fn screen_layout_with_filter(area: Rect) -> (Rect, Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(SCREEN_MARGIN)
        .constraints([
            Constraint::Length(TITLE_HEIGHT),
            Constraint::Length(FILTER_BAR_HEIGHT),
            Constraint::Min(5),
            Constraint::Length(HELP_BAR_HEIGHT),
        ])
        .split(area);

    (chunks[0], chunks[1], chunks[2], chunks[3])
}

/// Split the filter bar into (search_area, category_area)
pub fn filter_bar(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    (chunks[0], chunks[1])
}

/// Split a title area into title text and loading indicator.
///
/// Returns (title_text_area, loading_indicator_area)
pub fn title_with_loading(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    (chunks[0], chunks[1])
}

/// Create a centered popup rectangle.
///
/// # Arguments
/// * `percent_x` - Width as percentage of parent (0-100)
/// * `percent_y` - Height as percentage of parent (0-100)
/// * `area` - The parent area to center within
pub fn centered_popup(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Where a bordered list of `rows` items opens for an input at `anchor`.
///
/// Below the anchor when it fits inside `bounds`, above it otherwise, and
/// truncated as a last resort. Returns None when there is nothing to show.
pub fn dropdown_area(anchor: Rect, rows: usize, bounds: Rect) -> Option<Rect> {
    if rows == 0 {
        return None;
    }
    let rows = u16::try_from(rows).unwrap_or(u16::MAX).min(DROPDOWN_MAX_ROWS);
    let height = rows + 2;
    let width = anchor.width.min(bounds.right().saturating_sub(anchor.x));

    let below = anchor.bottom();
    if below + height <= bounds.bottom() {
        return Some(Rect::new(anchor.x, below, width, height));
    }
    if anchor.y >= bounds.y + height {
        return Some(Rect::new(anchor.x, anchor.y - height, width, height));
    }
    let available = bounds.bottom().saturating_sub(below);
    (available >= 3).then(|| Rect::new(anchor.x, below, width, available))
}

/// Standard popup sizes
pub mod popup_sizes {
    /// Small popup (50% x 30%) - for simple confirmations
    pub const SMALL: (u16, u16) = (50, 30);

    /// Medium popup (60% x 50%) - for the login form
    pub const MEDIUM: (u16, u16) = (60, 50);

    /// Form popup (70% x 90%) - for adding or editing a business
    pub const FORM: (u16, u16) = (70, 90);

    /// Large popup (80% x 80%) - for help screens and complex dialogs
    pub const LARGE: (u16, u16) = (80, 80);
}
