use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Row, Table},
};
use tracing::Level;

use crate::log_buffer::LogBuffer;
use crate::state::LogsState;
use crate::ui::{
    components::{empty_state, help_bar},
    layouts, theme,
};

pub fn render(f: &mut Frame, state: &LogsState, log_buffer: &LogBuffer) {
    let (title_area, content_area, help_area) = layouts::screen_layout(f.area());

    let title = format!("Logs ({} entries)", log_buffer.len());
    f.render_widget(
        ratatui::widgets::Paragraph::new(title).style(theme::title_style()),
        title_area,
    );
    render_logs(f, content_area, state, log_buffer);
    render_help(f, help_area, state);
}

fn level_style(level: Level) -> (&'static str, Style) {
    match level {
        Level::ERROR => (
            "ERROR",
            Style::default()
                .fg(theme::COLOR_ERROR)
                .add_modifier(Modifier::BOLD),
        ),
        Level::WARN => ("WARN ", Style::default().fg(theme::COLOR_LOADING)),
        Level::INFO => ("INFO ", Style::default().fg(theme::COLOR_SUCCESS)),
        Level::DEBUG => ("DEBUG", Style::default().fg(Color::Blue)),
        Level::TRACE => ("TRACE", theme::muted_style()),
    }
}

fn render_logs(f: &mut Frame, area: Rect, state: &LogsState, log_buffer: &LogBuffer) {
    let total = log_buffer.len();
    if total == 0 {
        empty_state::render_empty_state(f, area, "Session Logs", "No logs yet", None);
        return;
    }

    // Header takes two rows, borders another two
    let inner_height = usize::from(area.height.saturating_sub(4));
    let entries = log_buffer.window(state.scroll_offset, inner_height);
    let end = total.saturating_sub(state.scroll_offset);
    let start = end.saturating_sub(entries.len());

    let rows: Vec<Row> = entries
        .iter()
        .map(|entry| {
            let (label, style) = level_style(entry.level);
            Row::new(vec![
                entry.timestamp.format("%H:%M:%S%.3f").to_string(),
                label.to_string(),
                truncate_target(&entry.target, 25),
                entry.message.clone(),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(12), // Time
        Constraint::Length(5),  // Level
        Constraint::Length(25), // Target
        Constraint::Min(30),    // Message
    ];

    let table = Table::new(rows, widths)
        .block(Block::default().borders(Borders::ALL).title(format!(
            " Logs [{}-{} of {}] ",
            start + 1,
            end,
            total
        )))
        .header(
            Row::new(vec!["Time", "Level", "Target", "Message"])
                .style(theme::header_style())
                .bottom_margin(1),
        );

    f.render_widget(table, area);
}

fn render_help(f: &mut Frame, area: Rect, state: &LogsState) {
    let scroll_info = if state.scroll_offset > 0 {
        format!(" (scrolled {} from bottom)", state.scroll_offset)
    } else {
        String::new()
    };

    let help_text = format!(
        "j/k: scroll | t: oldest | b: newest | PgUp/PgDn: page | h: back | ?: help{}",
        scroll_info
    );

    help_bar::render_help_bar(f, area, &help_text);
}

/// Keeps the tail of a module path, which is the informative part
fn truncate_target(target: &str, max_len: usize) -> String {
    let count = target.chars().count();
    if count <= max_len {
        return target.to_string();
    }
    let tail: String = target.chars().skip(count - (max_len - 3)).collect();
    format!("...{}", tail)
}
