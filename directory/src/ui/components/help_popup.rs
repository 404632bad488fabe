use ratatui::{
    prelude::*,
    widgets::{List, ListItem},
    Frame,
};

use crate::state::InputMode;
use crate::ui::{layouts, screens::Screen, theme};

pub fn render_help_popup(f: &mut Frame, screen: &Screen, logged_in: bool) {
    let help_items = get_help_items(screen, logged_in);

    let inner = super::popup::render_popup_frame(
        f,
        f.area(),
        layouts::popup_sizes::LARGE,
        " Help (press ? or Esc to close) ",
        theme::accent_border_style(),
    )
    .inner;

    let items: Vec<ListItem> = help_items
        .iter()
        .map(|(key, description)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:15}", key), theme::header_style()),
                Span::raw(*description),
            ]))
        })
        .collect();

    let list = List::new(items).style(Style::default().fg(Color::White));

    f.render_widget(list, inner);
}

fn search_items(items: &mut Vec<(&'static str, &'static str)>, mode: InputMode) {
    items.push(("/", "Search by name, field of work, city or notes"));
    if mode == InputMode::Search {
        items.push(("Enter", "Keep the search and leave the input"));
        items.push(("Esc", "Clear the search"));
        items.push(("Backspace", "Delete last character"));
    }
}

fn get_help_items(screen: &Screen, logged_in: bool) -> Vec<(&'static str, &'static str)> {
    let mut items = vec![];

    match screen {
        Screen::Businesses(state) => {
            items.push(("↑/k", "Move selection up"));
            items.push(("↓/j", "Move selection down"));
            search_items(&mut items, state.input_mode);
            items.push(("f", "Filter by field of work"));
            if state.input_mode == InputMode::CategoryFilter {
                items.push(("Type", "Narrow the field list"));
                items.push(("↑/↓", "Move through fields"));
                items.push(("Enter", "Apply highlighted field"));
                items.push(("Esc", "Close without changing the filter"));
            }
            items.push(("n", "Add a business"));
            items.push(("a / g then a", "Open the admin panel"));
            items.push(("r", "Reload the directory"));
            items.push(("Esc", "Clear the search"));
        }
        Screen::Admin(state) if logged_in => {
            items.push(("↑/k", "Move selection up"));
            items.push(("↓/j", "Move selection down"));
            search_items(&mut items, state.input_mode);
            items.push(("n", "Add a business"));
            items.push(("e/Enter", "Edit selected business"));
            items.push(("d", "Delete selected business"));
            items.push(("r", "Reload businesses"));
            items.push(("L", "Log out"));
        }
        Screen::Admin(..) => {
            items.push(("Tab", "Switch between email and password"));
            items.push(("Enter", "Log in"));
            items.push(("Esc", "Back to the directory"));
        }
        Screen::Logs(..) => {
            items.push(("↑/k", "Scroll up (older logs)"));
            items.push(("↓/j", "Scroll down (newer logs)"));
            items.push(("Page Up", "Scroll up one page"));
            items.push(("Page Down", "Scroll down one page"));
            items.push(("t", "Scroll to oldest logs"));
            items.push(("b", "Scroll to newest logs"));
        }
    }

    items.push(("", ""));
    items.push(("--- Form ---", ""));
    items.push(("Tab/Shift+Tab", "Next / previous field"));
    items.push(("↑/↓", "Move through suggestions"));
    items.push(("Enter", "Pick suggestion, or submit"));
    items.push(("Ctrl+L", "Clear the field"));

    items.push(("", ""));
    items.push(("--- Global ---", ""));
    items.push(("h/←", "Navigate back"));
    items.push(("g then l", "Go to logs"));
    items.push(("g then g", "Navigate to top of list"));
    items.push(("G", "Navigate to bottom of list"));
    items.push(("?", "Toggle this help"));
    items.push(("q", "Quit application"));

    items
}
