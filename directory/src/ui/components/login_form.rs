//! Admin login form shown on the admin screen until a session exists.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::popup;
use crate::state::{LoginField, LoginFormState};
use crate::ui::{layouts, theme};

pub fn render(f: &mut Frame, area: ratatui::layout::Rect, login: &LoginFormState) {
    let inner = popup::render_popup_frame(
        f,
        area,
        layouts::popup_sizes::MEDIUM,
        " Admin login ",
        theme::info_border_style(),
    )
    .inner;

    let [email_area, password_area, status_area] = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(1),
        ])
        .areas(inner);

    let masked = "•".repeat(login.password.chars().count());
    render_input(
        f,
        email_area,
        "Email",
        &login.email,
        login.focus == LoginField::Email,
    );
    render_input(
        f,
        password_area,
        "Password",
        &masked,
        login.focus == LoginField::Password,
    );

    let status = if login.submitting {
        Line::from(Span::styled("Logging in...", theme::loading_style()))
    } else if let Some(error) = &login.error {
        Line::from(Span::styled(error.as_str(), theme::error_style()))
    } else {
        Line::from(Span::styled(
            "Tab: switch field | Enter: log in | Esc: back",
            theme::help_text_style(),
        ))
    };
    f.render_widget(
        Paragraph::new(status).alignment(Alignment::Center),
        status_area,
    );
}

fn render_input(
    f: &mut Frame,
    area: ratatui::layout::Rect,
    title: &str,
    value: &str,
    focused: bool,
) {
    let style = if focused {
        theme::form_field_focused_style()
    } else {
        theme::form_field_style()
    };
    f.render_widget(
        Paragraph::new(value).style(style).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme::input_border_style(focused))
                .title(title),
        ),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::buffer_lines;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_password_is_masked() {
        let login = LoginFormState {
            email: "admin@example.com".to_string(),
            password: "hunter2".to_string(),
            focus: LoginField::Password,
            error: Some("Invalid email or password".to_string()),
            submitting: false,
        };
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|f| render(f, f.area(), &login)).unwrap();
        let lines = buffer_lines(terminal.backend().buffer());

        assert!(lines.iter().any(|l| l.contains("admin@example.com")));
        assert!(lines.iter().any(|l| l.contains("•••••••")));
        assert!(!lines.iter().any(|l| l.contains("hunter2")));
        assert!(lines.iter().any(|l| l.contains("Invalid email or password")));
    }
}
