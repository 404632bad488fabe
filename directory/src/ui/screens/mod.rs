pub mod admin_screen;
pub mod businesses_screen;
pub mod logs_screen;

use crate::state::{form::BusinessFormState, AdminState, BusinessesState, InputMode, LogsState};

#[derive(Debug, Clone)]
pub enum Screen {
    Businesses(Box<BusinessesState>),
    Admin(Box<AdminState>),
    Logs(LogsState),
}

impl Screen {
    pub fn form(&self) -> Option<&BusinessFormState> {
        match self {
            Screen::Businesses(state) => state.form.as_ref(),
            Screen::Admin(state) => state.form.as_ref(),
            Screen::Logs(_) => None,
        }
    }

    pub fn form_mut(&mut self) -> Option<&mut BusinessFormState> {
        match self {
            Screen::Businesses(state) => state.form.as_mut(),
            Screen::Admin(state) => state.form.as_mut(),
            Screen::Logs(_) => None,
        }
    }

    pub fn input_mode(&self) -> InputMode {
        match self {
            Screen::Businesses(state) => state.input_mode,
            Screen::Admin(state) => state.input_mode,
            Screen::Logs(_) => InputMode::Normal,
        }
    }
}
