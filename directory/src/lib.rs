mod app;
pub mod app_core;
mod background;
pub mod commands;
pub mod events;
pub mod input;
pub mod log_buffer;
pub mod logging;
pub mod session;
pub mod settings;
pub mod state;
pub mod suggestions;
pub mod ui;

pub use app::App;

// Always expose testing module (integration tests need it)
pub mod testing;
