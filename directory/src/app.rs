use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::sync::Arc;

use crate::background::{data_loader::DataLoader, BackgroundTaskManager};
use crate::commands::{executor, handlers};
use crate::events::AppCommand;
use crate::input::{KeyEvent, PointerEvent};
use crate::log_buffer::LogBuffer;
use crate::logging::init_logging;
use crate::session::SessionStore;
use crate::settings::Settings;
use crate::state::AppState;
use crate::suggestions::cities::{CitySource, RemoteCityDataset};
use crate::ui::screens::Screen;

pub struct App {
    settings: Settings,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub async fn run(&self) -> Result<()> {
        // Create log buffer before initializing logging
        let log_buffer = LogBuffer::new(5000);
        let (log_path, _log_guard) = init_logging(log_buffer.clone())?;

        tracing::info!("directory starting, logging to {}", log_path.display());
        tracing::debug!("Settings: {:?}", self.settings);

        let sessions = Arc::new(SessionStore::new()?);
        let cities = Arc::new(CitySource::new(RemoteCityDataset::new(
            &self.settings.city_dataset_url,
            self.settings.city_resource_id.clone(),
        )));

        let (data_tx, mut data_rx) = tokio::sync::mpsc::unbounded_channel();
        let data_loader = DataLoader::new(&self.settings.api_url, cities, sessions.clone(), data_tx);

        let mut terminal = self.init()?;
        let mut ui_state = AppState::new();
        let mut task_manager = BackgroundTaskManager::new();
        let mut event_stream = EventStream::new();

        self.init_data(&mut ui_state, &mut task_manager, &data_loader, &sessions);

        tracing::info!("Entering main event loop");

        let mut interval = tokio::time::interval(std::time::Duration::from_millis(100));
        loop {
            // Update total_entries for logs screen if active
            if let Screen::Logs(logs_state) = ui_state.current_screen_mut() {
                logs_state.total_entries = log_buffer.len();
            }

            terminal.draw(|f| {
                crate::ui::render_app(f, &ui_state, &log_buffer);
            })?;

            tokio::select! {
                _ = interval.tick() => {
                    if let Some(throbber_state) = ui_state.loading_state() {
                        throbber_state.calc_next();
                    }
                }
                Some(Ok(event)) = event_stream.next() => {
                    // Don't log when on logs screen to avoid feedback loop
                    let on_logs_screen = matches!(ui_state.current_screen(), Screen::Logs(_));
                    let command = match event {
                        Event::Key(key) if matches!(key.kind, KeyEventKind::Press) => {
                            if !on_logs_screen {
                                tracing::debug!("Key press: {:?}", key);
                            }
                            handlers::handle_key_input(KeyEvent::from(key), &ui_state)
                        }
                        Event::Mouse(mouse) => PointerEvent::from_mouse(mouse)
                            .and_then(|pointer| handlers::handle_pointer_input(pointer, &ui_state)),
                        _ => None,
                    };
                    if let Some(command) = command {
                        if !on_logs_screen {
                            tracing::info!("Executing command: {:?}", command);
                        }
                        executor::execute_command(
                            command,
                            &mut ui_state,
                            &mut task_manager,
                            &data_loader,
                        );
                    }
                }
                Some(data_event) = data_rx.recv() => {
                    tracing::debug!("Received data event: {:?}", data_event);
                    crate::state::reducer::reduce_data_event(&mut ui_state, data_event);
                }
            }

            // Check if we should quit
            if ui_state.should_quit {
                tracing::info!("Quit requested, exiting event loop");
                break;
            }
        }

        tracing::info!("Cleaning up application");

        // Cancel all background tasks and pending timers
        task_manager.cancel_all();

        self.exit(terminal)?;

        Ok(())
    }

    fn init(&self) -> Result<Terminal<CrosstermBackend<std::io::Stdout>>, std::io::Error> {
        enable_raw_mode()?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        Terminal::new(backend)
    }

    /// Load the directory and check any remembered admin login
    fn init_data(
        &self,
        ui_state: &mut AppState,
        task_manager: &mut BackgroundTaskManager,
        data_loader: &DataLoader,
        sessions: &SessionStore,
    ) {
        tracing::info!("Loading businesses");
        executor::execute_command(
            AppCommand::LoadBusinesses,
            ui_state,
            task_manager,
            data_loader,
        );

        match sessions.load() {
            Ok(Some(session)) => {
                tracing::info!("Verifying stored session for {}", session.email);
                let loader = data_loader.clone();
                task_manager.spawn_load_task("verify-session".to_string(), async move {
                    loader.verify_session(session).await;
                });
            }
            Ok(None) => {}
            Err(e) => {
                tracing::warn!("Ignoring unreadable session file: {}", e);
                data_loader.clear_session();
            }
        }
    }

    fn exit(
        &self,
        mut terminal: Terminal<CrosstermBackend<std::io::Stdout>>,
    ) -> Result<(), std::io::Error> {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
        Ok(())
    }
}
