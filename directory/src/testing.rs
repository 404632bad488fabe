use ratatui::{backend::TestBackend, Terminal};

use crate::app_core::{AppCore, DataEventHandler};
use crate::commands::executor;
use crate::events::{AppCommand, DataEvent, Effect};
use crate::input::{Key, KeyEvent, PointerEvent};
use crate::log_buffer::LogBuffer;
use crate::state::AppState;
use crate::ui::screens::Screen;

/// Mock data event handler for tests (no real async tasks)
///
/// Commands are applied synchronously with `executor::apply_command`. The
/// side effects they request are recorded instead of run, so tests can
/// assert on them and inject the matching `DataEvent`s by hand.
#[derive(Debug, Default)]
pub struct MockDataHandler {
    effects: Vec<Effect>,
}

impl MockDataHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }
}

impl DataEventHandler for MockDataHandler {
    fn execute_with_context(&mut self, command: AppCommand, state: &mut AppState) {
        let effects = executor::apply_command(command, state);
        self.effects.extend(effects);
    }
}

pub struct TestApp {
    core: AppCore<MockDataHandler>,
    log_buffer: LogBuffer,
}

impl TestApp {
    /// Create a new test app with mock handler
    pub fn new() -> Self {
        Self {
            core: AppCore::new(MockDataHandler::new()),
            log_buffer: LogBuffer::new(100),
        }
    }

    /// Send a single key event
    pub fn send_key(&mut self, key: Key) {
        self.core.handle_key(KeyEvent::new(key));
    }

    /// Send a key event with modifiers
    pub fn send_key_event(&mut self, event: KeyEvent) {
        self.core.handle_key(event);
    }

    /// Send multiple keys in sequence
    pub fn send_keys(&mut self, keys: &[Key]) {
        for key in keys {
            self.send_key(*key);
        }
    }

    /// Type each character of `text` as a key press
    pub fn type_text(&mut self, text: &str) {
        for c in text.chars() {
            self.send_key(Key::Char(c));
        }
    }

    /// Left-click at a terminal cell. Call [`TestApp::render`] first so the
    /// components have declared where they are.
    pub fn click(&mut self, column: u16, row: u16) {
        self.core.handle_pointer(PointerEvent::down(column, row));
    }

    pub fn hover(&mut self, column: u16, row: u16) {
        self.core.handle_pointer(PointerEvent::moved(column, row));
    }

    /// Run a command directly, bypassing key mapping
    pub fn dispatch(&mut self, command: AppCommand) {
        self.core.dispatch(command);
    }

    /// Inject a data event (simulate API response or timer expiry)
    pub fn send_data_event(&mut self, event: DataEvent) {
        self.core.handle_data_event(event);
    }

    /// Draw one frame into an off-screen buffer and return it
    pub fn render(&self, width: u16, height: u16) -> ratatui::buffer::Buffer {
        let mut terminal =
            Terminal::new(TestBackend::new(width, height)).expect("test backend never fails");
        terminal
            .draw(|f| crate::ui::render_app(f, self.state(), &self.log_buffer))
            .expect("test backend never fails");
        terminal.backend().buffer().clone()
    }

    /// Get read-only access to current state
    pub fn state(&self) -> &AppState {
        self.core.state()
    }

    /// Every side effect requested so far, in order
    pub fn effects(&self) -> &[Effect] {
        self.core.handler().effects()
    }

    /// Assert that the app is on a specific screen type
    ///
    /// Uses discriminant comparison to check screen type without
    /// requiring full equality of state.
    pub fn assert_screen_type(&self, expected_discriminant: std::mem::Discriminant<Screen>) {
        let current = self.state().current_screen();
        assert_eq!(
            std::mem::discriminant(current),
            expected_discriminant,
            "Expected different screen. Current: {:?}",
            current
        );
    }

    /// Assert that the app should quit
    pub fn assert_should_quit(&self) {
        assert!(
            self.core.should_quit(),
            "App should be marked for quit but is not"
        );
    }

    /// Assert that the app should NOT quit
    pub fn assert_not_quit(&self) {
        assert!(
            !self.core.should_quit(),
            "App should NOT be marked for quit but is"
        );
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Flatten a rendered buffer into lines of text for content assertions
pub fn buffer_lines(buffer: &ratatui::buffer::Buffer) -> Vec<String> {
    let area = buffer.area;
    (area.top()..area.bottom())
        .map(|y| {
            (area.left()..area.right())
                .map(|x| buffer[(x, y)].symbol())
                .collect::<String>()
        })
        .collect()
}
