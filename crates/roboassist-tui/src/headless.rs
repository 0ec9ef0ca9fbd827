//! Headless mode for the roboassist TUI.
//!
//! Runs the real app loop against a [`TestBackend`] instead of a
//! terminal, so end-to-end behavior can be driven from tests. Actions
//! are sent via a channel and the screen is captured after each render.

use crate::app::{App, Focus};
use crate::event::Action;
use crate::{draw, spawn_command};
use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
use roboassist_engine::ApiClient;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Default terminal dimensions for headless mode.
pub const DEFAULT_WIDTH: u16 = 80;
pub const DEFAULT_HEIGHT: u16 = 24;

/// State captured from the headless TUI after each render.
#[derive(Debug, Clone, Default)]
pub struct HeadlessState {
    /// Text contents of the terminal buffer.
    pub screen_contents: String,
    /// Panel with keyboard focus.
    pub focus: Focus,
    /// Entry texts of the chatbot panel.
    pub chat_entries: Vec<String>,
    /// Entry texts of the community panel.
    pub community_entries: Vec<String>,
    /// Current text of the chatbot input.
    pub chat_input: String,
    /// Current text of the community input.
    pub community_input: String,
    /// Alert currently shown, if any.
    pub alert: Option<String>,
    /// Whether the TUI should quit.
    pub should_quit: bool,
}

impl HeadlessState {
    fn capture(app: &App, screen_contents: String) -> Self {
        let texts = |panel: &roboassist_engine::Panel| {
            panel.texts().into_iter().map(String::from).collect()
        };
        Self {
            screen_contents,
            focus: app.focus,
            chat_entries: texts(app.chatbot.panel()),
            community_entries: texts(app.community.panel()),
            chat_input: app.chat_input.content().to_string(),
            community_input: app.community_input.content().to_string(),
            alert: app.alert.map(String::from),
            should_quit: app.should_quit,
        }
    }
}

/// Handle to control a headless TUI instance.
pub struct HeadlessHandle {
    action_tx: mpsc::UnboundedSender<Action>,
    state_rx: watch::Receiver<HeadlessState>,
}

impl HeadlessHandle {
    /// Send an action to the TUI.
    ///
    /// Returns `true` if the action was sent successfully.
    pub fn send_action(&self, action: Action) -> bool {
        self.action_tx.send(action).is_ok()
    }

    /// Type a string into the focused input.
    pub fn type_text(&self, text: &str) -> bool {
        text.chars().all(|c| self.send_action(Action::Insert(c)))
    }

    /// Get the current state of the TUI.
    pub fn state(&self) -> HeadlessState {
        self.state_rx.borrow().clone()
    }

    /// Wait until a condition is met on the state.
    ///
    /// Returns the state when the condition is met, or `None` if timed out.
    pub async fn wait_for<F>(&mut self, condition: F, timeout: Duration) -> Option<HeadlessState>
    where
        F: Fn(&HeadlessState) -> bool,
    {
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            let state = self.state();
            if condition(&state) {
                return Some(state);
            }

            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            if remaining.is_zero() {
                return None;
            }

            match tokio::time::timeout(remaining, self.state_rx.changed()).await {
                Ok(Ok(())) => {}
                // Loop has exited; the last state is final
                Ok(Err(_)) => {
                    let state = self.state();
                    return condition(&state).then_some(state);
                }
                Err(_) => return None,
            }
        }
    }

    /// Wait for specific text to appear on screen.
    pub async fn wait_for_text(&mut self, text: &str, timeout: Duration) -> Option<HeadlessState> {
        let text = text.to_string();
        self.wait_for(|s| s.screen_contents.contains(&text), timeout)
            .await
    }

    /// Check if the TUI has quit.
    pub fn has_quit(&self) -> bool {
        self.state().should_quit
    }
}

/// Configuration for headless mode.
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    /// Terminal width.
    pub width: u16,
    /// Terminal height.
    pub height: u16,
    /// Tick rate in milliseconds.
    pub tick_rate_ms: u64,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            tick_rate_ms: 50, // Faster tick rate for testing
        }
    }
}

/// Run the TUI in headless mode against the given backend client.
///
/// Returns a handle to control the TUI and a join handle for the background task.
///
/// # Example
///
/// ```ignore
/// let (mut handle, task) = run_tui_headless(client, HeadlessConfig::default());
///
/// handle.type_text("hello");
/// handle.send_action(Action::Submit);
/// let state = handle.wait_for_text("Bot:", Duration::from_secs(1)).await;
///
/// handle.send_action(Action::Quit);
/// task.await.unwrap();
/// ```
pub fn run_tui_headless(
    client: ApiClient,
    config: HeadlessConfig,
) -> (HeadlessHandle, JoinHandle<Result<(), String>>) {
    let (action_tx, action_rx) = mpsc::unbounded_channel();
    let (state_tx, state_rx) = watch::channel(HeadlessState::default());

    let task = tokio::spawn(async move {
        run_headless_loop(client, config, action_rx, state_tx)
            .await
            .map_err(|e| e.to_string())
    });

    let handle = HeadlessHandle {
        action_tx,
        state_rx,
    };

    (handle, task)
}

async fn run_headless_loop(
    client: ApiClient,
    config: HeadlessConfig,
    mut action_rx: mpsc::UnboundedReceiver<Action>,
    state_tx: watch::Sender<HeadlessState>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let backend = TestBackend::new(config.width, config.height);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(client.base_url());
    let (done_tx, mut done_rx) = mpsc::unbounded_channel();
    let mut tasks: Vec<JoinHandle<()>> = Vec::new();

    tasks.push(spawn_command(app.startup(), &client, &done_tx));

    let tick_duration = Duration::from_millis(config.tick_rate_ms);

    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            draw(&app, area, frame.buffer_mut());
        })?;

        let screen_contents = buffer_to_string(terminal.backend().buffer());
        let _ = state_tx.send(HeadlessState::capture(&app, screen_contents));

        if app.should_quit {
            for task in tasks {
                task.abort();
            }
            break;
        }

        tokio::select! {
            Some(action) = action_rx.recv() => {
                if let Some(command) = app.handle_action(action) {
                    tasks.push(spawn_command(command, &client, &done_tx));
                }
            }
            Some(completion) = done_rx.recv() => app.apply(completion),
            () = tokio::time::sleep(tick_duration) => app.tick(),
        }

        tasks.retain(|task| !task.is_finished());
    }

    Ok(())
}

/// Convert a terminal buffer to a string, one line per row with
/// trailing whitespace trimmed.
pub fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut result = String::new();

    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            if let Some(cell) = buffer.cell((x, y)) {
                result.push_str(cell.symbol());
            }
        }
        while result.ends_with(' ') {
            result.pop();
        }
        result.push('\n');
    }

    if result.ends_with('\n') {
        result.pop();
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_state_default() {
        let state = HeadlessState::default();
        assert_eq!(state.focus, Focus::Chatbot);
        assert!(!state.should_quit);
        assert!(state.alert.is_none());
        assert!(state.screen_contents.is_empty());
    }

    #[test]
    fn test_headless_config_default() {
        let config = HeadlessConfig::default();
        assert_eq!(config.width, DEFAULT_WIDTH);
        assert_eq!(config.height, DEFAULT_HEIGHT);
        assert_eq!(config.tick_rate_ms, 50);
    }

    #[test]
    fn test_buffer_to_string() {
        use ratatui::layout::Rect;
        use ratatui::style::Style;

        let area = Rect::new(0, 0, 10, 2);
        let mut buffer = Buffer::empty(area);
        buffer.set_string(0, 0, "Hello", Style::default());
        buffer.set_string(0, 1, "World", Style::default());

        assert_eq!(buffer_to_string(&buffer), "Hello\nWorld");
    }
}
