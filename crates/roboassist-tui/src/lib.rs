//! roboassist-tui: Terminal UI for the roboassist chat client
//!
//! This crate provides the TUI layer, including:
//! - The two-panel screen (chatbot and community)
//! - Key handling and the request/completion loop
//! - Headless mode for testing and automation

mod app;
mod event;
pub mod headless;
mod screens;
#[cfg(test)]
pub mod test_utils;
mod text;
mod ui;

use screens::Screen as ScreenTrait;

pub use app::{App, Command, Completion, Focus};
pub use event::{key_to_action, Action, Event, EventHandler};
pub use roboassist_engine;

use crossterm::{
    cursor::Show as ShowCursor,
    event::{DisableMouseCapture, EnableMouseCapture, MouseEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, buffer::Buffer, layout::Rect, Terminal};
use roboassist_engine::{chatbot, post_and_refresh, ApiClient, Config};
use std::io::{self, stdout};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// RAII guard for terminal state restoration.
struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen, ShowCursor);
    }
}

/// Run the TUI application.
///
/// Sets up the terminal, loads the community list, runs the event loop,
/// and restores the terminal on exit.
pub async fn run_tui(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let client = ApiClient::new(config)?;

    enable_raw_mode()?;
    let _guard = TerminalGuard;

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(client.base_url());
    let mut events = EventHandler::new(config.tick_rate_ms);

    let result = run_loop(&mut terminal, &mut app, &mut events, &client).await;

    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
    client: &ApiClient,
) -> Result<(), Box<dyn std::error::Error>> {
    let (done_tx, mut done_rx) = mpsc::unbounded_channel();
    let mut tasks: Vec<JoinHandle<()>> = Vec::new();

    tasks.push(spawn_command(app.startup(), client, &done_tx));

    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            draw(app, area, frame.buffer_mut());
        })?;

        tokio::select! {
            Some(event) = events.next() => match event {
                Event::Key(key) => {
                    if let Some(command) = app.handle_action(key_to_action(key)) {
                        tasks.push(spawn_command(command, client, &done_tx));
                    }
                }
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollUp => app.handle_wheel(Action::ScrollUp),
                    MouseEventKind::ScrollDown => app.handle_wheel(Action::ScrollDown),
                    _ => {}
                },
                Event::Tick => app.tick(),
                // Next draw picks up the new size
                Event::Resize(_, _) => {}
            },
            Some(completion) = done_rx.recv() => app.apply(completion),
            else => break,
        }

        tasks.retain(|task| !task.is_finished());

        if app.should_quit {
            for task in tasks {
                task.abort();
            }
            break;
        }
    }

    Ok(())
}

/// Render the whole UI for the current app state.
pub(crate) fn draw(app: &App, area: Rect, buf: &mut Buffer) {
    screens::panels::PanelsScreen.render(app, area, buf);
    if let Some(message) = app.alert {
        screens::render_alert_overlay(message, area, buf);
    }
}

/// Run a command on the runtime, reporting back through `done`.
pub(crate) fn spawn_command(
    command: Command,
    client: &ApiClient,
    done: &mpsc::UnboundedSender<Completion>,
) -> JoinHandle<()> {
    let client = client.clone();
    let done = done.clone();

    tokio::spawn(async move {
        let completion = match command {
            Command::SendChat(pending) => {
                debug!(placeholder = pending.placeholder, "sending chat query");
                Completion::Chat {
                    placeholder: pending.placeholder,
                    result: chatbot::exchange(&client, &pending).await,
                }
            }
            Command::PostCommunity(message) => {
                debug!("posting community message");
                Completion::Posted(post_and_refresh(&client, &message).await)
            }
            Command::RefreshCommunity => {
                debug!("refreshing community messages");
                Completion::Refreshed(client.fetch_community().await)
            }
        };
        // The receiver is gone only when the UI has quit
        let _ = done.send(completion);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_includes_alert() {
        let mut app = test_utils::create_test_app();
        app.alert = Some(roboassist_engine::POST_UNREACHABLE_ALERT);

        let area = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(area);
        draw(&app, area, &mut buf);

        let screen = headless::buffer_to_string(&buf);
        assert!(screen.contains(roboassist_engine::POST_UNREACHABLE_ALERT));
    }
}
