//! Test utilities for roboassist-tui rendering tests.

use crate::app::App;
use crate::headless::buffer_to_string;
use crate::screens::Screen as ScreenTrait;
use ratatui::{buffer::Buffer, layout::Rect};
use roboassist_engine::DEFAULT_BASE_URL;

/// Default terminal width for tests.
pub const TEST_WIDTH: u16 = 80;

/// Default terminal height for tests.
pub const TEST_HEIGHT: u16 = 24;

/// Create a test app pointed at the default backend.
pub fn create_test_app() -> App {
    App::new(DEFAULT_BASE_URL)
}

/// Render a screen to a buffer and return it as a string.
pub fn render_screen_to_string<S: ScreenTrait>(screen: &S, app: &App) -> String {
    render_screen_to_string_sized(screen, app, TEST_WIDTH, TEST_HEIGHT)
}

/// Render a screen to a buffer and return it as a string with custom dimensions.
pub fn render_screen_to_string_sized<S: ScreenTrait>(
    screen: &S,
    app: &App,
    width: u16,
    height: u16,
) -> String {
    let area = Rect::new(0, 0, width, height);
    let mut buffer = Buffer::empty(area);
    screen.render(app, area, &mut buffer);
    buffer_to_string(&buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::panels::PanelsScreen;

    #[test]
    fn test_create_test_app() {
        let app = create_test_app();
        assert_eq!(app.base_url, DEFAULT_BASE_URL);
        assert!(app.chatbot.panel().is_empty());
    }

    #[test]
    fn test_render_sized() {
        let app = create_test_app();
        let result = render_screen_to_string_sized(&PanelsScreen, &app, 100, 30);
        assert_eq!(result.lines().count(), 30);
    }
}
