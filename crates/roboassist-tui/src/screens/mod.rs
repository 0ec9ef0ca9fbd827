//! Screen definitions for the roboassist TUI.

pub mod panels;

use crate::app::App;
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

/// Trait for screens that can be rendered.
pub trait Screen {
    /// Render the screen to the buffer.
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);
}

/// Render a blocking alert over whatever is on screen.
pub fn render_alert_overlay(message: &str, area: Rect, buf: &mut Buffer) {
    use crate::ui::centered_fixed;
    use crate::ui::theme::Styles;
    use ratatui::text::{Line, Span};
    use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

    let width = 48.min(area.width.saturating_sub(4));
    let height = 7.min(area.height.saturating_sub(2));
    let overlay_area = centered_fixed(width, height, area);

    Clear.render(overlay_area, buf);

    let block = Block::default()
        .title(" Alert ")
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(Styles::border_active())
        .style(Styles::default());

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(format!(" {message}"), Styles::warning())),
        Line::from(""),
        Line::from(Span::styled(" [Press any key to close]", Styles::dim())),
    ];

    Paragraph::new(text)
        .block(block)
        .style(Styles::default())
        .wrap(Wrap { trim: false })
        .render(overlay_area, buf);
}
