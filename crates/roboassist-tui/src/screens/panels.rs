//! The two-panel chat screen: chatbot on the left, community on the right.

use crate::app::{App, Focus};
use crate::screens::Screen;
use crate::ui::theme::{spinner, Styles};
use crate::ui::widgets::{EntryList, KeyHint, StatusBar, TextInputState};
use crate::ui::{main_layout, panel_columns, panel_with_input};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Block, Borders, Widget},
};
use roboassist_engine::Panel;
use std::cell::Cell;

/// The main screen.
pub struct PanelsScreen;

impl Screen for PanelsScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let (main_area, status_area) = main_layout(area);
        let (left, right) = panel_columns(main_area);

        render_column(
            &ColumnView {
                title: " Chatbot ",
                panel: app.chatbot.panel(),
                speakers: true,
                empty_hint: "Ask anything about RoboAnalyzer.",
                input: &app.chat_input,
                input_placeholder: " Ask a question...",
                max_scroll: &app.chat_max_scroll,
                focused: app.focus == Focus::Chatbot,
            },
            left,
            buf,
        );
        render_column(
            &ColumnView {
                title: " Community ",
                panel: app.community.panel(),
                speakers: false,
                empty_hint: "No community messages yet.",
                input: &app.community_input,
                input_placeholder: " Share with the community...",
                max_scroll: &app.community_max_scroll,
                focused: app.focus == Focus::Community,
            },
            right,
            buf,
        );

        let mode = match app.focus {
            Focus::Chatbot => "Chatbot",
            Focus::Community => "Community",
        };
        let hints = vec![
            KeyHint::new("Enter", "Send"),
            KeyHint::new("Tab", "Switch"),
            KeyHint::new("PgUp/PgDn", "Scroll"),
            KeyHint::new("Esc", "Quit"),
        ];
        let right_text = match app.activity() {
            Some(activity) => format!("{} {activity}", spinner(app.tick)),
            None => app.base_url.clone(),
        };
        StatusBar::new(mode)
            .hints(hints)
            .right(&right_text)
            .render(status_area, buf);
    }
}

struct ColumnView<'a> {
    title: &'static str,
    panel: &'a Panel,
    speakers: bool,
    empty_hint: &'static str,
    input: &'a TextInputState,
    input_placeholder: &'static str,
    max_scroll: &'a Cell<usize>,
    focused: bool,
}

fn render_column(view: &ColumnView<'_>, area: Rect, buf: &mut Buffer) {
    let (list_area, input_area) = panel_with_input(area);
    let border = if view.focused {
        Styles::border_active()
    } else {
        Styles::border()
    };

    let block = Block::default()
        .title(view.title)
        .title_style(Styles::title())
        .borders(Borders::ALL)
        .border_style(border)
        .style(Styles::default());
    EntryList::new(view.panel)
        .speakers(view.speakers)
        .empty_hint(view.empty_hint)
        .max_scroll(view.max_scroll)
        .block(block)
        .render(list_area, buf);

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .style(Styles::default());
    view.input
        .widget()
        .block(input_block)
        .focused(view.focused)
        .placeholder(view.input_placeholder)
        .render(input_area, buf);
}
