//! Scrolling view of a panel's entries.

use crate::text::wrap_text;
use crate::ui::theme::Styles;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span, Text},
    widgets::{
        Block, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget, Widget,
    },
};
use roboassist_engine::{Entry, EntryKind, Panel};
use std::cell::Cell;

fn entry_style(kind: EntryKind) -> Style {
    match kind {
        EntryKind::User => Styles::user(),
        EntryKind::Bot => Styles::bot(),
        EntryKind::Placeholder => Styles::placeholder(),
        EntryKind::Community => Styles::default(),
        EntryKind::Error => Styles::error(),
    }
}

fn speaker(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::User => "You: ",
        EntryKind::Bot | EntryKind::Placeholder | EntryKind::Error => "Bot: ",
        EntryKind::Community => "",
    }
}

/// Wrap a panel's entries into display lines of at most `width` columns.
///
/// With `speakers` set, each entry is prefixed with who said it and
/// entries are separated by a blank line.
pub fn entry_lines(entries: &[Entry], width: usize, speakers: bool) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for (i, entry) in entries.iter().enumerate() {
        if speakers && i > 0 {
            lines.push(Line::from(""));
        }
        let text = if speakers {
            format!("{}{}", speaker(entry.kind), entry.text)
        } else {
            entry.text.clone()
        };
        let style = entry_style(entry.kind);
        for wrapped in wrap_text(&text, width) {
            lines.push(Line::from(Span::styled(wrapped, style)));
        }
    }

    lines
}

/// Paragraph scroll is limited to `u16`; longer offsets stick to the end.
fn scroll_offset(offset: usize) -> u16 {
    u16::try_from(offset).unwrap_or(u16::MAX)
}

/// A scrollable list of panel entries, pinned to the bottom unless the
/// panel has been scrolled back.
#[derive(Debug, Clone)]
pub struct EntryList<'a> {
    panel: &'a Panel,
    speakers: bool,
    block: Option<Block<'a>>,
    empty_hint: Option<&'a str>,
    max_scroll: Option<&'a Cell<usize>>,
}

impl<'a> EntryList<'a> {
    /// Create a list over the given panel.
    pub fn new(panel: &'a Panel) -> Self {
        Self {
            panel,
            speakers: false,
            block: None,
            empty_hint: None,
            max_scroll: None,
        }
    }

    /// Prefix entries with their speaker.
    #[must_use]
    pub fn speakers(mut self, speakers: bool) -> Self {
        self.speakers = speakers;
        self
    }

    /// Set the block to wrap the list.
    #[must_use]
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Text shown while the panel has no entries.
    #[must_use]
    pub fn empty_hint(mut self, hint: &'a str) -> Self {
        self.empty_hint = Some(hint);
        self
    }

    /// Report the furthest the list can be scrolled back, as of this render.
    #[must_use]
    pub fn max_scroll(mut self, cell: &'a Cell<usize>) -> Self {
        self.max_scroll = Some(cell);
        self
    }
}

impl Widget for EntryList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = match &self.block {
            Some(b) => {
                let inner = b.inner(area);
                b.clone().render(area, buf);
                inner
            }
            None => area,
        };

        if area.height < 1 || area.width < 2 {
            return;
        }

        if self.panel.is_empty() {
            if let Some(cell) = self.max_scroll {
                cell.set(0);
            }
            if let Some(hint) = self.empty_hint {
                Paragraph::new(Line::from(Span::styled(hint, Styles::dim())))
                    .style(Styles::default())
                    .render(area, buf);
            }
            return;
        }

        // Leave the right column for the scrollbar
        let text_width = (area.width - 1) as usize;
        let lines = entry_lines(self.panel.entries(), text_width, self.speakers);

        let viewport = area.height as usize;
        let total = lines.len();
        let max_scroll = total.saturating_sub(viewport);
        if let Some(cell) = self.max_scroll {
            cell.set(max_scroll);
        }
        let offset = max_scroll - self.panel.scroll_back().min(max_scroll);

        let paragraph = Paragraph::new(Text::from(lines))
            .style(Styles::default())
            .scroll((scroll_offset(offset), 0));
        paragraph.render(area, buf);

        if total > viewport {
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight);
            let mut scrollbar_state = ScrollbarState::new(max_scroll).position(offset);
            let scrollbar_area = Rect {
                x: area.x + area.width - 1,
                y: area.y,
                width: 1,
                height: area.height,
            };
            scrollbar.render(scrollbar_area, buf, &mut scrollbar_state);
        }
    }
}
