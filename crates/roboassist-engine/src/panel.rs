//! Scrollable list of rendered entries.
//!
//! A [`Panel`] is the front-end-agnostic half of a chat pane: it owns
//! the ordered entries and how far the user has scrolled back from the
//! newest one. Appending always snaps the view back to the bottom.

/// Identifier of an entry, unique within its panel.
pub type EntryId = u64;

/// Style tag of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Text the local user sent.
    User,
    /// Reply from the chatbot.
    Bot,
    /// Transient entry shown while a request is outstanding.
    Placeholder,
    /// Entry from the shared community list.
    Community,
    /// Fixed error text standing in for a failed request.
    Error,
}

/// A single rendered entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub id: EntryId,
    pub text: String,
    pub kind: EntryKind,
}

/// Ordered entries plus scroll position.
#[derive(Debug, Clone, Default)]
pub struct Panel {
    entries: Vec<Entry>,
    next_id: EntryId,
    /// Lines scrolled back from the bottom; 0 follows the newest entry.
    scroll_back: usize,
}

impl Panel {
    /// Create an empty panel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry and scroll to it.
    pub fn append(&mut self, text: impl Into<String>, kind: EntryKind) -> EntryId {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            text: text.into(),
            kind,
        });
        self.scroll_back = 0;
        id
    }

    /// Remove the entry with the given id. Returns whether it existed.
    pub fn remove(&mut self, id: EntryId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.scroll_back = 0;
    }

    /// Entries in display order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries of the given kind.
    pub fn count(&self, kind: EntryKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }

    /// Entry texts in display order.
    pub fn texts(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.text.as_str()).collect()
    }

    /// Lines scrolled back from the bottom.
    pub fn scroll_back(&self) -> usize {
        self.scroll_back
    }

    /// Whether the view is pinned to the newest entry.
    pub fn is_following(&self) -> bool {
        self.scroll_back == 0
    }

    /// Scroll towards older entries, never past `limit` lines.
    pub fn scroll_up(&mut self, amount: usize, limit: usize) {
        self.scroll_back = (self.scroll_back + amount).min(limit);
    }

    /// Scroll towards the newest entry.
    pub fn scroll_down(&mut self, amount: usize) {
        self.scroll_back = self.scroll_back.saturating_sub(amount);
    }
}
