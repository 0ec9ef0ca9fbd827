//! Reusable widgets for the roboassist TUI.

pub mod entry_list;
pub mod status_bar;
pub mod text_input;

pub use entry_list::{entry_lines, EntryList};
pub use status_bar::{KeyHint, StatusBar};
pub use text_input::TextInputState;
