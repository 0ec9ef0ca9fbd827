//! Text wrapping for panel entries.

/// Wrap a plain text string to the specified width.
///
/// Embedded newlines start new lines; an empty string yields one empty line.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }
    textwrap::wrap(text, width)
        .into_iter()
        .map(std::borrow::Cow::into_owned)
        .collect()
}
