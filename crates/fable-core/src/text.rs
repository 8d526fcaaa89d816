//! Small text helpers shared by the memory and context subsystems

/// Cap `text` at `max_chars` characters, appending an ellipsis when cut.
///
/// Operates on `char` boundaries, never bytes; memory snippets routinely
/// carry CJK text.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(max_chars).collect();
        cut.push('…');
        cut
    }
}
