//! Recognition of "no-signal" service outputs
//!
//! Summarization models are instructed to answer with a sentinel token when a
//! conversation contains nothing worth remembering. Those tokens (and plain
//! empty output) must never be stored as memory entries, so every call site
//! checks outputs through [`is_no_signal`] instead of ad-hoc comparisons.

/// Sentinel outputs meaning "nothing worth remembering was found".
///
/// Matched after trimming and ASCII lowercasing; the CJK tokens come from the
/// prompt wording used with Traditional Chinese personas.
const NO_SIGNAL_TOKENS: &[&str] = &["none", "none.", "無", "無重要資訊"];

/// Returns `true` when a service output carries no usable signal.
///
/// Empty and whitespace-only strings count as no-signal, as does any of the
/// recognized sentinel tokens.
pub fn is_no_signal(text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return true;
    }
    let lowered = trimmed.to_lowercase();
    NO_SIGNAL_TOKENS.contains(&lowered.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_whitespace_are_no_signal() {
        assert!(is_no_signal(""));
        assert!(is_no_signal("   \n\t"));
    }

    #[test]
    fn sentinel_tokens_are_recognized_case_insensitively() {
        assert!(is_no_signal("None"));
        assert!(is_no_signal("none."));
        assert!(is_no_signal("  NONE  "));
        assert!(is_no_signal("無"));
        assert!(is_no_signal("無重要資訊"));
    }

    #[test]
    fn real_content_is_signal() {
        assert!(!is_no_signal("Enjoys watching anime"));
        assert!(!is_no_signal("nonetheless a good day"));
        assert!(!is_no_signal("無聊的時候喜歡看漫畫"));
    }
}
