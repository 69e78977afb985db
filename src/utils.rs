//! Small shared helpers.

/// Truncate `text` to at most `max_length` characters, appending `suffix`
/// when anything was cut. The suffix counts toward the limit.
pub fn truncate_text(text: &str, max_length: usize, suffix: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_length {
        return text.to_string();
    }

    let suffix_len = suffix.chars().count();
    if suffix_len >= max_length {
        return suffix.chars().take(max_length).collect();
    }

    let mut result: String = chars[..max_length - suffix_len].iter().collect();
    result.push_str(suffix);
    result
}

/// One-line preview of prompt content: the first line, with an ellipsis
/// marker when more lines follow or the line itself was shortened.
pub fn content_preview(content: &str, max_length: usize) -> String {
    let mut lines = content.lines();
    let first = lines.next().unwrap_or("");
    let has_more = lines.next().is_some();

    let mut preview = truncate_text(first, max_length, "...");
    if has_more && !preview.ends_with("...") {
        preview.push_str(" ...");
    }
    preview
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_untouched() {
        assert_eq!(truncate_text("hello", 100, "..."), "hello");
    }

    #[test]
    fn long_text_is_cut_with_suffix() {
        assert_eq!(truncate_text("hello world", 8, "..."), "hello...");
    }

    #[test]
    fn limit_includes_suffix() {
        let result = truncate_text("abcdefghij", 7, "...");
        assert_eq!(result.chars().count(), 7);
        assert!(result.ends_with("..."));
    }

    #[test]
    fn oversized_suffix_is_clipped() {
        assert_eq!(truncate_text("abcdefghij", 2, "..."), "..");
    }

    #[test]
    fn truncation_is_char_safe() {
        // Multi-byte characters must not be split.
        let result = truncate_text("héllö wörld", 8, "...");
        assert_eq!(result, "héllö...");
    }

    #[test]
    fn preview_takes_first_line() {
        assert_eq!(content_preview("one\ntwo\nthree", 100), "one ...");
    }

    #[test]
    fn preview_of_single_line_has_no_marker() {
        assert_eq!(content_preview("just one line", 100), "just one line");
    }

    #[test]
    fn preview_shortens_long_first_line() {
        let preview = content_preview(&"x".repeat(200), 50);
        assert_eq!(preview.chars().count(), 50);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn preview_of_empty_content_is_empty() {
        assert_eq!(content_preview("", 50), "");
    }
}
