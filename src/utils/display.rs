//! Terminal display helpers for listing output.

use unicode_width::UnicodeWidthChar;

/// Truncate text to fit within `max_width` terminal columns.
///
/// Wide characters count double. An ellipsis is appended when anything was cut.
///
/// # Examples
///
/// ```
/// use listing_search::utils::truncate_with_ellipsis;
///
/// assert_eq!(truncate_with_ellipsis("Hello World", 8), "Hello...");
/// assert_eq!(truncate_with_ellipsis("Hi", 8), "Hi");
/// ```
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }

    let char_widths: Vec<(char, usize)> = text
        .chars()
        .map(|c| (c, c.width().unwrap_or(1)))
        .collect();

    let total_width: usize = char_widths.iter().map(|(_, w)| *w).sum();
    if total_width <= max_width {
        return text.to_string();
    }

    let budget = max_width.saturating_sub(3);
    let mut current_width = 0;
    let mut truncated = String::new();
    for (c, w) in char_widths {
        if current_width + w > budget {
            break;
        }
        current_width += w;
        truncated.push(c);
    }

    format!("{}...", truncated)
}

/// Flatten a multi-line text into one line for table cells.
pub fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate_with_ellipsis("Hello World", 8), "Hello...");
        assert_eq!(truncate_with_ellipsis("Hello", 5), "Hello");
        assert_eq!(truncate_with_ellipsis("Hello", 0), "");
    }

    #[test]
    fn test_truncate_wide_chars() {
        // Each CJK character is two columns wide.
        assert_eq!(truncate_with_ellipsis("自転車を売ります", 9), "自転車...");
    }

    #[test]
    fn test_tiny_width() {
        assert_eq!(truncate_with_ellipsis("Hello World", 2), "...");
    }

    #[test]
    fn test_single_line() {
        assert_eq!(single_line("Oak desk\n\n  barely used "), "Oak desk barely used");
    }
}
