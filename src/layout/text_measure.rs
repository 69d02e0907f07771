//! Text measurement in terminal cells.
//!
//! Widths come from `unicode-width` and are summed per grapheme cluster
//! (`unicode-segmentation`), so combining marks add nothing and emoji
//! sequences (ZWJ families, skin tones, flags) count as one wide cell pair.
//! Truncation never cuts inside a cluster.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthChar;

const VARIATION_SELECTOR_16: char = '\u{FE0F}';

/// Cell width of one character. Control characters take no cells.
pub fn char_width(c: char) -> u16 {
    if c.is_control() {
        return 0;
    }
    c.width().unwrap_or(0) as u16
}

/// Cell width of one grapheme cluster.
///
/// The widest scalar decides, except that an emoji presentation selector
/// or a regional indicator pair always takes two cells.
pub fn grapheme_width(grapheme: &str) -> u16 {
    let mut chars = grapheme.chars();
    let Some(first) = chars.next() else {
        return 0;
    };
    if chars.as_str().is_empty() {
        return char_width(first);
    }
    if grapheme.contains(VARIATION_SELECTOR_16) || is_regional_indicator(first) {
        return 2;
    }
    grapheme.chars().map(char_width).max().unwrap_or(0)
}

fn is_regional_indicator(c: char) -> bool {
    ('\u{1F1E6}'..='\u{1F1FF}').contains(&c)
}

/// Display width of a single-line string.
pub fn string_width(s: &str) -> u16 {
    s.graphemes(true)
        .fold(0u16, |width, g| width.saturating_add(grapheme_width(g)))
}

/// Width of the widest line and the number of lines.
pub fn text_extent(s: &str) -> (u16, u16) {
    if s.is_empty() {
        return (0, 1);
    }
    s.lines().fold((0, 0), |(width, lines), line| {
        (width.max(string_width(line)), lines.saturating_add(1))
    })
}

/// Cut `text` to at most `width` cells, ending in `…` when shortened.
pub fn truncate_text(text: &str, width: u16) -> String {
    if width == 0 {
        return String::new();
    }
    if string_width(text) <= width {
        return text.to_string();
    }

    let target = width - 1;
    let mut result = String::with_capacity(text.len());
    let mut used = 0u16;
    for grapheme in text.graphemes(true) {
        let w = grapheme_width(grapheme);
        if used.saturating_add(w) > target {
            break;
        }
        result.push_str(grapheme);
        used += w;
    }
    result.push('…');
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_width_ascii() {
        assert_eq!(string_width("hello"), 5);
        assert_eq!(string_width(""), 0);
        assert_eq!(string_width("a\tb"), 2);
    }

    #[test]
    fn test_string_width_wide() {
        assert_eq!(string_width("日本"), 4);
        assert_eq!(string_width("한글"), 4);
    }

    #[test]
    fn test_combining_mark_is_one_cell() {
        assert_eq!(string_width("e\u{301}"), 1);
        assert_eq!(string_width("cafe\u{301}"), 4);
    }

    #[test]
    fn test_emoji_sequences_are_two_cells() {
        assert_eq!(string_width("👨\u{200D}👩"), 2);
        assert_eq!(string_width("👍\u{1F3FD}"), 2);
        assert_eq!(string_width("🇯🇵"), 2);
        assert_eq!(string_width("❤\u{FE0F}"), 2);
    }

    #[test]
    fn test_text_extent() {
        assert_eq!(text_extent(""), (0, 1));
        assert_eq!(text_extent("abc"), (3, 1));
        assert_eq!(text_extent("a\nlonger\nb"), (6, 3));
        assert_eq!(text_extent("e\u{301}e\u{301}\nx"), (2, 2));
    }

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("hello", 10), "hello");
        assert_eq!(truncate_text("hello world", 6), "hello…");
        assert_eq!(truncate_text("hello", 4), "hel…");
        assert_eq!(truncate_text("hello", 0), "");
    }

    #[test]
    fn test_truncate_keeps_clusters_whole() {
        assert_eq!(truncate_text("e\u{301}bcd", 3), "e\u{301}b…");
        assert_eq!(truncate_text("👨\u{200D}👩 family", 3), "👨\u{200D}👩…");
        // The family does not fit in one cell, so nothing of it is kept.
        assert_eq!(truncate_text("👨\u{200D}👩 family", 2), "…");
        assert_eq!(truncate_text("日本語", 4), "日…");
    }
}
