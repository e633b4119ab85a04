use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Trim surrounding whitespace and lower-case. Both user input and stored
/// answers go through this before comparison.
pub fn normalize_answer(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Shorten `s` to at most `max_width` terminal columns, ending with `...`.
pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }

    let budget = max_width.saturating_sub(3);
    let mut out = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if width + w > budget {
            break;
        }
        out.push(ch);
        width += w;
    }
    out.push_str("...");
    out
}

/// Right-pad `s` with spaces so it covers `columns` terminal cells.
/// Wide characters (emoji, CJK) count for two cells.
pub fn pad_to_width(s: &str, columns: usize) -> String {
    let width = s.width();
    if width >= columns {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(columns - width))
    }
}
