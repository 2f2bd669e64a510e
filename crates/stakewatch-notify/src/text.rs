//! Small text helpers for digest bodies.

/// Collapse whitespace, then cut at a word boundary so the result plus
/// `placeholder` is at most `width` characters.
///
/// Text that already fits is returned collapsed but otherwise intact. When
/// not even the first word fits, only the placeholder remains.
pub fn shorten(text: &str, width: usize, placeholder: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    let full = words.join(" ");
    if full.chars().count() <= width {
        return full;
    }

    let budget = width.saturating_sub(placeholder.chars().count());
    let mut out = String::new();
    let mut len = 0;
    for word in words {
        let add = word.chars().count() + usize::from(!out.is_empty());
        if len + add > budget {
            break;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
        len += add;
    }
    out.push_str(placeholder);
    out
}

/// Escape text for inclusion in HTML element content or a quoted attribute.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
