use std::borrow::Cow;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Ellipsis appended when truncating.
const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Truncate a string to fit within `max_width` terminal columns, appending
/// "..." when anything was cut. Width is measured per Unicode rules, so
/// CJK characters and emoji count as two columns.
///
/// For widths of 3 or less there is no room for "char + ellipsis", so the
/// result is just the characters that fit.
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if max_width == 0 {
        return Cow::Borrowed("");
    }
    if UnicodeWidthStr::width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    let budget = max_width.saturating_sub(ELLIPSIS_WIDTH);
    let mut used = 0;
    let mut out = String::new();
    for ch in s.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    if max_width > ELLIPSIS_WIDTH {
        out.push_str(ELLIPSIS);
    }
    Cow::Owned(out)
}

/// Render an item's HTML summary fragment as plain text wrapped to `width`
/// columns. Feed content is attacker-controlled HTML; going through a text
/// renderer means no markup ever reaches the terminal.
pub fn summary_to_text(html: &str, width: usize) -> String {
    if html.trim().is_empty() {
        return String::new();
    }
    html2text::from_read(html.as_bytes(), width.max(10))
}
