use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Terminal columns occupied by `s` (CJK and emoji count as two).
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Cuts `s` down to `max_width` columns, appending `...` when something was dropped.
///
/// Widths of three columns or less have no room for the ellipsis, so the
/// longest fitting prefix is returned as is. Returns `Cow::Borrowed` when the
/// title already fits, which is the common case while rendering a list.
///
/// ```
/// use panchax::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Arrival", 10), "Arrival");
/// assert_eq!(truncate_to_width("The Shawshank Redemption", 10), "The Sha...");
/// assert_eq!(truncate_to_width("Heat", 2), "He");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    let budget = if max_width <= ELLIPSIS_WIDTH {
        max_width
    } else {
        max_width - ELLIPSIS_WIDTH
    };

    let end = prefix_end(s, budget);
    if max_width <= ELLIPSIS_WIDTH {
        Cow::Owned(s[..end].to_string())
    } else {
        Cow::Owned(format!("{}{}", &s[..end], ELLIPSIS))
    }
}

/// Byte offset of the longest prefix of `s` that fits in `budget` columns.
fn prefix_end(s: &str, budget: usize) -> usize {
    let mut used = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            return idx;
        }
        used += w;
    }
    s.len()
}

/// Removes terminal control characters and ANSI escape sequences.
///
/// Titles and genre names come from the catalog service and end up written
/// straight into the terminal. CSI (`ESC [ ... final`) and OSC
/// (`ESC ] ... BEL|ESC \`) sequences are dropped whole; other C0 controls and
/// DEL are dropped individually. Tab, LF and CR survive.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    if !s.chars().any(is_stripped) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\x1b' => match chars.peek() {
                Some('[') => {
                    chars.next();
                    // Parameters run until the final byte in 0x40..=0x7E.
                    for c in chars.by_ref() {
                        if ('\x40'..='\x7e').contains(&c) {
                            break;
                        }
                    }
                }
                Some(']') => {
                    chars.next();
                    while let Some(c) = chars.next() {
                        if c == '\x07' {
                            break;
                        }
                        if c == '\x1b' && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            },
            c if is_stripped(c) => {}
            c => out.push(c),
        }
    }

    Cow::Owned(out)
}

fn is_stripped(c: char) -> bool {
    c == '\x1b' || c == '\x7f' || (c < '\x20' && !matches!(c, '\t' | '\n' | '\r'))
}

/// Renders an average rating the way the movie cards show it (`4.2`).
pub fn format_rating(rating: f64) -> String {
    if rating.is_finite() {
        format!("{:.1}", rating)
    } else {
        "-".to_string()
    }
}
