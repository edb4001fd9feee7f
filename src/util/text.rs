use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Terminal columns occupied by `s` (CJK and emoji count as two).
///
/// ```
/// use newsdeck::util::display_width;
///
/// assert_eq!(display_width("News"), 4);
/// assert_eq!(display_width("日本"), 4);
/// ```
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Truncate `s` to at most `max_width` columns, appending "..." when cut.
///
/// Widths of 3 or less have no room for the ellipsis, so the text is simply
/// clipped. Returns `Cow::Borrowed` when nothing was removed.
///
/// ```
/// use newsdeck::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Headline", 20), "Headline");
/// assert_eq!(truncate_to_width("Breaking news today", 11), "Breaking...");
/// assert_eq!(truncate_to_width("Test", 2), "Te");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }

    let (budget, suffix) = if max_width <= ELLIPSIS_WIDTH {
        (max_width, "")
    } else {
        (max_width - ELLIPSIS_WIDTH, ELLIPSIS)
    };

    let mut used = 0;
    let mut end = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        end = idx + c.len_utf8();
    }

    Cow::Owned(format!("{}{}", &s[..end], suffix))
}

/// Whether a byte is a control byte that must not reach the terminal.
/// Tab, newline and carriage return are allowed.
fn is_unsafe_control(b: u8) -> bool {
    b == 0x1b || b == 0x7f || (b < 0x20 && !matches!(b, b'\t' | b'\n' | b'\r'))
}

/// Remove control characters and ANSI escape sequences from API-supplied text.
///
/// CSI sequences (`ESC [` .. final byte) and OSC sequences (`ESC ]` .. BEL or
/// `ESC \`) are dropped whole. Returns `Cow::Borrowed` for clean input.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    let bytes = s.as_bytes();
    if !bytes.iter().copied().any(is_unsafe_control) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    let mut run_start = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if !is_unsafe_control(b) {
            i += 1;
            continue;
        }

        // Control bytes are ASCII, so this slice ends on a char boundary.
        out.push_str(&s[run_start..i]);

        i += 1;
        if b == 0x1b {
            match bytes.get(i) {
                Some(b'[') => {
                    i += 1;
                    while let Some(&c) = bytes.get(i) {
                        i += 1;
                        if (0x40..=0x7e).contains(&c) {
                            break;
                        }
                    }
                }
                Some(b']') => {
                    i += 1;
                    while let Some(&c) = bytes.get(i) {
                        if c == 0x07 {
                            i += 1;
                            break;
                        }
                        if c == 0x1b && bytes.get(i + 1) == Some(&b'\\') {
                            i += 2;
                            break;
                        }
                        i += 1;
                    }
                }
                _ => {}
            }
        }
        run_start = i;
    }
    out.push_str(&s[run_start..]);

    Cow::Owned(out)
}

/// Strip the API's trailing truncation marker, e.g. `"... [+2481 chars]"`.
pub fn strip_truncation_marker(content: &str) -> &str {
    let trimmed = content.trim_end();
    let Some(open) = trimmed.rfind("[+") else {
        return trimmed;
    };
    let tail = &trimmed[open + 2..];
    let is_marker = tail
        .strip_suffix(" chars]")
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()));
    if is_marker {
        trimmed[..open].trim_end()
    } else {
        trimmed
    }
}

/// Split article body text into paragraphs on blank lines.
///
/// The truncation marker is removed and control characters are stripped.
/// Lines within a paragraph are joined with single spaces.
pub fn article_paragraphs(content: &str) -> Vec<String> {
    let clean = strip_control_chars(content);
    let body = strip_truncation_marker(&clean).replace("\r\n", "\n");

    body.split("\n\n")
        .map(|p| {
            p.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|p| !p.is_empty())
        .collect()
}
