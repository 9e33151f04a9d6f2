#![forbid(unsafe_code)]

use ftui::text::display_width;

const TAB_WIDTH: usize = 4;

pub fn char_width(ch: char) -> usize {
    let mut buf = [0u8; 4];
    display_width(ch.encode_utf8(&mut buf))
}

pub fn str_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

/// Longest prefix of `s` whose display width does not exceed `width`.
pub fn truncate_to_width(s: &str, width: usize) -> (String, usize) {
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = char_width(ch);
        if used + w > width {
            break;
        }
        out.push(ch);
        used += w;
    }
    (out, used)
}

/// Truncates or pads `s` so the result is exactly `width` cells wide.
///
/// A wide character that would straddle the right edge is dropped and the
/// remaining cell is filled with a space.
pub fn fit_to_width(s: &str, width: usize) -> String {
    let (mut out, used) = truncate_to_width(s, width);
    out.extend(std::iter::repeat_n(' ', width - used));
    out
}

/// Longest suffix of `s` that fits in `width` cells.
pub fn tail_to_width(s: &str, width: usize) -> String {
    let mut kept = Vec::new();
    let mut used = 0;
    for ch in s.chars().rev() {
        let w = char_width(ch);
        if used + w > width {
            break;
        }
        kept.push(ch);
        used += w;
    }
    kept.iter().rev().collect()
}

/// Keeps the end of `s`, marking dropped leading text with `...`.
pub fn ellipsize_left(s: &str, width: usize) -> String {
    if str_width(s) <= width {
        return s.to_string();
    }
    if width <= 3 {
        return tail_to_width(s, width);
    }
    format!("...{}", tail_to_width(s, width - 3))
}

/// Makes captured output safe to lay out cell by cell: ANSI escape
/// sequences are removed, tabs expanded, other control characters dropped.
pub fn sanitize_line(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\u{1b}' => skip_escape(&mut chars),
            '\t' => out.extend(std::iter::repeat_n(' ', TAB_WIDTH)),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

fn skip_escape(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) {
    match chars.peek() {
        Some('[') => {
            chars.next();
            // CSI: parameters and intermediates up to a final byte in @..~
            for c in chars.by_ref() {
                if ('@'..='~').contains(&c) {
                    break;
                }
            }
        }
        Some(']') => {
            chars.next();
            // OSC: terminated by BEL or ST (ESC \)
            while let Some(c) = chars.next() {
                if c == '\u{7}' {
                    break;
                }
                if c == '\u{1b}' {
                    if chars.peek() == Some(&'\\') {
                        chars.next();
                    }
                    break;
                }
            }
        }
        Some(_) => {
            chars.next();
        }
        None => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_pads_short_text() {
        assert_eq!(fit_to_width("abc", 6), "abc   ");
        assert_eq!(fit_to_width("", 3), "   ");
    }

    #[test]
    fn fit_truncates_long_text() {
        assert_eq!(fit_to_width("abcdef", 4), "abcd");
    }

    #[test]
    fn wide_char_never_straddles_the_edge() {
        // each ideograph takes two cells
        let fitted = fit_to_width("日本語", 5);
        assert_eq!(fitted, "日本 ");
        assert_eq!(str_width(&fitted), 5);
    }

    #[test]
    fn tail_keeps_the_end() {
        assert_eq!(tail_to_width("abcdef", 3), "def");
        assert_eq!(tail_to_width("ab", 5), "ab");
        assert_eq!(tail_to_width("x日本", 4), "日本");
        assert_eq!(tail_to_width("x日本", 3), "本");
    }

    #[test]
    fn ellipsize_marks_dropped_prefix() {
        assert_eq!(ellipsize_left("/home/user/projects", 10), "...rojects");
        assert_eq!(ellipsize_left("/tmp", 10), "/tmp");
        assert_eq!(ellipsize_left("/tmp/abc", 2), "bc");
    }

    #[test]
    fn sanitize_strips_ansi_and_controls() {
        assert_eq!(sanitize_line("\u{1b}[32mgreen\u{1b}[0m"), "green");
        assert_eq!(sanitize_line("a\rb\u{7}c"), "abc");
        assert_eq!(sanitize_line("\u{1b}]0;title\u{7}text"), "text");
        assert_eq!(sanitize_line("evil\nname"), "evilname");
    }

    #[test]
    fn sanitize_expands_each_tab_to_four_spaces() {
        assert_eq!(sanitize_line("a\tb"), "a    b");
        assert_eq!(sanitize_line("\tx"), "    x");
        assert_eq!(sanitize_line("abcd\te"), "abcd    e");
    }
}
