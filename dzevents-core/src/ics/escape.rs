//! RFC 5545 text escaping and content line folding.

/// Longest physical line allowed, in octets, excluding the CRLF.
pub const MAX_LINE_OCTETS: usize = 75;

/// Escape a TEXT value (RFC 5545 §3.3.11).
///
/// Carriage returns and control characters other than tab and newline are
/// dropped. Backslash, comma, semicolon and newline are escaped.
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ',' => out.push_str("\\,"),
            ';' => out.push_str("\\;"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            c if is_stripped_control(c) => {}
            c => out.push(c),
        }
    }
    out
}

/// Clean a value that is not TEXT (URIs, email addresses): control
/// characters and line breaks are removed, nothing is escaped.
pub fn sanitize_value(s: &str) -> String {
    s.chars()
        .filter(|&c| c != '\r' && c != '\n' && !is_stripped_control(c))
        .collect()
}

/// Clean a parameter value. Double quotes are not allowed inside parameter
/// values and are dropped.
pub fn param_text(s: &str) -> String {
    sanitize_value(s).chars().filter(|&c| c != '"').collect()
}

/// Fold a content line so no physical line exceeds 75 octets, counting the
/// leading space of continuation lines.
///
/// Breaks fall between characters, never inside a UTF-8 sequence, and
/// continuation lines start with a single space.
pub fn fold_line(line: &str) -> String {
    if line.len() <= MAX_LINE_OCTETS {
        return line.to_string();
    }

    let mut out = String::with_capacity(line.len() + 3 * (line.len() / (MAX_LINE_OCTETS - 1)));
    let mut width = 0;
    for c in line.chars() {
        let len = c.len_utf8();
        if width + len > MAX_LINE_OCTETS {
            out.push_str("\r\n ");
            width = 1;
        }
        out.push(c);
        width += len;
    }
    out
}

fn is_stripped_control(c: char) -> bool {
    matches!(c, '\u{00}'..='\u{08}' | '\u{0B}' | '\u{0C}' | '\u{0E}'..='\u{1F}' | '\u{7F}')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_text_special_characters() {
        assert_eq!(escape_text("a,b;c\nd"), "a\\,b\\;c\\nd");
        assert_eq!(escape_text("C:\\temp"), "C:\\\\temp");
        assert_eq!(escape_text("line one\r\nline two"), "line one\\nline two");
    }

    #[test]
    fn test_escape_text_leaves_plain_text_alone() {
        let plain = "Annual Meetup at the Old Library (room 4) - bring snacks!";
        assert_eq!(escape_text(plain), plain);
        assert_eq!(escape_text(&escape_text(plain)), plain);
    }

    #[test]
    fn test_escape_text_strips_control_characters() {
        assert_eq!(escape_text("a\u{0}b\u{7}c\u{1B}d\u{7F}e"), "abcde");
        assert_eq!(escape_text("tab\there"), "tab\there");
    }

    #[test]
    fn test_param_text_drops_quotes_and_breaks() {
        assert_eq!(param_text("Jane Doe"), "Jane Doe");
        assert_eq!(param_text("The \"Best\" Team"), "The Best Team");
        assert_eq!(param_text("Two\r\nLines"), "TwoLines");
    }

    #[test]
    fn test_fold_line_short_line_untouched() {
        let line = "SUMMARY:Short";
        assert_eq!(fold_line(line), line);
    }

    #[test]
    fn test_fold_line_long_unbroken_token() {
        let line = format!("DESCRIPTION:{}", "x".repeat(100));
        let folded = fold_line(&line);

        let physical: Vec<&str> = folded.split("\r\n").collect();
        assert!(physical.len() > 1, "expected folding, got {:?}", folded);
        for (i, part) in physical.iter().enumerate() {
            assert!(part.chars().count() <= MAX_LINE_OCTETS, "line {} too long: {:?}", i, part);
            if i > 0 {
                assert!(part.starts_with(' '), "continuation without space: {:?}", part);
            }
        }

        let unfolded = folded.replace("\r\n ", "");
        assert_eq!(unfolded, line);
    }

    #[test]
    fn test_fold_line_never_splits_multibyte_characters() {
        let line = format!("LOCATION:{}", "ä".repeat(80));
        let folded = fold_line(&line);

        for part in folded.split("\r\n") {
            assert!(part.len() <= MAX_LINE_OCTETS, "line too long: {} octets", part.len());
        }
        assert_eq!(folded.replace("\r\n ", ""), line);
    }
}
