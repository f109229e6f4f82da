//! String literal unescaping: a cooked decode that interprets escape
//! sequences, and a raw decode that only un-doubles delimiter-escaping
//! backslashes.
//!
//! The per-escape-sequence handler below (`cooked_escape_handler`) has the
//! usual `fn(&str) -> Result<(char, &str), unescape_zero_copy::Error>` shape,
//! but this module drives its own loop over it rather than calling
//! `unescape_zero_copy::unescape` directly: that combinator always produces
//! exactly one output `char` per escape, and a line-continuation escape
//! (backslash immediately followed by a newline) must produce none.

use std::borrow::Cow;

use unescape_zero_copy::Error as EscapeError;

/// Decodes one escape sequence, given the source text immediately following
/// the backslash. Returns the decoded character and the remainder of the
/// input after the sequence.
fn cooked_escape_handler(s: &str) -> Result<(char, &str), EscapeError> {
    let mut chars = s.chars();
    let next = chars.next().ok_or(EscapeError::IncompleteSequence)?;
    match next {
        'n' => Ok(('\n', chars.as_str())),
        't' => Ok(('\t', chars.as_str())),
        'r' => Ok(('\r', chars.as_str())),
        'e' => Ok(('\x1b', chars.as_str())),
        'b' => Ok(('\x08', chars.as_str())),
        'f' => Ok(('\x0c', chars.as_str())),
        'v' => Ok(('\x0b', chars.as_str())),
        'a' => Ok(('\x07', chars.as_str())),
        '\\' | '\'' | '"' | '$' | '`' => Ok((next, chars.as_str())),
        'x' => unicode_char(chars.as_str(), 2, 2),
        'u' => unicode_char(chars.as_str(), 1, 4),
        'U' => unicode_char(chars.as_str(), 1, 8),
        '0'..='7' => octal_char(s),
        other => Err(EscapeError::InvalidUnicode(other as u32)),
    }
}

/// Reads between `min` and `max` hex digits and decodes them as one
/// character (used for `\x`, `\u`, `\U`).
fn unicode_char(s: &str, min: usize, max: usize) -> Result<(char, &str), EscapeError> {
    let digit_count = s
        .char_indices()
        .take(max)
        .take_while(|(_, c)| c.is_ascii_hexdigit())
        .count();
    if digit_count < min {
        return Err(EscapeError::IncompleteSequence);
    }
    let num = u32::from_str_radix(&s[..digit_count], 16).map_err(|_| EscapeError::IncompleteSequence)?;
    let ch = char::from_u32(num).ok_or(EscapeError::InvalidUnicode(num))?;
    Ok((ch, &s[digit_count..]))
}

/// Reads 1-3 octal digits, clamped to a single byte (0..=255).
fn octal_char(s: &str) -> Result<(char, &str), EscapeError> {
    let digit_count = s.chars().take(3).take_while(|c| ('0'..='7').contains(c)).count();
    let num = u32::from_str_radix(&s[..digit_count], 8).map_err(|_| EscapeError::IncompleteSequence)?;
    if num > 255 {
        return Err(EscapeError::InvalidUnicode(num));
    }
    Ok((num as u8 as char, &s[digit_count..]))
}

/// Decodes a cooked string/command body: interprets escape sequences,
/// consumes backslash-newline line continuations (along with an optional
/// CR/LF pair and any following indentation), and normalizes bare `\r`/`\r\n`
/// to `\n`. Returns the original slice unmodified (as `Cow::Borrowed`) when
/// no escape or line ending needed rewriting.
pub fn unescape_cooked(s: &str) -> Result<Cow<'_, str>, EscapeError> {
    if !s.contains(['\\', '\r']) {
        return Ok(Cow::Borrowed(s));
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(ch) = rest.chars().next() {
        match ch {
            '\\' => {
                let after_backslash = &rest[1..];
                match after_backslash.chars().next() {
                    Some('\n') => {
                        rest = skip_continuation_indent(&after_backslash[1..]);
                    }
                    Some('\r') => {
                        let after_cr = &after_backslash[1..];
                        let after_newline = after_cr.strip_prefix('\n').unwrap_or(after_cr);
                        rest = skip_continuation_indent(after_newline);
                    }
                    _ => {
                        let (decoded, remainder) = cooked_escape_handler(after_backslash)?;
                        out.push(decoded);
                        rest = remainder;
                    }
                }
            }
            '\r' => {
                out.push('\n');
                rest = rest[1..].strip_prefix('\n').unwrap_or(&rest[1..]);
            }
            other => {
                out.push(other);
                rest = &rest[other.len_utf8()..];
            }
        }
    }
    Ok(Cow::Owned(out))
}

fn skip_continuation_indent(s: &str) -> &str {
    s.trim_start_matches([' ', '\t'])
}

/// Decodes a raw string/command body: every backslash is preserved as-is
/// except a run of `n` backslashes immediately followed by `delimiter`,
/// which halves to `n / 2` backslashes followed by the delimiter (so the
/// delimiter itself can still be escaped without losing arbitrary backslash
/// runs elsewhere in the literal).
pub fn unescape_raw<'a>(s: &'a str, delimiter: &str) -> Cow<'a, str> {
    if !s.contains('\\') {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut rest = s;
    while !rest.is_empty() {
        match rest.find('\\') {
            None => {
                out.push_str(rest);
                break;
            }
            Some(idx) => {
                out.push_str(&rest[..idx]);
                rest = &rest[idx..];
                let run_len = rest.bytes().take_while(|b| *b == b'\\').count();
                let after_run = &rest[run_len..];
                if after_run.starts_with(delimiter) {
                    out.push_str(&"\\".repeat(run_len / 2));
                    if run_len % 2 == 1 {
                        out.push_str(delimiter);
                        rest = &after_run[delimiter.len()..];
                    } else {
                        rest = after_run;
                    }
                } else {
                    out.push_str(&rest[..run_len]);
                    rest = after_run;
                }
            }
        }
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cooked_passes_plain_text_through_unmodified() {
        assert_eq!(unescape_cooked("hello world").unwrap(), Cow::Borrowed("hello world"));
    }

    #[test]
    fn cooked_decodes_letter_escapes() {
        assert_eq!(unescape_cooked(r"a\nb\tc").unwrap(), "a\nb\tc");
    }

    #[test]
    fn cooked_decodes_hex_unicode_and_octal() {
        assert_eq!(unescape_cooked(r"\x41").unwrap(), "A");
        assert_eq!(unescape_cooked(r"A").unwrap(), "A");
        assert_eq!(unescape_cooked(r"\U00000041").unwrap(), "A");
        assert_eq!(unescape_cooked(r"\101").unwrap(), "A");
    }

    #[test]
    fn cooked_consumes_line_continuation_and_indentation() {
        assert_eq!(unescape_cooked("a\\\n    b").unwrap(), "ab");
        assert_eq!(unescape_cooked("a\\\r\n  b").unwrap(), "ab");
    }

    #[test]
    fn cooked_normalizes_bare_crlf() {
        assert_eq!(unescape_cooked("a\r\nb").unwrap(), "a\nb");
        assert_eq!(unescape_cooked("a\rb").unwrap(), "a\nb");
    }

    #[test]
    fn raw_is_identity_except_for_delimiter_escape_halving() {
        assert_eq!(unescape_raw(r"a\nb", "\""), Cow::Borrowed(r"a\nb"));
        assert_eq!(unescape_raw(r#"a\"b"#, "\""), "a\"b");
        assert_eq!(unescape_raw(r#"a\\\"b"#, "\""), "a\\\"b");
        assert_eq!(unescape_raw(r#"a\\"b"#, "\""), "a\\\"b");
    }
}
