//! Triple-quoted string dedenting, applied to the raw literal body before
//! escape unescaping and before `\r`/`\r\n` normalization.
//!
//! The dedent amount is the longest common leading run of spaces/tabs shared
//! by every line that counts towards the calculation: every non-blank line,
//! plus the final line if it is blank (whitespace-only) — that line is the
//! one immediately preceding the closing delimiter, so a block indented to
//! match the closing delimiter dedents by that amount even though the line
//! itself carries no content. A body with no qualifying line (every line
//! blank except where it isn't, or no line present at all) dedents by zero.
//!
//! A triple string containing interpolations is lexed as several
//! [`crate::Kind::STRING_CHUNK`] pieces rather than one contiguous body, but
//! the dedent computation still has to see it as one logical run of
//! lines: an interpolation in the middle of an indented line doesn't start a
//! new line, so the indentation of that line is whatever preceded the first
//! piece that opened it. [`dedent_pieces`] computes and applies a single
//! dedent length across all of a literal's chunks; [`dedent`] is the
//! single-piece case, used when a literal has no interpolations at all.
//!
//! The line immediately after the opening `"""` is never meant to carry
//! content of its own -- it exists only so the first real line can start in
//! column one of the source. Once the common indent has been stripped, the
//! single newline (or `\r\n`) that opens the body is removed from the first
//! piece, the same way a body with no interpolations at all collapses
//! `"""\n  a\n  """` down to `"a\n"` rather than `"\na\n"`.

/// Removes the common leading whitespace from every line of `body`.
pub fn dedent(body: &str) -> String {
    dedent_pieces(&[body]).pop().unwrap_or_default()
}

/// Removes the common leading whitespace across every line spanned by
/// `pieces`, treating them as one logical run of text with the interpolated
/// expressions between them elided (since they contribute no static
/// indentation of their own). Returns one dedented string per input piece,
/// in order.
///
/// A line is only a dedent candidate at the point it actually starts: the
/// first fragment of `pieces[0]`, and any fragment immediately following a
/// `\n` within a piece. The first fragment of every later piece continues a
/// line that was already open when the preceding piece ended at an
/// interpolation, so it is never itself stripped, only scanned past.
pub fn dedent_pieces(pieces: &[&str]) -> Vec<String> {
    let mut lines: Vec<&str> = Vec::new();
    let mut fragment_is_line_start: Vec<Vec<bool>> = Vec::with_capacity(pieces.len());
    let mut prev_ends_with_newline = true;

    for piece in pieces {
        let fragments: Vec<&str> = piece.split('\n').collect();
        let mut starts = Vec::with_capacity(fragments.len());
        for (i, fragment) in fragments.iter().enumerate() {
            let is_start = (i == 0 && prev_ends_with_newline) || i > 0;
            starts.push(is_start);
            if is_start {
                lines.push(fragment);
            }
            // else: a mid-line continuation after an interpolation. The line
            // it belongs to was already pushed (truncated at the
            // interpolation) by an earlier piece's trailing fragment, which
            // is all `common_indent` needs to see.
        }
        prev_ends_with_newline = piece.ends_with('\n');
        fragment_is_line_start.push(starts);
    }

    let prefix_len = common_indent(&lines);

    let mut dedented: Vec<String> = pieces
        .iter()
        .zip(fragment_is_line_start.iter())
        .map(|(piece, starts)| {
            if prefix_len == 0 {
                return piece.to_string();
            }
            piece
                .split('\n')
                .zip(starts.iter())
                .map(|(fragment, is_start)| if *is_start { strip_prefix_len(fragment, prefix_len) } else { fragment })
                .collect::<Vec<_>>()
                .join("\n")
        })
        .collect();

    strip_leading_newline(&mut dedented);
    dedented
}

/// Removes the single newline that opens a triple-quoted literal's body
/// from the first piece, if present. Runs after dedent so the empty first
/// line still counts during indent computation but never survives into the
/// decoded value.
fn strip_leading_newline(pieces: &mut [String]) {
    let Some(first) = pieces.first_mut() else { return };
    if let Some(rest) = first.strip_prefix("\r\n") {
        *first = rest.to_string();
    } else if let Some(rest) = first.strip_prefix('\n').or_else(|| first.strip_prefix('\r')) {
        *first = rest.to_string();
    }
}

fn common_indent(lines: &[&str]) -> usize {
    let mut qualifying = lines
        .iter()
        .enumerate()
        .filter(|(i, line)| !line.trim_matches([' ', '\t']).is_empty() || is_trailing_blank(lines, *i))
        .map(|(_, line)| *line);

    let Some(first) = qualifying.next() else {
        return 0;
    };
    let mut prefix = leading_whitespace(first);
    for line in qualifying {
        let this = leading_whitespace(line);
        let common = prefix.chars().zip(this.chars()).take_while(|(a, b)| a == b).count();
        prefix = &prefix[..common];
        if prefix.is_empty() {
            break;
        }
    }
    prefix.len()
}

fn is_trailing_blank(lines: &[&str], index: usize) -> bool {
    index == lines.len() - 1 && lines[index].trim_matches([' ', '\t']).is_empty()
}

fn leading_whitespace(line: &str) -> &str {
    let trimmed_len = line.len() - line.trim_start_matches([' ', '\t']).len();
    &line[..trimmed_len]
}

fn strip_prefix_len(line: &str, prefix_len: usize) -> &str {
    let actual = leading_whitespace(line).len().min(prefix_len);
    &line[actual..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedents_by_common_indentation() {
        let body = "\n    a\n    b\n    ";
        assert_eq!(dedent(body), "a\nb\n");
    }

    #[test]
    fn uneven_indentation_dedents_by_the_minimum() {
        let body = "\n  a\n      b\n  ";
        assert_eq!(dedent(body), "a\n    b\n");
    }

    #[test]
    fn blank_interior_lines_do_not_constrain_the_indent() {
        let body = "\n    a\n\n    b\n    ";
        assert_eq!(dedent(body), "a\n\nb\n");
    }

    #[test]
    fn no_qualifying_line_dedents_by_zero() {
        assert_eq!(dedent(""), "");
        assert_eq!(dedent("\n"), "");
    }

    #[test]
    fn non_blank_final_line_is_not_treated_as_the_closing_delimiter_line() {
        let body = "\n    a\n  b";
        assert_eq!(dedent(body), "  a\nb");
    }

    #[test]
    fn dedent_pieces_matches_single_piece_dedent() {
        let body = "\n    a\n    b\n    ";
        assert_eq!(dedent_pieces(&[body]), vec![dedent(body)]);
    }

    #[test]
    fn dedent_spans_an_interpolation_without_treating_its_continuation_as_a_new_line() {
        // """\n    hello $(name)!\n    bye\n    """ split around the $(name) interpolation.
        let pieces = dedent_pieces(&["\n    hello ", "!\n    bye\n    "]);
        assert_eq!(pieces, vec!["hello ".to_string(), "!\nbye\n".to_string()]);
    }

    #[test]
    fn triple_string_dedent_matches_scenario_five() {
        // """\n  a\n  b\n  """ -> "a\nb\n" (two-space dedent, opening newline elided).
        let body = "\n  a\n  b\n  ";
        assert_eq!(dedent(body), "a\nb\n");
    }
}
