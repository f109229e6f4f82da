//! Diagnostics renderer: turns a byte-ranged [`Diagnostic`] into
//! source-line context a human can read, independent of the terminal or
//! editor that eventually displays it. This is deliberately a plain string
//! builder rather than a dependency on a full diagnostic-rendering crate
//! (`codespan-reporting`, used elsewhere in this codebase for message
//! validation) -- the contiguous/elided-range behavior here is bespoke, not
//! the multi-label carets codespan renders.

use vela_syntax::Diagnostic;

const LEADING_CONTEXT: usize = 2;
const TRAILING_CONTEXT: usize = 1;
/// Ranges spanning more lines than this are elided with `…` between the
/// start and end contexts rather than shown in full.
const MAX_CONTIGUOUS_LINES: usize = 4;

/// A source file's line-start byte offsets, built once and reused across
/// every diagnostic rendered against the same source.
pub struct LineIndex {
    /// Byte offset of the first byte of each line; `starts[0] == 0`.
    starts: Vec<u32>,
    len: u32,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let mut starts = vec![0u32];
        for (i, byte) in source.bytes().enumerate() {
            if byte == b'\n' {
                starts.push(i as u32 + 1);
            }
        }
        Self {
            starts,
            len: source.len() as u32,
        }
    }

    pub fn line_count(&self) -> usize {
        self.starts.len()
    }

    /// The 0-indexed line containing `byte`, clamped to the last line.
    pub fn line_of(&self, byte: u32) -> usize {
        match self.starts.binary_search(&byte) {
            Ok(line) => line,
            Err(next) => next - 1,
        }
    }

    /// Half-open byte range of line `line`, excluding its trailing `\n`.
    fn line_span(&self, line: usize, source: &str) -> (u32, u32) {
        let start = self.starts[line];
        let end = self.starts.get(line + 1).copied().unwrap_or(self.len);
        let trimmed_end = source[start as usize..end as usize]
            .find('\n')
            .map(|i| start + i as u32)
            .unwrap_or(end);
        (start, trimmed_end)
    }

    fn line_text<'a>(&self, line: usize, source: &'a str) -> &'a str {
        let (start, end) = self.line_span(line, source);
        &source[start as usize..end as usize]
    }
}

/// Expands a zero-width range to the nearest adjacent code point on each
/// side, clamped to the source's bounds.
fn widen_empty_range(source: &str, start: u32, end: u32) -> (u32, u32) {
    if start != end {
        return (start, end);
    }
    let prev = source[..start as usize]
        .char_indices()
        .next_back()
        .map(|(i, _)| i as u32)
        .unwrap_or(start);
    let next = source[end as usize..]
        .chars()
        .next()
        .map(|c| end + c.len_utf8() as u32)
        .unwrap_or(end);
    (prev, next)
}

/// Renders `diagnostic` against `source`, using a pre-built [`LineIndex`] so
/// callers rendering many diagnostics against the same file pay the
/// line-scan cost once.
pub fn render_diagnostic(diagnostic: &Diagnostic, source: &str, index: &LineIndex) -> String {
    let (start, end) = widen_empty_range(source, diagnostic.start_byte, diagnostic.end_byte);
    let first_line = index.line_of(start);
    let last_line = index.line_of(end.saturating_sub(1).max(start));

    let lead_start = first_line.saturating_sub(LEADING_CONTEXT);
    let trail_end = (last_line + TRAILING_CONTEXT).min(index.line_count() - 1);

    let mut out = String::new();
    out.push_str(&format!("{:?}: {}\n", diagnostic.level, diagnostic.message));

    if last_line - first_line + 1 > MAX_CONTIGUOUS_LINES {
        render_line_range(&mut out, index, source, lead_start, first_line + 1);
        out.push_str("  ...\n");
        render_line_range(&mut out, index, source, last_line.saturating_sub(1), trail_end + 1);
    } else {
        render_line_range(&mut out, index, source, lead_start, trail_end + 1);
    }
    out
}

fn render_line_range(out: &mut String, index: &LineIndex, source: &str, from: usize, to: usize) {
    for line in from..to.min(index.line_count()) {
        out.push_str(&format!("{:>5} | {}\n", line + 1, index.line_text(line, source)));
    }
}

/// Serializes a batch of diagnostics as a JSON array, for callers (editor
/// integrations, CI annotations) that want the raw byte-range data rather
/// than the rendered-text form above.
#[cfg(feature = "serde")]
pub fn diagnostics_to_json(diagnostics: &[Diagnostic]) -> serde_json::Result<String> {
    serde_json::to_string(diagnostics)
}

#[cfg(test)]
mod tests {
    use vela_syntax::DiagnosticLevel;

    use super::*;

    #[test]
    fn widens_a_zero_width_range_to_adjacent_code_points() {
        let source = "abc";
        assert_eq!(widen_empty_range(source, 1, 1), (0, 2));
    }

    #[test]
    fn widen_clamps_at_the_start_and_end_of_source() {
        assert_eq!(widen_empty_range("abc", 0, 0), (0, 1));
        assert_eq!(widen_empty_range("abc", 3, 3), (2, 3));
    }

    #[test]
    fn line_of_finds_the_containing_line() {
        let index = LineIndex::new("aa\nbb\ncc");
        assert_eq!(index.line_of(0), 0);
        assert_eq!(index.line_of(3), 1);
        assert_eq!(index.line_of(6), 2);
    }

    #[test]
    fn renders_leading_and_trailing_context_around_a_compact_range() {
        let source = "one\ntwo\nthree\nfour\nfive\n";
        let index = LineIndex::new(source);
        let diag = Diagnostic::error(8, 13, "bad token"); // "three"
        let rendered = render_diagnostic(&diag, source, &index);
        assert!(rendered.contains("1 | one"));
        assert!(rendered.contains("2 | two"));
        assert!(rendered.contains("3 | three"));
        assert!(rendered.contains("4 | four"));
        assert!(!rendered.contains("5 | five"));
    }

    #[test]
    fn elides_long_ranges_between_start_and_end_context() {
        let source = (1..=10).map(|n| format!("line{n}")).collect::<Vec<_>>().join("\n");
        let index = LineIndex::new(&source);
        let diag = Diagnostic::error(0, source.len() as u32, "spans everything");
        let rendered = render_diagnostic(&diag, &source, &index);
        assert!(rendered.contains("..."));
        assert!(rendered.contains("1 | line1"));
        assert!(rendered.contains("10 | line10"));
    }

    #[test]
    fn level_is_included_verbatim() {
        let source = "a";
        let index = LineIndex::new(source);
        let diag = Diagnostic::new(DiagnosticLevel::Warning, 0, 1, "heads up");
        assert!(render_diagnostic(&diag, source, &index).starts_with("Warning: heads up"));
    }

    #[test]
    #[cfg(feature = "serde")]
    fn diagnostics_round_trip_through_json() {
        let diags = vec![Diagnostic::error(0, 1, "bad token"), Diagnostic::new(DiagnosticLevel::Note, 2, 2, "fyi")];
        let json = diagnostics_to_json(&diags).unwrap();
        let back: Vec<Diagnostic> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, diags);
    }
}
