//! The parser front-end core: lexer, value decoders, parse stream, tree
//! builder, and diagnostics renderer for a source-preserving syntax tree.
//! Recursive-descent grammar productions, CST-to-AST lowering, and macro
//! expansion are external collaborators built on top of [`ParseStream`] and
//! [`build_tree`] -- this crate stops at the lossless concrete syntax tree.

pub mod decode;
pub mod diagnostics;
mod error;
mod keywords;
mod lexer;
mod operators;
mod options;
mod stream;
mod tree_builder;

pub use diagnostics::{render_diagnostic, LineIndex};
pub use error::Error;
pub use keywords::lookup_keyword;
pub use lexer::Lexer;
pub use operators::lookup_operator;
pub use options::{LexerOptions, ParseOptions};
pub use stream::{ParseStream, SplitSpec, STUCK_PARSER_WATCHDOG};
pub use tree_builder::build_tree;

pub use vela_syntax::{
    Diagnostic, DiagnosticLevel, GrammarVersion, Kind, LexErrorCode, NodeConstructor, Position, RawToken, SourceText,
    SyntaxFlags, SyntaxHead, SyntaxNode, SyntaxToken, TaggedRange, TextSpan,
};

/// Lexes and parses `source` into a single CST using the default green-tree
/// constructor, wrapping multiple top-level events in `Kind::BLOCK`. This is
/// a convenience entry point for callers that only need the stock lossless
/// tree; anything needing a grammar beyond bare token concatenation drives
/// [`ParseStream`] directly through a recursive-descent production.
pub fn parse_to_green_tree(source: SourceText, options: ParseOptions) -> Result<(SyntaxNode, Vec<Diagnostic>), Error> {
    let mut stream = ParseStream::new(source, options);
    let mark = stream.position();
    loop {
        if stream.peek(0, true) == Kind::EOF {
            break;
        }
        stream.bump(SyntaxFlags::empty(), true, None, Kind::NOTHING);
    }
    stream.bump_trivia(true, None);
    stream.emit(mark, Kind::BLOCK, SyntaxFlags::empty(), None);
    let (ranges, diagnostics) = stream.finish()?;
    let mut ctor = vela_syntax::GreenNodeBuilder;
    let tree = build_tree(&mut ctor, &ranges, Some(Kind::BLOCK))?;
    Ok((tree, diagnostics))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn parse_to_green_tree_covers_every_source_byte() {
        let source: SourceText = Arc::from("a = b ; c");
        let (tree, _diagnostics) = parse_to_green_tree(source.clone(), ParseOptions::default()).unwrap();
        assert_eq!(tree.span(), 0..source.len());
    }

    #[test]
    fn parse_to_green_tree_on_empty_source_yields_an_empty_block() {
        let source: SourceText = Arc::from("");
        let (tree, diagnostics) = parse_to_green_tree(source, ParseOptions::default()).unwrap();
        assert!(tree.children().is_empty() || tree.children().iter().all(|c| c.is_leaf()));
        assert!(diagnostics.is_empty());
    }

    // Hand-written corpus walk checking the invariants every tree must hold,
    // rather than one assertion per fragment: lossless coverage, byte-range
    // monotonicity between siblings, and tree containment top to bottom.
    fn assert_invariants(node: &SyntaxNode, source_len: usize) {
        assert!(node.span().end <= source_len);
        let mut prev_end: Option<usize> = None;
        for child in node.children() {
            let span = child.span();
            assert!(span.start >= node.span().start && span.end <= node.span().end, "child escapes parent span");
            if let Some(prev) = prev_end {
                assert!(span.start >= prev, "sibling spans regress");
            }
            prev_end = Some(span.end);
            assert_invariants(child, source_len);
        }
    }

    #[test]
    fn tree_invariants_hold_across_a_fragment_corpus() {
        let corpus = [
            "a = b + c * 2",
            "a;b;c",
            "a .= b",
            "a, b = c, d",
            "2x",
            "x < y < z",
            "f(x, y)",
            "\"\"\"\n    hello $(name)!\n    bye\n    \"\"\"",
            "# a comment\na = 1 #= nested #= comment =# here =#\n",
            "a? b : c",
            "if end",
            "import ...A",
            "[x ;; y]",
            "",
        ];
        for fragment in corpus {
            let source: SourceText = Arc::from(fragment);
            let (tree, _diagnostics) = parse_to_green_tree(source.clone(), ParseOptions::default()).unwrap();
            assert_eq!(tree.span().end, source.len(), "tree does not cover fragment {fragment:?}");
            assert_invariants(&tree, source.len());
        }
    }
}
