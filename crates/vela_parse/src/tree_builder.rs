//! Event-buffer -> CST fold.
//!
//! The event buffer is a flat sequence of [`TaggedRange`]s; nesting is
//! recovered purely from each event's `start_mark`, never from byte-range
//! overlap (two zero-width invisible events at the same position would
//! otherwise be ambiguous). A single pass with one stack suffices: every
//! stack frame remembers the `start_mark` of the event that produced it --
//! a plain push for a leaf, or the wrapping event's own `start_mark` once a
//! fold completes -- and a later event folds in every frame whose
//! `start_mark` is at or after its own, in original order.

use tracing::debug;

use vela_syntax::{Kind, NodeConstructor, TaggedRange};

use crate::error::Error;

struct Frame<N> {
    start_mark: u32,
    node: N,
}

/// Folds `events` into a single CST rooted at `wrap_toplevel_as_kind` if more
/// than one top-level event remains after folding, or fails with
/// [`Error::MultipleTopLevelEvents`] if no wrapping kind was given.
pub fn build_tree<C: NodeConstructor>(
    ctor: &mut C,
    events: &[TaggedRange],
    wrap_toplevel_as_kind: Option<Kind>,
) -> Result<C::Node, Error> {
    let mut stack: Vec<Frame<C::Node>> = Vec::new();

    for event in events {
        if event.head.kind == Kind::TOMBSTONE {
            continue;
        }

        let is_leaf_push = match stack.last() {
            None => true,
            Some(top) => event.start_mark > top.start_mark,
        };

        if is_leaf_push {
            let node = ctor.make_leaf(event.head, event.span());
            stack.push(Frame {
                start_mark: event.start_mark,
                node,
            });
            continue;
        }

        let mut children = Vec::new();
        while let Some(top) = stack.last() {
            if top.start_mark >= event.start_mark {
                children.push(stack.pop().unwrap().node);
            } else {
                break;
            }
        }
        children.reverse();
        debug!(kind = ?event.head.kind, children = children.len(), "fold interior node");
        let node = ctor.make_interior(event.head, event.span(), children);
        stack.push(Frame {
            start_mark: event.start_mark,
            node,
        });
    }

    match stack.len() {
        0 => Ok(ctor.make_interior(vela_syntax::SyntaxHead::leaf(wrap_toplevel_as_kind.unwrap_or(Kind::BLOCK)), 0..0, Vec::new())),
        1 => Ok(stack.pop().unwrap().node),
        count => match wrap_toplevel_as_kind {
            Some(kind) => {
                let span_start = events.first().map(|e| e.start_byte).unwrap_or(0);
                let span_end = events.last().map(|e| e.end_byte).unwrap_or(0);
                let children: Vec<C::Node> = stack.into_iter().map(|f| f.node).collect();
                Ok(ctor.make_interior(
                    vela_syntax::SyntaxHead::leaf(kind),
                    span_start as usize..span_end as usize,
                    children,
                ))
            }
            None => Err(Error::MultipleTopLevelEvents { count }),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use vela_syntax::{GreenNodeBuilder, Kind, SourceText, SyntaxFlags};

    use super::*;
    use crate::options::ParseOptions;
    use crate::stream::ParseStream;

    fn parse(source: &str, build: impl FnOnce(&mut ParseStream)) -> (Vec<TaggedRange>, SourceText) {
        let text: SourceText = Arc::from(source);
        let mut stream = ParseStream::new(text.clone(), ParseOptions::default());
        build(&mut stream);
        let (ranges, _diagnostics) = stream.finish().unwrap();
        (ranges, text)
    }

    #[test]
    fn flat_block_of_three_identifiers() {
        let (ranges, source) = parse("a;b;c", |s| {
            s.bump(SyntaxFlags::empty(), true, None, Kind::NOTHING);
            s.bump(SyntaxFlags::empty(), true, None, Kind::NOTHING);
            s.bump(SyntaxFlags::empty(), true, None, Kind::NOTHING);
            s.bump(SyntaxFlags::empty(), true, None, Kind::NOTHING);
            s.bump(SyntaxFlags::empty(), true, None, Kind::NOTHING);
        });
        let mut ctor = GreenNodeBuilder;
        let tree = build_tree(&mut ctor, &ranges, Some(Kind::BLOCK)).unwrap();
        assert_eq!(tree.to_sexp(&source), "(block a ; b ; c)");
    }

    #[test]
    fn emit_wraps_a_single_interior_node() {
        let (ranges, source) = parse("a = b", |s| {
            let mark = s.position();
            s.bump(SyntaxFlags::empty(), true, None, Kind::NOTHING);
            s.bump(SyntaxFlags::empty(), true, None, Kind::NOTHING);
            s.bump(SyntaxFlags::empty(), true, None, Kind::NOTHING);
            s.emit(mark, Kind::ASSIGN, SyntaxFlags::empty(), None);
        });
        let mut ctor = GreenNodeBuilder;
        let tree = build_tree(&mut ctor, &ranges, None).unwrap();
        assert_eq!(tree.to_sexp(&source), "(assign a = b)");
        assert_eq!(tree.span(), 0..5);
    }

    #[test]
    fn nested_emits_fold_call_wrapping_a_group() {
        // f(x) -- GROUP wraps "(x)"; CALL wraps "f" + GROUP.
        let (ranges, source) = parse("f(x)", |s| {
            let call_mark = s.position();
            s.bump(SyntaxFlags::empty(), true, None, Kind::NOTHING); // f
            let group_mark = s.position();
            s.bump(SyntaxFlags::empty(), true, None, Kind::NOTHING); // (
            s.bump(SyntaxFlags::empty(), true, None, Kind::NOTHING); // x
            s.bump(SyntaxFlags::empty(), true, None, Kind::NOTHING); // )
            s.emit(group_mark, Kind::CALL, SyntaxFlags::empty(), None);
            s.emit(call_mark, Kind::CALL_INFIX, SyntaxFlags::empty(), None);
        });
        let mut ctor = GreenNodeBuilder;
        let tree = build_tree(&mut ctor, &ranges, None).unwrap();
        assert_eq!(tree.kind(), Kind::CALL_INFIX);
        assert_eq!(tree.children().len(), 2);
        assert_eq!(tree.children()[0].kind(), Kind::IDENTIFIER);
        assert_eq!(tree.children()[1].kind(), Kind::CALL);
        assert_eq!(tree.to_sexp(&source), "(call_infix f (call ( x )))");
    }

    #[test]
    fn tombstone_events_are_elided() {
        let (ranges, source) = parse("a", |s| {
            let mark = s.position();
            s.bump_invisible(Kind::TOMBSTONE, SyntaxFlags::empty(), None);
            s.bump(SyntaxFlags::empty(), true, None, Kind::NOTHING);
            s.emit(mark, Kind::BLOCK, SyntaxFlags::empty(), None);
        });
        let mut ctor = GreenNodeBuilder;
        let tree = build_tree(&mut ctor, &ranges, None).unwrap();
        assert_eq!(tree.children().len(), 1);
        assert_eq!(tree.to_sexp(&source), "(block a)");
    }

    #[test]
    fn multiple_top_level_events_without_wrap_kind_is_fatal() {
        let (ranges, _source) = parse("a;b", |s| {
            s.bump(SyntaxFlags::empty(), true, None, Kind::NOTHING);
            s.bump(SyntaxFlags::empty(), true, None, Kind::NOTHING);
            s.bump(SyntaxFlags::empty(), true, None, Kind::NOTHING);
        });
        let mut ctor = GreenNodeBuilder;
        let err = build_tree(&mut ctor, &ranges, None).unwrap_err();
        assert!(matches!(err, Error::MultipleTopLevelEvents { count: 3 }));
    }

    #[test]
    fn tree_containment_holds_for_nested_example() {
        let (ranges, _source) = parse("f(x)", |s| {
            let call_mark = s.position();
            s.bump(SyntaxFlags::empty(), true, None, Kind::NOTHING);
            let group_mark = s.position();
            s.bump(SyntaxFlags::empty(), true, None, Kind::NOTHING);
            s.bump(SyntaxFlags::empty(), true, None, Kind::NOTHING);
            s.bump(SyntaxFlags::empty(), true, None, Kind::NOTHING);
            s.emit(group_mark, Kind::CALL, SyntaxFlags::empty(), None);
            s.emit(call_mark, Kind::CALL_INFIX, SyntaxFlags::empty(), None);
        });
        let mut ctor = GreenNodeBuilder;
        let tree = build_tree(&mut ctor, &ranges, None).unwrap();
        fn assert_contained(node: &vela_syntax::SyntaxNode) {
            let span = node.span();
            for child in node.children() {
                assert!(child.span().start >= span.start && child.span().end <= span.end);
                assert_contained(child);
            }
        }
        assert_contained(&tree);
    }
}
