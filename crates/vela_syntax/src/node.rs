use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use slice_dst::SliceWithHeader;

use crate::{Kind, SyntaxFlags, SyntaxHead, TextSize, TextSpan};

/// The fixed-size part of a [`SyntaxNode`]: everything but its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SyntaxNodeHeader {
    pub head: SyntaxHead,
    pub text_offset: TextSize,
    pub text_len: TextSize,
}

/// A single uniform CST node: a `{head, span, children}` triple with no
/// distinction between "leaf" and "interior" at the type level — a leaf is
/// simply a node with zero children. This mirrors the tree builder's own
/// fold algorithm, which never special-cases leaves beyond an empty children
/// slice, and keeps the one polymorphic hook (picking the node shape a
/// caller wants) at the [`NodeConstructor`] trait below rather than in the
/// node type itself.
///
/// Stored as an `Arc<SliceWithHeader<..>>` rather than `Arc<(Header, Vec<_>)>`
/// so that header and children share one allocation.
#[derive(Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct SyntaxNode(Arc<SliceWithHeader<SyntaxNodeHeader, SyntaxNode>>);

impl SyntaxNode {
    pub fn new_leaf(head: SyntaxHead, span: TextSpan) -> Self {
        let text_offset = span.start as TextSize;
        let text_len = (span.end - span.start) as TextSize;
        Self(SliceWithHeader::new(
            SyntaxNodeHeader {
                head,
                text_offset,
                text_len,
            },
            std::iter::empty(),
        ))
    }

    pub fn new(head: SyntaxHead, span: TextSpan, children: Vec<SyntaxNode>) -> Self {
        let text_offset = span.start as TextSize;
        let text_len = (span.end - span.start) as TextSize;
        Self(SliceWithHeader::new(
            SyntaxNodeHeader {
                head,
                text_offset,
                text_len,
            },
            children,
        ))
    }

    pub fn kind(&self) -> Kind {
        self.0.header.head.kind
    }

    pub fn flags(&self) -> SyntaxFlags {
        self.0.header.head.flags
    }

    pub fn head(&self) -> SyntaxHead {
        self.0.header.head
    }

    pub fn text_offset(&self) -> TextSize {
        self.0.header.text_offset
    }

    pub fn text_len(&self) -> TextSize {
        self.0.header.text_len
    }

    pub fn span(&self) -> TextSpan {
        let start = self.text_offset() as usize;
        start..start + self.text_len() as usize
    }

    pub fn children(&self) -> &[SyntaxNode] {
        self.0.slice.as_ref()
    }

    pub fn is_leaf(&self) -> bool {
        self.0.slice.is_empty()
    }

    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span()]
    }

    /// Prints a parenthesized S-expression over this subtree, e.g.
    /// `(if a (error) b c)`. Trivia and zero-width invisible nodes are
    /// included so the shape is exact, not approximate.
    pub fn to_sexp(&self, source: &str) -> String {
        let mut out = String::new();
        self.write_sexp(source, &mut out);
        out
    }

    fn write_sexp(&self, source: &str, out: &mut String) {
        if self.is_leaf() {
            if self.kind().is_trivia() {
                return;
            }
            if self.text_len() == 0 {
                out.push_str(&format!("({:?})", self.kind()));
            } else {
                out.push_str(self.text(source));
            }
            return;
        }
        out.push('(');
        out.push_str(&format!("{:?}", self.kind()).to_lowercase());
        for child in self.children() {
            if child.kind().is_trivia() {
                continue;
            }
            out.push(' ');
            child.write_sexp(source, out);
        }
        out.push(')');
    }
}

impl Debug for SyntaxNode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{:?}@{:?}", self.kind(), self.span()))?;
        if !self.is_leaf() {
            f.debug_list().entries(self.children()).finish()?;
        }
        Ok(())
    }
}

/// The one polymorphic hook the tree builder uses to materialize events into
/// nodes: a pair of leaf/interior constructor methods rather than an
/// inheritance hierarchy. A caller wanting a richer typed syntax node on top
/// of the lossless CST implements this trait instead of changing the
/// builder.
pub trait NodeConstructor {
    type Node;

    fn make_leaf(&mut self, head: SyntaxHead, span: TextSpan) -> Self::Node;

    fn make_interior(&mut self, head: SyntaxHead, span: TextSpan, children: Vec<Self::Node>) -> Self::Node;
}

/// The default [`NodeConstructor`], producing the lossless green tree
/// ([`SyntaxNode`]) described above.
#[derive(Debug, Default, Clone, Copy)]
pub struct GreenNodeBuilder;

impl NodeConstructor for GreenNodeBuilder {
    type Node = SyntaxNode;

    fn make_leaf(&mut self, head: SyntaxHead, span: TextSpan) -> SyntaxNode {
        SyntaxNode::new_leaf(head, span)
    }

    fn make_interior(&mut self, head: SyntaxHead, span: TextSpan, children: Vec<SyntaxNode>) -> SyntaxNode {
        SyntaxNode::new(head, span, children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_span_matches_text() {
        let node = SyntaxNode::new_leaf(SyntaxHead::leaf(Kind::IDENTIFIER), 2..5);
        assert_eq!(node.span(), 2..5);
        assert!(node.is_leaf());
        assert_eq!(node.text("ab_xyz"), "_xy");
    }

    #[test]
    fn interior_wraps_children_in_order() {
        let a = SyntaxNode::new_leaf(SyntaxHead::leaf(Kind::IDENTIFIER), 0..1);
        let b = SyntaxNode::new_leaf(SyntaxHead::leaf(Kind::OP_EQ), 1..2);
        let c = SyntaxNode::new_leaf(SyntaxHead::leaf(Kind::IDENTIFIER), 2..3);
        let node = SyntaxNode::new(SyntaxHead::leaf(Kind::ASSIGN), 0..3, vec![a, b, c]);
        assert_eq!(node.children().len(), 3);
        assert_eq!(node.children()[1].kind(), Kind::OP_EQ);
    }
}
