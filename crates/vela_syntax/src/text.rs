use std::ops::{Deref, Range};
use std::sync::Arc;

/// Source bytes are read-only and may be shared across threads; the stream
/// and every token/node it produces hold a clone of the same [`Arc`].
pub type SourceText = Arc<str>;
pub type TextSize = u32;
pub type TextSpan = Range<usize>;

/// A flyweight handle to a byte range of some shared source text.
///
/// Unlike a source-editing tree's text pointer, this one never merges
/// adjacent trivia into a token's own span (trivia is represented as
/// independent `TRIVIA`-flagged events instead, see [`crate::Kind::is_trivia`]),
/// so it needs no `extend_front`/`extend_back` machinery: it is an immutable
/// reference into the original bytes for its whole lifetime.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct TextPointer {
    source: SourceText,
    offset: TextSize,
    len: TextSize,
}

impl Default for TextPointer {
    fn default() -> Self {
        Self {
            source: Arc::from(""),
            offset: 0,
            len: 0,
        }
    }
}

impl TextPointer {
    pub fn new(source: SourceText, offset: TextSize, len: TextSize) -> Self {
        Self { source, offset, len }
    }

    pub fn from_span(source: SourceText, span: TextSpan) -> Self {
        Self {
            source,
            offset: span.start as TextSize,
            len: (span.end - span.start) as TextSize,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source[self.range()]
    }

    pub fn start(&self) -> TextSize {
        self.offset
    }

    pub fn end(&self) -> TextSize {
        self.offset + self.len
    }

    pub fn range(&self) -> TextSpan {
        self.offset as usize..(self.offset + self.len) as usize
    }

    pub fn len_size(&self) -> TextSize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn source(&self) -> &SourceText {
        &self.source
    }
}

impl Deref for TextPointer {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        self.as_str()
    }
}

impl std::fmt::Debug for TextPointer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{} {:?}", self.offset, self.offset + self.len, self.as_str())
    }
}
