use crate::error_code::LexErrorCode;
use crate::text::{SourceText, TextPointer, TextSize, TextSpan};
use crate::Kind;

/// A single lossless byte-range token straight out of the lexer, before any
/// lookahead/trivia bookkeeping is attached.
///
/// Byte positions are half-open `[start_byte, end_byte)`, matching Rust slice
/// conventions, with `end_byte == start_byte + lexeme_len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RawToken {
    pub kind: Kind,
    pub start_byte: u32,
    pub end_byte: u32,
    pub error_code: LexErrorCode,
    /// Operator was written with a leading `.` (broadcast semantics).
    pub is_dotted: bool,
    /// Operator name was extended by trailing unicode sub/superscript characters.
    pub is_suffixed: bool,
}

impl RawToken {
    pub fn new(kind: Kind, start_byte: u32, end_byte: u32) -> Self {
        Self {
            kind,
            start_byte,
            end_byte,
            error_code: LexErrorCode::NoErr,
            is_dotted: false,
            is_suffixed: false,
        }
    }

    pub fn with_error(mut self, error_code: LexErrorCode) -> Self {
        self.error_code = error_code;
        self
    }

    pub fn span(&self) -> TextSpan {
        self.start_byte as usize..self.end_byte as usize
    }

    pub fn len(&self) -> u32 {
        self.end_byte - self.start_byte
    }

    pub fn is_empty(&self) -> bool {
        self.start_byte == self.end_byte
    }
}

/// A [`RawToken`] decorated with the trivia that preceded it in the parse
/// stream's lookahead buffer. Equality to a [`Kind`] is "kind matches AND not
/// decorated": `at_whitespace`/`at_newline` never factor into the comparison
/// a parser production performs on `token.raw.kind`, only into the separate
/// `had_whitespace`/`had_newline` checks it performs when the distinction
/// matters (e.g. disambiguating `f (x)` from `f(x)`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SyntaxToken {
    pub raw: RawToken,
    /// Any whitespace (not counting newlines) preceded this token.
    pub had_whitespace: bool,
    /// A newline-containing whitespace run preceded this token.
    pub had_newline: bool,
}

impl SyntaxToken {
    pub fn new(raw: RawToken, had_whitespace: bool, had_newline: bool) -> Self {
        Self {
            raw,
            had_whitespace,
            had_newline,
        }
        .normalize()
    }

    fn normalize(self) -> Self {
        // A newline run implies whitespace was present, even if the caller only set one flag.
        Self {
            had_whitespace: self.had_whitespace || self.had_newline,
            ..self
        }
    }

    pub fn kind(&self) -> Kind {
        self.raw.kind
    }

    pub fn is(&self, kind: Kind) -> bool {
        self.raw.kind == kind
    }

    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.raw.span()]
    }

    pub fn text_pointer(&self, source: &SourceText) -> TextPointer {
        TextPointer::from_span(source.clone(), self.raw.span())
    }

    pub fn len(&self) -> TextSize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}
