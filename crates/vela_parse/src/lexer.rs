//! The byte-indexed UTF-8 tokenizer. Produces one [`RawToken`] per call to
//! [`Lexer::next_token`], terminating in an idempotent [`Kind::EOF`].
//!
//! String/command literals are lexed as a sequence of piece tokens rather
//! than one token per literal, so interpolation can re-enter ordinary
//! expression lexing mid-literal. The lexer tracks this with its own
//! interpolation-depth frame stack -- nothing outside this module needs to
//! drive the transition between string and expression lexing; it falls out
//! of which frame is on top.

use memchr::memchr3;
use tracing::trace;
use unicode_xid::UnicodeXID;

use vela_syntax::{LexErrorCode, SourceText};

use crate::keywords::lookup_keyword;
use crate::operators::{is_operator_start_byte, is_operator_suffix_char, lookup_operator};
use crate::options::LexerOptions;
use vela_syntax::Kind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StrDelim {
    Quote,
    Backtick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Str { delim: StrDelim, is_triple: bool },
    /// An embedded `$( ... )` expression. `depth` counts unmatched `(` opened
    /// since entering, so the paren that balances the interpolation's own
    /// opening paren is the first `)` seen at `depth == 0`.
    Interp { depth: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingInterp {
    None,
    ExpectLParen,
    ExpectIdentifier,
}

pub struct Lexer {
    source: SourceText,
    position: u32,
    stack: Vec<Frame>,
    pending_interp: PendingInterp,
    #[allow(dead_code)]
    options: LexerOptions,
}

impl Lexer {
    pub fn new(source: SourceText, options: LexerOptions) -> Self {
        Self {
            source,
            position: 0,
            stack: Vec::new(),
            pending_interp: PendingInterp::None,
            options,
        }
    }

    pub fn position(&self) -> u32 {
        self.position
    }

    fn rest(&self) -> &str {
        &self.source[self.position as usize..]
    }

    fn is_eof(&self) -> bool {
        self.position as usize >= self.source.len()
    }

    fn current_byte(&self) -> u8 {
        self.source.as_bytes().get(self.position as usize).copied().unwrap_or(0)
    }

    fn advance_bytes(&mut self, n: u32) {
        self.position += n;
    }

    fn advance_char(&mut self) -> char {
        let c = self.rest().chars().next().unwrap_or('\0');
        self.position += c.len_utf8() as u32;
        c
    }

    /// Lexes the next token, terminating in an idempotent [`Kind::EOF`].
    pub fn next_token(&mut self) -> RawToken {
        if self.is_eof() {
            return self.finish(self.position, Kind::EOF);
        }
        let token = match self.stack.last() {
            Some(Frame::Str { delim, is_triple }) => {
                let (delim, is_triple) = (*delim, *is_triple);
                self.next_string_token(delim, is_triple)
            }
            _ => self.next_regular_token(),
        };
        trace!(kind = ?token.kind, start = token.start_byte, end = token.end_byte, "lexed token");
        token
    }

    fn start(&self) -> u32 {
        self.position
    }

    fn finish(&self, start: u32, kind: Kind) -> RawToken {
        RawToken::new(kind, start, self.position)
    }

    // ---- regular (non-string) tokens ---------------------------------

    fn next_regular_token(&mut self) -> RawToken {
        let start = self.start();
        let b = self.current_byte();
        match b {
            b' ' | b'\t' => self.consume_whitespace(start),
            b'\r' | b'\n' => self.consume_whitespace(start),
            b'#' => self.consume_comment(start),
            b'"' | b'`' => self.consume_string_open(start, b),
            b'\'' => self.consume_char(start),
            b'(' => self.consume_bracket_open(start, Kind::LPAREN),
            b')' => self.consume_bracket_close(start, Kind::RPAREN),
            b'[' => {
                self.advance_bytes(1);
                self.finish(start, Kind::LBRACKET)
            }
            b']' => {
                self.advance_bytes(1);
                self.finish(start, Kind::RBRACKET)
            }
            b'{' => {
                self.advance_bytes(1);
                self.finish(start, Kind::LBRACE)
            }
            b'}' => {
                self.advance_bytes(1);
                self.finish(start, Kind::RBRACE)
            }
            b',' => {
                self.advance_bytes(1);
                self.finish(start, Kind::COMMA)
            }
            b';' => {
                self.advance_bytes(1);
                self.finish(start, Kind::SEMICOLON)
            }
            b'@' => {
                self.advance_bytes(1);
                self.finish(start, Kind::AT)
            }
            b':' => self.consume_colon(start),
            b'.' => self.consume_dot_or_operator(start),
            b'0'..=b'9' => self.consume_number(start),
            _ if is_operator_start_byte(b) => self.consume_operator(start),
            _ => self.consume_identifier_or_unknown(start),
        }
    }

    fn consume_whitespace(&mut self, start: u32) -> RawToken {
        let mut has_newline = false;
        while !self.is_eof() {
            match self.current_byte() {
                b' ' | b'\t' => {
                    self.advance_bytes(1);
                }
                b'\r' => {
                    has_newline = true;
                    self.advance_bytes(1);
                    if self.current_byte() == b'\n' {
                        self.advance_bytes(1);
                    }
                }
                b'\n' => {
                    has_newline = true;
                    self.advance_bytes(1);
                }
                _ => break,
            }
        }
        self.finish(start, if has_newline { Kind::NEWLINE_WS } else { Kind::WHITESPACE })
    }

    fn consume_comment(&mut self, start: u32) -> RawToken {
        self.advance_bytes(1);
        if self.current_byte() == b'=' {
            self.advance_bytes(1);
            let mut depth = 1u32;
            while depth > 0 {
                if self.is_eof() {
                    return self.finish(start, Kind::COMMENT).with_error(LexErrorCode::EofMultiComment);
                }
                if self.current_byte() == b'#' && self.peek_byte(1) == b'=' {
                    self.advance_bytes(2);
                    depth += 1;
                } else if self.current_byte() == b'=' && self.peek_byte(1) == b'#' {
                    self.advance_bytes(2);
                    depth -= 1;
                } else {
                    self.advance_char();
                }
            }
            return self.finish(start, Kind::COMMENT);
        }
        while !self.is_eof() && self.current_byte() != b'\n' && self.current_byte() != b'\r' {
            self.advance_char();
        }
        self.finish(start, Kind::COMMENT)
    }

    fn peek_byte(&self, ahead: u32) -> u8 {
        self.source.as_bytes().get((self.position + ahead) as usize).copied().unwrap_or(0)
    }

    fn consume_bracket_open(&mut self, start: u32, kind: Kind) -> RawToken {
        self.advance_bytes(1);
        if let Some(Frame::Interp { depth }) = self.stack.last_mut() {
            *depth += 1;
        }
        self.finish(start, kind)
    }

    fn consume_bracket_close(&mut self, start: u32, kind: Kind) -> RawToken {
        if let Some(Frame::Interp { depth: 0 }) = self.stack.last() {
            self.stack.pop();
            self.advance_bytes(1);
            return self.finish(start, Kind::INTERP_RPAREN);
        }
        if let Some(Frame::Interp { depth }) = self.stack.last_mut() {
            *depth -= 1;
        }
        self.advance_bytes(1);
        self.finish(start, kind)
    }

    fn consume_colon(&mut self, start: u32) -> RawToken {
        if self.peek_byte(1) == b':' {
            self.advance_bytes(2);
            return self.finish(start, Kind::OP_COLONCOLON);
        }
        self.advance_bytes(1);
        self.finish(start, Kind::COLON)
    }

    fn consume_dot_or_operator(&mut self, start: u32) -> RawToken {
        if let Some((kind, len)) = lookup_operator(self.rest()) {
            if matches!(kind, Kind::OP_DOTDOT | Kind::OP_DOTDOTDOT) {
                self.advance_bytes(len as u32);
                return self.finish(start, kind);
            }
        }
        let after_dot = &self.rest()[1..];
        if let Some((kind, len)) = lookup_operator(after_dot) {
            self.advance_bytes(1 + len as u32);
            let mut result = self.finish(start, kind);
            result.is_dotted = true;
            return self.attach_suffix(result);
        }
        self.advance_bytes(1);
        self.finish(start, Kind::DOT)
    }

    fn consume_operator(&mut self, start: u32) -> RawToken {
        match lookup_operator(self.rest()) {
            Some((kind, len)) => {
                self.advance_bytes(len as u32);
                let result = self.finish(start, kind);
                self.attach_suffix(result)
            }
            None => {
                self.advance_char();
                self.finish(start, Kind::INVALID_OPERATOR).with_error(LexErrorCode::InvalidOperator)
            }
        }
    }

    fn attach_suffix(&mut self, mut result: RawToken) -> RawToken {
        let mut consumed = false;
        while let Some(c) = self.rest().chars().next() {
            if !is_operator_suffix_char(c) {
                break;
            }
            self.advance_char();
            consumed = true;
        }
        if consumed {
            result.is_suffixed = true;
            result.end_byte = self.position;
        }
        result
    }

    fn consume_number(&mut self, start: u32) -> RawToken {
        if self.current_byte() == b'0' && matches!(self.peek_byte(1), b'x' | b'X') {
            return self.consume_radix_int(start, Kind::HEX_INT, |b| b.is_ascii_hexdigit());
        }
        if self.current_byte() == b'0' && matches!(self.peek_byte(1), b'o' | b'O') {
            return self.consume_radix_int(start, Kind::OCT_INT, |b| (b'0'..=b'7').contains(&b));
        }
        if self.current_byte() == b'0' && matches!(self.peek_byte(1), b'b' | b'B') {
            return self.consume_radix_int(start, Kind::BIN_INT, |b| b == b'0' || b == b'1');
        }

        let mut is_float = false;
        let mut malformed = false;
        self.consume_digit_run();
        if self.current_byte() == b'.' && !matches!(self.peek_byte(1), b'.') {
            is_float = true;
            self.advance_bytes(1);
            self.consume_digit_run();
        }
        if matches!(self.current_byte(), b'e' | b'E' | b'f' | b'F') {
            let exponent_start = self.position;
            self.advance_bytes(1);
            is_float = true;
            if matches!(self.current_byte(), b'+' | b'-') {
                self.advance_bytes(1);
            }
            let digits_start = self.position;
            self.consume_digit_run();
            if self.position == digits_start {
                malformed = true;
                self.position = exponent_start + 1;
            }
        }
        let mut result = self.finish(start, if is_float { Kind::FLOAT } else { Kind::INTEGER });
        if malformed {
            result = result.with_error(LexErrorCode::InvalidNumericConstant);
        }
        result
    }

    fn consume_digit_run(&mut self) {
        while matches!(self.current_byte(), b'0'..=b'9' | b'_') {
            self.advance_bytes(1);
        }
    }

    fn consume_radix_int(&mut self, start: u32, kind: Kind, is_digit: fn(u8) -> bool) -> RawToken {
        self.advance_bytes(2);
        let digits_start = self.position;
        while is_digit(self.current_byte()) || self.current_byte() == b'_' {
            self.advance_bytes(1);
        }
        let mut result = self.finish(start, kind);
        if self.position == digits_start {
            result = result.with_error(LexErrorCode::InvalidNumericConstant);
        }
        result
    }

    fn consume_char(&mut self, start: u32) -> RawToken {
        self.advance_bytes(1);
        loop {
            if self.is_eof() || self.current_byte() == b'\n' {
                return self.finish(start, Kind::CHAR).with_error(LexErrorCode::EofChar);
            }
            if self.current_byte() == b'\\' {
                self.advance_bytes(1);
                if !self.is_eof() {
                    self.advance_char();
                }
                continue;
            }
            if self.current_byte() == b'\'' {
                self.advance_bytes(1);
                return self.finish(start, Kind::CHAR);
            }
            self.advance_char();
        }
    }

    fn consume_string_open(&mut self, start: u32, quote: u8) -> RawToken {
        let delim = if quote == b'"' { StrDelim::Quote } else { StrDelim::Backtick };
        let is_triple = self.peek_byte(1) == quote && self.peek_byte(2) == quote;
        self.advance_bytes(if is_triple { 3 } else { 1 });
        self.stack.push(Frame::Str { delim, is_triple });
        let kind = match (delim, is_triple) {
            (StrDelim::Quote, false) => Kind::STRING_OPEN,
            (StrDelim::Quote, true) => Kind::STRING_TRIPLE_OPEN,
            (StrDelim::Backtick, false) => Kind::CMD_OPEN,
            (StrDelim::Backtick, true) => Kind::CMD_TRIPLE_OPEN,
        };
        self.finish(start, kind)
    }

    fn consume_identifier_or_unknown(&mut self, start: u32) -> RawToken {
        let mut chars = self.rest().chars();
        let first = chars.next();
        let is_start = matches!(first, Some(c) if c == '_' || c.is_xid_start());
        if !is_start {
            self.advance_char();
            return self.finish(start, Kind::ERROR).with_error(LexErrorCode::Unknown);
        }
        self.advance_char();
        while let Some(c) = self.rest().chars().next() {
            if c == '_' || c.is_xid_continue() {
                self.advance_char();
            } else {
                break;
            }
        }
        let text = &self.source[start as usize..self.position as usize];
        match lookup_keyword(text) {
            Some(kind) => self.finish(start, kind),
            None => self.finish(start, Kind::IDENTIFIER),
        }
    }

    // ---- string/command literal content ------------------------------

    fn next_string_token(&mut self, delim: StrDelim, is_triple: bool) -> RawToken {
        match self.pending_interp {
            PendingInterp::ExpectLParen => {
                self.pending_interp = PendingInterp::None;
                let start = self.start();
                self.advance_bytes(1);
                self.stack.push(Frame::Interp { depth: 0 });
                return self.finish(start, Kind::INTERP_LPAREN);
            }
            PendingInterp::ExpectIdentifier => {
                self.pending_interp = PendingInterp::None;
                return self.consume_identifier_or_unknown(self.start());
            }
            PendingInterp::None => {}
        }

        let start = self.start();
        if self.is_eof() {
            self.stack.pop();
            return self.finish(start, close_kind(delim, is_triple)).with_error(LexErrorCode::Unknown);
        }
        if self.at_close_delimiter(delim, is_triple) {
            self.advance_bytes(if is_triple { 3 } else { 1 });
            self.stack.pop();
            return self.finish(start, close_kind(delim, is_triple));
        }
        if self.current_byte() == b'$' {
            return self.consume_dollar(start);
        }

        self.scan_string_chunk(delim, is_triple);
        self.finish(start, Kind::STRING_CHUNK)
    }

    /// Advances past a run of literal string/command content, stopping
    /// exactly at EOF, a `$` interpolation entry, or the close delimiter.
    /// `memchr3` jumps straight to the next byte that could plausibly matter
    /// (the quote byte, `$`, or a backslash) rather than decoding every
    /// intervening code point one at a time.
    fn scan_string_chunk(&mut self, delim: StrDelim, is_triple: bool) {
        let quote = match delim {
            StrDelim::Quote => b'"',
            StrDelim::Backtick => b'`',
        };
        loop {
            let rest = self.source.as_bytes().get(self.position as usize..).unwrap_or(&[]);
            let Some(offset) = memchr3(quote, b'$', b'\\', rest) else {
                self.position = self.source.len() as u32;
                return;
            };
            self.advance_bytes(offset as u32);
            match self.current_byte() {
                b'\\' => {
                    self.advance_bytes(1);
                    if !self.is_eof() {
                        self.advance_char();
                    }
                }
                b'$' => return,
                b if b == quote && is_triple && !(self.peek_byte(1) == quote && self.peek_byte(2) == quote) => {
                    // A lone quote byte inside a triple-quoted literal -- not
                    // actually the close delimiter, just content.
                    self.advance_bytes(1);
                }
                _ => return,
            }
        }
    }

    fn at_close_delimiter(&self, delim: StrDelim, is_triple: bool) -> bool {
        let quote = match delim {
            StrDelim::Quote => b'"',
            StrDelim::Backtick => b'`',
        };
        if is_triple {
            self.current_byte() == quote && self.peek_byte(1) == quote && self.peek_byte(2) == quote
        } else {
            self.current_byte() == quote
        }
    }

    fn consume_dollar(&mut self, start: u32) -> RawToken {
        self.advance_bytes(1);
        match self.peek_byte(0) {
            b'(' => {
                self.pending_interp = PendingInterp::ExpectLParen;
                self.finish(start, Kind::INTERP_DOLLAR)
            }
            _ if matches!(self.rest().chars().next(), Some(c) if c == '_' || c.is_xid_start()) => {
                self.pending_interp = PendingInterp::ExpectIdentifier;
                self.finish(start, Kind::INTERP_DOLLAR)
            }
            _ => self
                .finish(start, Kind::INTERP_DOLLAR)
                .with_error(LexErrorCode::InvalidInterpolationTerminator),
        }
    }
}

fn close_kind(delim: StrDelim, is_triple: bool) -> Kind {
    match (delim, is_triple) {
        (StrDelim::Quote, false) => Kind::STRING_CLOSE,
        (StrDelim::Quote, true) => Kind::STRING_TRIPLE_CLOSE,
        (StrDelim::Backtick, false) => Kind::CMD_CLOSE,
        (StrDelim::Backtick, true) => Kind::CMD_TRIPLE_CLOSE,
    }
}

pub use vela_syntax::RawToken;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use test_case::test_case;

    fn lex_all(src: &str) -> Vec<RawToken> {
        let source: SourceText = Arc::from(src);
        let mut lexer = Lexer::new(source, LexerOptions::default());
        let mut out = Vec::new();
        loop {
            let token = lexer.next_token();
            let done = token.kind == Kind::EOF;
            out.push(token);
            if done {
                break;
            }
        }
        out
    }

    fn kinds(src: &str) -> Vec<Kind> {
        lex_all(src).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_a_simple_assignment() {
        assert_eq!(
            kinds("a = b"),
            vec![Kind::IDENTIFIER, Kind::WHITESPACE, Kind::OP_EQ, Kind::WHITESPACE, Kind::IDENTIFIER, Kind::EOF]
        );
    }

    #[test]
    fn dotted_operator_is_flagged() {
        let tokens = lex_all("a .== b");
        assert_eq!(tokens[2].kind, Kind::OP_EQEQ);
        assert!(tokens[2].is_dotted);
    }

    #[test]
    fn hex_maximal_munch_stops_at_first_non_hex_digit() {
        assert_eq!(kinds("0xenomorph"), vec![Kind::HEX_INT, Kind::IDENTIFIER, Kind::EOF]);
        let tokens = lex_all("0xenomorph");
        assert_eq!(tokens[0].span(), 0..3);
        assert_eq!(tokens[1].span(), 3..10);
    }

    #[test]
    fn unterminated_multiline_comment_is_flagged() {
        let tokens = lex_all("#= never closes");
        assert_eq!(tokens[0].kind, Kind::COMMENT);
        assert_eq!(tokens[0].error_code, LexErrorCode::EofMultiComment);
    }

    #[test]
    fn unterminated_char_is_flagged() {
        let tokens = lex_all("'a");
        assert_eq!(tokens[0].kind, Kind::CHAR);
        assert_eq!(tokens[0].error_code, LexErrorCode::EofChar);
    }

    #[test_case("+=", Kind::OP_PLUSEQ)]
    #[test_case("===", Kind::OP_EQEQEQ)]
    #[test_case("->", Kind::OP_ARROW)]
    fn recognizes_operators(src: &str, expected: Kind) {
        assert_eq!(kinds(src), vec![expected, Kind::EOF]);
    }

    #[test]
    fn simple_string_lexes_as_open_chunk_close() {
        assert_eq!(
            kinds(r#""hello""#),
            vec![Kind::STRING_OPEN, Kind::STRING_CHUNK, Kind::STRING_CLOSE, Kind::EOF]
        );
    }

    #[test]
    fn triple_string_open_and_close_are_distinct_kinds() {
        assert_eq!(
            kinds("\"\"\"a\"\"\""),
            vec![Kind::STRING_TRIPLE_OPEN, Kind::STRING_CHUNK, Kind::STRING_TRIPLE_CLOSE, Kind::EOF]
        );
    }

    #[test]
    fn bare_dollar_identifier_interpolation() {
        assert_eq!(
            kinds(r#""a$bc""#),
            vec![
                Kind::STRING_OPEN,
                Kind::STRING_CHUNK,
                Kind::INTERP_DOLLAR,
                Kind::IDENTIFIER,
                Kind::STRING_CHUNK,
                Kind::STRING_CLOSE,
                Kind::EOF,
            ]
        );
    }

    #[test]
    fn parenthesized_interpolation_reenters_regular_lexing_and_resumes() {
        assert_eq!(
            kinds(r#""a$(1 + 2)b""#),
            vec![
                Kind::STRING_OPEN,
                Kind::STRING_CHUNK,
                Kind::INTERP_DOLLAR,
                Kind::INTERP_LPAREN,
                Kind::INTEGER,
                Kind::WHITESPACE,
                Kind::OP_PLUS,
                Kind::WHITESPACE,
                Kind::INTEGER,
                Kind::INTERP_RPAREN,
                Kind::STRING_CHUNK,
                Kind::STRING_CLOSE,
                Kind::EOF,
            ]
        );
    }

    #[test]
    fn nested_parens_inside_interpolation_do_not_prematurely_close_it() {
        assert_eq!(
            kinds(r#""$(f(1))""#),
            vec![
                Kind::STRING_OPEN,
                Kind::INTERP_DOLLAR,
                Kind::INTERP_LPAREN,
                Kind::IDENTIFIER,
                Kind::LPAREN,
                Kind::INTEGER,
                Kind::RPAREN,
                Kind::INTERP_RPAREN,
                Kind::STRING_CLOSE,
                Kind::EOF,
            ]
        );
    }

    #[test]
    fn eof_mid_string_closes_with_unknown_error() {
        let tokens = lex_all("\"never closes");
        let last = tokens.iter().find(|t| t.kind == Kind::STRING_CLOSE).unwrap();
        assert_eq!(last.error_code, LexErrorCode::Unknown);
    }

    #[test]
    fn next_token_is_idempotent_at_eof() {
        let mut lexer = Lexer::new(Arc::from(""), LexerOptions::default());
        assert_eq!(lexer.next_token().kind, Kind::EOF);
        assert_eq!(lexer.next_token().kind, Kind::EOF);
    }
}
