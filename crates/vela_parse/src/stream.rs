//! The lookahead-buffered parse stream: the primary contract surface between
//! the lexer and a recursive-descent parser's productions.
//!
//! The stream owns the lexer, a lookahead queue of raw tokens (trivia
//! included), and the append-only event buffer that the tree builder later
//! folds into a CST. Parser productions are the only callers; this module has
//! no knowledge of any particular grammar production.

use std::collections::VecDeque;

use tracing::{debug, warn};

use vela_syntax::{
    Diagnostic, DiagnosticLevel, GrammarVersion, Kind, Position, RawToken, SourceText, SyntaxFlags, SyntaxHead,
    SyntaxToken, TaggedRange,
};

use crate::error::Error;
use crate::lexer::Lexer;
use crate::options::ParseOptions;

/// Once `peek_count` exceeds this many lookaheads without an intervening
/// bump, the stream concludes the grammar production driving it is stuck and
/// fails fast.
pub const STUCK_PARSER_WATCHDOG: u32 = 100_000;

/// One piece of a [`ParseStream::bump_split`] call: a byte length to carve
/// off the front of the current lookahead token, tagged with the kind and
/// flags the resulting event should carry.
#[derive(Debug, Clone, Copy)]
pub struct SplitSpec {
    pub len: u32,
    pub kind: Kind,
    pub flags: SyntaxFlags,
}

impl SplitSpec {
    pub fn new(len: u32, kind: Kind, flags: SyntaxFlags) -> Self {
        Self { len, kind, flags }
    }
}

fn is_skippable(kind: Kind, skip_newlines: bool) -> bool {
    matches!(kind, Kind::WHITESPACE | Kind::COMMENT) || (skip_newlines && kind == Kind::NEWLINE_WS)
}

/// Trivia that directly precedes some raw token: whitespace/comment runs
/// contiguous with it, scanned backwards from its index in the lookahead
/// queue. This is independent of any `skip_newlines` policy -- it describes
/// what is literally adjacent in the byte stream.
fn trivia_flags_before(lookahead: &VecDeque<RawToken>, idx: usize) -> (bool, bool) {
    let mut had_whitespace = false;
    let mut had_newline = false;
    let mut i = idx;
    while i > 0 {
        i -= 1;
        let kind = lookahead[i].kind;
        if !kind.is_trivia() {
            break;
        }
        match kind {
            Kind::NEWLINE_WS => had_newline = true,
            Kind::WHITESPACE | Kind::COMMENT => had_whitespace = true,
            _ => {}
        }
    }
    (had_whitespace || had_newline, had_newline)
}

pub struct ParseStream {
    lexer: Lexer,
    source: SourceText,
    lookahead: VecDeque<RawToken>,
    ranges: Vec<TaggedRange>,
    diagnostics: Vec<Diagnostic>,
    next_byte: u32,
    peek_count: u32,
    options: ParseOptions,
    stuck: Option<Error>,
    /// Every raw token the lexer has ever handed out, in order. Only
    /// maintained under `debug-tracing`, for dumping alongside the event
    /// buffer when diffing two runs of the same input.
    #[cfg(feature = "debug-tracing")]
    debug_token_list: Vec<RawToken>,
}

impl ParseStream {
    pub fn new(source: SourceText, options: ParseOptions) -> Self {
        let lexer = Lexer::new(source.clone(), options.lexer);
        Self {
            lexer,
            source,
            lookahead: VecDeque::new(),
            ranges: Vec::new(),
            diagnostics: Vec::new(),
            next_byte: 0,
            peek_count: 0,
            options,
            stuck: None,
            #[cfg(feature = "debug-tracing")]
            debug_token_list: Vec::new(),
        }
    }

    pub fn grammar_version(&self) -> GrammarVersion {
        self.options.grammar_version()
    }

    /// Every raw token handed out by the lexer so far, in order. Only
    /// available under the `debug-tracing` feature.
    #[cfg(feature = "debug-tracing")]
    pub fn debug_token_list(&self) -> &[RawToken] {
        &self.debug_token_list
    }

    pub fn is_stuck(&self) -> bool {
        self.stuck.is_some()
    }

    pub fn source(&self) -> &SourceText {
        &self.source
    }

    // ---- lookahead ----------------------------------------------------

    fn ensure_raw(&mut self, count: usize) {
        while self.lookahead.len() < count {
            let token = self.lexer.next_token();
            #[cfg(feature = "debug-tracing")]
            self.debug_token_list.push(token);
            self.lookahead.push_back(token);
        }
    }

    /// Index into `self.lookahead` of the `n`th significant token under
    /// `skip_newlines`, pulling from the lexer as needed.
    fn significant_index(&mut self, n: usize, skip_newlines: bool) -> usize {
        let mut seen = 0usize;
        let mut idx = 0usize;
        loop {
            self.ensure_raw(idx + 1);
            let kind = self.lookahead[idx].kind;
            if !is_skippable(kind, skip_newlines) {
                if seen == n {
                    return idx;
                }
                seen += 1;
            }
            idx += 1;
        }
    }

    /// Returns the kind of the `n`th significant token without consuming it.
    pub fn peek(&mut self, n: usize, skip_newlines: bool) -> Kind {
        self.peek_token(n, skip_newlines).kind()
    }

    /// Returns the full `n`th significant token, decorated with the trivia
    /// flags of whatever directly precedes it.
    pub fn peek_token(&mut self, n: usize, skip_newlines: bool) -> SyntaxToken {
        self.peek_count += 1;
        if self.peek_count > STUCK_PARSER_WATCHDOG && self.stuck.is_none() {
            let position = self.position();
            warn!(peek_count = self.peek_count, ?position, "parser watchdog tripped");
            tracing::error!(peek_count = self.peek_count, ?position, "stuck parser: aborting");
            self.diagnostics.push(Diagnostic::error(
                position.next_byte,
                position.next_byte,
                "parser made no progress; aborting",
            ));
            self.stuck = Some(Error::StuckParser {
                peek_count: self.peek_count,
                position,
            });
        }
        let idx = self.significant_index(n, skip_newlines);
        let (had_whitespace, had_newline) = trivia_flags_before(&self.lookahead, idx);
        SyntaxToken::new(self.lookahead[idx], had_whitespace, had_newline)
    }

    /// Inspects the head of an already-emitted event, without consuming
    /// anything from the lookahead. `skip_trivia` walks backwards past
    /// trivia-flagged events to find the last significant one.
    pub fn peek_behind(&self, skip_trivia: bool) -> SyntaxHead {
        for event in self.ranges.iter().rev() {
            if skip_trivia && event.head.is_trivia() {
                continue;
            }
            return event.head;
        }
        SyntaxHead::leaf(Kind::NOTHING)
    }

    /// Compares the byte range covered by the event at `pos` against `str`.
    pub fn peek_behind_str(&self, pos: Position, str: &str) -> bool {
        match self.ranges.get(pos.event_count as usize) {
            Some(event) => &self.source[event.start_byte as usize..event.end_byte as usize] == str,
            None => false,
        }
    }

    // ---- position / marks ----------------------------------------------

    pub fn position(&self) -> Position {
        Position::new(self.next_byte, self.ranges.len() as u32)
    }

    fn push_leaf(&mut self, head: SyntaxHead, start_byte: u32, end_byte: u32) {
        let start_mark = self.ranges.len() as u32 + 1;
        self.ranges.push(TaggedRange {
            head,
            start_byte,
            end_byte,
            start_mark,
        });
        self.next_byte = end_byte;
    }

    fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        if self.options.should_retain(diagnostic.level) {
            if diagnostic.level >= DiagnosticLevel::Warning {
                warn!(start = diagnostic.start_byte, end = diagnostic.end_byte, "{}", diagnostic.message);
            }
            self.diagnostics.push(diagnostic);
        }
    }

    // ---- emission primitives --------------------------------------------

    /// Flushes pending trivia (under `skip_newlines`) into the event buffer
    /// without consuming the next significant token. `error`, when set,
    /// pushes a diagnostic spanning the flushed trivia (a no-op if nothing
    /// was flushed).
    pub fn bump_trivia(&mut self, skip_newlines: bool, error: Option<&str>) {
        self.peek_count = 0;
        let start = self.next_byte;
        loop {
            self.ensure_raw(1);
            let kind = self.lookahead[0].kind;
            if !is_skippable(kind, skip_newlines) {
                break;
            }
            let token = self.lookahead.pop_front().unwrap();
            self.push_leaf(SyntaxHead::new(token.kind, SyntaxFlags::TRIVIA), token.start_byte, token.end_byte);
        }
        if let Some(message) = error {
            if self.next_byte != start {
                self.push_diagnostic(Diagnostic::warning(start, self.next_byte, message));
            }
        }
    }

    /// Consumes trivia up to and including the next significant token (under
    /// `skip_newlines`), flushing each into the event buffer. `flags` are
    /// applied to the significant token only; `remap_kind`, when not
    /// [`Kind::NOTHING`], overrides its reported kind. When `error` is set, a
    /// zero-width `error` event is emitted immediately before the significant
    /// token and a diagnostic covering the token's span is pushed.
    pub fn bump(&mut self, flags: SyntaxFlags, skip_newlines: bool, error: Option<&str>, remap_kind: Kind) {
        self.bump_trivia(skip_newlines, None);
        self.peek_count = 0;
        self.ensure_raw(1);
        let token = self.lookahead.pop_front().expect("bump_trivia leaves a significant token at the front");

        if let Some(message) = error {
            let mark = self.next_byte;
            self.push_leaf(SyntaxHead::new(Kind::ERROR, SyntaxFlags::HAS_ERROR), mark, mark);
            self.push_diagnostic(Diagnostic::error(token.start_byte, token.end_byte, message));
        }

        let mut head_flags = flags;
        if token.is_dotted {
            head_flags |= SyntaxFlags::DOTOP;
        }
        if token.is_suffixed {
            head_flags |= SyntaxFlags::SUFFIXED;
        }
        if token.error_code.is_error() {
            head_flags |= SyntaxFlags::HAS_ERROR;
            self.push_diagnostic(Diagnostic::warning(
                token.start_byte,
                token.end_byte,
                format!("lex error: {:?}", token.error_code),
            ));
        }
        let kind = if remap_kind == Kind::NOTHING { token.kind } else { remap_kind };
        debug!(?kind, start = token.start_byte, end = token.end_byte, ?head_flags, "bump");
        self.push_leaf(SyntaxHead::new(kind, head_flags), token.start_byte, token.end_byte);
    }

    /// Emits a zero-width event at the current position, used for implicit
    /// tokens like the invisible `*` in `2x`.
    pub fn bump_invisible(&mut self, kind: Kind, flags: SyntaxFlags, error: Option<&str>) {
        self.peek_count = 0;
        let at = self.next_byte;
        let mut head_flags = flags | SyntaxFlags::SYNTHESIZED;
        if error.is_some() {
            head_flags |= SyntaxFlags::HAS_ERROR;
        }
        debug!(?kind, at, ?head_flags, "bump_invisible");
        self.push_leaf(SyntaxHead::new(kind, head_flags), at, at);
        if let Some(message) = error {
            self.push_diagnostic(Diagnostic::error(at, at, message));
        }
    }

    /// Merges the next `n` raw lookahead tokens (trivia included -- the
    /// caller is responsible for having already dealt with any trivia it
    /// cares about) into a single event spanning their union of bytes.
    pub fn bump_glue(&mut self, kind: Kind, flags: SyntaxFlags, n: usize) {
        self.peek_count = 0;
        self.ensure_raw(n);
        assert!(n > 0, "bump_glue requires at least one token");
        let start_byte = self.lookahead[0].start_byte;
        let mut end_byte = start_byte;
        for _ in 0..n {
            let token = self.lookahead.pop_front().expect("ensure_raw guarantees n tokens are buffered");
            end_byte = token.end_byte;
        }
        debug!(?kind, start_byte, end_byte, n, "bump_glue");
        self.push_leaf(SyntaxHead::new(kind, flags), start_byte, end_byte);
    }

    /// Takes the next lookahead token and tiles its byte range into several
    /// events, one per `SplitSpec`, in order. Used for tokens whose lexical
    /// identity is grammar-dependent, e.g. `...` as splat vs. three `.` path
    /// components.
    pub fn bump_split(&mut self, specs: &[SplitSpec]) {
        self.peek_count = 0;
        self.ensure_raw(1);
        let token = self.lookahead.pop_front().expect("ensure_raw(1) guarantees a token");
        let total: u32 = specs.iter().map(|s| s.len).sum();
        debug_assert_eq!(
            total,
            token.end_byte - token.start_byte,
            "bump_split specs must tile the token's full byte range"
        );
        let mut cursor = token.start_byte;
        for spec in specs {
            let end = cursor + spec.len;
            debug!(kind = ?spec.kind, start = cursor, end, "bump_split piece");
            self.push_leaf(SyntaxHead::new(spec.kind, spec.flags), cursor, end);
            cursor = end;
        }
    }

    /// Declares every event emitted since `mark` a child of a new interior
    /// event with the given kind/flags, spanning `[mark.next_byte,
    /// next_byte)`. This is the sole mechanism for building non-leaf
    /// structure; the returned position can itself be used as a mark for a
    /// further-enclosing `emit`.
    pub fn emit(&mut self, mark: Position, kind: Kind, flags: SyntaxFlags, error: Option<&str>) -> Position {
        let mut head_flags = flags;
        if error.is_some() {
            head_flags |= SyntaxFlags::HAS_ERROR;
        }
        let start_mark = mark.event_count + 1;
        debug!(?kind, start = mark.next_byte, end = self.next_byte, start_mark, "emit");
        self.ranges.push(TaggedRange {
            head: SyntaxHead::new(kind, head_flags),
            start_byte: mark.next_byte,
            end_byte: self.next_byte,
            start_mark,
        });
        if let Some(message) = error {
            self.push_diagnostic(Diagnostic::error(mark.next_byte, self.next_byte, message));
        }
        self.position()
    }

    /// Replaces the head of the event at `mark` in place, without touching
    /// its span or `start_mark`. Used where a later token re-types an
    /// earlier node without requiring unbounded lookahead.
    pub fn reset_node(&mut self, mark: Position, kind: Option<Kind>, flags: Option<SyntaxFlags>) {
        let idx = mark.event_count as usize;
        if let Some(event) = self.ranges.get_mut(idx) {
            if let Some(k) = kind {
                event.head.kind = k;
            }
            if let Some(f) = flags {
                event.head.flags = f;
            }
            debug!(?idx, head = ?event.head, "reset_node!");
        }
    }

    pub fn emit_diagnostic(&mut self, level: DiagnosticLevel, start_byte: u32, end_byte: u32, message: impl Into<String>) {
        self.push_diagnostic(Diagnostic::new(level, start_byte, end_byte, message));
    }

    pub fn emit_diagnostic_at(&mut self, level: DiagnosticLevel, pos: Position, message: impl Into<String>) {
        self.emit_diagnostic(level, pos.next_byte, pos.next_byte, message);
    }

    pub fn emit_diagnostic_span(&mut self, level: DiagnosticLevel, from: Position, to: Position, message: impl Into<String>) {
        self.emit_diagnostic(level, from.next_byte, to.next_byte, message);
    }

    /// Consumes the stream, returning its event buffer and diagnostics, or
    /// the fatal watchdog error if the stream tripped it.
    pub fn finish(self) -> Result<(Vec<TaggedRange>, Vec<Diagnostic>), Error> {
        if let Some(err) = self.stuck {
            return Err(err);
        }
        Ok((self.ranges, self.diagnostics))
    }
}
