//! Construction-time configuration. No global mutable
//! configuration exists anywhere in this crate; every toggle here is passed
//! by value when a lexer or stream is built.

use vela_syntax::{DiagnosticLevel, GrammarVersion};

/// Lexer-level behavior toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexerOptions {
    /// The grammar version this lex pass is reporting against. The lexer
    /// itself never branches on this; it is carried through to the stream so
    /// parser productions (external to this core) can consult it.
    pub grammar_version: GrammarVersion,
}

impl Default for LexerOptions {
    fn default() -> Self {
        Self {
            grammar_version: GrammarVersion::LATEST,
        }
    }
}

/// Parse-stream-level behavior toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub lexer: LexerOptions,
    /// When `false` (the default), diagnostics below [`DiagnosticLevel::Warning`]
    /// are dropped at emission time rather than retained, bounding memory on
    /// inputs that produce many `info`-level notes.
    pub retain_below_warning: bool,
}

impl ParseOptions {
    pub fn grammar_version(&self) -> GrammarVersion {
        self.lexer.grammar_version
    }

    pub fn should_retain(&self, level: DiagnosticLevel) -> bool {
        self.retain_below_warning || level >= DiagnosticLevel::Warning
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            lexer: LexerOptions::default(),
            retain_below_warning: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_report_latest_grammar_and_drop_low_severity_diagnostics() {
        let opts = ParseOptions::default();
        assert_eq!(opts.grammar_version(), GrammarVersion::LATEST);
        assert!(!opts.should_retain(DiagnosticLevel::Info));
        assert!(opts.should_retain(DiagnosticLevel::Warning));
        assert!(opts.should_retain(DiagnosticLevel::Error));
    }
}
