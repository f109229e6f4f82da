/// Lex-time error codes. Every lex error is attached to the offending
/// [`crate::RawToken`] rather than aborting the lexer; the token's kind is
/// retained so a parser production can still absorb it.
///
/// This is the closed set named in the external interface: an unterminated
/// string or command literal has no code of its own and is reported as
/// `Unknown`, since its token already carries the open-delimiter kind that
/// identifies what went unterminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LexErrorCode {
    #[default]
    NoErr,
    EofMultiComment,
    EofChar,
    InvalidNumericConstant,
    InvalidOperator,
    InvalidInterpolationTerminator,
    Unknown,
}

impl LexErrorCode {
    pub fn is_error(self) -> bool {
        !matches!(self, LexErrorCode::NoErr)
    }
}
