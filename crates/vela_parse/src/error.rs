//! The fatal-error surface. Everything that is *not* fatal — lex errors,
//! parse errors — stays data (see [`vela_syntax::Diagnostic`]/
//! [`vela_syntax::LexErrorCode`]) and is never converted into one of these
//! variants.

use thiserror::Error;

use vela_syntax::Position;

/// The only two conditions this crate treats as unrecoverable.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("parser made no progress after {peek_count} lookaheads at {position:?}")]
    StuckParser { peek_count: u32, position: Position },

    #[error("tree builder found {count} top-level events with no wrap_toplevel_as_kind")]
    MultipleTopLevelEvents { count: usize },
}
