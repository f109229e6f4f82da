//! Literal decoding: the pure, allocation-aware functions that
//! turn a token's raw lexeme into a value. None of these touch the lexer or
//! parse stream; they operate purely on `&str` slices so they can be called
//! either eagerly by a parser production or lazily by a caller inspecting a
//! finished tree.

mod dedent;
mod numeric;
mod string_unescape;

pub use dedent::{dedent, dedent_pieces};
pub use numeric::{decode_bin, decode_float, decode_hex, decode_integer, decode_oct, FloatValue, IntValue, UIntValue};
pub use string_unescape::{unescape_cooked, unescape_raw};
