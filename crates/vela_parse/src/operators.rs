//! The symbolic operator table: process-wide read-only state built once at
//! initialisation. Lookup is longest-match: the lexer tries the longest
//! candidate slice first so `===` wins over `==` and `==` wins over `=`.

use std::collections::HashMap;

use lazy_static::lazy_static;
use unicode_properties::{GeneralCategoryGroup, UnicodeGeneralCategory};

use vela_syntax::Kind;

pub const MAX_OPERATOR_LEN: usize = 3;

lazy_static! {
    static ref OPERATORS: HashMap<&'static str, Kind> = {
        let mut map = HashMap::with_capacity(36);
        map.insert("===", Kind::OP_EQEQEQ);
        map.insert("...", Kind::OP_DOTDOTDOT);
        map.insert("||=", Kind::OP_PIPEPIPEEQ);
        map.insert("&&=", Kind::OP_AMPAMPEQ);

        map.insert("==", Kind::OP_EQEQ);
        map.insert("!=", Kind::OP_NEQ);
        map.insert("<=", Kind::OP_LE);
        map.insert(">=", Kind::OP_GE);
        map.insert("&&", Kind::OP_ANDAND);
        map.insert("||", Kind::OP_OROR);
        map.insert("->", Kind::OP_ARROW);
        map.insert("<:", Kind::OP_SUBTYPE);
        map.insert(">:", Kind::OP_SUPERTYPE);
        map.insert("::", Kind::OP_COLONCOLON);
        map.insert("..", Kind::OP_DOTDOT);
        map.insert("+=", Kind::OP_PLUSEQ);
        map.insert("-=", Kind::OP_MINUSEQ);
        map.insert("*=", Kind::OP_STAREQ);
        map.insert("/=", Kind::OP_SLASHEQ);
        map.insert("^=", Kind::OP_CARETEQ);
        map.insert("%=", Kind::OP_PERCENTEQ);

        map.insert("+", Kind::OP_PLUS);
        map.insert("-", Kind::OP_MINUS);
        map.insert("*", Kind::OP_STAR);
        map.insert("/", Kind::OP_SLASH);
        map.insert("\\", Kind::OP_BACKSLASH);
        map.insert("^", Kind::OP_CARET);
        map.insert("%", Kind::OP_PERCENT);
        map.insert("&", Kind::OP_AMP);
        map.insert("|", Kind::OP_PIPE);
        map.insert("~", Kind::OP_TILDE);
        map.insert("!", Kind::OP_BANG);
        map.insert("=", Kind::OP_EQ);
        map.insert("<", Kind::OP_LT);
        map.insert(">", Kind::OP_GT);
        map.insert("?", Kind::OP_QUESTION);
        map
    };
    static ref OPERATOR_TEXT: HashMap<Kind, &'static str> = OPERATORS.iter().map(|(text, kind)| (*kind, *text)).collect();
}

/// Longest-match lookup starting at byte offset 0 of `s`. Returns the
/// matched kind and how many bytes it consumed.
pub fn lookup_operator(s: &str) -> Option<(Kind, usize)> {
    for len in (1..=MAX_OPERATOR_LEN.min(s.len())).rev() {
        if !s.is_char_boundary(len) {
            continue;
        }
        if let Some(kind) = OPERATORS.get(&s[..len]) {
            return Some((*kind, len));
        }
    }
    None
}

/// The canonical spelling of a symbolic operator kind, used by diagnostics
/// and by `peek_behind_str`-adjacent callers that need to re-render a kind
/// as text.
pub fn operator_text(kind: Kind) -> Option<&'static str> {
    OPERATOR_TEXT.get(&kind).copied()
}

/// True for the ASCII bytes that can begin or continue a symbolic operator,
/// used by the lexer to decide whether a `.` is a plain [`Kind::DOT`] or the
/// leading dot of a broadcast/dotted operator.
pub fn is_operator_start_byte(b: u8) -> bool {
    matches!(
        b,
        b'+' | b'-' | b'*' | b'/' | b'\\' | b'^' | b'%' | b'&' | b'|' | b'~' | b'!' | b'=' | b'<' | b'>' | b'?'
    )
}

/// True for the trailing unicode subscript/superscript/modifier-letter
/// characters that extend an operator's spelling, setting `is_suffixed=true`
/// on the token. Restricted to the Unicode blocks that are actually used this
/// way (Superscripts and Subscripts, Spacing Modifier Letters, Phonetic
/// Extensions) and further narrowed by general category group to the three
/// groups those blocks legitimately contain here (letters, numbers, and the
/// handful of superscript punctuation/math symbols like `⁺`/`⁼`/`⁽`) --
/// excludes control and separator code points that sneak into the same
/// blocks but can never spell part of an operator.
pub fn is_operator_suffix_char(c: char) -> bool {
    let in_block = matches!(c as u32,
        0x2070..=0x209C
        | 0x02B0..=0x02FF
        | 0x1D2C..=0x1D6A
        | 0x1D9B..=0x1DBF
    );
    in_block
        && matches!(
            c.general_category_group(),
            GeneralCategoryGroup::Letter | GeneralCategoryGroup::Number | GeneralCategoryGroup::Symbol | GeneralCategoryGroup::Punctuation
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("===x", Kind::OP_EQEQEQ, 3)]
    #[test_case("==x", Kind::OP_EQEQ, 2)]
    #[test_case("=x", Kind::OP_EQ, 1)]
    #[test_case("...x", Kind::OP_DOTDOTDOT, 3)]
    #[test_case("..x", Kind::OP_DOTDOT, 2)]
    fn longest_match_wins(input: &str, expected_kind: Kind, expected_len: usize) {
        assert_eq!(lookup_operator(input), Some((expected_kind, expected_len)));
    }

    #[test]
    fn unknown_symbol_does_not_match() {
        assert_eq!(lookup_operator("@"), None);
    }

    #[test]
    fn reverse_map_round_trips() {
        assert_eq!(operator_text(Kind::OP_ARROW), Some("->"));
    }

    #[test]
    fn suffix_chars_match_subscript_block_but_not_ascii() {
        assert!(is_operator_suffix_char('\u{2090}'));
        assert!(!is_operator_suffix_char('a'));
    }
}
