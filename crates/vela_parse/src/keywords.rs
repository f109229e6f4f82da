//! The reserved-word table: process-wide read-only state built once at
//! initialisation. Contextual keywords (`outer`, `get`, `set`, `public`)
//! are deliberately absent here — the lexer always emits them as
//! `Kind::IDENTIFIER`, and only a parser production that recognizes the
//! surrounding grammar ever gives them meaning.

use std::collections::HashMap;

use lazy_static::lazy_static;

use vela_syntax::Kind;

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, Kind> = {
        let mut map = HashMap::with_capacity(34);
        map.insert("if", Kind::KW_IF);
        map.insert("elseif", Kind::KW_ELSEIF);
        map.insert("else", Kind::KW_ELSE);
        map.insert("end", Kind::KW_END);
        map.insert("for", Kind::KW_FOR);
        map.insert("while", Kind::KW_WHILE);
        map.insert("function", Kind::KW_FUNCTION);
        map.insert("macro", Kind::KW_MACRO);
        map.insert("return", Kind::KW_RETURN);
        map.insert("break", Kind::KW_BREAK);
        map.insert("continue", Kind::KW_CONTINUE);
        map.insert("let", Kind::KW_LET);
        map.insert("global", Kind::KW_GLOBAL);
        map.insert("local", Kind::KW_LOCAL);
        map.insert("const", Kind::KW_CONST);
        map.insert("import", Kind::KW_IMPORT);
        map.insert("using", Kind::KW_USING);
        map.insert("export", Kind::KW_EXPORT);
        map.insert("module", Kind::KW_MODULE);
        map.insert("baremodule", Kind::KW_BAREMODULE);
        map.insert("struct", Kind::KW_STRUCT);
        map.insert("mutable", Kind::KW_MUTABLE);
        map.insert("abstract", Kind::KW_ABSTRACT);
        map.insert("primitive", Kind::KW_PRIMITIVE);
        map.insert("type", Kind::KW_TYPE);
        map.insert("do", Kind::KW_DO);
        map.insert("try", Kind::KW_TRY);
        map.insert("catch", Kind::KW_CATCH);
        map.insert("finally", Kind::KW_FINALLY);
        map.insert("quote", Kind::KW_QUOTE);
        map.insert("begin", Kind::KW_BEGIN);
        map.insert("in", Kind::WOP_IN);
        map.insert("isa", Kind::WOP_ISA);
        map.insert("where", Kind::WOP_WHERE);
        map
    };
}

/// Looks up `word` in the reserved-word table. Returns `None` for everything
/// else, including contextual keywords, which are plain identifiers here.
pub fn lookup_keyword(word: &str) -> Option<Kind> {
    KEYWORDS.get(word).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_reserved_words() {
        assert_eq!(lookup_keyword("function"), Some(Kind::KW_FUNCTION));
        assert_eq!(lookup_keyword("where"), Some(Kind::WOP_WHERE));
    }

    #[test]
    fn contextual_keywords_are_not_reserved() {
        assert_eq!(lookup_keyword("outer"), None);
        assert_eq!(lookup_keyword("get"), None);
        assert_eq!(lookup_keyword("set"), None);
        assert_eq!(lookup_keyword("public"), None);
    }

    #[test]
    fn arbitrary_identifiers_are_not_reserved() {
        assert_eq!(lookup_keyword("functio"), None);
        assert_eq!(lookup_keyword(""), None);
    }
}
