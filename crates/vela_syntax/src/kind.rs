//! The closed catalog of terminal and non-terminal node kinds.
//!
//! Kinds are grouped into contiguous bands so that membership tests
//! (`is_keyword`, `is_operator`, ...) are plain range comparisons on the
//! enum's ordinal rather than a match over every variant.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Kind {
    // --- Structural (0..10) ---------------------------------------------
    /// An invisible event the parser chose not to finalize. Never reaches the CST.
    #[default]
    TOMBSTONE = 0,
    EOF,
    ERROR,
    /// Placeholder used where a grammar slot is optional and absent.
    NOTHING,

    // --- Trivia (10..30) --------------------------------------------------
    WHITESPACE = 10,
    /// A whitespace run containing at least one `\n`.
    NEWLINE_WS,
    COMMENT,

    // --- Literals & identifiers (30..80) -----------------------------------
    INTEGER = 30,
    HEX_INT,
    OCT_INT,
    BIN_INT,
    FLOAT,
    CHAR,
    IDENTIFIER,
    STRING_OPEN,
    STRING_TRIPLE_OPEN,
    CMD_OPEN,
    CMD_TRIPLE_OPEN,
    STRING_CLOSE,
    STRING_TRIPLE_CLOSE,
    CMD_CLOSE,
    CMD_TRIPLE_CLOSE,
    STRING_CHUNK,
    INTERP_DOLLAR,
    INTERP_LPAREN,
    INTERP_RPAREN,

    // --- Keywords (80..150) -------------------------------------------------
    KW_IF = 80,
    KW_ELSEIF,
    KW_ELSE,
    KW_END,
    KW_FOR,
    KW_WHILE,
    KW_FUNCTION,
    KW_MACRO,
    KW_RETURN,
    KW_BREAK,
    KW_CONTINUE,
    KW_LET,
    KW_GLOBAL,
    KW_LOCAL,
    KW_CONST,
    KW_IMPORT,
    KW_USING,
    KW_EXPORT,
    KW_MODULE,
    KW_BAREMODULE,
    KW_STRUCT,
    KW_MUTABLE,
    KW_ABSTRACT,
    KW_PRIMITIVE,
    KW_TYPE,
    KW_DO,
    KW_TRY,
    KW_CATCH,
    KW_FINALLY,
    KW_QUOTE,
    KW_BEGIN,

    // --- Contextual keywords (150..200) -- lex as identifiers -------------
    CTX_OUTER = 150,
    CTX_GET,
    CTX_SET,
    CTX_PUBLIC,

    // --- Operators (200..280) ------------------------------------------------
    OP_PLUS = 200,
    OP_MINUS,
    OP_STAR,
    OP_SLASH,
    OP_BACKSLASH,
    OP_CARET,
    OP_PERCENT,
    OP_AMP,
    OP_PIPE,
    OP_TILDE,
    OP_BANG,
    OP_EQ,
    OP_EQEQ,
    OP_EQEQEQ,
    OP_NEQ,
    OP_LT,
    OP_LE,
    OP_GT,
    OP_GE,
    OP_ANDAND,
    OP_OROR,
    OP_ARROW,
    OP_SUBTYPE,
    OP_SUPERTYPE,
    OP_COLONCOLON,
    OP_DOTDOTDOT,
    OP_DOTDOT,
    OP_QUESTION,
    OP_PLUSEQ,
    OP_MINUSEQ,
    OP_STAREQ,
    OP_SLASHEQ,
    OP_CARETEQ,
    OP_PERCENTEQ,
    OP_PIPEPIPEEQ,
    OP_AMPAMPEQ,
    INVALID_OPERATOR,

    // --- Word operators (280..300) -- keyword spelling, operator precedence
    WOP_IN = 280,
    WOP_ISA,
    WOP_WHERE,

    // --- Delimiters / punctuation (300..400) --------------------------------
    LPAREN = 300,
    RPAREN,
    LBRACKET,
    RBRACKET,
    LBRACE,
    RBRACE,
    COMMA,
    SEMICOLON,
    AT,
    COLON,
    BACKTICK,
    DOT,

    // --- Non-terminal / composite kinds (400..) -----------------------------
    BLOCK = 400,
    CALL,
    CALL_INFIX,
    TUPLE,
    VECT,
    HCAT,
    VCAT,
    NCAT,
    NROW,
    ROW,
    GENERATOR,
    COMPREHENSION,
    FLATTEN,
    CURLY,
    REF,
    MACROCALL,
    STRING,
    STRING_TRIPLE,
    CMD,
    CMD_TRIPLE,
    QUOTE_NODE,
    IF_NODE,
    ELSEIF_NODE,
    FOR_NODE,
    WHILE_NODE,
    LET_NODE,
    TRY_NODE,
    FUNCTION_NODE,
    MACRO_NODE,
    STRUCT_NODE,
    ABSTRACT_NODE,
    PRIMITIVE_NODE,
    MODULE_NODE,
    IMPORT_NODE,
    USING_NODE,
    EXPORT_NODE,
    RETURN_NODE,
    BREAK_NODE,
    CONTINUE_NODE,
    GLOBAL_NODE,
    LOCAL_NODE,
    CONST_NODE,
    DO_NODE,
    WHERE_NODE,
    PARAMETERS,
    KW_ARG,
    AS_NODE,
    COMPARISON,
    ASSIGN,
    NAMEDTUPLE,
    IMPORT_PATH,
    DOTS_PATH,
}

impl Kind {
    #[inline]
    fn ord(self) -> u16 {
        self as u16
    }

    pub fn is_trivia(self) -> bool {
        (10..30).contains(&self.ord())
    }

    pub fn is_literal(self) -> bool {
        (30..80).contains(&self.ord())
    }

    pub fn is_keyword(self) -> bool {
        (80..150).contains(&self.ord())
    }

    pub fn is_contextual_keyword(self) -> bool {
        (150..200).contains(&self.ord())
    }

    pub fn is_operator(self) -> bool {
        (200..280).contains(&self.ord())
    }

    pub fn is_word_operator(self) -> bool {
        (280..300).contains(&self.ord())
    }

    pub fn is_delimiter(self) -> bool {
        (300..400).contains(&self.ord())
    }

    pub fn is_non_terminal(self) -> bool {
        self.ord() >= 400
    }

    pub fn is_structural(self) -> bool {
        self.ord() < 10
    }

    /// True for any kind that can introduce an assignment-precedence operator,
    /// including the dotted/broadcast forms which share the same base kind and
    /// are distinguished only by the `DOTOP` flag on the token/event.
    pub fn is_assignment_operator(self) -> bool {
        matches!(
            self,
            Kind::OP_EQ
                | Kind::OP_PLUSEQ
                | Kind::OP_MINUSEQ
                | Kind::OP_STAREQ
                | Kind::OP_SLASHEQ
                | Kind::OP_CARETEQ
                | Kind::OP_PERCENTEQ
                | Kind::OP_PIPEPIPEEQ
                | Kind::OP_AMPAMPEQ
        )
    }

    pub fn is_comparison_operator(self) -> bool {
        matches!(
            self,
            Kind::OP_EQEQ
                | Kind::OP_EQEQEQ
                | Kind::OP_NEQ
                | Kind::OP_LT
                | Kind::OP_LE
                | Kind::OP_GT
                | Kind::OP_GE
        )
    }
}
