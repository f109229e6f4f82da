use bitflags::bitflags;

bitflags! {
    /// Parser-visible discriminators attached to a [`crate::SyntaxHead`] alongside its
    /// [`crate::Kind`]. Kind carries *what* a token/node is; flags carry the small amount
    /// of extra context the tree builder and later passes need without inventing new kinds.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct SyntaxFlags: u16 {
        /// This event is whitespace, a comment, or a newline run, not syntax structure.
        const TRIVIA          = 1 << 0;
        /// Operator was written with a leading `.` (broadcast semantics).
        const DOTOP           = 1 << 1;
        /// This event is participating as an infix operator in a `call-infix` chain.
        const INFIX           = 1 << 2;
        /// A `;` at the top level of a block, separating statements rather than
        /// terminating a row inside a matrix literal.
        const TOPLEVEL_SEMI   = 1 << 3;
        /// Operator name was extended with trailing unicode sub/superscript characters.
        const SUFFIXED        = 1 << 4;
        /// This event was synthesized (e.g. an invisible juxtaposition `*`) rather than
        /// corresponding to literal source bytes.
        const SYNTHESIZED     = 1 << 5;
        /// This event carries an attached [`crate::Diagnostic`] (see `error` params on
        /// the parse stream's emission primitives).
        const HAS_ERROR       = 1 << 6;
    }
}

/// `{kind, flags}` pair tagging a single event or tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SyntaxHead {
    pub kind: crate::Kind,
    pub flags: SyntaxFlags,
}

impl SyntaxHead {
    pub fn new(kind: crate::Kind, flags: SyntaxFlags) -> Self {
        Self { kind, flags }
    }

    pub fn leaf(kind: crate::Kind) -> Self {
        Self {
            kind,
            flags: SyntaxFlags::empty(),
        }
    }

    pub fn is_trivia(&self) -> bool {
        self.flags.contains(SyntaxFlags::TRIVIA) || self.kind.is_trivia()
    }
}
