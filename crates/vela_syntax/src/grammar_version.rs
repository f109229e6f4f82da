/// An ordered tag for a released grammar epoch.
///
/// The stream only carries this value through to parser productions via
/// [`crate::SyntaxHead`]-adjacent APIs; it never branches on it itself.
/// Gating version-introduced syntax (e.g. a `try`/`else` arm, a `const`
/// without an initializer, `import A as B`) is entirely the parser's concern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum GrammarVersion {
    /// The earliest supported grammar: no `try`/`else`, `const` always requires
    /// an initializer, `import` paths cannot be renamed with `as`.
    #[default]
    V1,
    /// Adds `try`/`else` and `import A as B`.
    V2,
    /// Adds `const` declarations without an initializer.
    V3,
}

impl GrammarVersion {
    pub const LATEST: GrammarVersion = GrammarVersion::V3;

    pub fn supports(self, introduced_in: GrammarVersion) -> bool {
        self >= introduced_in
    }
}
