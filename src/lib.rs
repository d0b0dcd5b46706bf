#[macro_use]
mod macros;
mod api;
mod constraints;
mod error;
mod head;
mod item;
mod sexp;
mod treebank;

#[cfg(test)]
pub(crate) mod testutil;

pub use api::{Config, constraints_for, constraints_for_with, default_registry};
pub use constraints::{
    ConstraintId, ConstraintKind, ConstraintNode, ConstraintSetFactory, ConstraintSetRegistry,
    LexicalizedFactory, MatchPolicy, PartialBracketFactory, PartialLexicalizedFactory,
    SetProperties, TreeConstraintSet, UnlexicalizedFactory,
};
pub use error::Error;
pub use head::{HeadFinder, LeftmostHead, RightmostHead, SharedHeadFinder};
pub use item::ChartItem;
pub use sexp::Sexp;
pub use treebank::{Nonterminal, PennTreebank, SharedTreebank, Treebank};

use std::fmt;

// --- Core primitives --------------------------------------------------------

/// A span over word positions: zero-based, inclusive on both ends.
///
/// A preterminal (single word) has `start == end`. Spans never run
/// backwards; the constraint builder guarantees `start <= end` for every
/// node it produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    /// First word position covered (inclusive).
    pub start: usize,
    /// Last word position covered (inclusive).
    pub end: usize,
}

impl Span {
    /// Span of a single word position.
    pub fn point(pos: usize) -> Self {
        Span { start: pos, end: pos }
    }

    /// Number of words covered.
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// True if `other` lies entirely within this span (does not cross it).
    pub fn contains(&self, other: Span) -> bool {
        other.start >= self.start && other.end <= self.end
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.start, self.end)
    }
}

/// A word paired with its part-of-speech tag.
///
/// `features` carries whatever extra information a richer word
/// representation may attach (morphology, word classes, ...). Derived
/// equality compares all three fields; the PartialLexicalized policy
/// instead uses [`Word::matches_word_and_tag`], which ignores `features`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Word {
    /// The word itself.
    pub word: String,
    /// Its part-of-speech tag.
    pub tag: String,
    /// Optional extra features carried by richer word representations.
    pub features: Option<String>,
}

impl Word {
    pub fn new(word: impl Into<String>, tag: impl Into<String>) -> Self {
        Word { word: word.into(), tag: tag.into(), features: None }
    }

    pub fn with_features(mut self, features: impl Into<String>) -> Self {
        self.features = Some(features.into());
        self
    }

    /// Equality on the bare word and tag only, ignoring `features`.
    pub fn matches_word_and_tag(&self, other: &Word) -> bool {
        self.word == other.word && self.tag == other.tag
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.word, self.tag)
    }
}
