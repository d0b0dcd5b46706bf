//! The arena node record and its policy tags.
//!
//! Constraint trees are parent/child *graphs* built bottom-up, which in
//! an ownership-strict language is best stored as a flat arena: the
//! owning [`TreeConstraintSet`] holds a `Vec<ConstraintNode>`, and
//! parent/child references are [`ConstraintId`] indices into it.
//!
//! [`TreeConstraintSet`]: super::TreeConstraintSet

use crate::treebank::Nonterminal;
use crate::{Span, Word};
use std::cell::Cell;
use std::fmt;

/// Stable index of a constraint node within its owning set's arena.
///
/// Ids are only meaningful to the set that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstraintId(pub(crate) usize);

impl ConstraintId {
    /// Position of the node in the owning set's arena (pre-order).
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ConstraintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which matching policy a constraint set applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchPolicy {
    /// Labels and structure must match; tags and words are unconstrained.
    Unlexicalized,
    /// As Unlexicalized, plus full head-word equality (including any
    /// extra word features).
    Lexicalized,
    /// As Lexicalized, but head words compare on bare word and tag only.
    PartialLexicalized,
    /// Items need only stay consistent with the given brackets; a bracket
    /// closes on exact span plus label subsumption.
    PartialBracket,
}

impl MatchPolicy {
    pub fn name(&self) -> &'static str {
        match self {
            MatchPolicy::Unlexicalized => "unlexicalized",
            MatchPolicy::Lexicalized => "lexicalized",
            MatchPolicy::PartialLexicalized => "partial-lexicalized",
            MatchPolicy::PartialBracket => "partial-bracket",
        }
    }

    /// Whether construction under this policy needs a head finder.
    pub fn requires_head_finder(&self) -> bool {
        matches!(self, MatchPolicy::Lexicalized | MatchPolicy::PartialLexicalized)
    }
}

impl fmt::Display for MatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Policy-specific payload of a constraint node.
#[derive(Debug, Clone)]
pub enum ConstraintKind {
    Unlexicalized,
    /// Carries the head word propagated up from the node's head child.
    Lexicalized { head_word: Word },
    /// Same payload as `Lexicalized`; matching ignores word features.
    PartialLexicalized { head_word: Word },
    /// Carries the pre-parsed nonterminal used by the subsumption test.
    PartialBracket { nt: Nonterminal },
}

/// One node of the constraint tree.
///
/// The two satisfaction flags are the only mutable state in a built set.
/// They are monotonic: once set, nothing in this crate resets them for
/// the lifetime of the set.
#[derive(Debug, Clone)]
pub struct ConstraintNode {
    pub(crate) label: String,
    pub(crate) span: Span,
    pub(crate) parent: Option<ConstraintId>,
    pub(crate) children: Vec<ConstraintId>,
    pub(crate) kind: ConstraintKind,
    pub(crate) satisfied: Cell<bool>,
    pub(crate) fully_satisfied: Cell<bool>,
}

impl ConstraintNode {
    pub(crate) fn new(
        label: String,
        span: Span,
        parent: Option<ConstraintId>,
        children: Vec<ConstraintId>,
        kind: ConstraintKind,
    ) -> Self {
        ConstraintNode {
            label,
            span,
            parent,
            children,
            kind,
            satisfied: Cell::new(false),
            fully_satisfied: Cell::new(false),
        }
    }

    /// The node's nonterminal label (canonicalized for the tree-matching
    /// policies) or part-of-speech tag for a leaf.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn start(&self) -> usize {
        self.span.start
    }

    pub fn end(&self) -> usize {
        self.span.end
    }

    /// The structural parent, `None` at the root. For the bracket-aware
    /// variant of this query see
    /// [`TreeConstraintSet::parent_of`](super::TreeConstraintSet::parent_of).
    pub fn parent(&self) -> Option<ConstraintId> {
        self.parent
    }

    /// Child constraint nodes, left to right.
    pub fn children(&self) -> &[ConstraintId] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn kind(&self) -> &ConstraintKind {
        &self.kind
    }

    /// The head word propagated to this node, for the lexicalized kinds.
    pub fn head_word(&self) -> Option<&Word> {
        match &self.kind {
            ConstraintKind::Lexicalized { head_word }
            | ConstraintKind::PartialLexicalized { head_word } => Some(head_word),
            _ => None,
        }
    }

    /// Whether some derivation item has matched this node.
    pub fn has_been_satisfied(&self) -> bool {
        self.satisfied.get()
    }

    /// Whether this node has been matched exactly (span and label); only
    /// ever differs from [`Self::has_been_satisfied`] under the
    /// PartialBracket policy.
    pub fn has_been_fully_satisfied(&self) -> bool {
        self.fully_satisfied.get()
    }

    pub(crate) fn mark_satisfied(&self) {
        self.satisfied.set(true);
    }

    pub(crate) fn mark_fully_satisfied(&self) {
        self.fully_satisfied.set(true);
    }
}

impl fmt::Display for ConstraintNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "label={}, span={}", self.label, self.span)?;
        if let Some(head_word) = self.head_word() {
            write!(f, ", head={head_word}")?;
        }
        Ok(())
    }
}
