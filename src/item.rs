//! Derivation-item contract.
//!
//! The host chart parser produces candidate constituents ("items") and
//! asks the constraint engine whether each one is licensed. The engine
//! only ever *reads* an item through this trait; recording the resolved
//! constraint via [`ChartItem::assign_constraint`] is the host parser's
//! job, done after [`constraint_satisfying`] returns one.
//!
//! [`constraint_satisfying`]: crate::TreeConstraintSet::constraint_satisfying

use crate::constraints::ConstraintId;
use crate::Word;

/// A candidate constituent produced by the external chart parser.
///
/// An internal item decomposes into a head child flanked by left and
/// right modifier children. Iteration orders mirror how a bottom-up
/// parser accumulates modifiers:
///
/// - [`left_children`](Self::left_children) yields the *leftmost* child first;
/// - [`right_children`](Self::right_children) yields the *rightmost* child first.
pub trait ChartItem {
    /// The constituent's (possibly annotated) nonterminal label, or its
    /// part-of-speech tag for a preterminal item.
    fn label(&self) -> &str;

    /// First word position covered (zero-based, inclusive).
    fn start(&self) -> usize;

    /// Last word position covered (zero-based, inclusive).
    fn end(&self) -> usize;

    /// The item's head word, if the host parser is lexicalized.
    fn head_word(&self) -> Option<&Word>;

    /// Whether this item spans exactly one word as a part-of-speech node.
    fn is_preterminal(&self) -> bool;

    /// The head child of an internal item; `None` for preterminals.
    fn head_child(&self) -> Option<&Self>;

    /// Modifier children to the left of the head, leftmost first.
    fn left_children(&self) -> impl Iterator<Item = &Self>;

    /// Modifier children to the right of the head, rightmost first.
    fn right_children(&self) -> impl Iterator<Item = &Self>;

    /// The constraint this item resolved to, if any has been assigned.
    fn constraint(&self) -> Option<ConstraintId>;

    /// Record the constraint this item resolved to. Called by the host
    /// parser, never by the engine.
    fn assign_constraint(&self, constraint: ConstraintId);
}
