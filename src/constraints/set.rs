//! The constraint set and its matching operations.
//!
//! A [`TreeConstraintSet`] owns the arena of [`ConstraintNode`]s built
//! from one reference tree, the position-ordered leaf list, and the
//! matching policy. It is built once per sentence and consulted for
//! every candidate constituent; the only state that changes after
//! construction is the per-node satisfaction flags.
//!
//! The central operation is [`TreeConstraintSet::constraint_satisfying`]:
//! rather than scanning for *any* node that happens to match a candidate
//! item, it resolves the item through the parent of its head child's
//! assigned constraint. This forces an item's children to have resolved,
//! transitively, under the same ancestor as the item itself — a candidate
//! whose children were licensed under an unrelated branch is pruned even
//! if some node matches its label and span in isolation.

use super::build::Builder;
use super::node::{ConstraintId, ConstraintKind, ConstraintNode, MatchPolicy};
use crate::error::Error;
use crate::head::HeadFinder;
use crate::item::ChartItem;
use crate::sexp::Sexp;
use crate::treebank::SharedTreebank;
use crate::Span;
use std::fmt;

bitflags::bitflags! {
    /// Properties the host parser consults to decide how much extra
    /// violation-checking it must perform per candidate item.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SetProperties: u8 {
        /// The constraints form a tree isomorphic to a reference tree.
        const TREE_STRUCTURE   = 1 << 0;
        /// Every accepted item must have a satisfying constraint attached.
        const FIND_SATISFYING  = 1 << 1;
        /// Every generated item must additionally be checked against all
        /// constraints for violations.
        const FIND_VIOLATIONS  = 1 << 2;
    }
}

/// A tree of constraint nodes spanning one sentence's word positions.
pub struct TreeConstraintSet {
    policy: MatchPolicy,
    treebank: SharedTreebank,
    nodes: Vec<ConstraintNode>,
    root: Option<ConstraintId>,
    leaves: Vec<ConstraintId>,
}

impl TreeConstraintSet {
    /// A set with no constraints. It fails closed: no candidate item is
    /// ever licensed.
    pub fn empty(policy: MatchPolicy, treebank: SharedTreebank) -> Self {
        TreeConstraintSet { policy, treebank, nodes: Vec::new(), root: None, leaves: Vec::new() }
    }

    /// Build the constraint tree isomorphic to `tree`.
    ///
    /// `head_finder` is required by the lexicalized policies and ignored
    /// by the others. A reference tree with zero preterminals yields an
    /// empty set.
    pub fn from_tree(
        policy: MatchPolicy,
        tree: &Sexp,
        treebank: SharedTreebank,
        head_finder: Option<&dyn HeadFinder>,
    ) -> Result<Self, Error> {
        if policy.requires_head_finder() && head_finder.is_none() {
            return Err(Error::HeadFinderRequired { policy });
        }

        let nodes = Builder::new(policy, treebank.as_ref(), head_finder).build(tree)?;
        let root = if nodes.is_empty() { None } else { Some(ConstraintId(0)) };

        let mut leaves = Vec::new();
        if let Some(root) = root {
            collect_leaves(&nodes, root, &mut leaves);
        }

        Ok(TreeConstraintSet { policy, treebank, nodes, root, leaves })
    }

    // --- Accessors ----------------------------------------------------------

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    /// The root constraint, or `None` for an empty set.
    pub fn root(&self) -> Option<ConstraintId> {
        self.root
    }

    /// Leaf constraints in word order: `leaves()[i]` spans exactly
    /// position `i`.
    pub fn leaves(&self) -> &[ConstraintId] {
        &self.leaves
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every node in the set, in construction (pre-)order.
    pub fn iter(&self) -> impl Iterator<Item = &ConstraintNode> {
        self.nodes.iter()
    }

    /// The node behind `id`. Ids are only valid for the set that issued
    /// them.
    pub fn node(&self, id: ConstraintId) -> &ConstraintNode {
        &self.nodes[id.0]
    }

    // --- Set-level predicates -----------------------------------------------

    pub fn properties(&self) -> SetProperties {
        // tree-shaped sets guarantee internal consistency, so the host
        // parser never needs a per-item violation sweep
        SetProperties::TREE_STRUCTURE | SetProperties::FIND_SATISFYING
    }

    pub fn has_tree_structure(&self) -> bool {
        self.properties().contains(SetProperties::TREE_STRUCTURE)
    }

    pub fn find_at_least_one_satisfying(&self) -> bool {
        self.properties().contains(SetProperties::FIND_SATISFYING)
    }

    pub fn find_no_violations(&self) -> bool {
        self.properties().contains(SetProperties::FIND_VIOLATIONS)
    }

    // --- Matching -----------------------------------------------------------

    /// Find the constraint licensing `item`, or `None` to prune it.
    ///
    /// Preterminal items are resolved by position against the leaf list;
    /// internal items resolve through the parent of their head child's
    /// assigned constraint, which is what keeps a whole constituent's
    /// children aligned to one region of the constraint tree.
    pub fn constraint_satisfying<I: ChartItem>(&self, item: &I) -> Option<ConstraintId> {
        self.root?;

        if item.is_preterminal() {
            let id = *self.leaves.get(item.start())?;
            return self.is_satisfied_by(id, item).then_some(id);
        }

        let assigned = item.head_child()?.constraint()?;
        let parent = self.parent_of(assigned)?;
        self.is_satisfied_by(parent, item).then_some(parent)
    }

    /// Whether `item` satisfies the constraint at `id`, including the
    /// structural correspondence of its children for the tree-matching
    /// policies. Marks the node satisfied on success.
    pub fn is_satisfied_by<I: ChartItem>(&self, id: ConstraintId, item: &I) -> bool {
        if item.is_preterminal() {
            return self.is_satisfied_by_preterminal(id, item);
        }
        match self.policy {
            MatchPolicy::PartialBracket => self.bracket_match(id, item),
            _ => self.tree_match(id, item),
        }
    }

    /// Whether `item` satisfies only the local information of the node at
    /// `id` (label, head word, or span containment, per policy),
    /// regardless of its place in the tree.
    pub fn is_locally_satisfied_by<I: ChartItem>(&self, id: ConstraintId, item: &I) -> bool {
        let node = self.node(id);
        match &node.kind {
            ConstraintKind::Unlexicalized => {
                item.label() == node.label
                    || self.treebank.get_canonical(item.label()) == node.label()
            }
            ConstraintKind::Lexicalized { head_word } => {
                item.label() == node.label && item.head_word() == Some(head_word)
            }
            ConstraintKind::PartialLexicalized { head_word } => {
                item.label() == node.label
                    && item.head_word().is_some_and(|w| w.matches_word_and_tag(head_word))
            }
            ConstraintKind::PartialBracket { .. } => self.span_within(id, item),
        }
    }

    /// Whether attaching `child` under the node at `id` would cross
    /// between unrelated branches of the constraint tree. A local check,
    /// independent of the full [`Self::is_satisfied_by`] recursion.
    pub fn is_violated_by_child<I: ChartItem>(&self, id: ConstraintId, child: &I) -> bool {
        if self.policy == MatchPolicy::PartialBracket {
            return !self.span_within(id, child);
        }
        match child.constraint() {
            Some(c) => {
                self.node(c).parent() != Some(id) || !self.node(id).children.contains(&c)
            }
            None => true,
        }
    }

    /// Violation detection is delegated entirely to
    /// [`Self::find_no_violations`] for tree-shaped sets; asking anyway is
    /// a programmer error in the host parser.
    pub fn is_violated_by<I: ChartItem>(&self, _id: ConstraintId, _item: &I) -> Result<bool, Error> {
        Err(Error::Unsupported { operation: "is_violated_by", policy: self.policy })
    }

    /// See [`Self::is_violated_by`].
    pub fn contains_violation<I: ChartItem>(&self, _item: &I) -> Result<bool, Error> {
        Err(Error::Unsupported { operation: "contains_violation", policy: self.policy })
    }

    /// The parent to resolve through when an item's head child carries
    /// the constraint at `id`.
    ///
    /// For the tree-matching policies this is the structural parent. A
    /// PartialBracket node instead returns *itself* until it is fully
    /// satisfied, so that intermediate partial structures accumulate
    /// inside one bracket until the bracket closes.
    pub fn parent_of(&self, id: ConstraintId) -> Option<ConstraintId> {
        let node = self.node(id);
        if self.policy == MatchPolicy::PartialBracket && !node.has_been_fully_satisfied() {
            return Some(id);
        }
        node.parent()
    }

    pub fn has_been_satisfied(&self, id: ConstraintId) -> bool {
        self.node(id).has_been_satisfied()
    }

    pub fn has_been_fully_satisfied(&self, id: ConstraintId) -> bool {
        self.node(id).has_been_fully_satisfied()
    }

    // --- Matching internals -------------------------------------------------

    fn is_satisfied_by_preterminal<I: ChartItem>(&self, id: ConstraintId, item: &I) -> bool {
        let node = self.node(id);
        match self.policy {
            // parts of speech are unconstrained
            MatchPolicy::Unlexicalized => {
                node.mark_satisfied();
                true
            }
            MatchPolicy::PartialBracket => {
                node.mark_satisfied();
                node.mark_fully_satisfied();
                true
            }
            MatchPolicy::Lexicalized | MatchPolicy::PartialLexicalized => {
                if self.is_locally_satisfied_by(id, item) && self.span_matches(id, item) {
                    node.mark_satisfied();
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Full satisfaction for the tree-matching policies: local match,
    /// exact span, and the item's left children, head child, and right
    /// children resolving — in left-to-right order — to exactly this
    /// node's children.
    fn tree_match<I: ChartItem>(&self, id: ConstraintId, item: &I) -> bool {
        if !self.is_locally_satisfied_by(id, item) || !self.span_matches(id, item) {
            return false;
        }

        let node = self.node(id);
        let num_left = item.left_children().count();
        let num_right = item.right_children().count();
        if num_left + num_right + 1 != node.children.len() {
            return false;
        }

        for (i, child) in item.left_children().enumerate() {
            if child.constraint() != Some(node.children[i]) {
                return false;
            }
        }

        let head_constraint = item.head_child().and_then(|h| h.constraint());
        if head_constraint != Some(node.children[num_left]) {
            return false;
        }

        // right children arrive rightmost first
        let last = node.children.len() - 1;
        for (i, child) in item.right_children().enumerate() {
            if child.constraint() != Some(node.children[last - i]) {
                return false;
            }
        }

        node.mark_satisfied();
        true
    }

    /// Two-level satisfaction for the PartialBracket policy: any item
    /// contained in the bracket satisfies it; exact span plus label
    /// subsumption closes it.
    fn bracket_match<I: ChartItem>(&self, id: ConstraintId, item: &I) -> bool {
        if !self.is_locally_satisfied_by(id, item) {
            return false;
        }

        let node = self.node(id);
        node.mark_satisfied();
        if self.span_matches(id, item) && self.label_subsumes(id, item) {
            node.mark_fully_satisfied();
        }
        true
    }

    fn label_subsumes<I: ChartItem>(&self, id: ConstraintId, item: &I) -> bool {
        match &self.node(id).kind {
            ConstraintKind::PartialBracket { nt } => {
                nt.subsumes(&self.treebank.parse_nonterminal(item.label()))
            }
            _ => false,
        }
    }

    fn span_matches<I: ChartItem>(&self, id: ConstraintId, item: &I) -> bool {
        let span = self.node(id).span;
        item.start() == span.start && item.end() == span.end
    }

    fn span_within<I: ChartItem>(&self, id: ConstraintId, item: &I) -> bool {
        self.node(id).span.contains(Span { start: item.start(), end: item.end() })
    }

    // --- Rendering ----------------------------------------------------------

    /// Render the constraint tree as an S-expression whose labels carry
    /// spans (and head words, for the lexicalized policies), e.g.
    /// `(S-0-2 (NP-0-1 DT-0-0 NN-1-1) (VP-2-2 VBD-2-2))`.
    pub fn to_sexp(&self) -> Option<Sexp> {
        self.root.map(|root| self.node_to_sexp(root))
    }

    fn node_to_sexp(&self, id: ConstraintId) -> Sexp {
        let node = self.node(id);
        let tag = match node.head_word() {
            Some(w) => format!("{}[{w}]-{}-{}", node.label, node.span.start, node.span.end),
            None => format!("{}-{}-{}", node.label, node.span.start, node.span.end),
        };
        if node.is_leaf() {
            Sexp::sym(tag)
        } else {
            let mut items = vec![Sexp::sym(tag)];
            items.extend(node.children.iter().map(|&c| self.node_to_sexp(c)));
            Sexp::list(items)
        }
    }
}

impl fmt::Debug for TreeConstraintSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeConstraintSet")
            .field("policy", &self.policy)
            .field("nodes", &self.nodes.len())
            .field("leaves", &self.leaves.len())
            .finish()
    }
}

fn collect_leaves(nodes: &[ConstraintNode], id: ConstraintId, leaves: &mut Vec<ConstraintId>) {
    let node = &nodes[id.0];
    if node.is_leaf() {
        leaves.push(id);
    } else {
        for &child in &node.children {
            collect_leaves(nodes, child, leaves);
        }
    }
}
