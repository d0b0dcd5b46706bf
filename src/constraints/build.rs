//! Constraint-tree construction.
//!
//! One left-to-right recursive descent over the reference tree, threading
//! a word-position counter: a preterminal takes the current position and
//! advances the counter; an internal node records the counter before
//! descending (`start`) and after (`end = counter - 1`). This single pass
//! is what guarantees the span-partition invariant — children's spans
//! tile `[start, end]` contiguously, left to right.
//!
//! Internal nodes are allocated with a reserve-then-fill scheme so that
//! children can hold their parent's arena index before the parent's span
//! is known.

use super::node::{ConstraintId, ConstraintKind, ConstraintNode, MatchPolicy};
use crate::error::Error;
use crate::head::HeadFinder;
use crate::sexp::Sexp;
use crate::treebank::Treebank;
use crate::{Span, Word};

pub(super) struct Builder<'a> {
    policy: MatchPolicy,
    treebank: &'a dyn Treebank,
    head_finder: Option<&'a dyn HeadFinder>,
    nodes: Vec<ConstraintNode>,
    next_word: usize,
}

impl<'a> Builder<'a> {
    pub(super) fn new(
        policy: MatchPolicy,
        treebank: &'a dyn Treebank,
        head_finder: Option<&'a dyn HeadFinder>,
    ) -> Self {
        Builder { policy, treebank, head_finder, nodes: Vec::new(), next_word: 0 }
    }

    /// Build the arena for `tree`. An empty list `()` has zero
    /// preterminals and yields an empty arena (a set with no root).
    pub(super) fn build(mut self, tree: &Sexp) -> Result<Vec<ConstraintNode>, Error> {
        if matches!(tree, Sexp::List(items) if items.is_empty()) {
            return Ok(Vec::new());
        }
        self.build_node(tree, None)?;
        tracing::debug!(
            policy = %self.policy,
            nodes = self.nodes.len(),
            words = self.next_word,
            "built constraint tree"
        );
        Ok(self.nodes)
    }

    fn build_node(&mut self, tree: &Sexp, parent: Option<ConstraintId>) -> Result<ConstraintId, Error> {
        if self.treebank.is_preterminal(tree) {
            return self.build_leaf(tree, parent);
        }

        let Some(items) = tree.as_list() else {
            return Err(Error::MalformedTree {
                reason: format!("expected a subtree, got bare symbol `{tree}`"),
            });
        };
        let Some((first, rhs)) = items.split_first() else {
            return Err(Error::MalformedTree { reason: "empty `()` node inside tree".to_string() });
        };
        let Some(raw_label) = first.as_sym() else {
            return Err(Error::MalformedTree {
                reason: format!("node label must be a symbol, got `{first}`"),
            });
        };
        if rhs.is_empty() {
            return Err(Error::MalformedTree {
                reason: format!("internal node `{raw_label}` has no children"),
            });
        }

        let start = self.next_word;
        let id = self.reserve(parent);
        let mut children = Vec::with_capacity(rhs.len());
        for child in rhs {
            children.push(self.build_node(child, Some(id))?);
        }
        let span = Span { start, end: self.next_word - 1 };

        let kind = match self.policy {
            MatchPolicy::Unlexicalized => ConstraintKind::Unlexicalized,
            MatchPolicy::PartialBracket => {
                ConstraintKind::PartialBracket { nt: self.treebank.parse_nonterminal(raw_label) }
            }
            MatchPolicy::Lexicalized => {
                ConstraintKind::Lexicalized { head_word: self.inherit_head_word(raw_label, rhs, &children)? }
            }
            MatchPolicy::PartialLexicalized => {
                ConstraintKind::PartialLexicalized {
                    head_word: self.inherit_head_word(raw_label, rhs, &children)?,
                }
            }
        };

        self.nodes[id.0] = ConstraintNode::new(self.internal_label(raw_label), span, parent, children, kind);
        Ok(id)
    }

    fn build_leaf(&mut self, tree: &Sexp, parent: Option<ConstraintId>) -> Result<ConstraintId, Error> {
        let word = self.treebank.make_word(tree)?;
        let label = word.tag.clone();
        let kind = match self.policy {
            MatchPolicy::Unlexicalized => ConstraintKind::Unlexicalized,
            MatchPolicy::Lexicalized => ConstraintKind::Lexicalized { head_word: word },
            MatchPolicy::PartialLexicalized => ConstraintKind::PartialLexicalized { head_word: word },
            MatchPolicy::PartialBracket => {
                ConstraintKind::PartialBracket { nt: self.treebank.parse_nonterminal(&label) }
            }
        };

        let span = Span::point(self.next_word);
        self.next_word += 1;
        let id = ConstraintId(self.nodes.len());
        self.nodes.push(ConstraintNode::new(label, span, parent, Vec::new(), kind));
        Ok(id)
    }

    /// Reserve an arena slot so children built below can reference their
    /// parent by index; the slot is overwritten once the subtree is done.
    fn reserve(&mut self, parent: Option<ConstraintId>) -> ConstraintId {
        let id = ConstraintId(self.nodes.len());
        self.nodes.push(ConstraintNode::new(
            String::new(),
            Span::point(0),
            parent,
            Vec::new(),
            ConstraintKind::Unlexicalized,
        ));
        id
    }

    /// Internal-node labels are canonicalized for the tree-matching
    /// policies, except for the base-NP label; the PartialBracket policy
    /// keeps the raw annotation for its subsumption test.
    fn internal_label(&self, raw: &str) -> String {
        match self.policy {
            MatchPolicy::PartialBracket => raw.to_string(),
            _ if raw == self.treebank.base_np_label() => raw.to_string(),
            _ => self.treebank.get_canonical(raw).into_owned(),
        }
    }

    fn inherit_head_word(
        &self,
        label: &str,
        rhs: &[Sexp],
        children: &[ConstraintId],
    ) -> Result<Word, Error> {
        let Some(head_finder) = self.head_finder else {
            return Err(Error::HeadFinderRequired { policy: self.policy });
        };

        // the head finder sees the untransformed right-hand side
        let rhs_labels: Vec<&str> = rhs.iter().map(rhs_label).collect();
        let index = head_finder.find_head(label, &rhs_labels);
        if index == 0 || index > children.len() {
            return Err(Error::HeadNotFound {
                label: label.to_string(),
                index,
                arity: children.len(),
            });
        }

        let head_child = &self.nodes[children[index - 1].0];
        head_child.head_word().cloned().ok_or_else(|| Error::MalformedTree {
            reason: format!("head child {} of `{label}` carries no head word", index),
        })
    }
}

/// The label a right-hand-side element presents to the head finder: a
/// preterminal's tag, an internal node's raw label.
fn rhs_label(child: &Sexp) -> &str {
    match child {
        Sexp::Sym(s) => s,
        Sexp::List(items) => items.first().and_then(Sexp::as_sym).unwrap_or(""),
    }
}

#[cfg(test)]
mod tests {
    use crate::constraints::{MatchPolicy, TreeConstraintSet};
    use crate::head::{HeadFinder, RightmostHead};
    use crate::sexp::Sexp;
    use crate::treebank::{PennTreebank, SharedTreebank};
    use crate::Error;
    use std::sync::Arc;

    fn treebank() -> SharedTreebank {
        Arc::new(PennTreebank::new())
    }

    fn build(policy: MatchPolicy, text: &str) -> Result<TreeConstraintSet, Error> {
        let head_finder: Option<&dyn HeadFinder> =
            if policy.requires_head_finder() { Some(&RightmostHead) } else { None };
        TreeConstraintSet::from_tree(policy, &Sexp::parse(text).unwrap(), treebank(), head_finder)
    }

    #[test]
    fn malformed_trees_fail_construction() {
        let cases = [
            "dog",                    // bare symbol at the root
            "(NP dog cat)",           // three-symbol list is no preterminal
            "(NP)",                   // internal node without children
            "(NP (NN dog) ())",       // empty node inside the tree
            "(S ((NP) (NN dog)))",    // list in label position
        ];
        for case in cases {
            let result = build(MatchPolicy::Unlexicalized, case);
            assert!(
                matches!(result, Err(Error::MalformedTree { .. })),
                "expected MalformedTree for `{case}`, got {result:?}"
            );
        }
    }

    #[test]
    fn head_not_found_is_fatal() {
        struct NoHead;
        impl HeadFinder for NoHead {
            fn find_head(&self, _label: &str, _rhs: &[&str]) -> usize {
                0
            }
        }

        let tree = Sexp::parse("(NP (DT the) (NN dog))").unwrap();
        let result =
            TreeConstraintSet::from_tree(MatchPolicy::Lexicalized, &tree, treebank(), Some(&NoHead));
        match result {
            Err(Error::HeadNotFound { label, index, arity }) => {
                assert_eq!(label, "NP");
                assert_eq!(index, 0);
                assert_eq!(arity, 2);
            }
            other => panic!("expected HeadNotFound, got {other:?}"),
        }
    }

    #[test]
    fn lexicalized_policies_require_a_head_finder() {
        let tree = Sexp::parse("(NP (NN dog))").unwrap();
        let result = TreeConstraintSet::from_tree(MatchPolicy::Lexicalized, &tree, treebank(), None);
        assert!(matches!(result, Err(Error::HeadFinderRequired { .. })));
    }

    #[test]
    fn spans_partition_every_internal_node() {
        let set = build(
            MatchPolicy::Unlexicalized,
            "(S (NP (DT the) (NN dog)) (VP (VBD barked) (PP (IN at) (NP (DT the) (NN cat)))))",
        )
        .unwrap();

        for node in set.iter() {
            if node.is_leaf() {
                continue;
            }
            let mut expected_start = node.start();
            for &child_id in node.children() {
                let child = set.node(child_id);
                assert_eq!(child.start(), expected_start, "gap before {child_id}");
                expected_start = child.end() + 1;
            }
            assert_eq!(expected_start, node.end() + 1, "children fall short of parent span");
        }
    }

    #[test]
    fn head_words_propagate_to_the_root() {
        let set = build(MatchPolicy::Lexicalized, "(S (NP (DT the) (NN dog)) (VP (VBD barked)))")
            .unwrap();

        for node in set.iter() {
            if node.is_leaf() {
                continue;
            }
            let head_child = set.node(*node.children().last().unwrap());
            assert_eq!(node.head_word(), head_child.head_word());
        }

        let root = set.node(set.root().unwrap());
        assert_eq!(root.head_word().unwrap().word, "barked");
    }

    #[test]
    fn base_np_label_skips_canonicalization() {
        let set = build(MatchPolicy::Unlexicalized, "(S (NPB (DT the) (NN dog)) (VP-TPC (VBD barked)))")
            .unwrap();
        let labels: Vec<&str> = set.iter().map(|n| n.label()).collect();
        assert!(labels.contains(&"NPB"));
        assert!(labels.contains(&"VP"), "VP-TPC should canonicalize to VP, got {labels:?}");
    }

    #[test]
    fn partial_bracket_keeps_raw_labels() {
        let set = build(MatchPolicy::PartialBracket, "(NP-SBJ (DT the) (NN dog))").unwrap();
        assert_eq!(set.node(set.root().unwrap()).label(), "NP-SBJ");
    }
}
