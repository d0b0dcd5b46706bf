//! Head-finder contract.
//!
//! Which right-hand-side position heads a constituent is a language- and
//! treebank-specific question that lives outside this crate; the
//! lexicalized constraint builders only consume the answer. Coordination
//! handling (e.g. skipping conjunctions to find the "true" head) likewise
//! belongs in the implementation behind this trait — the builder treats
//! whatever index it returns as authoritative.

use std::sync::Arc;

/// Shared handle to a head finder.
pub type SharedHeadFinder = Arc<dyn HeadFinder + Send + Sync>;

/// Locates the head child of an internal reference-tree node.
pub trait HeadFinder {
    /// Given a node's (untransformed) label and the labels of its
    /// right-hand-side children in order, return the **1-based** index of
    /// the head child. Returning `0` or an index greater than
    /// `rhs.len()` means "head not found" and aborts constraint-set
    /// construction.
    fn find_head(&self, label: &str, rhs: &[&str]) -> usize;
}

/// Always picks the first right-hand-side element.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeftmostHead;

impl HeadFinder for LeftmostHead {
    fn find_head(&self, _label: &str, rhs: &[&str]) -> usize {
        if rhs.is_empty() { 0 } else { 1 }
    }
}

/// Always picks the last right-hand-side element. A serviceable
/// approximation for head-final constituents such as Penn noun phrases.
#[derive(Debug, Clone, Copy, Default)]
pub struct RightmostHead;

impl HeadFinder for RightmostHead {
    fn find_head(&self, _label: &str, rhs: &[&str]) -> usize {
        rhs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_positions() {
        assert_eq!(LeftmostHead.find_head("NP", &["DT", "NN"]), 1);
        assert_eq!(RightmostHead.find_head("NP", &["DT", "NN"]), 2);
        assert_eq!(LeftmostHead.find_head("NP", &[]), 0);
        assert_eq!(RightmostHead.find_head("NP", &[]), 0);
    }
}
