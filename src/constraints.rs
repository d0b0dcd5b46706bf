//! Constraint trees, sets, and factories.
//!
//! This module is the core of the crate: given a reference syntactic
//! tree, it builds an isomorphic tree of constraint nodes over the
//! sentence's word positions, and answers — for every candidate
//! constituent the host chart parser produces — "does a node in this
//! constraint tree license this constituent, and if so, which one?"
//!
//! ## How the parts work together
//!
//! ```text
//! reference tree (Sexp)
//!        │
//!        v
//! build.rs   single left-to-right descent, threading a word counter;
//!            head-word propagation for the lexicalized policies
//!        │
//!        v
//! set.rs     TreeConstraintSet: arena of nodes + position-ordered
//!            leaves; constraint_satisfying / is_satisfied_by /
//!            is_violated_by_child per the active MatchPolicy
//!        ^
//!        │
//! registry.rs  factory per policy + ConstraintSetRegistry with
//!              runtime reconfiguration and observer callbacks
//! ```
//!
//! The host parser builds one set per sentence (via the registry), then
//! calls [`TreeConstraintSet::constraint_satisfying`] for every candidate
//! item; a `None` result means prune the candidate.
//!
//! ## Responsibilities by module
//!
//! - `node.rs`: the arena node record ([`ConstraintNode`]), its id type,
//!   and the policy tags ([`MatchPolicy`], [`ConstraintKind`]).
//! - `build.rs`: constraint-tree construction and its error cases
//!   (malformed trees, head-finder failures).
//! - `set.rs`: the owning set and every matching operation.
//! - `registry.rs`: strategy selection, fallback, and hot-swapping.

#[path = "constraints/build.rs"]
mod build;
#[path = "constraints/node.rs"]
mod node;
#[path = "constraints/registry.rs"]
mod registry;
#[path = "constraints/set.rs"]
mod set;

pub use node::{ConstraintId, ConstraintKind, ConstraintNode, MatchPolicy};
pub use registry::{
    ConstraintSetFactory, ConstraintSetRegistry, LexicalizedFactory, PartialBracketFactory,
    PartialLexicalizedFactory, UnlexicalizedFactory,
};
pub use set::{SetProperties, TreeConstraintSet};
