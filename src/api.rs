use crate::constraints::{ConstraintSetRegistry, TreeConstraintSet};
use crate::error::Error;
use crate::head::LeftmostHead;
use crate::sexp::Sexp;
use crate::treebank::PennTreebank;
use std::sync::Arc;

/// Configuration consumed by the constraint-set registry.
///
/// This is intentionally minimal: one string-valued setting selecting the
/// active factory. Changes take effect for subsequently constructed
/// constraint sets only (see [`ConstraintSetRegistry::reconfigure`]).
#[derive(Debug, Clone)]
pub struct Config {
    /// Name of the constraint-set factory to activate. One of
    /// `unlexicalized` (the default), `lexicalized`,
    /// `partial-lexicalized`, or `partial-bracket`.
    pub constraint_set_factory: String,
}

impl Default for Config {
    fn default() -> Self {
        Config { constraint_set_factory: "unlexicalized".to_string() }
    }
}

/// A registry over the default [`PennTreebank`] conventions and a
/// leftmost head finder.
///
/// Hosts with real head rules or a different treebank schema should
/// construct [`ConstraintSetRegistry`] directly.
pub fn default_registry(config: &Config) -> ConstraintSetRegistry {
    ConstraintSetRegistry::new(
        &config.constraint_set_factory,
        Arc::new(PennTreebank::new()),
        Arc::new(LeftmostHead),
    )
}

/// Build a constraint set from a reference tree in textual notation,
/// using the default configuration (unlexicalized policy, Penn-Treebank
/// conventions).
///
/// # Example
/// ```
/// use syntrellis::constraints_for;
///
/// let set = constraints_for("(S (NP (DT the) (NN dog)) (VP (VBD barked)))").unwrap();
/// assert_eq!(set.leaves().len(), 3);
/// ```
pub fn constraints_for(text: &str) -> Result<TreeConstraintSet, Error> {
    constraints_for_with(text, &default_registry(&Config::default()))
}

/// Build a constraint set from a reference tree in textual notation,
/// using the given registry's active factory.
pub fn constraints_for_with(text: &str, registry: &ConstraintSetRegistry) -> Result<TreeConstraintSet, Error> {
    let tree = Sexp::parse(text)?;
    registry.get_tree(&tree)
}
