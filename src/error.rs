use crate::constraints::MatchPolicy;
use thiserror::Error;

/// Errors produced while reading a reference tree or building a constraint
/// set from it.
///
/// Matching failures are deliberately *not* represented here: an item that
/// fails to satisfy any constraint is the normal "prune this candidate"
/// signal, reported as `None`/`false` by the matching operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The head finder returned `0` or an out-of-range index for an
    /// internal node. The reference tree (or the head finder) is
    /// untrustworthy, so construction of the whole set is abandoned.
    #[error("no head found for `{label}`: head index {index} of {arity} children")]
    HeadNotFound {
        /// Label of the internal node whose head was requested.
        label: String,
        /// The 1-based index the head finder returned.
        index: usize,
        /// Number of right-hand-side children the node actually has.
        arity: usize,
    },

    /// The reference tree is structurally broken: a bare symbol where a
    /// subtree was expected, an internal node without children, or a
    /// preterminal that is not exactly `(TAG word)`.
    #[error("malformed reference tree: {reason}")]
    MalformedTree { reason: String },

    /// The textual tree notation could not be read.
    #[error("tree syntax error at byte {at}: {reason}")]
    TreeSyntax { at: usize, reason: &'static str },

    /// A query was made that the active matching policy does not implement.
    /// This is a programmer error in the host parser, not a data error.
    #[error("operation `{operation}` is not supported by the {policy} policy")]
    Unsupported {
        operation: &'static str,
        policy: MatchPolicy,
    },

    /// No factory is registered under the requested name. The registry
    /// recovers from this by falling back to the unlexicalized factory.
    #[error("unknown constraint-set factory `{name}`")]
    UnknownFactory { name: String },

    /// A lexicalized factory was asked to build a set without a head finder.
    #[error("the {policy} policy requires a head finder")]
    HeadFinderRequired { policy: MatchPolicy },
}
