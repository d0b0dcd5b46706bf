//! Treebank schema contract and a default Penn-Treebank-style implementation.
//!
//! The constraint engine does not own any treebank knowledge; it asks a
//! [`Treebank`] three kinds of questions while building and matching:
//!
//! - shape: is this subtree a preterminal, and what `(word, tag)` does it
//!   carry ([`Treebank::is_preterminal`], [`Treebank::make_word`])?
//! - label identity: what is the canonical (annotation-free) form of a
//!   label ([`Treebank::get_canonical`])?
//! - label structure: how does a complex annotation decompose into base,
//!   augmentations, and index ([`Treebank::parse_nonterminal`]), which is
//!   what the PartialBracket subsumption test runs on?

use crate::error::Error;
use crate::sexp::Sexp;
use crate::Word;
use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Shared handle to a treebank, cloned into every constraint set built
/// from it.
pub type SharedTreebank = Arc<dyn Treebank + Send + Sync>;

/// Decomposed form of a complex nonterminal annotation, e.g.
/// `NP-SBJ=2` has base `NP`, augmentations `[SBJ]`, and index `2`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Nonterminal {
    /// The unaugmented base label.
    pub base: String,
    /// Function tags and other augmentations, in order of appearance.
    pub augmentations: Vec<String>,
    /// Gap/coindexation index, if the annotation carried one.
    pub index: Option<u32>,
}

impl Nonterminal {
    /// Subsumption: a weaker compatibility test than label identity.
    ///
    /// `a.subsumes(b)` holds when both share a base, every augmentation of
    /// `a` also occurs on `b`, and `a` either carries no index or carries
    /// the same index as `b`. A bare `NP` therefore subsumes `NP-SBJ`, but
    /// `NP-SBJ` does not subsume a bare `NP`.
    pub fn subsumes(&self, other: &Nonterminal) -> bool {
        if self.base != other.base {
            return false;
        }
        if self.index.is_some() && self.index != other.index {
            return false;
        }
        self.augmentations.iter().all(|a| other.augmentations.contains(a))
    }
}

impl fmt::Display for Nonterminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)?;
        for a in &self.augmentations {
            write!(f, "-{a}")?;
        }
        if let Some(index) = self.index {
            write!(f, "-{index}")?;
        }
        Ok(())
    }
}

/// The schema questions the constraint engine asks of its treebank.
pub trait Treebank {
    /// Whether `tree` is a preterminal, i.e. a `(TAG word)` pair.
    fn is_preterminal(&self, tree: &Sexp) -> bool;

    /// Extract the `(word, tag)` pair of a preterminal. A subtree that is
    /// not exactly `(TAG word)` is a malformed-tree error.
    fn make_word(&self, preterminal: &Sexp) -> Result<Word, Error>;

    /// The canonical (annotation-free) form of a label. Labels on the
    /// canonical-exception list pass through unchanged.
    fn get_canonical<'a>(&self, label: &'a str) -> Cow<'a, str>;

    /// Decompose a complex nonterminal annotation.
    fn parse_nonterminal(&self, label: &str) -> Nonterminal;

    /// The label of base (non-recursive) noun phrases, which is exempt
    /// from canonicalization during constraint construction.
    fn base_np_label(&self) -> &str;
}

// --- Default implementation -------------------------------------------------

/// Penn-Treebank-style label conventions: `-` and `=` delimit
/// augmentations, a trailing numeric segment is a coindexation index, and
/// bracket-like tokens (`-LRB-`, `-RRB-`, `-NONE-`) are atomic.
#[derive(Debug, Clone)]
pub struct PennTreebank {
    canonical_exceptions: HashSet<String>,
    base_np: String,
}

impl Default for PennTreebank {
    fn default() -> Self {
        let exceptions = ["-LRB-", "-RRB-", "-NONE-"];
        PennTreebank {
            canonical_exceptions: exceptions.iter().map(|s| s.to_string()).collect(),
            base_np: "NPB".to_string(),
        }
    }
}

impl PennTreebank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extend the set of labels that bypass canonicalization.
    pub fn with_canonical_exceptions<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.canonical_exceptions.extend(labels.into_iter().map(Into::into));
        self
    }
}

impl Treebank for PennTreebank {
    fn is_preterminal(&self, tree: &Sexp) -> bool {
        matches!(tree.as_list(), Some([Sexp::Sym(_), Sexp::Sym(_)]))
    }

    fn make_word(&self, preterminal: &Sexp) -> Result<Word, Error> {
        match preterminal.as_list() {
            Some([Sexp::Sym(tag), Sexp::Sym(word)]) => Ok(Word::new(word.as_str(), tag.as_str())),
            _ => Err(Error::MalformedTree {
                reason: format!("preterminal must be `(TAG word)`, got `{preterminal}`"),
            }),
        }
    }

    fn get_canonical<'a>(&self, label: &'a str) -> Cow<'a, str> {
        if self.canonical_exceptions.contains(label) {
            return Cow::Borrowed(label);
        }
        let nt = self.parse_nonterminal(label);
        if nt.base.len() == label.len() {
            Cow::Borrowed(label)
        } else {
            Cow::Owned(nt.base)
        }
    }

    fn parse_nonterminal(&self, label: &str) -> Nonterminal {
        if self.canonical_exceptions.contains(label) {
            return Nonterminal { base: label.to_string(), ..Nonterminal::default() };
        }
        // base is either a bracket-like token (-XXX-) or everything up to
        // the first delimiter
        let base = match regex!(r"^(-[A-Za-z]+-|[^-=|]+)").find(label) {
            Some(m) => m.as_str(),
            None => label,
        };
        let mut nt = Nonterminal { base: base.to_string(), ..Nonterminal::default() };

        let segments: Vec<&str> = label[base.len()..]
            .split(['-', '=', '|'])
            .filter(|s| !s.is_empty())
            .collect();
        for (i, segment) in segments.iter().enumerate() {
            let is_last = i + 1 == segments.len();
            match segment.parse::<u32>() {
                Ok(index) if is_last => nt.index = Some(index),
                _ => nt.augmentations.push(segment.to_string()),
            }
        }
        nt
    }

    fn base_np_label(&self) -> &str {
        &self.base_np
    }
}
