//! Factory selection and runtime reconfiguration.
//!
//! One [`ConstraintSetFactory`] exists per matching policy; a
//! [`ConstraintSetRegistry`] holds the active one, selected by name from
//! configuration. An unresolvable name is recovered locally: the registry
//! falls back to the unlexicalized factory and emits a diagnostic, so
//! parsing continues. Reconfiguring swaps the factory for *subsequently*
//! constructed sets only — sets already handed out are independent values
//! and keep working unchanged.

use super::node::MatchPolicy;
use super::set::TreeConstraintSet;
use crate::error::Error;
use crate::head::SharedHeadFinder;
use crate::sexp::Sexp;
use crate::treebank::SharedTreebank;
use std::fmt;
use tracing::warn;

/// Builds constraint sets for one matching policy.
pub trait ConstraintSetFactory {
    /// The policy of the sets this factory builds.
    fn policy(&self) -> MatchPolicy;

    /// A new, empty constraint set.
    fn empty(&self) -> TreeConstraintSet;

    /// A constraint set built from the given reference tree.
    fn from_tree(&self, tree: &Sexp) -> Result<TreeConstraintSet, Error>;
}

macro_rules! unlexicalized_style_factory {
    ($(#[$doc:meta])* $name:ident, $policy:expr) => {
        $(#[$doc])*
        #[derive(Clone)]
        pub struct $name {
            treebank: SharedTreebank,
        }

        impl $name {
            pub fn new(treebank: SharedTreebank) -> Self {
                Self { treebank }
            }
        }

        impl ConstraintSetFactory for $name {
            fn policy(&self) -> MatchPolicy {
                $policy
            }

            fn empty(&self) -> TreeConstraintSet {
                TreeConstraintSet::empty($policy, self.treebank.clone())
            }

            fn from_tree(&self, tree: &Sexp) -> Result<TreeConstraintSet, Error> {
                TreeConstraintSet::from_tree($policy, tree, self.treebank.clone(), None)
            }
        }
    };
}

macro_rules! lexicalized_style_factory {
    ($(#[$doc:meta])* $name:ident, $policy:expr) => {
        $(#[$doc])*
        #[derive(Clone)]
        pub struct $name {
            treebank: SharedTreebank,
            head_finder: SharedHeadFinder,
        }

        impl $name {
            pub fn new(treebank: SharedTreebank, head_finder: SharedHeadFinder) -> Self {
                Self { treebank, head_finder }
            }
        }

        impl ConstraintSetFactory for $name {
            fn policy(&self) -> MatchPolicy {
                $policy
            }

            fn empty(&self) -> TreeConstraintSet {
                TreeConstraintSet::empty($policy, self.treebank.clone())
            }

            fn from_tree(&self, tree: &Sexp) -> Result<TreeConstraintSet, Error> {
                let head_finder: &dyn crate::head::HeadFinder = self.head_finder.as_ref();
                TreeConstraintSet::from_tree($policy, tree, self.treebank.clone(), Some(head_finder))
            }
        }
    };
}

unlexicalized_style_factory!(
    /// Factory for sets that constrain labels and structure only.
    UnlexicalizedFactory,
    MatchPolicy::Unlexicalized
);
unlexicalized_style_factory!(
    /// Factory for sets that require consistency with given brackets.
    PartialBracketFactory,
    MatchPolicy::PartialBracket
);
lexicalized_style_factory!(
    /// Factory for fully head-lexicalized sets.
    LexicalizedFactory,
    MatchPolicy::Lexicalized
);
lexicalized_style_factory!(
    /// Factory for head-lexicalized sets comparing bare word and tag.
    PartialLexicalizedFactory,
    MatchPolicy::PartialLexicalized
);

/// Holds the active constraint-set factory and supports swapping it when
/// configuration changes at runtime.
///
/// Accepted factory names are the policy names: `unlexicalized`,
/// `lexicalized`, `partial-lexicalized`, and `partial-bracket`.
pub struct ConstraintSetRegistry {
    treebank: SharedTreebank,
    head_finder: SharedHeadFinder,
    active: Box<dyn ConstraintSetFactory>,
    observers: Vec<Box<dyn Fn(&str)>>,
}

impl ConstraintSetRegistry {
    /// Create a registry with the factory named by `factory_name` active.
    /// An unknown name falls back to the unlexicalized factory with a
    /// diagnostic.
    pub fn new(factory_name: &str, treebank: SharedTreebank, head_finder: SharedHeadFinder) -> Self {
        let active = resolve_or_fallback(factory_name, &treebank, &head_finder);
        ConstraintSetRegistry { treebank, head_finder, active, observers: Vec::new() }
    }

    pub fn active_policy(&self) -> MatchPolicy {
        self.active.policy()
    }

    pub fn active_factory(&self) -> &dyn ConstraintSetFactory {
        self.active.as_ref()
    }

    /// Swap the active factory. Takes effect for sets constructed after
    /// this call; in-flight sets are unaffected. Observers are notified
    /// with the name of the newly active factory (which is the fallback
    /// name if `factory_name` did not resolve).
    pub fn reconfigure(&mut self, factory_name: &str) {
        self.active = resolve_or_fallback(factory_name, &self.treebank, &self.head_finder);
        let name = self.active.policy().name();
        for observer in &self.observers {
            observer(name);
        }
    }

    /// Register a callback invoked after every [`Self::reconfigure`].
    pub fn on_reconfigure(&mut self, observer: impl Fn(&str) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// A new, empty set from the active factory.
    pub fn get(&self) -> TreeConstraintSet {
        self.active.empty()
    }

    /// A set built from `tree` by the active factory.
    pub fn get_tree(&self, tree: &Sexp) -> Result<TreeConstraintSet, Error> {
        self.active.from_tree(tree)
    }
}

impl fmt::Debug for ConstraintSetRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstraintSetRegistry")
            .field("active", &self.active.policy())
            .field("observers", &self.observers.len())
            .finish()
    }
}

fn resolve_factory(
    name: &str,
    treebank: &SharedTreebank,
    head_finder: &SharedHeadFinder,
) -> Result<Box<dyn ConstraintSetFactory>, Error> {
    match name {
        "unlexicalized" => Ok(Box::new(UnlexicalizedFactory::new(treebank.clone()))),
        "lexicalized" => {
            Ok(Box::new(LexicalizedFactory::new(treebank.clone(), head_finder.clone())))
        }
        "partial-lexicalized" => {
            Ok(Box::new(PartialLexicalizedFactory::new(treebank.clone(), head_finder.clone())))
        }
        "partial-bracket" => Ok(Box::new(PartialBracketFactory::new(treebank.clone()))),
        _ => Err(Error::UnknownFactory { name: name.to_string() }),
    }
}

fn resolve_or_fallback(
    name: &str,
    treebank: &SharedTreebank,
    head_finder: &SharedHeadFinder,
) -> Box<dyn ConstraintSetFactory> {
    resolve_factory(name, treebank, head_finder).unwrap_or_else(|err| {
        warn!(%err, fallback = "unlexicalized", "constraint-set factory not resolved");
        Box::new(UnlexicalizedFactory::new(treebank.clone()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::head::RightmostHead;
    use crate::treebank::PennTreebank;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::Arc;

    fn registry(name: &str) -> ConstraintSetRegistry {
        ConstraintSetRegistry::new(name, Arc::new(PennTreebank::new()), Arc::new(RightmostHead))
    }

    #[test]
    fn each_name_resolves_to_its_policy() {
        let cases = [
            ("unlexicalized", MatchPolicy::Unlexicalized),
            ("lexicalized", MatchPolicy::Lexicalized),
            ("partial-lexicalized", MatchPolicy::PartialLexicalized),
            ("partial-bracket", MatchPolicy::PartialBracket),
        ];
        for (name, policy) in cases {
            let registry = registry(name);
            assert_eq!(registry.active_policy(), policy);
            assert_eq!(registry.get().policy(), policy);
        }
    }

    #[test]
    fn unknown_factory_falls_back_to_unlexicalized() {
        let registry = registry("com.example.FancyConstraintSetFactory");
        assert_eq!(registry.active_policy(), MatchPolicy::Unlexicalized);

        // and the fallback factory is fully usable
        let tree = Sexp::parse("(NP (DT the) (NN dog))").unwrap();
        let set = registry.get_tree(&tree).unwrap();
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn reconfigure_affects_only_subsequent_sets() {
        let mut registry = registry("unlexicalized");
        let tree = Sexp::parse("(NP (DT the) (NN dog))").unwrap();

        let before = registry.get_tree(&tree).unwrap();
        registry.reconfigure("partial-bracket");
        let after = registry.get_tree(&tree).unwrap();

        assert_eq!(before.policy(), MatchPolicy::Unlexicalized);
        assert_eq!(after.policy(), MatchPolicy::PartialBracket);
    }

    #[test]
    fn observers_see_the_effective_factory() {
        let seen: Rc<RefCell<Vec<String>>> = Rc::default();
        let mut registry = registry("unlexicalized");

        let sink = Rc::clone(&seen);
        registry.on_reconfigure(move |name| sink.borrow_mut().push(name.to_string()));

        registry.reconfigure("lexicalized");
        registry.reconfigure("no-such-factory");

        assert_eq!(*seen.borrow(), vec!["lexicalized".to_string(), "unlexicalized".to_string()]);
    }

    #[test]
    fn lexicalized_factory_builds_lexicalized_sets() {
        let registry = registry("lexicalized");
        let tree = Sexp::parse("(NP (DT the) (NN dog))").unwrap();
        let set = registry.get_tree(&tree).unwrap();

        let root = set.node(set.root().unwrap());
        assert_eq!(root.head_word().map(|w| w.word.as_str()), Some("dog"));
    }
}
