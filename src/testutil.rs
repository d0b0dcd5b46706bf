//! Test support: a minimal chart item and a derivation driver.

use crate::constraints::{ConstraintId, TreeConstraintSet};
use crate::head::HeadFinder;
use crate::item::ChartItem;
use crate::sexp::Sexp;
use crate::treebank::Treebank;
use crate::Word;
use std::cell::Cell;

/// The smallest possible stand-in for a host parser's chart item.
#[derive(Debug)]
pub(crate) struct TestItem {
    label: String,
    start: usize,
    end: usize,
    head_word: Option<Word>,
    preterminal: bool,
    head: Option<Box<TestItem>>,
    /// Left modifier children, leftmost first.
    left: Vec<TestItem>,
    /// Right modifier children, rightmost first.
    right: Vec<TestItem>,
    assigned: Cell<Option<ConstraintId>>,
}

impl TestItem {
    pub fn preterminal(tag: &str, word: &str, pos: usize) -> Self {
        TestItem {
            label: tag.to_string(),
            start: pos,
            end: pos,
            head_word: Some(Word::new(word, tag)),
            preterminal: true,
            head: None,
            left: Vec::new(),
            right: Vec::new(),
            assigned: Cell::new(None),
        }
    }

    /// An internal item over `left ++ [head] ++ right` (all given leftmost
    /// first); the span and head word derive from the children.
    pub fn internal(label: &str, left: Vec<TestItem>, head: TestItem, right: Vec<TestItem>) -> Self {
        let start = left.first().map_or(head.start, |c| c.start);
        let end = right.last().map_or(head.end, |c| c.end);
        let head_word = head.head_word.clone();
        let mut right = right;
        right.reverse();
        TestItem {
            label: label.to_string(),
            start,
            end,
            head_word,
            preterminal: false,
            head: Some(Box::new(head)),
            left,
            right,
            assigned: Cell::new(None),
        }
    }

    pub fn with_span(mut self, start: usize, end: usize) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn with_head_word(mut self, head_word: Word) -> Self {
        self.head_word = Some(head_word);
        self
    }
}

impl ChartItem for TestItem {
    fn label(&self) -> &str {
        &self.label
    }

    fn start(&self) -> usize {
        self.start
    }

    fn end(&self) -> usize {
        self.end
    }

    fn head_word(&self) -> Option<&Word> {
        self.head_word.as_ref()
    }

    fn is_preterminal(&self) -> bool {
        self.preterminal
    }

    fn head_child(&self) -> Option<&Self> {
        self.head.as_deref()
    }

    fn left_children(&self) -> impl Iterator<Item = &Self> {
        self.left.iter()
    }

    fn right_children(&self) -> impl Iterator<Item = &Self> {
        self.right.iter()
    }

    fn constraint(&self) -> Option<ConstraintId> {
        self.assigned.get()
    }

    fn assign_constraint(&self, constraint: ConstraintId) {
        self.assigned.set(Some(constraint));
    }
}

/// Mirror `tree` as a bottom-up derivation against `set`, resolving and
/// assigning a constraint for every item the way a host parser would.
/// Returns `None` as soon as any item fails to find a licensing
/// constraint.
pub(crate) fn derive(
    set: &TreeConstraintSet,
    tree: &Sexp,
    treebank: &dyn Treebank,
    head_finder: &dyn HeadFinder,
) -> Option<TestItem> {
    let mut next_word = 0;
    derive_node(set, tree, treebank, head_finder, &mut next_word)
}

fn derive_node(
    set: &TreeConstraintSet,
    tree: &Sexp,
    treebank: &dyn Treebank,
    head_finder: &dyn HeadFinder,
    next_word: &mut usize,
) -> Option<TestItem> {
    if treebank.is_preterminal(tree) {
        let word = treebank.make_word(tree).ok()?;
        let item = TestItem::preterminal(&word.tag, &word.word, *next_word);
        *next_word += 1;
        let id = set.constraint_satisfying(&item)?;
        item.assign_constraint(id);
        return Some(item);
    }

    let items = tree.as_list()?;
    let (first, rhs) = items.split_first()?;
    let label = first.as_sym()?;

    let mut children = Vec::with_capacity(rhs.len());
    for child in rhs {
        children.push(derive_node(set, child, treebank, head_finder, next_word)?);
    }

    let rhs_labels: Vec<&str> = rhs
        .iter()
        .map(|child| match child {
            Sexp::Sym(s) => s.as_str(),
            Sexp::List(items) => items.first().and_then(Sexp::as_sym).unwrap_or(""),
        })
        .collect();
    let head_index = head_finder.find_head(label, &rhs_labels);
    if head_index == 0 || head_index > children.len() {
        return None;
    }

    let mut rest = children.split_off(head_index - 1);
    let head = rest.remove(0);
    let item = TestItem::internal(label, children, head, rest);

    let id = set.constraint_satisfying(&item)?;
    item.assign_constraint(id);
    Some(item)
}
