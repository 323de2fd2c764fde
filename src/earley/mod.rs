//! The Earley chart parsing engine.
//!
//! The recognizer fills one [Column] per input character with dotted rule [Item]s through the
//! predict, scan and complete steps. Nullable nonterminals are handled with the Aycock-Horspool
//! prediction so that ε derivations inside a single column are never missed. The parse forest is
//! recovered afterwards by walking the completed items of each column backwards over the spans
//! they cover.
//!
//! [EarleyParser] is the plain engine. [LeoParser] additionally applies Joop Leo's deterministic
//! reduction so that right recursive rules leave a single transitive item per column instead of a
//! growing tail of completions, which keeps the chart linear for LR(k) grammars. Both parsers
//! produce the same derivation trees.

mod chart;
mod extract;
mod forest;
mod leo;
mod parser;

#[cfg(test)]
mod __tests__;

use crate::choices::Choice;
use crate::util::Log;
use crate::{Alternative, Grammar};
use once_cell::unsync::OnceCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

pub(crate) type ItemKey = (Rc<str>, usize, usize, usize);

#[derive(Debug, Clone)]
/// A dotted rule spanning a part of the input.
///
/// Two items are equal when they agree on the nonterminal, the alternative, the dot and the
/// start column; the end column is metadata maintained by the column an item is stored in.
pub struct Item {
    name: Rc<str>,
    alternative: Rc<Alternative>,
    dot: usize,
    start: usize,
    end: usize,
    transitive: bool,
}

/// One chart column: the set of items alive after reading a prefix of the input.
pub struct Column {
    index: usize,
    letter: Option<char>,
    items: Vec<Item>,
    unique: HashSet<ItemKey>,
    transitives: HashMap<Rc<str>, Item>,
}

/// The filled chart of one parse together with the recorded right recursion chain links.
pub struct Chart {
    columns: Vec<Column>,
    postdots: HashMap<ItemKey, Item>,
}

/// The plain Earley parser.
pub struct EarleyParser {
    grammar: Rc<Grammar>,
    debugger: OnceCell<Log<&'static str>>,
}

/// The Earley parser with Leo's right recursion optimization.
pub struct LeoParser {
    grammar: Rc<Grammar>,
    debugger: OnceCell<Log<&'static str>>,
}

#[derive(Clone)]
pub(crate) enum PathStep {
    Letter(char),
    Completed(Item),
}

#[derive(Clone)]
pub(crate) struct ForestNode {
    name: Rc<str>,
    paths: Vec<Vec<PathStep>>,
}

/// A lazy enumerator of the distinct derivation trees of one parse.
///
/// Yields one tree per call until the forest is exhausted; derivations that recurse into the
/// same nonterminal over the same span are suppressed.
pub struct Trees {
    chart: Chart,
    root: ForestNode,
    choices: Choice,
}
