//! The generalized LL (GLL) parsing engine.
//!
//! A [GllParser] is compiled once per grammar by [compile_grammar]: every position inside an
//! alternative becomes a [Slot], and parsing runs as a dispatch loop over slot labels. Instead of
//! the call stack of recursive descent, return positions live in a graph structured stack (GSS)
//! shared by all pending parse attempts, and pending attempts themselves are descriptors in a
//! FIFO queue, deduplicated per input position. Every derivation discovered on the way is
//! recorded in a shared packed parse forest (SPPF) from which the distinct derivation trees are
//! enumerated afterwards.
//!
//! The loop is linear for LL(1) grammars and cubic in the worst case, and handles left
//! recursion, right recursion and ambiguity without any grammar rewriting.

mod driver;
mod extract;
mod gss;
mod sppf;


use crate::choices::Choice;
use crate::util::Log;
use crate::{Alternative, Grammar, Symbol};
use once_cell::unsync::OnceCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

/// A grammar slot: the position `dot` inside one alternative of a nonterminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Slot {
    nt: usize,
    alternative: usize,
    dot: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Label {
    /// Pick the next descriptor from the queue.
    Fetch,
    /// Return to the recorded parents of the current stack node.
    Pop,
    /// Spawn one descriptor per alternative of a nonterminal.
    Enter(usize),
    /// Continue inside an alternative.
    At(Slot),
}

/// A parser compiled from a [Grammar], driving the GLL dispatch loop.
pub struct GllParser {
    grammar: Rc<Grammar>,
    names: Vec<Rc<str>>,
    ids: HashMap<Rc<str>, usize>,
    alternatives: Vec<Vec<Rc<Alternative>>>,
    step_limit: Option<usize>,
    debugger: OnceCell<Log<&'static str>>,
}

/// Compile the grammar into its dedicated [GllParser].
pub fn compile_grammar(grammar: &Rc<Grammar>) -> GllParser {
    GllParser::compile(grammar)
}

pub(crate) struct GssNode {
    label: (Option<Slot>, usize),
    edges: Vec<(usize, usize)>,
    popped: Vec<usize>,
}

/// The graph structured stack: return positions keyed by (slot, input index), edges labeled with
/// SPPF nodes.
pub(crate) struct Gss {
    nodes: Vec<GssNode>,
    index: HashMap<(Option<Slot>, usize), usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum SppfLabel {
    /// Absence of a left sibling.
    Dummy,
    /// An ε leaf.
    Epsilon,
    /// A terminal leaf or a completed nonterminal.
    Symbol(Symbol),
    /// A partially recognized alternative.
    Intermediate(Slot),
    /// One concrete split of the parent's span.
    Packed(Slot, usize),
}

pub(crate) struct SppfNode {
    label: SppfLabel,
    start: usize,
    end: usize,
    children: Vec<usize>,
}

/// The shared packed parse forest of one parse, stored as an arena indexed by node id.
pub(crate) struct Sppf {
    nodes: Vec<SppfNode>,
    index: HashMap<(SppfLabel, usize, usize), usize>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Descriptor {
    slot: Slot,
    stack: usize,
    index: usize,
    sppf: usize,
}

/// One parse in flight: the driver owns the input, the GSS, the SPPF and the descriptor queue.
pub(crate) struct Driver<'p> {
    parser: &'p GllParser,
    input: Vec<char>,
    gss: Gss,
    sppf: Sppf,
    threads: VecDeque<Descriptor>,
    seen: Vec<HashSet<(Slot, usize, usize)>>,
    bottom: usize,
    dummy: usize,
    high_water: usize,
    steps: usize,
}

/// A lazy enumerator of the distinct derivation trees recorded in the SPPF.
///
/// Yields one tree per call until the forest is exhausted; derivations that recurse through a
/// forest node already on the walk are suppressed.
pub struct Trees {
    sppf: Sppf,
    root: usize,
    choices: Choice,
}
