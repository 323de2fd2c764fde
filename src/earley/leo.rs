//! Leo's right recursion optimization.
//!
//! A finished item whose parent in its start column is unique and has the dot on the last
//! position sits on a deterministic reduction path. Instead of completing every link of such a
//! path into the current column, only the topmost item of the path is added; the topmost item of
//! each chain is memoized per column as a transitive item. The links skipped this way are
//! recorded in the chart's postdot map and re-materialized before forest walking.

use super::{parser, Chart, Item};
use std::collections::HashSet;
use std::rc::Rc;

/// Marker for a reduction path that loops through cyclic unit productions. Such a path never has
/// a topmost item, so the whole reduction is abandoned in favor of standard completion.
struct CyclicChain;

pub(super) fn leo_complete(chart: &mut Chart, i: usize, item: &Item) {
    match deterministic_reduction(chart, item) {
        Some(top) => {
            chart.columns[i].add(top.transitive_copy());
        }
        None => parser::complete(chart, i, item),
    }
}

fn deterministic_reduction(chart: &mut Chart, item: &Item) -> Option<Item> {
    let mut visited = HashSet::new();
    match chain_top(chart, item, &mut visited) {
        Ok(top) => top,
        Err(CyclicChain) => None,
    }
}

/// The topmost item of the deterministic reduction path above `item`, memoized on the column the
/// unique parent lives in.
fn chain_top(
    chart: &mut Chart,
    item: &Item,
    visited: &mut HashSet<(usize, Rc<str>)>,
) -> Result<Option<Item>, CyclicChain> {
    let Some(parent) = unique_postdot(chart, item) else {
        return Ok(None);
    };
    let name = parent.name_rc().clone();
    let column = parent.end();

    if let Some(memoized) = chart.columns[column].transitive(&name) {
        return Ok(Some(memoized.clone()));
    }
    if !visited.insert((column, name.clone())) {
        return Err(CyclicChain);
    }

    let advanced = parent.advance();
    let top = chain_top(chart, &advanced, visited)?.unwrap_or(advanced);
    Ok(Some(chart.columns[column].add_transitive(name, top)))
}

/// The unique item of `item`'s start column with the dot immediately before `item`'s nonterminal
/// and sitting on the last position of its alternative. Records the chain link for later
/// expansion.
fn unique_postdot(chart: &mut Chart, item: &Item) -> Option<Item> {
    let column = &chart.columns[item.start()];
    let mut parents = column
        .items()
        .iter()
        .filter(|state| !state.alternative().is_empty() && state.dot_is(item.name()));

    let first = parents.next()?.clone();
    if parents.next().is_some() {
        return None;
    }
    if first.dot() != first.alternative().len() - 1 {
        return None;
    }
    chart.postdots.insert(first.key(), item.clone());
    Some(first)
}

/// Re-materialize the completions suppressed below one transitive item: walk its chain of
/// recorded links and add each suppressed completion to the item's end column. Links whose
/// completion already sits in the column are deduplicated by the column itself. Invoked for
/// every transitive item visited during forest walking.
pub(super) fn expand_transitive(chart: &mut Chart, link: &Item, end: usize) {
    let Some(predecessor) = chart.postdots.get(&link.key()).cloned() else {
        return;
    };
    let mut completed = predecessor.clone();
    completed.transitive = false;
    chart.columns[end].add(completed);
    expand_transitive(chart, &predecessor.back(), end);
}
