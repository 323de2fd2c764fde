//! Parse forest recovery from the filled chart.
//!
//! An alternative spanning `[from, till]` is unified with the input right to left: a terminal
//! consumes one position when the column letter matches, a nonterminal branches over every
//! finished item of that name ending in the column. Each branch fixes the start of the remaining
//! prefix, which is resolved recursively. A forest node is the bundle of all such paths for one
//! nonterminal; ambiguity shows up as multiple paths and cyclic derivations as paths leading
//! back to an already visited span.

use super::{Chart, ForestNode, Item, PathStep};
use crate::Symbol;

impl Chart {
    /// The merged forest node of the completed start items. All items carry the same name.
    pub(super) fn start_forest(&self, starts: &[Item]) -> ForestNode {
        let mut paths = Vec::new();
        for state in starts {
            paths.extend(self.item_paths(state));
        }
        ForestNode {
            name: starts[0].name_rc().clone(),
            paths,
        }
    }

    pub(super) fn item_forest(&self, item: &Item) -> ForestNode {
        ForestNode {
            name: item.name_rc().clone(),
            paths: self.item_paths(item),
        }
    }

    fn item_paths(&self, item: &Item) -> Vec<Vec<PathStep>> {
        if item.alternative().is_empty() {
            return Vec::new();
        }
        self.parse_paths(item.alternative().symbols(), item.start(), item.end())
    }

    fn parse_paths(&self, expr: &[Symbol], from: usize, till: usize) -> Vec<Vec<PathStep>> {
        let Some((last, prefix)) = expr.split_last() else {
            return Vec::new();
        };

        let starts: Vec<(PathStep, usize)> = match last {
            Symbol::Terminal(letter) => {
                if till > 0 && self.columns[till].letter() == Some(*letter) {
                    vec![(PathStep::Letter(*letter), till - 1)]
                } else {
                    Vec::new()
                }
            }
            Symbol::NonTerminal(name) => self.columns[till]
                .items()
                .iter()
                .filter(|state| state.is_finished() && state.name() == &**name)
                .map(|state| (PathStep::Completed(state.clone()), state.start()))
                .collect(),
        };

        let mut paths = Vec::new();
        for (step, start) in starts {
            if prefix.is_empty() {
                if start == from {
                    paths.push(vec![step]);
                }
            } else {
                for mut path in self.parse_paths(prefix, from, start) {
                    path.push(step.clone());
                    paths.push(path);
                }
            }
        }
        paths
    }
}
