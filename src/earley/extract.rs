use super::{leo, Chart, ForestNode, Item, PathStep, Trees};
use crate::choices::Choice;
use crate::{ParseTree, Symbol};
use std::collections::HashSet;
use std::rc::Rc;

type SpanKey = (Rc<str>, usize, usize);

impl Trees {
    pub(super) fn build(mut chart: Chart, starts: Vec<Item>) -> Trees {
        for state in &starts {
            if state.is_transitive() {
                leo::expand_transitive(&mut chart, &state.back(), state.end());
            }
        }
        let root = chart.start_forest(&starts);
        Trees {
            chart,
            root,
            choices: Choice::root(),
        }
    }

    /// Extract the next distinct derivation tree, or `None` when the forest is exhausted.
    pub fn extract_a_tree(&mut self) -> Option<ParseTree> {
        while !self.choices.finished() {
            let root = self.root.clone();
            let mut seen = HashSet::new();
            let (tree, last) = self.extract_node(&root, &mut seen, self.choices.clone());
            last.increment();
            if tree.is_some() {
                return tree;
            }
        }
        None
    }

    /// The forest node of a completed item, re-materializing the completions a transitive item
    /// suppressed before its paths are read.
    fn forest_of(&mut self, item: &Item) -> ForestNode {
        if item.is_transitive() {
            leo::expand_transitive(&mut self.chart, &item.back(), item.end());
        }
        self.chart.item_forest(item)
    }

    /// Walk one forest node along the currently chosen path. Fails upward when the chosen path
    /// revisits a span already on the walk or when the choice record is exhausted.
    fn extract_node(
        &mut self,
        node: &ForestNode,
        seen: &mut HashSet<SpanKey>,
        choices: Choice,
    ) -> (Option<ParseTree>, Choice) {
        if node.paths.is_empty() {
            let tree = ParseTree::branch(Symbol::NonTerminal(node.name.clone()), Vec::new());
            return (Some(tree), choices);
        }

        let (pick, mut current) = match choices.step(node.paths.len()) {
            Ok(stepped) => stepped,
            Err(stale) => return (None, stale),
        };

        let mut children = Vec::new();
        for step in &node.paths[pick] {
            match step {
                PathStep::Letter(letter) => children.push(ParseTree::leaf(*letter)),
                PathStep::Completed(item) => {
                    let span: SpanKey = (item.name_rc().clone(), item.start(), item.end());
                    if seen.contains(&span) {
                        return (None, current);
                    }
                    let forest = self.forest_of(item);
                    seen.insert(span.clone());
                    let (tree, advanced) = self.extract_node(&forest, seen, current);
                    seen.remove(&span);
                    match tree {
                        None => return (None, advanced),
                        Some(tree) => {
                            children.push(tree);
                            current = advanced;
                        }
                    }
                }
            }
        }
        let tree = ParseTree::branch(Symbol::NonTerminal(node.name.clone()), children);
        (Some(tree), current)
    }
}

impl Iterator for Trees {
    type Item = ParseTree;

    fn next(&mut self) -> Option<ParseTree> {
        self.extract_a_tree()
    }
}
