use super::{Sppf, SppfLabel, Trees};
use crate::choices::Choice;
use crate::{ParseTree, Symbol};
use std::collections::HashSet;

/// What one forest node contributes to the tree under construction: a labeled subtree for symbol
/// nodes, a spliced child list for packed, intermediate and ε nodes.
type Extracted = (Option<Symbol>, Vec<ParseTree>);

impl Trees {
    pub(super) fn new(sppf: Sppf, root: usize) -> Trees {
        Trees {
            sppf,
            root,
            choices: Choice::root(),
        }
    }

    /// Extract the next distinct derivation tree, or `None` when the forest is exhausted.
    pub fn extract_a_tree(&mut self) -> Option<ParseTree> {
        while !self.choices.finished() {
            let mut seen = HashSet::new();
            let (extracted, last) = self.extract_node(self.root, &mut seen, self.choices.clone());
            last.increment();
            if let Some((Some(symbol), children)) = extracted {
                return Some(ParseTree::branch(symbol, children));
            }
        }
        None
    }

    /// Walk one SPPF node along the currently chosen packed children. Fails upward when the walk
    /// revisits a node already on the stack or when the choice record is exhausted.
    fn extract_node(
        &self,
        id: usize,
        seen: &mut HashSet<usize>,
        choices: Choice,
    ) -> (Option<Extracted>, Choice) {
        let node = self.sppf.node(id);
        match node.label() {
            SppfLabel::Dummy | SppfLabel::Epsilon => (Some((None, Vec::new())), choices),

            SppfLabel::Packed(_, _) => {
                let mut current = choices;
                let mut spliced = Vec::new();
                for &child in node.children() {
                    let (extracted, advanced) = self.extract_node(child, seen, current);
                    match extracted {
                        None => return (None, advanced),
                        Some((symbol, mut children)) => {
                            current = advanced;
                            match symbol {
                                Some(symbol) => spliced.push(ParseTree::branch(symbol, children)),
                                None => spliced.append(&mut children),
                            }
                        }
                    }
                }
                (Some((None, spliced)), current)
            }

            SppfLabel::Intermediate(_) => {
                if node.children().is_empty() {
                    return (Some((None, Vec::new())), choices);
                }
                match self.descend(node.children(), seen, choices) {
                    (Some((_, children)), advanced) => (Some((None, children)), advanced),
                    failed => failed,
                }
            }

            SppfLabel::Symbol(symbol) => {
                if node.children().is_empty() {
                    return (Some((Some(symbol.clone()), Vec::new())), choices);
                }
                match self.descend(node.children(), seen, choices) {
                    (Some((_, children)), advanced) => {
                        (Some((Some(symbol.clone()), children)), advanced)
                    }
                    failed => failed,
                }
            }
        }
    }

    /// Choose one packed child and extract it, guarding against direct recursion.
    fn descend(
        &self,
        children: &[usize],
        seen: &mut HashSet<usize>,
        choices: Choice,
    ) -> (Option<Extracted>, Choice) {
        let (pick, next) = match choices.step(children.len()) {
            Ok(stepped) => stepped,
            Err(stale) => return (None, stale),
        };
        let child = children[pick];
        if seen.contains(&child) {
            return (None, next);
        }
        seen.insert(child);
        let result = self.extract_node(child, seen, next);
        seen.remove(&child);
        result
    }
}

impl Iterator for Trees {
    type Item = ParseTree;

    fn next(&mut self) -> Option<ParseTree> {
        self.extract_a_tree()
    }
}
