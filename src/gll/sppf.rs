//! Shared packed parse forest construction.
//!
//! Symbol and intermediate nodes are unique per (label, extent) within one parse; packed nodes
//! are unique per (slot, split index) within their parent. Node ids are indices into the
//! per-parse arena.

use super::{GllParser, Slot, Sppf, SppfLabel, SppfNode};
use crate::Symbol;
use std::collections::HashMap;

impl Sppf {
    pub(super) fn new() -> Sppf {
        Sppf {
            nodes: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn find_or_create(&mut self, label: SppfLabel, start: usize, end: usize) -> usize {
        if let Some(&id) = self.index.get(&(label.clone(), start, end)) {
            return id;
        }
        let id = self.nodes.len();
        self.nodes.push(SppfNode {
            label: label.clone(),
            start,
            end,
            children: Vec::new(),
        });
        self.index.insert((label, start, end), id);
        id
    }

    pub(super) fn find(&self, label: &SppfLabel, start: usize, end: usize) -> Option<usize> {
        self.index.get(&(label.clone(), start, end)).copied()
    }

    pub(super) fn dummy(&mut self) -> usize {
        self.find_or_create(SppfLabel::Dummy, 0, 0)
    }

    /// The unique leaf for a scanned terminal, or the ε leaf when no letter is consumed.
    pub(super) fn leaf(&mut self, letter: Option<char>, index: usize) -> usize {
        match letter {
            Some(c) => self.find_or_create(SppfLabel::Symbol(Symbol::Terminal(c)), index, index + 1),
            None => self.find_or_create(SppfLabel::Epsilon, index, index),
        }
    }

    /// Combine the node `left` recognized before the slot's dot with the newly recognized node
    /// `right` into the parent node of the slot.
    ///
    /// When the prefix before the dot is a single non nullable symbol and the rule is not yet
    /// complete, no parent is needed and `right` is returned unchanged. Otherwise the parent is
    /// the symbol node of the slot's nonterminal (complete rule) or the intermediate node of the
    /// slot (partial rule), and the concrete split is recorded as a packed child, deduplicated by
    /// (slot, split index).
    pub(super) fn combine(&mut self, parser: &GllParser, slot: Slot, left: usize, right: usize) -> usize {
        let alternative = &parser.alternatives[slot.nt][slot.alternative];
        let (prefix, suffix) = alternative.symbols().split_at(slot.dot);

        let single_non_nullable = prefix.len() == 1
            && match &prefix[0] {
                Symbol::Terminal(_) => true,
                Symbol::NonTerminal(name) => !parser.grammar.is_nullable(name),
            };
        if single_non_nullable && !suffix.is_empty() {
            return right;
        }

        let label = if suffix.is_empty() {
            SppfLabel::Symbol(Symbol::NonTerminal(parser.names[slot.nt].clone()))
        } else {
            SppfLabel::Intermediate(slot)
        };

        let split = self.nodes[right].start;
        let end = self.nodes[right].end;
        let (start, children) = if self.nodes[left].label == SppfLabel::Dummy {
            (split, vec![right])
        } else {
            (self.nodes[left].start, vec![left, right])
        };

        let parent = self.find_or_create(label, start, end);
        let recorded = self.nodes[parent]
            .children
            .iter()
            .any(|&packed| self.nodes[packed].label == SppfLabel::Packed(slot, split));
        if !recorded {
            let packed = self.nodes.len();
            self.nodes.push(SppfNode {
                label: SppfLabel::Packed(slot, split),
                start,
                end,
                children,
            });
            self.nodes[parent].children.push(packed);
        }
        parent
    }

    pub(super) fn node(&self, id: usize) -> &SppfNode {
        &self.nodes[id]
    }

    pub(super) fn len(&self) -> usize {
        self.nodes.len()
    }
}

impl SppfNode {
    pub(super) fn label(&self) -> &SppfLabel {
        &self.label
    }

    pub(super) fn end(&self) -> usize {
        self.end
    }

    pub(super) fn children(&self) -> &[usize] {
        &self.children
    }
}
