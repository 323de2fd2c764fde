use super::{Gss, GssNode, Slot};
use std::collections::HashMap;

impl Gss {
    pub(super) fn new() -> Gss {
        Gss {
            nodes: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// The canonical node for the given (slot, input index) label, created on first use.
    pub(super) fn node(&mut self, label: (Option<Slot>, usize)) -> usize {
        if let Some(&id) = self.index.get(&label) {
            return id;
        }
        let id = self.nodes.len();
        self.nodes.push(GssNode {
            label,
            edges: Vec::new(),
            popped: Vec::new(),
        });
        self.index.insert(label, id);
        id
    }

    pub(super) fn return_slot(&self, id: usize) -> Option<Slot> {
        self.nodes[id].label.0
    }

    /// Add an edge to `child` labeled with the SPPF node `sppf` unless it already exists.
    pub(super) fn add_edge(&mut self, id: usize, child: usize, sppf: usize) -> bool {
        let node = &mut self.nodes[id];
        if node
            .edges
            .iter()
            .any(|&(c, label)| c == child && label == sppf)
        {
            return false;
        }
        node.edges.push((child, sppf));
        true
    }

    pub(super) fn edges(&self, id: usize) -> &[(usize, usize)] {
        &self.nodes[id].edges
    }

    /// Record an SPPF node produced by popping this stack node.
    pub(super) fn add_popped(&mut self, id: usize, sppf: usize) {
        self.nodes[id].popped.push(sppf);
    }

    pub(super) fn popped(&self, id: usize) -> &[usize] {
        &self.nodes[id].popped
    }

    pub(super) fn len(&self) -> usize {
        self.nodes.len()
    }
}
