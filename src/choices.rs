//! The choice trie driving tree extraction.
//!
//! Every ambiguity point met while walking a forest is recorded as one choice record holding the
//! candidate picked so far and the number of candidates. The records of one traversal form a
//! chain; advancing to the next tree increments the deepest record that still has candidates left
//! and drops the stale continuation below it.

use std::cell::RefCell;
use std::rc::Rc;

pub(crate) struct Choice(Rc<RefCell<ChoiceNode>>);

struct ChoiceNode {
    parent: Option<Choice>,
    chosen: usize,
    total: usize,
    next: Option<Choice>,
}

impl Clone for Choice {
    fn clone(&self) -> Self {
        Choice(self.0.clone())
    }
}

impl Choice {
    pub(crate) fn root() -> Choice {
        Choice::with(None, 1)
    }

    fn with(parent: Option<Choice>, total: usize) -> Choice {
        Choice(Rc::new(RefCell::new(ChoiceNode {
            parent,
            chosen: 0,
            total,
            next: None,
        })))
    }

    pub(crate) fn finished(&self) -> bool {
        let node = self.0.borrow();
        node.chosen >= node.total
    }

    fn chosen(&self) -> usize {
        self.0.borrow().chosen
    }

    /// Pick a candidate among `total` alternatives at the current traversal position.
    ///
    /// Reuses the recorded pick when the traversal has been here before; otherwise appends a
    /// fresh record. Returns the exhausted record instead when no candidate is left, so that the
    /// failure bubbles up to [increment](Choice::increment).
    pub(crate) fn step(&self, total: usize) -> Result<(usize, Choice), Choice> {
        let next = self.0.borrow().next.clone();
        let record = match next {
            Some(record) => {
                if record.finished() {
                    return Err(record);
                }
                record
            }
            None => {
                let record = Choice::with(Some(self.clone()), total);
                self.0.borrow_mut().next = Some(record.clone());
                record
            }
        };
        Ok((record.chosen(), record))
    }

    /// Advance to the next unexplored combination of candidates.
    pub(crate) fn increment(&self) {
        let mut current = self.clone();
        loop {
            let parent = {
                let mut node = current.0.borrow_mut();
                // as soon as we increment, the continuation below becomes invalid
                node.next = None;
                node.chosen += 1;
                if node.chosen < node.total {
                    return;
                }
                node.parent.clone()
            };
            match parent {
                Some(p) => current = p,
                None => return,
            }
        }
    }
}
