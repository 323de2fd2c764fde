use super::{Chart, Column, Item, ItemKey};
use crate::{Alternative, Symbol};
use std::collections::{HashMap, HashSet};
use std::fmt::{Display, Formatter};
use std::rc::Rc;

impl Item {
    pub(crate) fn new(name: Rc<str>, alternative: Rc<Alternative>, dot: usize, start: usize) -> Item {
        Item {
            name,
            alternative,
            dot,
            start,
            end: start,
            transitive: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn name_rc(&self) -> &Rc<str> {
        &self.name
    }

    pub fn alternative(&self) -> &Rc<Alternative> {
        &self.alternative
    }

    pub fn dot(&self) -> usize {
        self.dot
    }

    /// Index of the column this item started in.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Index of the column this item is stored in.
    pub fn end(&self) -> usize {
        self.end
    }

    pub fn is_finished(&self) -> bool {
        self.dot >= self.alternative.len()
    }

    /// Whether this item is a memoized topmost completion of a right recursion chain.
    pub fn is_transitive(&self) -> bool {
        self.transitive
    }

    pub fn at_dot(&self) -> Option<&Symbol> {
        self.alternative.symbols().get(self.dot)
    }

    /// Whether the symbol at the dot is the given nonterminal.
    pub(crate) fn dot_is(&self, name: &str) -> bool {
        match self.at_dot() {
            Some(Symbol::NonTerminal(n)) => &**n == name,
            _ => false,
        }
    }

    pub(crate) fn advance(&self) -> Item {
        Item {
            name: self.name.clone(),
            alternative: self.alternative.clone(),
            dot: self.dot + 1,
            start: self.start,
            end: self.end,
            transitive: false,
        }
    }

    pub(crate) fn back(&self) -> Item {
        Item {
            name: self.name.clone(),
            alternative: self.alternative.clone(),
            dot: self.dot - 1,
            start: self.start,
            end: self.end,
            transitive: true,
        }
    }

    pub(crate) fn transitive_copy(&self) -> Item {
        let mut copy = self.clone();
        copy.transitive = true;
        copy
    }

    pub(crate) fn key(&self) -> ItemKey {
        (
            self.name.clone(),
            self.alternative.index(),
            self.dot,
            self.start,
        )
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}
impl Eq for Item {}

impl Display for Item {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ::=", self.name)?;
        for (index, symbol) in self.alternative.symbols().iter().enumerate() {
            if index == self.dot {
                write!(f, " .")?;
            }
            write!(f, " {}", symbol)?;
        }
        if self.is_finished() {
            write!(f, " .")?;
        }
        write!(f, " ({}, {})", self.start, self.end)
    }
}

impl Column {
    pub(crate) fn new(index: usize, letter: Option<char>) -> Column {
        Column {
            index,
            letter,
            items: Vec::new(),
            unique: HashSet::new(),
            transitives: HashMap::new(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// The input character whose consumption this column reflects. `None` for column zero.
    pub fn letter(&self) -> Option<char> {
        self.letter
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Add an item unless an equal one is already present. The end column of a stored item is
    /// always the column holding it.
    pub(crate) fn add(&mut self, mut item: Item) -> bool {
        item.end = self.index;
        if self.unique.insert(item.key()) {
            self.items.push(item);
            true
        } else {
            false
        }
    }

    pub(crate) fn add_transitive(&mut self, name: Rc<str>, item: Item) -> Item {
        let marked = item.transitive_copy();
        self.transitives.insert(name, marked.clone());
        marked
    }

    pub(crate) fn transitive(&self, name: &str) -> Option<&Item> {
        self.transitives.get(name)
    }

    pub fn transitive_count(&self) -> usize {
        self.transitives.len()
    }
}

impl Display for Column {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.letter {
            Some(c) => writeln!(f, "{} chart[{}]", c, self.index)?,
            None => writeln!(f, "chart[{}]", self.index)?,
        }
        for item in &self.items {
            writeln!(f, "{}", item)?;
        }
        Ok(())
    }
}

impl Chart {
    pub(crate) fn new(text: &str) -> Chart {
        let mut columns = vec![Column::new(0, None)];
        for (index, letter) in text.chars().enumerate() {
            columns.push(Column::new(index + 1, Some(letter)));
        }
        Chart {
            columns,
            postdots: HashMap::new(),
        }
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Number of items over all columns.
    pub fn state_count(&self) -> usize {
        self.columns.iter().map(|column| column.items.len()).sum()
    }
}
