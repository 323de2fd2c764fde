use crate::{ParseTree, Symbol};
use ptree::TreeItem;
use std::fmt::{Debug, Display, Formatter};

impl ParseTree {
    /// Create a new derivation tree node.
    pub fn branch(symbol: Symbol, children: Vec<ParseTree>) -> Self {
        Self { symbol, children }
    }

    /// Create a terminal leaf node.
    pub fn leaf(letter: char) -> Self {
        ParseTree::branch(Symbol::Terminal(letter), Vec::with_capacity(0))
    }

    /// Collapse the tree back into the string it derives by concatenating the terminal leaves
    /// left to right.
    pub fn text(&self) -> String {
        let mut expanded = String::new();
        let mut to_expand: Vec<&ParseTree> = vec![self];
        while let Some(tree) = to_expand.pop() {
            match &tree.symbol {
                Symbol::Terminal(c) => expanded.push(*c),
                Symbol::NonTerminal(_) => {
                    for child in tree.children.iter().rev() {
                        to_expand.push(child);
                    }
                }
            }
        }
        expanded
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        &self.symbol == symbol || self.children.iter().any(|child| child.contains(symbol))
    }

    /// Search through all nested children and return the first matching node.
    pub fn find_tree<TF: Fn(&ParseTree) -> bool>(&self, p: &TF) -> Option<&ParseTree> {
        if p(self) {
            Some(self)
        } else {
            self.children.iter().find_map(|child| child.find_tree(p))
        }
    }

    /// Find a nested subtree derived from the given nonterminal.
    pub fn find_non_terminal(&self, name: &str) -> Option<&ParseTree> {
        self.find_tree(&|tree| match &tree.symbol {
            Symbol::NonTerminal(n) => &**n == name,
            Symbol::Terminal(_) => false,
        })
    }
}

impl Display for ParseTree {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.symbol {
            Symbol::Terminal(c) => write!(f, "{:?}", c),
            Symbol::NonTerminal(name) => {
                write!(f, "({}", name)?;
                for child in &self.children {
                    write!(f, " {}", child)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl Debug for ParseTree {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl TreeItem for ParseTree {
    type Child = Self;

    fn write_self<W: std::io::Write>(&self, f: &mut W, _: &ptree::Style) -> std::io::Result<()> {
        match &self.symbol {
            Symbol::NonTerminal(name) => write!(f, "{}", name),
            Symbol::Terminal(c) => write!(f, "{:?}", c),
        }
    }

    fn children(&self) -> std::borrow::Cow<[Self::Child]> {
        std::borrow::Cow::from(&self.children)
    }
}

impl ParseTree {
    pub fn print(&self) -> Result<(), std::io::Error> {
        ptree::print_tree(self)
    }
}
