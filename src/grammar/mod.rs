//! Grammar intake and the analyses shared by both engines: symbol classification, the nullable
//! set, and the FIRST/FOLLOW sets.

use crate::{Alternative, Grammar, GrammarError, Symbol};
use once_cell::sync::Lazy;
use once_cell::unsync::OnceCell;
use regex::Regex;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt::{Display, Formatter};
use std::rc::Rc;


static NON_TERMINAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^<[^>]*>$").unwrap());

impl Symbol {
    /// Classify a raw token into a nonterminal or a single character terminal.
    pub fn classify(token: &str) -> Result<Symbol, GrammarError> {
        if NON_TERMINAL.is_match(token) {
            return Ok(Symbol::NonTerminal(Rc::from(token)));
        }
        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Symbol::Terminal(c)),
            (None, _) => Err(GrammarError::new(
                "terminal".to_string(),
                "The empty string is not allowed as a terminal symbol.".to_string(),
            )),
            _ => Err(GrammarError::new(
                token.to_string(),
                "A terminal symbol must consist of exactly one character.".to_string(),
            )),
        }
    }

    pub fn is_non_terminal(&self) -> bool {
        match self {
            Symbol::NonTerminal(_) => true,
            Symbol::Terminal(_) => false,
        }
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Symbol::NonTerminal(name) => write!(f, "{}", name),
            Symbol::Terminal(c) => write!(f, "{}", c),
        }
    }
}

impl Alternative {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }
}

impl Display for Alternative {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for symbol in &self.symbols {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{}", symbol)?;
            first = false;
        }
        Ok(())
    }
}

impl Grammar {
    /// Build a grammar from an ordered list of nonterminal definitions.
    ///
    /// Every definition maps a `<...>` name to its ordered alternatives, each an ordered list of
    /// symbols; an empty list is the ε alternative. Duplicate alternatives within one definition
    /// are redundant and dropped. Every nonterminal referenced in an alternative must be defined.
    pub fn from_rules(rules: Vec<(&str, Vec<Vec<&str>>)>) -> Result<Grammar, GrammarError> {
        let mut order: Vec<Rc<str>> = Vec::new();
        let mut definitions: HashMap<Rc<str>, Vec<Rc<Alternative>>> = HashMap::new();

        for (name, rule_set) in &rules {
            if !NON_TERMINAL.is_match(name) {
                return Err(GrammarError::new(
                    name.to_string(),
                    "A nonterminal name must be surrounded by angle brackets.".to_string(),
                ));
            }
            let key: Rc<str> = Rc::from(*name);
            if definitions.contains_key(&key) {
                return Err(GrammarError::new(
                    name.to_string(),
                    "The nonterminal is defined more than once.".to_string(),
                ));
            }
            if rule_set.is_empty() {
                return Err(GrammarError::new(
                    name.to_string(),
                    "A definition must contain at least one alternative.".to_string(),
                ));
            }

            let mut alternatives: Vec<Rc<Alternative>> = Vec::new();
            let mut unique: HashSet<&[&str]> = HashSet::new();
            for alternative in rule_set {
                if !unique.insert(alternative.as_slice()) {
                    continue;
                }
                let symbols = alternative
                    .iter()
                    .map(|token| Symbol::classify(token))
                    .collect::<Result<Vec<Symbol>, GrammarError>>()?;
                alternatives.push(Rc::new(Alternative {
                    index: alternatives.len(),
                    symbols,
                }));
            }
            order.push(key.clone());
            definitions.insert(key, alternatives);
        }

        let grammar = Grammar {
            order,
            definitions,
            nullable: OnceCell::new(),
            first_follow: OnceCell::new(),
        };
        grammar.validate()?;
        Ok(grammar)
    }

    fn validate(&self) -> Result<(), GrammarError> {
        for name in &self.order {
            for alternative in &self.definitions[name] {
                for symbol in &alternative.symbols {
                    if let Symbol::NonTerminal(reference) = symbol {
                        if !self.definitions.contains_key(reference) {
                            return Err(GrammarError::new(
                                reference.to_string(),
                                format!("The nonterminal is used in {} but never defined.", name),
                            ));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    pub fn alternatives(&self, name: &str) -> Option<&[Rc<Alternative>]> {
        self.definitions.get(name).map(|v| v.as_slice())
    }

    pub fn non_terminals(&self) -> impl Iterator<Item = &Rc<str>> {
        self.order.iter()
    }

    /// All terminal and nonterminal symbols occurring in alternative bodies.
    pub fn symbols(&self) -> (BTreeSet<char>, BTreeSet<Rc<str>>) {
        let mut terminals = BTreeSet::new();
        let mut non_terminals = BTreeSet::new();
        for name in &self.order {
            for alternative in &self.definitions[name] {
                for symbol in &alternative.symbols {
                    match symbol {
                        Symbol::Terminal(c) => {
                            terminals.insert(*c);
                        }
                        Symbol::NonTerminal(n) => {
                            non_terminals.insert(n.clone());
                        }
                    }
                }
            }
        }
        (terminals, non_terminals)
    }

    pub fn is_nullable(&self, name: &str) -> bool {
        self.nullable_set().contains(name)
    }

    /// The set of nonterminals which derive the empty string.
    pub fn nullable_set(&self) -> &HashSet<Rc<str>> {
        self.nullable.get_or_init(|| self.compute_nullable())
    }

    fn compute_nullable(&self) -> HashSet<Rc<str>> {
        let mut nullable: HashSet<Rc<str>> = self
            .order
            .iter()
            .filter(|name| self.definitions[*name].iter().any(|alt| alt.is_empty()))
            .cloned()
            .collect();
        let mut unprocessed: Vec<Rc<str>> = nullable.iter().cloned().collect();

        // Alternatives containing a terminal can never derive ε; drop them up front.
        let mut working: HashMap<Rc<str>, Vec<Vec<Rc<str>>>> = HashMap::new();
        for name in &self.order {
            let candidates: Vec<Vec<Rc<str>>> = self.definitions[name]
                .iter()
                .filter(|alt| alt.symbols.iter().all(Symbol::is_non_terminal))
                .map(|alt| {
                    alt.symbols
                        .iter()
                        .map(|symbol| match symbol {
                            Symbol::NonTerminal(n) => n.clone(),
                            Symbol::Terminal(_) => unreachable!(),
                        })
                        .collect()
                })
                .collect();
            if !candidates.is_empty() {
                working.insert(name.clone(), candidates);
            }
        }

        while let Some(next) = unprocessed.pop() {
            let mut reduced: HashMap<Rc<str>, Vec<Vec<Rc<str>>>> = HashMap::new();
            for (name, candidates) in &working {
                let mut kept: Vec<Vec<Rc<str>>> = Vec::new();
                let mut emptied = false;
                for candidate in candidates {
                    let remaining: Vec<Rc<str>> = candidate
                        .iter()
                        .filter(|token| **token != next)
                        .cloned()
                        .collect();
                    if remaining.is_empty() {
                        if nullable.insert(name.clone()) {
                            unprocessed.push(name.clone());
                        }
                        emptied = true;
                        break;
                    }
                    kept.push(remaining);
                }
                if !emptied && !kept.is_empty() {
                    reduced.insert(name.clone(), kept);
                }
            }
            working = reduced;
        }
        nullable
    }

    /// FIRST sets of all nonterminals over single character terminals.
    pub fn first_sets(&self) -> &HashMap<Rc<str>, BTreeSet<char>> {
        &self.first_follow().0
    }

    /// FOLLOW sets of all nonterminals over single character terminals.
    pub fn follow_sets(&self) -> &HashMap<Rc<str>, BTreeSet<char>> {
        &self.first_follow().1
    }

    fn first_follow(&self) -> &crate::FirstFollowSets {
        self.first_follow.get_or_init(|| self.compute_first_follow())
    }

    fn compute_first_follow(&self) -> crate::FirstFollowSets {
        let mut first: HashMap<Rc<str>, BTreeSet<char>> = self
            .order
            .iter()
            .map(|name| (name.clone(), BTreeSet::new()))
            .collect();
        let mut follow = first.clone();

        loop {
            let mut changed = false;
            for name in &self.order {
                for alternative in &self.definitions[name] {
                    for symbol in &alternative.symbols {
                        match symbol {
                            Symbol::Terminal(c) => {
                                changed |= first.get_mut(name).map_or(false, |s| s.insert(*c));
                                break;
                            }
                            Symbol::NonTerminal(n) => {
                                let sourced: Vec<char> = first[n].iter().cloned().collect();
                                if let Some(target) = first.get_mut(name) {
                                    for c in sourced {
                                        changed |= target.insert(c);
                                    }
                                }
                                if !self.is_nullable(n) {
                                    break;
                                }
                            }
                        }
                    }

                    let mut trailer: BTreeSet<char> = follow[name].clone();
                    for symbol in alternative.symbols.iter().rev() {
                        match symbol {
                            Symbol::NonTerminal(n) => {
                                if let Some(target) = follow.get_mut(n) {
                                    for c in &trailer {
                                        changed |= target.insert(*c);
                                    }
                                }
                                if self.is_nullable(n) {
                                    trailer.extend(first[n].iter().cloned());
                                } else {
                                    trailer = first[n].clone();
                                }
                            }
                            Symbol::Terminal(c) => {
                                trailer = BTreeSet::from([*c]);
                            }
                        }
                    }
                }
            }
            if !changed {
                return (first, follow);
            }
        }
    }
}

impl Display for Grammar {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for name in &self.order {
            write!(f, "{} ::=", name)?;
            for (index, alternative) in self.definitions[name].iter().enumerate() {
                if index > 0 {
                    write!(f, " |")?;
                }
                write!(f, " {}", alternative)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
