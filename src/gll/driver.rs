use super::{Descriptor, Driver, GllParser, Gss, Label, Slot, Sppf, SppfLabel, Trees};
use crate::util::Log;
use crate::{Grammar, IParse, ParseError, ParseTree, Symbol};
use once_cell::unsync::OnceCell;
use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

impl Slot {
    pub(super) fn advanced(&self) -> Slot {
        Slot {
            nt: self.nt,
            alternative: self.alternative,
            dot: self.dot + 1,
        }
    }
}

impl GllParser {
    /// Compile the grammar into its slot table: interned nonterminal ids and the per
    /// nonterminal alternative vectors the dispatch loop indexes into.
    pub fn compile(grammar: &Rc<Grammar>) -> GllParser {
        let mut names: Vec<Rc<str>> = Vec::new();
        let mut ids: HashMap<Rc<str>, usize> = HashMap::new();
        let mut alternatives = Vec::new();
        for name in grammar.non_terminals() {
            ids.insert(name.clone(), names.len());
            names.push(name.clone());
            alternatives.push(grammar.alternatives(name).map(|a| a.to_vec()).unwrap_or_default());
        }
        GllParser {
            grammar: grammar.clone(),
            names,
            ids,
            alternatives,
            step_limit: None,
            debugger: OnceCell::new(),
        }
    }

    /// Bound the number of dispatch steps of every parse; exhausting the budget surfaces
    /// [ParseError::Budget].
    pub fn with_step_limit(mut self, limit: usize) -> Self {
        self.step_limit = Some(limit);
        self
    }

    /// Set a log label to debug the dispatch loop based on the level of [Log](crate::util::Log).
    pub fn set_log(&self, debugger: Log<&'static str>) -> Result<(), String> {
        self.debugger
            .set(debugger)
            .map_err(|_| "Debug label is already set for the parser.".to_string())
    }

    /// Parse the input and return the lazy derivation tree enumerator.
    pub fn parse_on(&self, text: &str, start_symbol: &str) -> Result<Trees, ParseError> {
        let mut driver = Driver::new(self, text);
        match driver.run(start_symbol)? {
            Some(root) => Ok(Trees::new(driver.into_sppf(), root)),
            None => Err(driver.syntax_error(text)),
        }
    }
}

impl IParse for GllParser {
    fn recognize_on(&self, text: &str, start_symbol: &str) -> Result<(), ParseError> {
        let mut driver = Driver::new(self, text);
        match driver.run(start_symbol)? {
            Some(_) => Ok(()),
            None => Err(driver.syntax_error(text)),
        }
    }

    fn parse_on(
        &self,
        text: &str,
        start_symbol: &str,
    ) -> Result<Box<dyn Iterator<Item = ParseTree>>, ParseError> {
        Ok(Box::new(self.parse_on(text, start_symbol)?))
    }
}

impl<'p> Driver<'p> {
    pub(super) fn new(parser: &'p GllParser, text: &str) -> Driver<'p> {
        let input: Vec<char> = text.chars().collect();
        let mut gss = Gss::new();
        let mut sppf = Sppf::new();
        let bottom = gss.node((None, 0));
        let dummy = sppf.dummy();
        let seen = (0..=input.len()).map(|_| HashSet::new()).collect();
        Driver {
            parser,
            input,
            gss,
            sppf,
            threads: VecDeque::new(),
            seen,
            bottom,
            dummy,
            high_water: 0,
            steps: 0,
        }
    }

    /// Run the dispatch loop to its fixed point. Returns the root SPPF node covering the whole
    /// input if the parse succeeded.
    pub(super) fn run(&mut self, start_symbol: &str) -> Result<Option<usize>, ParseError> {
        let Some(&start) = self.parser.ids.get(start_symbol) else {
            return Err(ParseError::Syntax(
                0,
                format!("The start symbol {} is not defined.", start_symbol),
            ));
        };

        let mut label = Label::Enter(start);
        let mut stack = self.bottom;
        let mut index = 0usize;
        let mut node = self.dummy;

        loop {
            if let Some(limit) = self.parser.step_limit {
                if self.steps >= limit {
                    return Err(ParseError::Budget(self.steps));
                }
            }
            self.steps += 1;

            match label {
                Label::Fetch => match self.threads.pop_front() {
                    Some(descriptor) => {
                        label = Label::At(descriptor.slot);
                        stack = descriptor.stack;
                        index = descriptor.index;
                        node = descriptor.sppf;
                    }
                    None => {
                        #[cfg(debug_assertions)]
                        if let Some(log) = self.parser.debugger.get() {
                            if log.order() >= Log::Result(()).order() {
                                println!(
                                    "[{}; Driver]: {} steps, {} gss nodes, {} sppf nodes",
                                    log,
                                    self.steps,
                                    self.gss.len(),
                                    self.sppf.len()
                                );
                            }
                        }
                        return Ok(self.root(start));
                    }
                },
                Label::Pop => {
                    self.pop(stack, index, node);
                    label = Label::Fetch;
                }
                Label::Enter(nt) => {
                    for alternative in 0..self.parser.alternatives[nt].len() {
                        let slot = Slot {
                            nt,
                            alternative,
                            dot: 0,
                        };
                        self.add_thread(slot, stack, index, self.dummy);
                    }
                    label = Label::Fetch;
                }
                Label::At(slot) => {
                    let alternative = self.parser.alternatives[slot.nt][slot.alternative].clone();
                    let symbols = alternative.symbols();
                    if symbols.is_empty() {
                        // ε alternative: scan the ε leaf and fall through to the return.
                        let right = self.sppf.leaf(None, index);
                        node = self.sppf.combine(self.parser, slot, node, right);
                        label = Label::Pop;
                    } else if slot.dot >= symbols.len() {
                        label = Label::Pop;
                    } else {
                        match &symbols[slot.dot] {
                            Symbol::Terminal(letter) => {
                                if index < self.input.len() && self.input[index] == *letter {
                                    let right = self.sppf.leaf(Some(*letter), index);
                                    index += 1;
                                    if index > self.high_water {
                                        self.high_water = index;
                                    }
                                    let next = slot.advanced();
                                    node = self.sppf.combine(self.parser, next, node, right);
                                    label = Label::At(next);
                                } else {
                                    label = Label::Fetch;
                                }
                            }
                            Symbol::NonTerminal(name) => {
                                let next = slot.advanced();
                                stack = self.register_return(next, stack, index, node);
                                match self.parser.ids.get(name) {
                                    Some(&id) => label = Label::Enter(id),
                                    None => label = Label::Fetch,
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    /// Queue a descriptor unless an equal one was already queued at this input index.
    fn add_thread(&mut self, slot: Slot, stack: usize, index: usize, sppf: usize) {
        if self.seen[index].insert((slot, stack, sppf)) {
            self.threads.push_back(Descriptor {
                slot,
                stack,
                index,
                sppf,
            });
        }
    }

    /// Record a return position before descending into a nonterminal. Replays every result
    /// already popped from the canonical node over the new edge.
    fn register_return(&mut self, ret: Slot, stack: usize, index: usize, left: usize) -> usize {
        let v = self.gss.node((Some(ret), index));
        if self.gss.add_edge(v, stack, left) {
            let popped: Vec<usize> = self.gss.popped(v).to_vec();
            for z in popped {
                let combined = self.sppf.combine(self.parser, ret, left, z);
                let right_extent = self.sppf.node(z).end();
                self.add_thread(ret, stack, right_extent, combined);
            }
        }
        v
    }

    /// Return the result `sppf` to every recorded parent of the stack node.
    fn pop(&mut self, stack: usize, index: usize, sppf: usize) {
        if stack == self.bottom {
            return;
        }
        let Some(slot) = self.gss.return_slot(stack) else {
            return;
        };
        self.gss.add_popped(stack, sppf);
        let edges: Vec<(usize, usize)> = self.gss.edges(stack).to_vec();
        for (child, left) in edges {
            let combined = self.sppf.combine(self.parser, slot, left, sppf);
            self.add_thread(slot, child, index, combined);
        }
    }

    fn root(&self, start: usize) -> Option<usize> {
        let label = SppfLabel::Symbol(Symbol::NonTerminal(self.parser.names[start].clone()));
        self.sppf.find(&label, 0, self.input.len())
    }

    pub(super) fn syntax_error(&self, text: &str) -> ParseError {
        let suffix: String = text.chars().skip(self.high_water).collect();
        let message = if suffix.is_empty() {
            format!("Unexpected end of input at index {}.", self.high_water)
        } else {
            format!("Unexpected {:?} at index {}.", suffix, self.high_water)
        };
        ParseError::Syntax(self.high_water, message)
    }

    pub(super) fn into_sppf(self) -> Sppf {
        self.sppf
    }

    #[cfg(test)]
    pub(super) fn sppf(&self) -> &Sppf {
        &self.sppf
    }

    #[cfg(test)]
    pub(super) fn gss(&self) -> &Gss {
        &self.gss
    }
}
