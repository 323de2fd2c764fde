use super::{leo, Chart, EarleyParser, Item, LeoParser, Trees};
use crate::util::Log;
use crate::{Grammar, IParse, ParseError, ParseTree, Symbol};
use once_cell::unsync::OnceCell;
use std::rc::Rc;

impl EarleyParser {
    pub fn new(grammar: &Rc<Grammar>) -> Self {
        Self {
            grammar: grammar.clone(),
            debugger: OnceCell::new(),
        }
    }

    /// Set a log label to debug the chart filling based on the level of [Log](crate::util::Log).
    pub fn set_log(&self, debugger: Log<&'static str>) -> Result<(), String> {
        self.debugger
            .set(debugger)
            .map_err(|_| "Debug label is already set for the parser.".to_string())
    }

    /// Parse the longest prefix of the input derivable from the start symbol.
    ///
    /// Returns the number of consumed characters together with the start items reaching that
    /// point (finished or not).
    pub fn parse_prefix(
        &self,
        text: &str,
        start_symbol: &str,
    ) -> Result<(usize, Vec<Item>), ParseError> {
        let chart = chart_parse(&self.grammar, false, self.debugger.get(), text, start_symbol)?;
        Ok(prefix_states(&chart, start_symbol))
    }

    /// Parse the input and return the lazy derivation tree enumerator.
    pub fn parse_on(&self, text: &str, start_symbol: &str) -> Result<Trees, ParseError> {
        let (starts, chart) = recognize(&self.grammar, false, self.debugger.get(), text, start_symbol)?;
        Ok(Trees::build(chart, starts))
    }
}

impl IParse for EarleyParser {
    fn recognize_on(&self, text: &str, start_symbol: &str) -> Result<(), ParseError> {
        recognize(&self.grammar, false, self.debugger.get(), text, start_symbol).map(|_| ())
    }

    fn parse_on(
        &self,
        text: &str,
        start_symbol: &str,
    ) -> Result<Box<dyn Iterator<Item = ParseTree>>, ParseError> {
        Ok(Box::new(self.parse_on(text, start_symbol)?))
    }
}

impl LeoParser {
    pub fn new(grammar: &Rc<Grammar>) -> Self {
        Self {
            grammar: grammar.clone(),
            debugger: OnceCell::new(),
        }
    }

    /// Set a log label to debug the chart filling based on the level of [Log](crate::util::Log).
    pub fn set_log(&self, debugger: Log<&'static str>) -> Result<(), String> {
        self.debugger
            .set(debugger)
            .map_err(|_| "Debug label is already set for the parser.".to_string())
    }

    /// Parse the longest prefix of the input derivable from the start symbol.
    pub fn parse_prefix(
        &self,
        text: &str,
        start_symbol: &str,
    ) -> Result<(usize, Vec<Item>), ParseError> {
        let chart = chart_parse(&self.grammar, true, self.debugger.get(), text, start_symbol)?;
        Ok(prefix_states(&chart, start_symbol))
    }

    /// Parse the input and return the lazy derivation tree enumerator.
    pub fn parse_on(&self, text: &str, start_symbol: &str) -> Result<Trees, ParseError> {
        let (starts, chart) = recognize(&self.grammar, true, self.debugger.get(), text, start_symbol)?;
        Ok(Trees::build(chart, starts))
    }
}

impl IParse for LeoParser {
    fn recognize_on(&self, text: &str, start_symbol: &str) -> Result<(), ParseError> {
        recognize(&self.grammar, true, self.debugger.get(), text, start_symbol).map(|_| ())
    }

    fn parse_on(
        &self,
        text: &str,
        start_symbol: &str,
    ) -> Result<Box<dyn Iterator<Item = ParseTree>>, ParseError> {
        Ok(Box::new(self.parse_on(text, start_symbol)?))
    }
}

/// Build and fill the chart for the given input.
pub(super) fn chart_parse(
    grammar: &Grammar,
    leo: bool,
    debugger: Option<&Log<&'static str>>,
    text: &str,
    start_symbol: &str,
) -> Result<Chart, ParseError> {
    let alternatives = grammar.alternatives(start_symbol).ok_or_else(|| {
        ParseError::Syntax(
            0,
            format!("The start symbol {} is not defined.", start_symbol),
        )
    })?;

    let mut chart = Chart::new(text);
    let name: Rc<str> = Rc::from(start_symbol);
    for alternative in alternatives {
        chart.columns[0].add(Item::new(name.clone(), alternative.clone(), 0, 0));
    }
    fill_chart(grammar, leo, &mut chart, debugger);
    Ok(chart)
}

fn fill_chart(grammar: &Grammar, leo: bool, chart: &mut Chart, debugger: Option<&Log<&'static str>>) {
    for i in 0..chart.columns.len() {
        let mut j = 0;
        while j < chart.columns[i].items.len() {
            let item = chart.columns[i].items[j].clone();
            if item.is_finished() {
                if leo {
                    leo::leo_complete(chart, i, &item);
                } else {
                    complete(chart, i, &item);
                }
            } else {
                match item.at_dot().cloned() {
                    Some(Symbol::NonTerminal(name)) => predict(grammar, chart, i, &name, &item),
                    Some(Symbol::Terminal(letter)) => {
                        if i + 1 < chart.columns.len() {
                            scan(chart, i + 1, &item, letter);
                        }
                    }
                    None => {}
                }
            }
            j += 1;
        }

        #[cfg(debug_assertions)]
        if let Some(log) = debugger {
            if log.order() >= Log::Verbose(()).order() {
                println!("[{}; Chart]:\n{}", log, chart.columns[i]);
            }
        }
        #[cfg(not(debug_assertions))]
        let _ = &debugger;
    }
}

fn predict(grammar: &Grammar, chart: &mut Chart, i: usize, name: &Rc<str>, item: &Item) {
    if let Some(alternatives) = grammar.alternatives(name) {
        for alternative in alternatives {
            chart.columns[i].add(Item::new(name.clone(), alternative.clone(), 0, i));
        }
    }
    if grammar.is_nullable(name) {
        chart.columns[i].add(item.advance());
    }
}

fn scan(chart: &mut Chart, to: usize, item: &Item, letter: char) {
    if chart.columns[to].letter == Some(letter) {
        chart.columns[to].add(item.advance());
    }
}

pub(super) fn complete(chart: &mut Chart, i: usize, item: &Item) {
    let parents: Vec<Item> = chart.columns[item.start]
        .items
        .iter()
        .filter(|state| state.dot_is(item.name()))
        .cloned()
        .collect();
    for parent in parents {
        chart.columns[i].add(parent.advance());
    }
}

/// The latest column holding a start item, together with those items.
fn prefix_states(chart: &Chart, start_symbol: &str) -> (usize, Vec<Item>) {
    for column in chart.columns.iter().rev() {
        let states: Vec<Item> = column
            .items
            .iter()
            .filter(|state| state.name() == start_symbol && state.start() == 0)
            .cloned()
            .collect();
        if !states.is_empty() {
            return (column.index, states);
        }
    }
    (0, Vec::new())
}

fn recognize(
    grammar: &Grammar,
    leo: bool,
    debugger: Option<&Log<&'static str>>,
    text: &str,
    start_symbol: &str,
) -> Result<(Vec<Item>, Chart), ParseError> {
    let chart = chart_parse(grammar, leo, debugger, text, start_symbol)?;
    let (cursor, states) = prefix_states(&chart, start_symbol);
    let starts: Vec<Item> = states.into_iter().filter(Item::is_finished).collect();

    let length = chart.columns.len() - 1;
    if cursor < length || starts.is_empty() {
        let suffix: String = text.chars().skip(cursor).collect();
        let message = if suffix.is_empty() {
            format!("Unexpected end of input at index {}.", cursor)
        } else {
            format!("Unexpected {:?} at index {}.", suffix, cursor)
        };
        return Err(ParseError::Syntax(cursor, message));
    }
    Ok((starts, chart))
}
