use crate::{GrammarError, ParseError};
use std::fmt::{Display, Formatter};

impl GrammarError {
    pub fn new(what: String, message: String) -> Self {
        Self { message, what }
    }
}

impl Display for GrammarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "GrammarError: {}-{}", self.what, self.message)
    }
}

impl ParseError {
    pub fn is_syntax(&self) -> bool {
        match self {
            ParseError::Syntax(_, _) => true,
            ParseError::Budget(_) => false,
        }
    }

    pub fn is_budget(&self) -> bool {
        match self {
            ParseError::Syntax(_, _) => false,
            ParseError::Budget(_) => true,
        }
    }

    /// The input index of a syntax error.
    pub fn pointer(&self) -> Option<usize> {
        match self {
            ParseError::Syntax(pointer, _) => Some(*pointer),
            ParseError::Budget(_) => None,
        }
    }
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Syntax(_, message) => writeln!(f, "SyntaxError: {}", message),
            ParseError::Budget(steps) => {
                writeln!(f, "BudgetError: gave up after {} dispatch steps.", steps)
            }
        }
    }
}
