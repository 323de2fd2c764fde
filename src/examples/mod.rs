//! Ready made grammar fixtures used in the documentation and the scenario tests.

mod arithmetic;
mod json;

#[cfg(test)]
mod __tests__;

pub use arithmetic::{ambiguous_expr_grammar, expr_grammar};
pub use json::json_grammar;

use crate::Grammar;
use std::rc::Rc;

/// `<S> ::= <A>` with the left recursive `<A> ::= <A> a | ε`.
pub fn left_recursive_grammar() -> Rc<Grammar> {
    Rc::new(
        Grammar::from_rules(vec![
            ("<S>", vec![vec!["<A>"]]),
            ("<A>", vec![vec!["<A>", "a"], vec![]]),
        ])
        .unwrap(),
    )
}

/// The right recursive `<A> ::= a <A> | a`.
pub fn right_recursive_grammar() -> Rc<Grammar> {
    Rc::new(
        Grammar::from_rules(vec![("<A>", vec![vec!["a", "<A>"], vec!["a"]])]).unwrap(),
    )
}

/// A cyclic pair of unit productions: `<A> ::= <B> | a` and `<B> ::= <A>`.
pub fn cyclic_grammar() -> Rc<Grammar> {
    Rc::new(
        Grammar::from_rules(vec![
            ("<A>", vec![vec!["<B>"], vec!["a"]]),
            ("<B>", vec![vec!["<A>"]]),
        ])
        .unwrap(),
    )
}
