use crate::Grammar;
use std::rc::Rc;

/// An unambiguous grammar for arithmetic expressions over single digit operands.
pub fn expr_grammar() -> Rc<Grammar> {
    Rc::new(
        Grammar::from_rules(vec![
            ("<start>", vec![vec!["<expr>"]]),
            (
                "<expr>",
                vec![
                    vec!["<term>", "+", "<expr>"],
                    vec!["<term>", "-", "<expr>"],
                    vec!["<term>"],
                ],
            ),
            (
                "<term>",
                vec![
                    vec!["<fact>", "*", "<term>"],
                    vec!["<fact>", "/", "<term>"],
                    vec!["<fact>"],
                ],
            ),
            ("<fact>", vec![vec!["<digits>"], vec!["(", "<expr>", ")"]]),
            ("<digits>", vec![vec!["<digit>", "<digits>"], vec!["<digit>"]]),
            (
                "<digit>",
                vec![
                    vec!["0"],
                    vec!["1"],
                    vec!["2"],
                    vec!["3"],
                    vec!["4"],
                    vec!["5"],
                    vec!["6"],
                    vec!["7"],
                    vec!["8"],
                    vec!["9"],
                ],
            ),
        ])
        .unwrap(),
    )
}

/// An ambiguous grammar for the same expression language, leaving operator association open.
pub fn ambiguous_expr_grammar() -> Rc<Grammar> {
    Rc::new(
        Grammar::from_rules(vec![
            ("<start>", vec![vec!["<expr>"]]),
            (
                "<expr>",
                vec![
                    vec!["<expr>", "+", "<expr>"],
                    vec!["<expr>", "-", "<expr>"],
                    vec!["<expr>", "*", "<expr>"],
                    vec!["<expr>", "/", "<expr>"],
                    vec!["(", "<expr>", ")"],
                    vec!["<integer>"],
                ],
            ),
            ("<integer>", vec![vec!["<digits>"]]),
            ("<digits>", vec![vec!["<digit>", "<digits>"], vec!["<digit>"]]),
            (
                "<digit>",
                vec![
                    vec!["0"],
                    vec!["1"],
                    vec!["2"],
                    vec!["3"],
                    vec!["4"],
                    vec!["5"],
                    vec!["6"],
                    vec!["7"],
                    vec!["8"],
                    vec!["9"],
                ],
            ),
        ])
        .unwrap(),
    )
}
