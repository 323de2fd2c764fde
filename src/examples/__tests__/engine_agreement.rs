use crate::earley::{EarleyParser, LeoParser};
use crate::examples::{
    ambiguous_expr_grammar, expr_grammar, json_grammar, left_recursive_grammar,
    right_recursive_grammar,
};
use crate::gll::compile_grammar;
use crate::{Grammar, IParse, ParseTree};
use std::collections::BTreeSet;
use std::rc::Rc;

fn engines(grammar: &Rc<Grammar>) -> Vec<(&'static str, Box<dyn IParse>)> {
    vec![
        ("earley", Box::new(EarleyParser::new(grammar))),
        ("leo", Box::new(LeoParser::new(grammar))),
        ("gll", Box::new(compile_grammar(grammar))),
    ]
}

#[test]
fn recognition_agrees_across_engines() {
    let cases: Vec<(Rc<Grammar>, &str, Vec<&str>)> = vec![
        (
            expr_grammar(),
            "<start>",
            vec!["1", "1+2*3", "(1+2)*3", "9-(2+3)", "", "1+", "x", "1++2"],
        ),
        (
            ambiguous_expr_grammar(),
            "<start>",
            vec!["1+2+4", "1*2+3", "(1)", "1+", ")("],
        ),
        (
            left_recursive_grammar(),
            "<S>",
            vec!["", "a", "aa", "aaa", "ab", "b"],
        ),
        (
            right_recursive_grammar(),
            "<A>",
            vec!["a", "aa", "aaaa", "", "ba", "ab"],
        ),
        (
            json_grammar(),
            "<json>",
            vec![r#"{"a":[1,2]}"#, r#"[]"#, r#"{"#, r#"[1,]"#],
        ),
    ];

    for (grammar, start, inputs) in cases {
        let engines = engines(&grammar);
        for input in inputs {
            let verdicts: Vec<bool> = engines
                .iter()
                .map(|(_, parser)| parser.recognize_on(input, start).is_ok())
                .collect();
            assert!(
                verdicts.iter().all(|v| *v == verdicts[0]),
                "engines disagree on {:?}: {:?}",
                input,
                engines
                    .iter()
                    .map(|(name, _)| *name)
                    .zip(verdicts.iter())
                    .collect::<Vec<_>>()
            );
        }
    }
}

#[test]
fn tree_sets_agree_on_acyclic_grammars() {
    let cases: Vec<(Rc<Grammar>, &str, &str)> = vec![
        (expr_grammar(), "<start>", "1+2*3"),
        (expr_grammar(), "<start>", "(1+2)*3"),
        (ambiguous_expr_grammar(), "<start>", "1+2+4"),
        (ambiguous_expr_grammar(), "<start>", "1+2*4+5"),
        (left_recursive_grammar(), "<S>", "aaa"),
        (right_recursive_grammar(), "<A>", "aaaa"),
    ];

    for (grammar, start, input) in cases {
        let mut rendered: Vec<BTreeSet<String>> = Vec::new();
        for (_, parser) in engines(&grammar) {
            let trees: Vec<ParseTree> = parser.parse_on(input, start).unwrap().collect();
            for tree in &trees {
                assert_eq!(tree.text(), input);
            }
            rendered.push(trees.into_iter().map(|t| format!("{}", t)).collect());
        }
        assert_eq!(rendered[0], rendered[1], "leo differs on {:?}", input);
        assert_eq!(rendered[0], rendered[2], "gll differs on {:?}", input);
    }
}
