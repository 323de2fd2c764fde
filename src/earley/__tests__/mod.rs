use super::parser::chart_parse;
use super::{EarleyParser, LeoParser};
use crate::examples::{
    ambiguous_expr_grammar, cyclic_grammar, expr_grammar, left_recursive_grammar,
    right_recursive_grammar,
};
use crate::{Grammar, IParse, ParseTree};
use std::collections::BTreeSet;
use std::rc::Rc;

fn sample_grammar() -> Rc<Grammar> {
    Rc::new(
        Grammar::from_rules(vec![
            ("<start>", vec![vec!["<A>", "<B>"]]),
            ("<A>", vec![vec!["a", "<B>", "c"], vec!["a", "<A>"]]),
            ("<B>", vec![vec!["b", "<C>"], vec!["<D>"]]),
            ("<C>", vec![vec!["c"]]),
            ("<D>", vec![vec!["d"]]),
        ])
        .unwrap(),
    )
}

fn tree_set(trees: Vec<ParseTree>) -> BTreeSet<String> {
    trees.into_iter().map(|t| format!("{}", t)).collect()
}

#[test]
fn recognizes_sample_input() {
    let parser = EarleyParser::new(&sample_grammar());
    assert!(parser.recognize_on("adcd", "<start>").is_ok());
    assert!(parser.recognize_on("adc", "<start>").is_err());
    assert!(parser.recognize_on("abcd", "<start>").is_err());
}

#[test]
fn chart_invariants() {
    let grammar = sample_grammar();
    let chart = chart_parse(&grammar, false, None, "adcd", "<start>").unwrap();

    for column in chart.columns() {
        let mut keys = BTreeSet::new();
        for item in column.items() {
            assert_eq!(item.end(), column.index());
            assert!(item.start() <= column.index());
            assert!(item.dot() <= item.alternative().len());
            assert!(
                keys.insert((
                    item.name().to_string(),
                    item.alternative().index(),
                    item.dot(),
                    item.start()
                )),
                "duplicate item {} in column {}",
                item,
                column.index()
            );
        }
    }
}

#[test]
fn nullable_prediction() {
    let grammar = Rc::new(
        Grammar::from_rules(vec![
            ("<S>", vec![vec!["<A>", "<B>"]]),
            ("<A>", vec![vec!["a"], vec![]]),
            ("<B>", vec![vec!["b"]]),
        ])
        .unwrap(),
    );
    let parser = EarleyParser::new(&grammar);
    assert!(parser.recognize_on("b", "<S>").is_ok());
    assert!(parser.recognize_on("ab", "<S>").is_ok());
    assert!(parser.recognize_on("a", "<S>").is_err());
}

#[test]
fn empty_input_iff_nullable_start() {
    let nullable = left_recursive_grammar();
    assert!(EarleyParser::new(&nullable).recognize_on("", "<S>").is_ok());

    let strict = expr_grammar();
    assert!(EarleyParser::new(&strict).recognize_on("", "<start>").is_err());
}

#[test]
fn single_terminal_grammar() {
    let grammar = Rc::new(Grammar::from_rules(vec![("<S>", vec![vec!["x"]])]).unwrap());
    let parser = EarleyParser::new(&grammar);
    assert!(parser.recognize_on("x", "<S>").is_ok());
    assert!(parser.recognize_on("y", "<S>").is_err());
    assert!(parser.recognize_on("xx", "<S>").is_err());

    let trees: Vec<ParseTree> = parser.parse_on("x", "<S>").unwrap().collect();
    assert_eq!(trees.len(), 1);
    assert_eq!(trees[0].text(), "x");
}

#[test]
fn left_recursion_terminates() {
    let grammar = left_recursive_grammar();
    let parser = EarleyParser::new(&grammar);
    for accepted in ["", "a", "aa", "aaa"] {
        assert!(
            parser.recognize_on(accepted, "<S>").is_ok(),
            "should accept {:?}",
            accepted
        );
    }
    let err = parser.recognize_on("ab", "<S>").unwrap_err();
    assert_eq!(err.pointer(), Some(1));
}

#[test]
fn ambiguous_input_yields_both_associations() {
    let parser = EarleyParser::new(&ambiguous_expr_grammar());
    let trees: Vec<ParseTree> = parser.parse_on("1+2+4", "<start>").unwrap().collect();

    assert_eq!(trees.len(), 2, "1+2+4 associates in exactly two ways");
    for tree in &trees {
        assert_eq!(tree.text(), "1+2+4");
    }
    assert_ne!(trees[0], trees[1]);
}

#[test]
fn parse_trees_round_trip() {
    let grammar = ambiguous_expr_grammar();
    let parser = EarleyParser::new(&grammar);
    let trees: Vec<ParseTree> = parser.parse_on("1+2+4", "<start>").unwrap().collect();
    for tree in &trees {
        let reparsed: Vec<ParseTree> = parser.parse_on(&tree.text(), "<start>").unwrap().collect();
        assert!(
            reparsed.contains(tree),
            "reparsing {:?} should reproduce the tree",
            tree.text()
        );
    }
}

#[test]
fn unambiguous_input_yields_one_tree() {
    let parser = EarleyParser::new(&expr_grammar());
    let trees: Vec<ParseTree> = parser.parse_on("1+2*3", "<start>").unwrap().collect();
    assert_eq!(trees.len(), 1);

    let tree = &trees[0];
    assert_eq!(tree.text(), "1+2*3");
    // Addition binds last: the topmost <expr> splits as <term> + <expr>.
    let expr = tree.find_non_terminal("<expr>").unwrap();
    assert_eq!(expr.children.len(), 3);
    assert_eq!(expr.children[0].text(), "1");
    assert_eq!(expr.children[1].text(), "+");
    assert_eq!(expr.children[2].text(), "2*3");
}

#[test]
fn parse_prefix_reports_consumed_length() {
    let parser = EarleyParser::new(&expr_grammar());
    let (cursor, states) = parser.parse_prefix("1+2+x", "<start>").unwrap();
    assert_eq!(cursor, 3);
    assert!(states.iter().any(|s| s.is_finished()));

    let err = parser.recognize_on("1+2+x", "<start>").unwrap_err();
    assert_eq!(err.pointer(), Some(3));
}

#[test]
fn undefined_start_symbol() {
    let parser = EarleyParser::new(&expr_grammar());
    assert!(parser.recognize_on("1", "<nope>").is_err());
}

#[test]
fn extractor_is_idempotent_after_exhaustion() {
    let parser = EarleyParser::new(&ambiguous_expr_grammar());
    let mut trees = parser.parse_on("1+2", "<start>").unwrap();
    assert!(trees.extract_a_tree().is_some());
    assert!(trees.extract_a_tree().is_none());
    assert!(trees.extract_a_tree().is_none());
}

#[test]
fn cyclic_grammar_extraction_is_finite() {
    let parser = EarleyParser::new(&cyclic_grammar());
    let trees: Vec<ParseTree> = parser.parse_on("a", "<A>").unwrap().collect();

    let rendered = tree_set(trees);
    let expected: BTreeSet<String> =
        ["(<A> 'a')".to_string(), "(<A> (<B> (<A> 'a')))".to_string()].into();
    assert_eq!(rendered, expected);
}

#[test]
fn leo_accepts_and_rejects_like_the_baseline() {
    let grammar = right_recursive_grammar();
    let earley = EarleyParser::new(&grammar);
    let leo = LeoParser::new(&grammar);
    for input in ["a", "aa", "aaaaaaa", "", "b", "aab"] {
        assert_eq!(
            earley.recognize_on(input, "<A>").is_ok(),
            leo.recognize_on(input, "<A>").is_ok(),
            "engines disagree on {:?}",
            input
        );
    }
}

#[test]
fn leo_chart_stays_linear() {
    let grammar = right_recursive_grammar();
    let counts: Vec<usize> = [20usize, 40, 60]
        .iter()
        .map(|n| {
            let text = "a".repeat(*n);
            chart_parse(&grammar, true, None, &text, "<A>")
                .unwrap()
                .state_count()
        })
        .collect();
    assert_eq!(
        counts[1] - counts[0],
        counts[2] - counts[1],
        "item growth should be linear in the input length"
    );

    // The plain engine accumulates completions quadratically on the same input.
    let baseline = chart_parse(&grammar, false, None, &"a".repeat(60), "<A>")
        .unwrap()
        .state_count();
    assert!(counts[2] < baseline);
}

#[test]
fn leo_trees_match_the_baseline() {
    let cases: Vec<(Rc<Grammar>, &str, &str)> = vec![
        (right_recursive_grammar(), "aaaa", "<A>"),
        (expr_grammar(), "1+2*3", "<start>"),
        (expr_grammar(), "9-(2+3)", "<start>"),
        (ambiguous_expr_grammar(), "1+2+4", "<start>"),
        (left_recursive_grammar(), "aa", "<S>"),
        (cyclic_grammar(), "a", "<A>"),
    ];
    for (grammar, input, start) in cases {
        let earley: Vec<ParseTree> = EarleyParser::new(&grammar)
            .parse_on(input, start)
            .unwrap()
            .collect();
        let leo: Vec<ParseTree> = LeoParser::new(&grammar)
            .parse_on(input, start)
            .unwrap()
            .collect();
        assert_eq!(
            tree_set(earley),
            tree_set(leo),
            "tree sets differ on {:?}",
            input
        );
    }
}

#[test]
fn leo_right_recursion_single_tree() {
    let parser = LeoParser::new(&right_recursive_grammar());
    let text = "a".repeat(12);
    let trees: Vec<ParseTree> = parser.parse_on(&text, "<A>").unwrap().collect();
    assert_eq!(trees.len(), 1);
    assert_eq!(trees[0].text(), text);
}

#[test]
fn log_label_is_set_once() {
    let parser = EarleyParser::new(&expr_grammar());
    parser.set_log(crate::util::Log::Verbose("expr")).unwrap();
    assert!(parser.set_log(crate::util::Log::Default("expr")).is_err());

    // Parsing with a verbose label dumps the chart columns without changing the result.
    let trees: Vec<ParseTree> = parser.parse_on("1+2", "<start>").unwrap().collect();
    assert_eq!(trees.len(), 1);
}

#[test]
fn transitive_items_stay_unique_per_column() {
    let grammar = right_recursive_grammar();
    let chart = chart_parse(&grammar, true, None, "aaaaa", "<A>").unwrap();
    let mut found = 0;
    for column in chart.columns() {
        found += column.transitive_count();
        for item in column.items() {
            if item.is_transitive() {
                assert!(item.is_finished());
            }
        }
    }
    assert!(found > 0, "the right recursive chain should be memoized");
}
