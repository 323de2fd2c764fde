use crate::earley::EarleyParser;
use crate::examples::json_grammar;
use crate::gll::compile_grammar;
use crate::{IParse, ParseTree};
use serde_json::Value as SerdeValue;

const INPUT: &str = r#"{"quiz":{"sport":["one",2,true],"maths":null},"ok":false}"#;

#[test]
fn earley_parses_nested_document() {
    let parser = EarleyParser::new(&json_grammar());
    let trees: Vec<ParseTree> = parser.parse_on(INPUT, "<json>").unwrap().collect();
    assert_eq!(trees.len(), 1, "the grammar is unambiguous");
    assert_eq!(trees[0].text(), INPUT);
    trees[0].print().unwrap();
}

#[test]
fn gll_parses_nested_document() {
    let parser = compile_grammar(&json_grammar());
    let trees: Vec<ParseTree> = parser.parse_on(INPUT, "<json>").unwrap().collect();
    assert_eq!(trees.len(), 1);
    assert_eq!(trees[0].text(), INPUT);
}

#[test]
fn accepted_documents_agree_with_serde() {
    let parser = EarleyParser::new(&json_grammar());
    let accepted = [
        INPUT,
        r#"[]"#,
        r#"{}"#,
        r#"[1,2,3]"#,
        r#"{"a":"b"}"#,
        r#"true"#,
        r#"42"#,
    ];
    for document in accepted {
        assert!(
            parser.recognize_on(document, "<json>").is_ok(),
            "grammar should accept {}",
            document
        );
        assert!(
            serde_json::from_str::<SerdeValue>(document).is_ok(),
            "serde should agree on {}",
            document
        );
    }
}

#[test]
fn rejected_documents_agree_with_serde() {
    let parser = EarleyParser::new(&json_grammar());
    for document in [r#"{"a":}"#, r#"[1,]"#, r#"{"#, r#"tru"#] {
        assert!(parser.recognize_on(document, "<json>").is_err());
        assert!(serde_json::from_str::<SerdeValue>(document).is_err());
    }
}
