use proptest::prelude::*;
use serde_json::{json, Value};
use tmplit::{compile, render, Store};

// Literal text heavy in the characters that delimit or escape a template literal.
fn literal_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 `\\\\$\\{\\}.,!\n]*".prop_filter("text must not open an expression", |text| {
        !text.contains("${")
    })
}

// Strategy for generating arbitrary JSON leaves.
fn leaf_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(|n| json!(n)),
        "[a-zA-Z0-9 `\\\\]*".prop_map(Value::String),
    ]
}

proptest! {
    #[test]
    fn test_literal_text_renders_verbatim(text in literal_strategy()) {
        let template = compile(&text, &[]).unwrap();

        prop_assert_eq!(template.render(&Store::new()).unwrap(), text.clone());
        let ends_with_closer = template.source_text().ends_with("`;\n}");
        prop_assert!(ends_with_closer);
    }

    #[test]
    fn test_literal_text_around_expression(
        before in literal_strategy(),
        after in literal_strategy(),
        value in "[a-zA-Z0-9 `\\\\]*",
    ) {
        let text = format!("{before}${{value}}{after}");
        let store = Store::new().with_must("value", &value);

        // An odd run of backslashes escapes the marker and loses one backslash.
        let run = before.chars().rev().take_while(|c| *c == '\\').count();
        let expect = if run % 2 == 1 {
            format!("{}${{value}}{after}", &before[..before.len() - 1])
        } else {
            format!("{before}{value}{after}")
        };

        prop_assert_eq!(render(&text, &store).unwrap(), expect);
    }

    #[test]
    fn test_render_is_idempotent(leaf in leaf_strategy()) {
        let template = compile("[${value}]", &["value"]).unwrap();
        let store = Store::new().with_must("value", leaf);

        let first = template.render(&store).unwrap();
        let second = template.render(&store.clone()).unwrap();
        prop_assert_eq!(first, second);
    }
}
