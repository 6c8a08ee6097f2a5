use proptest::prelude::*;

use circuit_proof::analysis::{equivalent, simplify};
use circuit_proof::parser::parse_formula;
use circuit_proof::symbol::SymbolTable;

const NAMES: [&str; 5] = ["A", "B", "C", "Y1", "Y2"];

fn symbols() -> SymbolTable {
    NAMES.into_iter().collect()
}

/// Formula text in the input grammar, with irregular spacing.
fn arb_formula() -> impl Strategy<Value = String> {
    let leaf = prop::sample::select(NAMES.to_vec()).prop_map(str::to_string);
    leaf.prop_recursive(4, 32, 3, |inner| {
        prop_oneof![
            inner.clone().prop_map(|x| format!("Not({})", x)),
            prop::collection::vec(inner.clone(), 2..4).prop_map(|xs| format!("And({})", xs.join(","))),
            prop::collection::vec(inner, 2..4).prop_map(|xs| format!("Or( {} )", xs.join(" , "))),
        ]
    })
}

proptest! {
    #[test]
    fn prop_parse_round_trip(text in arb_formula()) {
        let symbols = symbols();
        let parsed = parse_formula(&text, &symbols).unwrap();
        let reparsed = parse_formula(&parsed.to_string(), &symbols).unwrap();
        prop_assert_eq!(&parsed, &reparsed);
        prop_assert_eq!(parsed.to_string(), reparsed.to_string());
    }

    #[test]
    fn prop_simplified_is_equivalent(text in arb_formula()) {
        let e = parse_formula(&text, &symbols()).unwrap();
        let simplified = simplify(&e).unwrap();
        prop_assert!(equivalent(&e, &simplified).unwrap());
        prop_assert_eq!(simplify(&e).unwrap(), simplified);
    }
}
