//! Property-based tests for token classification
//!
//! Checks the classification cascade against generated tokens: integer-shaped
//! text, quoted strings and values rendered back into fields.

use lightcsv::parser::{ClassifierChain, tokenize};
use lightcsv::{CellValue, LightCsvReader, ReaderConfig};
use proptest::prelude::*;

/// Strategy for arbitrary text content, including quotes and separators
fn text_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 ]{0,20}",
        "[a-z]{0,5}\"[a-z]{0,5}\"[a-z]{0,5}",
        "[a-z]{0,5},[a-z]{0,5};[a-z]{0,5}",
        "[0-9]{1,4}(\\.[0-9]{1,3})?",
    ]
}

proptest! {
    #[test]
    fn prop_integer_text_classifies_as_integer(value in any::<i64>()) {
        let chain = ClassifierChain::new('"', true);
        prop_assert_eq!(chain.classify(1, &value.to_string()).unwrap(), CellValue::Integer(value));
    }

    #[test]
    fn prop_signed_digit_runs_never_fail(sign in "[+-]?", digits in "[0-9]{1,30}") {
        let chain = ClassifierChain::new('"', true);
        let value = chain.classify(1, &format!("{}{}", sign, digits)).unwrap();
        prop_assert!(matches!(value, CellValue::Integer(_) | CellValue::Float(_)));
    }

    #[test]
    fn prop_non_digit_text_never_classifies_as_integer(
        head in "[0-9]{0,8}",
        tail in "[0-9]{0,8}",
        other in "[^0-9+\\-\\s]",
    ) {
        let token = format!("{}{}{}", head, other, tail);
        let chain = ClassifierChain::new('"', false);
        let value = chain.classify(1, &token).unwrap();
        prop_assert!(
            !matches!(value, CellValue::Integer(_)),
            "{} classified as {:?}",
            token,
            value
        );
    }

    #[test]
    fn prop_quoted_string_round_trips(text in text_strategy()) {
        let chain = ClassifierChain::new('"', true);
        let field = CellValue::String(text.clone()).to_field('"');

        let tokens = tokenize(&field, ',', '"').unwrap();
        prop_assert_eq!(tokens.len(), 1);
        prop_assert_eq!(chain.classify(1, tokens[0]).unwrap(), CellValue::String(text));
    }

    #[test]
    fn prop_float_round_trips_through_field(value in -1.0e9f64..1.0e9f64) {
        let chain = ClassifierChain::new('"', true);
        let field = CellValue::Float(value).to_field('"');
        prop_assert_eq!(chain.classify(1, &field).unwrap(), CellValue::Float(value));
    }

    #[test]
    fn prop_row_arity_matches_column_count(values in prop::collection::vec(any::<i32>(), 1..12)) {
        let line: Vec<String> = values.iter().map(ToString::to_string).collect();
        let reader = LightCsvReader::new(ReaderConfig::default()).unwrap();
        let row = reader.read_str(&line.join(",")).next().unwrap().unwrap();

        prop_assert_eq!(row.len(), values.len());
        for (index, value) in values.iter().enumerate() {
            prop_assert_eq!(row.get(index), Some(&CellValue::Integer(i64::from(*value))));
        }
    }
}
