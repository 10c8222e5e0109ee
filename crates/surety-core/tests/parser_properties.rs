use proptest::prelude::*;
use surety_core::{
    is_decline, parse_boolean, parse_float, parse_integer, Parser, StringChoiceParser,
    StringListParser,
};

fn padding() -> impl Strategy<Value = String> {
    "[ \t\n]{0,4}"
}

proptest! {
    #[test]
    fn integers_survive_surrounding_whitespace(n in any::<i64>(), left in padding(), right in padding()) {
        let input = format!("{left}{n}{right}");
        prop_assert_eq!(parse_integer(&input), Ok(n));
    }

    #[test]
    fn finite_floats_survive_surrounding_whitespace(x in -1.0e12f64..1.0e12, left in padding(), right in padding()) {
        let input = format!("{left}{x}{right}");
        prop_assert_eq!(parse_float(&input), Ok(x));
    }

    #[test]
    fn fractional_literals_are_not_integers(n in -10_000i64..10_000, frac in 0u8..10) {
        let input = format!("{n}.{frac}");
        prop_assert!(parse_integer(&input).is_err());
    }

    #[test]
    fn boolean_ignores_case(word in prop::sample::select(vec!["true", "yes", "false", "no"]), mask in any::<u8>()) {
        let mixed: String = word
            .chars()
            .enumerate()
            .map(|(i, c)| if mask >> (i % 8) & 1 == 1 { c.to_ascii_uppercase() } else { c })
            .collect();
        let expected = matches!(word, "true" | "yes");
        prop_assert_eq!(parse_boolean(&mixed), Ok(expected));
    }

    #[test]
    fn boolean_failure_keeps_original_text(input in "[a-z]{1,8}") {
        prop_assume!(!matches!(input.as_str(), "true" | "yes" | "false" | "no"));
        let err = parse_boolean(&input).unwrap_err();
        prop_assert_eq!(err.response(), input.as_str());
    }

    #[test]
    fn list_items_are_trimmed_and_non_empty(items in prop::collection::vec("[ a-z]{0,6}", 0..8)) {
        let input = items.join(",");
        let parser = StringListParser::new().allow_empty(true);
        let parsed = parser.parse(&input).unwrap();

        let expected: Vec<String> = items
            .iter()
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect();
        prop_assert_eq!(parsed, expected);
    }

    #[test]
    fn choice_accepts_only_exact_members(choice in "[a-z]{1,6}", probe in "[a-zA-Z]{1,6}") {
        let parser = StringChoiceParser::new([choice.clone()]);
        prop_assert_eq!(parser.parse(&format!(" {choice} ")), Ok(choice.clone()));
        prop_assert_eq!(parser.parse(&probe).is_ok(), probe == choice);
    }

    #[test]
    fn decline_detection_ignores_padding_quotes_and_case(left in padding(), right in padding(), upper in any::<bool>(), quote in prop::sample::select(vec!["", "'", "\""])) {
        let word = if upper { "DECLINED" } else { "declined" };
        let input = format!("{left}{quote}{word}{quote}{right}");
        prop_assert!(is_decline(&input));
    }
}
