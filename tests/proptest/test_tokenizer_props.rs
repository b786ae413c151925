//! Property-based tests for the tokenizer and command splitter

use std::collections::HashMap;

use mosaicsh::expansion::ExpansionContext;
use mosaicsh::parser::tokenizer::words;
use mosaicsh::parser::{parse_command, split_commands, tokenize};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_tokenize_doesnt_panic(s in "\\PC{0,80}") {
        let env = HashMap::new();
        let ctx = ExpansionContext::new(&env, 0);
        let _ = tokenize(&s, &ctx);
        let _ = parse_command(&s, &ctx);
    }

    #[test]
    fn test_split_doesnt_panic(s in "[a-z ;|&'\"\\\\=$]{0,60}") {
        let _ = split_commands(&s);
    }

    #[test]
    fn test_plain_words_round_trip(list in prop::collection::vec("[a-zA-Z0-9_.,/-]{1,8}", 1..8)) {
        let env = HashMap::new();
        let ctx = ExpansionContext::new(&env, 0);
        let line = list.join("  ");
        prop_assert_eq!(words(&tokenize(&line, &ctx)), list);
    }

    #[test]
    fn test_single_quotes_preserve_content(s in "[^']{0,30}") {
        let env = HashMap::new();
        let ctx = ExpansionContext::new(&env, 0);
        let line = format!("'{}'", s);
        prop_assert_eq!(words(&tokenize(&line, &ctx)), vec![s]);
    }

    #[test]
    fn test_status_parameter(status in 0i32..256) {
        let env = HashMap::new();
        let ctx = ExpansionContext::new(&env, status);
        prop_assert_eq!(words(&tokenize("$?", &ctx)), vec![status.to_string()]);
    }
}
