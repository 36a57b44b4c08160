//! FILENAME: tests/common/mod.rs
//! Shared helpers for the formula parser integration tests.

#![allow(dead_code)]

use formula_parser::{parse_string, split_string, ExpressionTree, FormulaError, PatternTable};

/// Parses with the built-in table and panics on failure.
pub fn parse(input: &str) -> ExpressionTree {
    parse_string(input).unwrap_or_else(|e| panic!("'{}' should parse: {}", input, e))
}

/// Prefix rendering of the tree, e.g. "(+ 1 (* 2 3))".
pub fn shape(input: &str) -> String {
    parse(input).to_string()
}

pub fn lexemes(input: &str) -> Vec<String> {
    split_string(PatternTable::default_table(), input)
        .unwrap_or_else(|e| panic!("'{}' should split: {}", input, e))
}

pub fn assert_syntax_error(input: &str) {
    match parse_string(input) {
        Err(FormulaError::Syntax(_)) => {}
        other => panic!("'{}' should be a syntax error, got {:?}", input, other),
    }
}

/// A JSON pattern table where multiplication is spelled 'x' and dice 'w'.
pub const ALTERNATE_TABLE_JSON: &str = r#"{
    "patterns": [
        { "id": "SPACE", "pattern": "\\s+" },
        { "id": "NUMBER", "pattern": "[0-9]+", "traits": ["OPERAND", "NUMBER"] },
        { "id": "PLUS", "pattern": "\\+", "traits": ["OPERATOR", "PLUS"] },
        { "id": "MINUS", "pattern": "-", "traits": ["OPERATOR", "MINUS"] },
        { "id": "TIMES", "pattern": "x", "traits": ["OPERATOR", "MULTIPLICATION"] },
        { "id": "DICE", "pattern": "w", "traits": ["OPERATOR", "DICE_OPERATOR"], "followed_by": "[0-9(]" },
        { "id": "OPEN", "pattern": "\\(", "traits": ["OPEN_PARENTHESIS"] },
        { "id": "CLOSE", "pattern": "\\)", "traits": ["CLOSE_PARENTHESIS"] }
    ]
}"#;
