//! FILENAME: formula-parser/src/lib.rs
//! PURPOSE: Library root for the dice formula parser.
//! CONTEXT: Converts formula strings such as "3d6+1" or "(1+2)*(3+4)" into
//! expression trees. Evaluating those trees (rolling dice, doing arithmetic,
//! binding variables) is left to the caller.
//!
//! PIPELINE: String --> trim --> Tokenizer --> Tokens --> TreeBuilder --> ExpressionTree
//!
//! SUPPORTED FEATURES:
//! - Operands: numbers (100), variables (str, a1)
//!   Variables cannot start with 'd' or 'D', which always lex as the dice
//!   operator: "dex" is "d" followed by "ex" and does not parse.
//! - Binary operators: + - * / % and the dice operator d
//! - Unary sign: -5, +x
//! - Parentheses for grouping, up to builder::MAX_NESTING_DEPTH levels
//!   (unary signs count as a level)
//! - Custom pattern tables loaded from JSON

pub mod builder;
pub mod error;
pub mod pattern;
pub mod token;
pub mod tokenizer;
pub mod tree;


// Re-export commonly used types for convenience
pub use builder::{build_tree, parse_string, parse_with, TreeBuilder, MAX_NESTING_DEPTH};
pub use error::{FormulaError, FormulaResult, PatternError};
pub use pattern::{PatternDefinition, PatternTable, TokenPattern, Trait, TraitSet};
pub use token::{classify, Token};
pub use tokenizer::{split_string, tokenize, trim_string, Tokenizer};
pub use tree::{ExpressionTree, Node};
