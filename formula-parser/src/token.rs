//! FILENAME: formula-parser/src/token.rs
//! PURPOSE: Typed tokens and the classifier that produces them.
//! CONTEXT: The tokenizer produces typed tokens directly; `classify` covers
//! lexeme lists built by hand. Trait sets replace a token type per kind.

use std::fmt;

use serde::Serialize;

use crate::error::{FormulaError, FormulaResult};
use crate::pattern::{PatternTable, Trait, TraitSet};

/// A lexeme together with its trait set. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Token {
    lexeme: String,
    traits: TraitSet,
}

impl Token {
    pub fn new(lexeme: impl Into<String>, traits: TraitSet) -> Self {
        Token {
            lexeme: lexeme.into(),
            traits,
        }
    }

    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    pub fn into_lexeme(self) -> String {
        self.lexeme
    }

    pub fn traits(&self) -> TraitSet {
        self.traits
    }

    pub fn has_trait(&self, t: Trait) -> bool {
        self.traits.contains(t)
    }

    pub fn is_operand(&self) -> bool {
        self.has_trait(Trait::Operand)
    }

    pub fn is_operator(&self) -> bool {
        self.has_trait(Trait::Operator)
    }

    pub fn is_number(&self) -> bool {
        self.has_trait(Trait::Number)
    }

    pub fn is_variable(&self) -> bool {
        self.has_trait(Trait::Variable)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lexeme)
    }
}

/// Attaches trait sets to a hand-built list of lexemes. The first
/// non-separator pattern matching the whole lexeme wins; follow constraints
/// are not consulted, so scanned input should go through `tokenize` instead.
pub fn classify<S: AsRef<str>>(table: &PatternTable, lexemes: &[S]) -> FormulaResult<Vec<Token>> {
    lexemes
        .iter()
        .map(|lexeme| classify_one(table, lexeme.as_ref()))
        .collect()
}

fn classify_one(table: &PatternTable, lexeme: &str) -> FormulaResult<Token> {
    table
        .iter()
        .filter(|pattern| !pattern.is_separator())
        .find(|pattern| pattern.matches_exactly(lexeme))
        .map(|pattern| Token::new(lexeme, pattern.traits()))
        .ok_or_else(|| FormulaError::Unclassified(lexeme.to_string()))
}
