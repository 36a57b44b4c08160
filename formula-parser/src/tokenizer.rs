//! FILENAME: formula-parser/src/tokenizer.rs
//! PURPOSE: Splits a raw formula string into lexemes.
//! CONTEXT: First stage of the pipeline. Each lexeme leaves the scan with the
//! trait set of the pattern that recognized it, so the builder sees exactly
//! the choice the scan made.
//!
//! PIPELINE: String --> trim --> Tokenizer --> Tokens (lexeme + traits of the winning pattern)
//!
//! At each scan position every pattern of the table is tried. The longest
//! valid match wins and ties go to the earlier pattern, so "100" is a single
//! NUMBER and "a1" a single VARIABLE. A position no pattern accepts fails the
//! whole split; partial results are never returned.

use crate::error::{FormulaError, FormulaResult};
use crate::pattern::{PatternTable, TokenPattern};
use crate::token::Token;

/// The character removed by `trim_string`.
pub const TRIM_CHAR: char = ' ';

/// Removes every space from `input`, not only the leading and trailing ones.
pub fn trim_string(input: &str) -> String {
    input.chars().filter(|&c| c != TRIM_CHAR).collect()
}

/// Scans a trimmed string one lexeme at a time.
pub struct Tokenizer<'t> {
    table: &'t PatternTable,
    input: String,
    position: usize,
}

impl<'t> Tokenizer<'t> {
    /// Creates a tokenizer over the trimmed form of `input`.
    pub fn new(table: &'t PatternTable, input: &str) -> Self {
        Tokenizer {
            table,
            input: trim_string(input),
            position: 0,
        }
    }

    /// The string actually being scanned.
    pub fn trimmed(&self) -> &str {
        &self.input
    }

    /// Returns the next token, carrying the traits of the pattern that won
    /// the scan at this position. `Ok(None)` at end of input.
    pub fn next_token(&mut self) -> FormulaResult<Option<Token>> {
        loop {
            let Some(rest) = self.input.get(self.position..).filter(|r| !r.is_empty()) else {
                return Ok(None);
            };

            let (pattern, len) = self.longest_match(rest).ok_or_else(|| {
                let offending = rest.chars().next().unwrap_or_default();
                FormulaError::syntax(format!(
                    "unrecognized character '{}' at position {}",
                    offending, self.position
                ))
            })?;

            let lexeme = &rest[..len];
            self.position += len;

            if pattern.is_separator() {
                continue;
            }

            log::trace!("lexeme '{}' matched {}", lexeme, pattern.id());
            return Ok(Some(Token::new(lexeme, pattern.traits())));
        }
    }

    /// Returns the next lexeme, `Ok(None)` at end of input.
    pub fn next_lexeme(&mut self) -> FormulaResult<Option<String>> {
        Ok(self.next_token()?.map(Token::into_lexeme))
    }

    fn longest_match(&self, rest: &str) -> Option<(&'t TokenPattern, usize)> {
        let mut best: Option<(&'t TokenPattern, usize)> = None;
        for pattern in self.table {
            if let Some(len) = pattern.match_at(rest) {
                if best.map_or(true, |(_, best_len)| len > best_len) {
                    best = Some((pattern, len));
                }
            }
        }
        best
    }
}

/// Splits `input` into lexemes using `table`.
///
/// - `None` fails with `FormulaError::NullParameter` (spell it `None::<&str>`).
/// - `""` yields an empty sequence.
/// - Non-empty input that yields no lexeme at all (e.g. `" "`) is a syntax error.
/// - Any position no pattern accepts is a syntax error.
pub fn split_string<'a>(
    table: &PatternTable,
    input: impl Into<Option<&'a str>>,
) -> FormulaResult<Vec<String>> {
    let tokens = tokenize(table, input)?;
    Ok(tokens.into_iter().map(Token::into_lexeme).collect())
}

/// Splits `input` into typed tokens. Each token keeps the traits of the
/// pattern the scan actually chose, follow constraints included.
pub fn tokenize<'a>(
    table: &PatternTable,
    input: impl Into<Option<&'a str>>,
) -> FormulaResult<Vec<Token>> {
    let input = input.into().ok_or(FormulaError::NullParameter("input"))?;

    let mut tokenizer = Tokenizer::new(table, input);
    let mut tokens = Vec::new();
    while let Some(token) = tokenizer.next_token()? {
        tokens.push(token);
    }

    if tokens.is_empty() && !input.is_empty() {
        return Err(FormulaError::syntax("expression contains only whitespace"));
    }

    log::debug!("split {} bytes into {} tokens", input.len(), tokens.len());
    Ok(tokens)
}
