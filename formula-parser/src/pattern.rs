//! FILENAME: formula-parser/src/pattern.rs
//! PURPOSE: The closed set of recognizable lexemes and the traits attached to them.
//! CONTEXT: Both the tokenizer and the classifier read the same table, so a
//! lexeme accepted while splitting is always classifiable afterwards.
//!
//! A table is an ordered list. Order is priority: when two patterns match the
//! same number of characters at a scan position, the earlier one wins.
//! Patterns with an empty trait set are separators (whitespace); they consume
//! input but never produce a lexeme.
//!
//! CONFIGURATION FORMAT (JSON):
//!   { "patterns": [
//!       { "id": "NUMBER", "pattern": "[0-9]+", "traits": ["OPERAND", "NUMBER"] },
//!       { "id": "DICE_OPERATOR", "pattern": "[dD]", "traits": ["OPERATOR", "DICE_OPERATOR"],
//!         "followed_by": "[0-9A-Za-z_(]" }
//!   ] }

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::PatternError;

// ============================================================================
// TRAITS
// ============================================================================

/// Semantic tag carried by a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Trait {
    Operand,
    Operator,
    Number,
    Variable,
    Plus,
    Minus,
    Multiplication,
    Division,
    Modulo,
    DiceOperator,
    OpenParenthesis,
    CloseParenthesis,
}

impl Trait {
    pub const ALL: [Trait; 12] = [
        Trait::Operand,
        Trait::Operator,
        Trait::Number,
        Trait::Variable,
        Trait::Plus,
        Trait::Minus,
        Trait::Multiplication,
        Trait::Division,
        Trait::Modulo,
        Trait::DiceOperator,
        Trait::OpenParenthesis,
        Trait::CloseParenthesis,
    ];

    const fn bit(self) -> u16 {
        1 << (self as u16)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Trait::Operand => "OPERAND",
            Trait::Operator => "OPERATOR",
            Trait::Number => "NUMBER",
            Trait::Variable => "VARIABLE",
            Trait::Plus => "PLUS",
            Trait::Minus => "MINUS",
            Trait::Multiplication => "MULTIPLICATION",
            Trait::Division => "DIVISION",
            Trait::Modulo => "MODULO",
            Trait::DiceOperator => "DICE_OPERATOR",
            Trait::OpenParenthesis => "OPEN_PARENTHESIS",
            Trait::CloseParenthesis => "CLOSE_PARENTHESIS",
        }
    }
}

impl fmt::Display for Trait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A small set of traits stored as a bitmask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Trait>", into = "Vec<Trait>")]
pub struct TraitSet(u16);

impl TraitSet {
    pub const fn empty() -> Self {
        TraitSet(0)
    }

    pub fn of(traits: &[Trait]) -> Self {
        traits.iter().fold(TraitSet::empty(), |set, t| set.with(*t))
    }

    pub const fn with(self, t: Trait) -> Self {
        TraitSet(self.0 | t.bit())
    }

    pub fn insert(&mut self, t: Trait) {
        self.0 |= t.bit();
    }

    pub const fn contains(self, t: Trait) -> bool {
        self.0 & t.bit() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterates in vocabulary order.
    pub fn iter(self) -> impl Iterator<Item = Trait> {
        Trait::ALL.into_iter().filter(move |t| self.contains(*t))
    }
}

impl From<Vec<Trait>> for TraitSet {
    fn from(traits: Vec<Trait>) -> Self {
        TraitSet::of(&traits)
    }
}

impl From<TraitSet> for Vec<Trait> {
    fn from(set: TraitSet) -> Self {
        set.iter().collect()
    }
}

impl FromIterator<Trait> for TraitSet {
    fn from_iter<I: IntoIterator<Item = Trait>>(iter: I) -> Self {
        iter.into_iter().fold(TraitSet::empty(), |set, t| set.with(t))
    }
}

impl fmt::Display for TraitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, t) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", t)?;
        }
        write!(f, "]")
    }
}

// ============================================================================
// PATTERN DEFINITIONS (configuration form)
// ============================================================================

/// Uncompiled form of one pattern, as it appears in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternDefinition {
    pub id: String,
    pub pattern: String,
    #[serde(default)]
    pub traits: TraitSet,
    /// Text that must immediately follow the lexeme for it to be accepted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followed_by: Option<String>,
}

impl PatternDefinition {
    pub fn new(id: &str, pattern: &str, traits: &[Trait]) -> Self {
        PatternDefinition {
            id: id.to_string(),
            pattern: pattern.to_string(),
            traits: TraitSet::of(traits),
            followed_by: None,
        }
    }

    pub fn followed_by(mut self, pattern: &str) -> Self {
        self.followed_by = Some(pattern.to_string());
        self
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct PatternConfig {
    patterns: Vec<PatternDefinition>,
}

// ============================================================================
// COMPILED PATTERNS
// ============================================================================

/// A compiled recognition rule.
#[derive(Debug, Clone)]
pub struct TokenPattern {
    definition: PatternDefinition,
    /// `^(?:pattern)`, used while scanning.
    prefix: Regex,
    /// `^(?:pattern)$`, used while classifying.
    exact: Regex,
    follow: Option<Regex>,
}

impl TokenPattern {
    fn compile(definition: PatternDefinition) -> Result<Self, PatternError> {
        let build = |source: String| {
            Regex::new(&source).map_err(|e| PatternError::InvalidRegex {
                id: definition.id.clone(),
                source: e,
            })
        };

        let prefix = build(format!("^(?:{})", definition.pattern))?;
        let exact = build(format!("^(?:{})$", definition.pattern))?;
        let follow = match &definition.followed_by {
            Some(p) => Some(build(format!("^(?:{})", p))?),
            None => None,
        };

        Ok(TokenPattern {
            definition,
            prefix,
            exact,
            follow,
        })
    }

    pub fn id(&self) -> &str {
        &self.definition.id
    }

    pub fn traits(&self) -> TraitSet {
        self.definition.traits
    }

    pub fn regex(&self) -> &Regex {
        &self.prefix
    }

    /// Separators consume input without producing a lexeme.
    pub fn is_separator(&self) -> bool {
        self.definition.traits.is_empty()
    }

    /// Length in bytes of the valid lexeme this pattern recognizes at the
    /// start of `rest`, if any. Empty matches never count.
    pub fn match_at(&self, rest: &str) -> Option<usize> {
        let len = self.prefix.find(rest)?.end();
        if len == 0 {
            return None;
        }
        match &self.follow {
            Some(follow) if !follow.is_match(&rest[len..]) => None,
            _ => Some(len),
        }
    }

    /// True when the whole of `lexeme` is one match of this pattern.
    pub fn matches_exactly(&self, lexeme: &str) -> bool {
        self.exact.is_match(lexeme)
    }
}

// ============================================================================
// PATTERN TABLE
// ============================================================================

static DEFAULT_TABLE: Lazy<PatternTable> = Lazy::new(|| {
    PatternTable::from_definitions(default_definitions())
        .expect("built-in token patterns must compile")
});

/// The built-in pattern definitions, in priority order.
pub fn default_definitions() -> Vec<PatternDefinition> {
    use Trait::*;

    vec![
        PatternDefinition::new("WHITESPACE", r"\s+", &[]),
        PatternDefinition::new("NUMBER", "[0-9]+", &[Operand, Number]),
        // 'd' is reserved for the dice operator, so identifiers cannot start with it
        PatternDefinition::new("VARIABLE", "[a-ce-zA-CE-Z_][a-zA-Z0-9_]*", &[Operand, Variable]),
        PatternDefinition::new("PLUS", r"\+", &[Operator, Plus]),
        PatternDefinition::new("MINUS", "-", &[Operator, Minus]),
        PatternDefinition::new("MULTIPLICATION", r"\*", &[Operator, Multiplication]),
        PatternDefinition::new("DIVISION", "/", &[Operator, Division]),
        PatternDefinition::new("MODULO", "%", &[Operator, Modulo]),
        PatternDefinition::new("DICE_OPERATOR", "[dD]", &[Operator, DiceOperator])
            .followed_by("[0-9A-Za-z_(]"),
        PatternDefinition::new("OPEN_PARENTHESIS", r"\(", &[OpenParenthesis]),
        PatternDefinition::new("CLOSE_PARENTHESIS", r"\)", &[CloseParenthesis]),
    ]
}

/// Ordered, immutable set of token patterns.
#[derive(Debug, Clone)]
pub struct PatternTable {
    patterns: Vec<TokenPattern>,
}

impl PatternTable {
    /// The shared built-in table. Compiled on first use.
    pub fn default_table() -> &'static PatternTable {
        &DEFAULT_TABLE
    }

    pub fn from_definitions(definitions: Vec<PatternDefinition>) -> Result<Self, PatternError> {
        if definitions.is_empty() {
            return Err(PatternError::EmptyTable);
        }

        let mut seen = HashSet::new();
        let mut patterns = Vec::with_capacity(definitions.len());
        for definition in definitions {
            if !seen.insert(definition.id.clone()) {
                return Err(PatternError::DuplicateId(definition.id));
            }
            patterns.push(TokenPattern::compile(definition)?);
        }

        log::debug!("compiled pattern table with {} patterns", patterns.len());
        Ok(PatternTable { patterns })
    }

    pub fn from_json_str(json: &str) -> Result<Self, PatternError> {
        let config: PatternConfig = serde_json::from_str(json)?;
        Self::from_definitions(config.patterns)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PatternError> {
        let path = path.as_ref();
        log::debug!("loading pattern table from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Serializes the table back into its configuration form.
    pub fn to_json_string(&self) -> Result<String, PatternError> {
        let config = PatternConfig {
            patterns: self.definitions(),
        };
        Ok(serde_json::to_string_pretty(&config)?)
    }

    pub fn definitions(&self) -> Vec<PatternDefinition> {
        self.patterns.iter().map(|p| p.definition.clone()).collect()
    }

    /// Pattern ids paired with their compiled rules, in priority order.
    pub fn to_map(&self) -> Vec<(&str, &Regex)> {
        self.patterns.iter().map(|p| (p.id(), p.regex())).collect()
    }

    pub fn get(&self, id: &str) -> Option<&TokenPattern> {
        self.patterns.iter().find(|p| p.id() == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TokenPattern> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Default for PatternTable {
    fn default() -> Self {
        DEFAULT_TABLE.clone()
    }
}

impl<'a> IntoIterator for &'a PatternTable {
    type Item = &'a TokenPattern;
    type IntoIter = std::slice::Iter<'a, TokenPattern>;

    fn into_iter(self) -> Self::IntoIter {
        self.patterns.iter()
    }
}
