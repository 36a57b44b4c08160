//! FILENAME: formula-parser/src/builder.rs
//! PURPOSE: Recursive descent builder that turns classified tokens into an ExpressionTree.
//! CONTEXT: Last stage of the pipeline. Operators are recognized by their
//! traits, never by their lexeme, so a custom pattern table can spell them
//! differently.
//!
//! GRAMMAR:
//!   expression     --> additive
//!   additive       --> multiplicative ( ("+" | "-") multiplicative )*
//!   multiplicative --> unary ( ("*" | "/" | "%") unary )*
//!   unary          --> ("+" | "-") unary | dice
//!   dice           --> primary ( "d" primary )*
//!   primary        --> OPERAND | "(" expression? ")"
//!
//! Parentheses and unary signs recurse; past MAX_NESTING_DEPTH levels the
//! builder fails with a syntax error instead of exhausting the stack.
//! Binary chains are folded in a loop and have no length limit.
//!
//! Every level yields `Option<Node>`: an empty group "()" produces no node.
//! That is only acceptable when the whole expression is empty; an operator
//! next to an empty group is a syntax error.

use crate::error::{FormulaError, FormulaResult};
use crate::pattern::{PatternTable, Trait};
use crate::token::Token;
use crate::tokenizer::tokenize;
use crate::tree::{ExpressionTree, Node};

const ADDITIVE: &[Trait] = &[Trait::Plus, Trait::Minus];
const MULTIPLICATIVE: &[Trait] = &[Trait::Multiplication, Trait::Division, Trait::Modulo];
const DICE: &[Trait] = &[Trait::DiceOperator];
const SIGN: &[Trait] = &[Trait::Plus, Trait::Minus];

/// Deepest combined nesting of parenthesis groups and unary signs accepted.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Holds the token slice and the cursor into it.
pub struct TreeBuilder<'a> {
    tokens: &'a [Token],
    position: usize,
    nesting: usize,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        TreeBuilder {
            tokens,
            position: 0,
            nesting: 0,
        }
    }

    /// Builds the tree for the whole token slice.
    pub fn build(&mut self) -> FormulaResult<ExpressionTree> {
        let root = self.parse_expression()?;

        // Ensure we consumed all tokens
        if let Some(token) = self.current() {
            return Err(FormulaError::syntax(format!(
                "unexpected '{}' at token {}",
                token, self.position
            )));
        }

        Ok(ExpressionTree::new(root))
    }

    fn current(&self) -> Option<&'a Token> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.current();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn enter_nested(&mut self) -> FormulaResult<()> {
        self.nesting += 1;
        if self.nesting > MAX_NESTING_DEPTH {
            return Err(FormulaError::syntax("expression nested too deeply"));
        }
        Ok(())
    }

    fn leave_nested(&mut self) {
        self.nesting -= 1;
    }

    /// Returns the current token if it is an operator carrying one of `traits`.
    fn current_operator(&self, traits: &[Trait]) -> Option<&'a Token> {
        self.current()
            .filter(|t| t.is_operator() && traits.iter().any(|tr| t.has_trait(*tr)))
    }

    fn parse_expression(&mut self) -> FormulaResult<Option<Node>> {
        self.parse_additive()
    }

    fn parse_additive(&mut self) -> FormulaResult<Option<Node>> {
        let left = self.parse_multiplicative()?;
        self.parse_left_assoc(left, ADDITIVE, Self::parse_multiplicative)
    }

    fn parse_multiplicative(&mut self) -> FormulaResult<Option<Node>> {
        let left = self.parse_unary()?;
        self.parse_left_assoc(left, MULTIPLICATIVE, Self::parse_unary)
    }

    /// Parses prefix signs. The operand binds tighter than any binary operator
    /// except dice, so "-2*3" is (-2)*3 while "-2d6" is -(2d6).
    fn parse_unary(&mut self) -> FormulaResult<Option<Node>> {
        if let Some(op) = self.current_operator(SIGN) {
            self.enter_nested()?;
            self.advance();
            let operand = self.parse_unary()?;
            self.leave_nested();
            let operand = Self::require_operand(operand, op, "right")?;
            return Ok(Some(Node::unary(op.clone(), operand)));
        }

        self.parse_dice()
    }

    fn parse_dice(&mut self) -> FormulaResult<Option<Node>> {
        let left = self.parse_primary()?;
        self.parse_left_assoc(left, DICE, Self::parse_primary)
    }

    /// Folds `left (op next)*` into a left-leaning chain of binary nodes.
    fn parse_left_assoc(
        &mut self,
        mut left: Option<Node>,
        operators: &[Trait],
        next: fn(&mut Self) -> FormulaResult<Option<Node>>,
    ) -> FormulaResult<Option<Node>> {
        while let Some(op) = self.current_operator(operators) {
            let lhs = Self::require_operand(left.take(), op, "left")?;
            self.advance();
            let rhs = Self::require_operand(next(self)?, op, "right")?;
            left = Some(Node::binary(op.clone(), lhs, rhs));
        }

        Ok(left)
    }

    fn parse_primary(&mut self) -> FormulaResult<Option<Node>> {
        let Some(token) = self.current() else {
            return Ok(None);
        };

        if token.is_operand() {
            self.advance();
            return Ok(Some(Node::leaf(token.clone())));
        }

        if token.has_trait(Trait::OpenParenthesis) {
            let open_at = self.position;
            self.enter_nested()?;
            self.advance();
            let inner = self.parse_expression()?;
            self.leave_nested();
            return match self.advance() {
                Some(close) if close.has_trait(Trait::CloseParenthesis) => Ok(inner),
                Some(other) => Err(FormulaError::syntax(format!(
                    "expected ')' to close '(' at token {}, found '{}'",
                    open_at, other
                ))),
                None => Err(FormulaError::syntax(format!(
                    "unclosed '(' at token {}",
                    open_at
                ))),
            };
        }

        // A closing parenthesis ends an enclosing group; anything else here
        // is left for the caller to reject.
        Ok(None)
    }

    fn require_operand(node: Option<Node>, op: &Token, side: &str) -> FormulaResult<Node> {
        node.ok_or_else(|| {
            FormulaError::syntax(format!("operator '{}' is missing its {} operand", op, side))
        })
    }
}

/// Builds a tree from an already classified token sequence.
pub fn build_tree(tokens: &[Token]) -> FormulaResult<ExpressionTree> {
    let tree = TreeBuilder::new(tokens).build()?;
    log::debug!("built tree of depth {} from {} tokens", tree.depth(), tokens.len());
    Ok(tree)
}

/// Tokenizes, classifies and builds `input` with a caller-supplied table.
pub fn parse_with<'a>(
    table: &PatternTable,
    input: impl Into<Option<&'a str>>,
) -> FormulaResult<ExpressionTree> {
    let tokens = tokenize(table, input)?;
    build_tree(&tokens)
}

/// Convenience function to parse a formula string with the built-in table.
pub fn parse_string<'a>(input: impl Into<Option<&'a str>>) -> FormulaResult<ExpressionTree> {
    parse_with(PatternTable::default_table(), input)
}
