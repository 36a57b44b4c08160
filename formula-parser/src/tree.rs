//! FILENAME: formula-parser/src/tree.rs
//! PURPOSE: The expression tree produced by the builder.
//! CONTEXT: Evaluation happens elsewhere; this module only describes shape.
//!
//! SHAPES:
//! - Operand leaf: no children (e.g., 3, x)
//! - Unary sign: one child (e.g., -5)
//! - Binary operator: two children, left then right (e.g., 3d6, 1+2)
//!
//! Parentheses never appear in the tree; they only decide its shape.
//!
//! Left-associative chains make trees as deep as they are long, so drop,
//! equality, depth, operand collection and Display walk the tree with an
//! explicit stack instead of recursing.

use std::fmt;

use serde::Serialize;

use crate::token::Token;

/// One node of an expression tree. Each child is owned by exactly one parent.
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    token: Token,
    children: Vec<Node>,
}

impl Node {
    pub fn leaf(token: Token) -> Self {
        Node {
            token,
            children: Vec::new(),
        }
    }

    pub fn unary(operator: Token, operand: Node) -> Self {
        Node {
            token: operator,
            children: vec![operand],
        }
    }

    pub fn binary(operator: Token, left: Node, right: Node) -> Self {
        Node {
            token: operator,
            children: vec![left, right],
        }
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// First child: the left operand of a binary node, the operand of a unary one.
    pub fn left(&self) -> Option<&Node> {
        self.children.first()
    }

    /// Second child of a binary node.
    pub fn right(&self) -> Option<&Node> {
        self.children.get(1)
    }

    pub fn arity(&self) -> usize {
        self.children.len()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of levels below and including this node.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1)];
        while let Some((node, level)) = stack.pop() {
            deepest = deepest.max(level);
            stack.extend(node.children.iter().map(|child| (child, level + 1)));
        }
        deepest
    }

    fn collect_operands<'n>(&'n self, out: &mut Vec<&'n Token>) {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.is_leaf() {
                out.push(&node.token);
            }
            // Reversed so the leftmost child is visited first
            stack.extend(node.children.iter().rev());
        }
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        let mut stack = vec![(self, other)];
        while let Some((a, b)) = stack.pop() {
            if a.token != b.token || a.children.len() != b.children.len() {
                return false;
            }
            stack.extend(a.children.iter().zip(&b.children));
        }
        true
    }
}

impl Eq for Node {}

enum Step<'n> {
    Open(&'n Node, bool),
    Close,
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![Step::Open(self, false)];
        while let Some(step) = stack.pop() {
            let (node, spaced) = match step {
                Step::Close => {
                    f.write_str(")")?;
                    continue;
                }
                Step::Open(node, spaced) => (node, spaced),
            };

            if spaced {
                f.write_str(" ")?;
            }
            if node.is_leaf() {
                write!(f, "{}", node.token)?;
                continue;
            }

            write!(f, "({}", node.token)?;
            stack.push(Step::Close);
            stack.extend(node.children.iter().rev().map(|child| Step::Open(child, true)));
        }
        Ok(())
    }
}

/// A parsed expression. An absent root means "no expression".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExpressionTree {
    root: Option<Node>,
}

impl ExpressionTree {
    pub fn new(root: Option<Node>) -> Self {
        ExpressionTree { root }
    }

    pub fn empty() -> Self {
        ExpressionTree { root: None }
    }

    pub fn root(&self) -> Option<&Node> {
        self.root.as_ref()
    }

    pub fn into_root(self) -> Option<Node> {
        self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Operand tokens in left-to-right order.
    pub fn operands(&self) -> Vec<&Token> {
        let mut out = Vec::new();
        if let Some(root) = &self.root {
            root.collect_operands(&mut out);
        }
        out
    }

    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, Node::depth)
    }
}

impl From<Node> for ExpressionTree {
    fn from(node: Node) -> Self {
        ExpressionTree { root: Some(node) }
    }
}

impl fmt::Display for ExpressionTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.root {
            Some(root) => write!(f, "{}", root),
            None => Ok(()),
        }
    }
}
