//! Expression parsing implementation
//!
//! Expressions are chosen by lookahead, first matching alternative wins:
//!
//! 1. `var|let|const NAME = expr`, or `NAME = expr` (plain reassignment)
//! 2. `NAME op NAME [expr]` where the trailing expression continues the chain
//! 3. `NAME`
//! 4. number literal
//! 5. string literal
//!
//! `while` conditions are a separate, flatter production with exactly three
//! shapes: `x`, `x op y` and `x op y cmp z`. Two-character comparators arrive
//! as two tokens (`>` `=`), which are grouped here.
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{Parser, SyntaxError};

const EXPRESSION_STARTERS: [TokenKind; 6] = [
    TokenKind::Var,
    TokenKind::Let,
    TokenKind::Const,
    TokenKind::Identifier,
    TokenKind::Number,
    TokenKind::String,
];

const ARITH_OPS: [TokenKind; 4] = [
    TokenKind::Plus,
    TokenKind::Minus,
    TokenKind::Star,
    TokenKind::Slash,
];

const COMPARATOR_STARTERS: [TokenKind; 3] =
    [TokenKind::Equals, TokenKind::Greater, TokenKind::Less];

fn arith_op(kind: TokenKind) -> Option<ArithOp> {
    match kind {
        TokenKind::Plus => Some(ArithOp::Add),
        TokenKind::Minus => Some(ArithOp::Sub),
        TokenKind::Star => Some(ArithOp::Mul),
        TokenKind::Slash => Some(ArithOp::Div),
        _ => None,
    }
}

/// A link of an expression chain still waiting for the expression after it
enum Pending {
    Assignment {
        binding: BindingKind,
        target: String,
        location: SourceLocation,
    },
    Operation {
        left: String,
        op: ArithOp,
        right: String,
        location: SourceLocation,
    },
}

impl Parser {
    /// Parse expression (top-level entry point)
    ///
    /// Assignment values and operation continuations nest to the right, so the
    /// links are collected in a loop and folded into the tree afterwards.
    pub(crate) fn parse_expression(&mut self) -> Result<AstNode, SyntaxError> {
        let mut links = Vec::new();

        let mut node = loop {
            let binding = match self.peek_kind() {
                TokenKind::Var => Some(BindingKind::Var),
                TokenKind::Let => Some(BindingKind::Let),
                TokenKind::Const => Some(BindingKind::Const),
                _ => None,
            };
            if let Some(binding) = binding {
                let location = self.advance().location;
                let target = self.expect_identifier()?;
                self.expect_token(TokenKind::Equals)?;
                links.push(Pending::Assignment {
                    binding,
                    target,
                    location,
                });
                continue;
            }

            if !self.check_any(&EXPRESSION_STARTERS) {
                return Err(self.unexpected());
            }

            let token = self.advance();
            let location = token.location;
            match token.kind {
                TokenKind::Number => {
                    break AstNode::Literal {
                        kind: LiteralKind::Number,
                        value: token.lexeme,
                        location,
                    }
                }
                TokenKind::String => {
                    break AstNode::Literal {
                        kind: LiteralKind::String,
                        value: token.lexeme,
                        location,
                    }
                }
                _ => {}
            }

            let name = token.lexeme;
            if self.match_token(TokenKind::Equals) {
                links.push(Pending::Assignment {
                    binding: BindingKind::Plain,
                    target: name,
                    location,
                });
                continue;
            }

            let Some(op) = self.parse_arith_op() else {
                break AstNode::Identifier(name, location);
            };
            let right = self.expect_identifier()?;

            if !self.check_any(&EXPRESSION_STARTERS) {
                break AstNode::BinaryOp {
                    left: name,
                    op,
                    right,
                    continuation: None,
                    location,
                };
            }
            links.push(Pending::Operation {
                left: name,
                op,
                right,
                location,
            });
        };

        while let Some(link) = links.pop() {
            node = match link {
                Pending::Assignment {
                    binding,
                    target,
                    location,
                } => AstNode::Assignment {
                    binding,
                    target,
                    value: Box::new(node),
                    location,
                },
                Pending::Operation {
                    left,
                    op,
                    right,
                    location,
                } => AstNode::BinaryOp {
                    left,
                    op,
                    right,
                    continuation: Some(Box::new(node)),
                    location,
                },
            };
        }

        Ok(node)
    }

    /// Parse a while condition: x | x op y | x op y cmp z
    pub(crate) fn parse_condition(&mut self) -> Result<Condition, SyntaxError> {
        let left = self.expect_identifier()?;

        let Some(op) = self.parse_arith_op() else {
            return Ok(Condition::Bare(left));
        };
        let right = self.expect_identifier()?;

        let Some(comparator) = self.parse_comparator()? else {
            return Ok(Condition::Arithmetic { left, op, right });
        };
        let rhs = self.expect_identifier()?;

        Ok(Condition::Comparison {
            left,
            op,
            right,
            comparator,
            rhs,
        })
    }

    fn parse_arith_op(&mut self) -> Option<ArithOp> {
        if !self.check_any(&ARITH_OPS) {
            return None;
        }
        arith_op(self.advance().kind)
    }

    /// Parse `==`, `>=`, `<=`, `>` or `<`.
    ///
    /// A two-character comparator is two tokens, so `> =` is the same as `>=`.
    fn parse_comparator(&mut self) -> Result<Option<Comparator>, SyntaxError> {
        if !self.check_any(&COMPARATOR_STARTERS) {
            return Ok(None);
        }

        let first = self.advance().kind;
        let followed_by_equals = self.match_token(TokenKind::Equals);

        let comparator = match (first, followed_by_equals) {
            (TokenKind::Equals, true) => Comparator::Eq,
            (TokenKind::Greater, true) => Comparator::Ge,
            (TokenKind::Greater, false) => Comparator::Gt,
            (TokenKind::Less, true) => Comparator::Le,
            (TokenKind::Less, false) => Comparator::Lt,
            _ => {
                // a lone '=' needs its partner
                let mut err = self.unexpected();
                err.expected = vec![TokenKind::Equals];
                return Err(err);
            }
        };

        Ok(Some(comparator))
    }
}
