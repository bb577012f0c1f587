//! Statement parsing implementation
//!
//! This module handles statement lists and the block-shaped goals:
//!
//! - Statements: `return expr;` and `expr;`
//! - Loops: `while (condition) { ... }`
//! - Exception handling: `try { ... } catch (e) { ... } catch { ... } finally { ... }`
//!
//! # Grammar
//!
//! ```text
//! statements     ::= statement+
//! statement      ::= ("return" expression | expression) ";"
//! while_decl     ::= "while" "(" condition ")" "{" statements "}"
//! try_catch      ::= "try" "{" statements "}" handler_chain
//! handler_chain  ::= catch_clause+ finally_clause? | finally_clause
//! catch_clause   ::= "catch" ("(" IDENT ")")? "{" statements "}"
//! finally_clause ::= "finally" "{" statements "}"
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{Parser, SyntaxError};

impl Parser {
    /// Parse `{ statements }`
    pub(crate) fn parse_block(&mut self) -> Result<Vec<AstNode>, SyntaxError> {
        self.expect_token(TokenKind::LBrace)?;
        let statements = self.parse_statements()?;
        self.expect_token(TokenKind::RBrace)?;
        Ok(statements)
    }

    /// Parse one or more statements, up to (not including) the closing brace
    pub(crate) fn parse_statements(&mut self) -> Result<Vec<AstNode>, SyntaxError> {
        let mut statements = vec![self.parse_statement()?];

        while !self.check(TokenKind::RBrace) {
            statements.push(self.parse_statement()?);
        }

        Ok(statements)
    }

    /// Parse a statement
    pub(crate) fn parse_statement(&mut self) -> Result<AstNode, SyntaxError> {
        let statement = if self.check(TokenKind::Return) {
            let loc = self.advance().location;
            let value = Box::new(self.parse_expression()?);
            AstNode::Return {
                value,
                location: loc,
            }
        } else {
            self.parse_expression()?
        };

        self.expect_token(TokenKind::Semicolon)?;
        Ok(statement)
    }

    /// Parse while declaration: while (condition) { body }
    pub(crate) fn parse_while_declaration(&mut self) -> Result<AstNode, SyntaxError> {
        let loc = self.expect_token(TokenKind::While)?.location;

        self.expect_token(TokenKind::LParen)?;
        let condition = self.parse_condition()?;
        self.expect_token(TokenKind::RParen)?;

        let body = self.parse_block()?;

        Ok(AstNode::While {
            condition,
            body,
            location: loc,
        })
    }

    /// Parse try block followed by its handler chain
    pub(crate) fn parse_try_catch(&mut self) -> Result<AstNode, SyntaxError> {
        let loc = self.expect_token(TokenKind::Try)?.location;
        let body = self.parse_block()?;

        let mut handlers = Vec::new();
        loop {
            if self.check(TokenKind::Catch) {
                handlers.push(self.parse_catch_clause()?);
            } else if self.check(TokenKind::Finally) {
                let finally_loc = self.advance().location;
                let body = self.parse_block()?;
                handlers.push(Handler::Finally {
                    body,
                    location: finally_loc,
                });
                break;
            } else if handlers.is_empty() {
                return Err(self.unexpected());
            } else {
                break;
            }
        }

        Ok(AstNode::TryCatch {
            body,
            handlers,
            location: loc,
        })
    }

    /// Parse catch clause with optional binding: catch (e) { body } | catch { body }
    fn parse_catch_clause(&mut self) -> Result<Handler, SyntaxError> {
        let loc = self.expect_token(TokenKind::Catch)?.location;

        let binding = if self.match_token(TokenKind::LParen) {
            let name = self.expect_identifier()?;
            self.expect_token(TokenKind::RParen)?;
            Some(name)
        } else {
            None
        };

        let body = self.parse_block()?;

        Ok(Handler::Catch {
            binding,
            body,
            location: loc,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::lexer::TokenKind;
    use crate::parser::parse::{parse, Goal};

    const STATEMENT_STARTERS: [TokenKind; 7] = [
        TokenKind::Identifier,
        TokenKind::Number,
        TokenKind::String,
        TokenKind::Var,
        TokenKind::Let,
        TokenKind::Const,
        TokenKind::Return,
    ];

    #[test]
    fn test_statements_in_order() {
        let node = parse(
            "function f(a) { a; 1; \"two\"; return a; }",
            Goal::FunctionDeclaration,
        )
        .result
        .unwrap();

        match &node {
            AstNode::FunctionDeclaration { body, .. } => {
                assert_eq!(body.len(), 4);
                assert!(matches!(&body[0], AstNode::Identifier(n, _) if n == "a"));
                assert!(matches!(
                    &body[1],
                    AstNode::Literal { kind: LiteralKind::Number, value, .. } if value == "1"
                ));
                assert!(matches!(
                    &body[2],
                    AstNode::Literal { kind: LiteralKind::String, value, .. } if value == "two"
                ));
                assert!(matches!(&body[3], AstNode::Return { .. }));
            }
            _ => panic!("Expected function declaration"),
        }
    }

    #[test]
    fn test_empty_body_rejected() {
        let err = parse("function f(a) { }", Goal::FunctionDeclaration)
            .result
            .unwrap_err();
        let mut expected = STATEMENT_STARTERS.to_vec();
        expected.sort();
        assert_eq!(err.expected, expected);
        assert_eq!(err.found.kind, TokenKind::RBrace);
    }

    #[test]
    fn test_missing_semicolon() {
        let err = parse("function f(a) { return a }", Goal::FunctionDeclaration)
            .result
            .unwrap_err();
        assert!(err.expected.contains(&TokenKind::Semicolon));
        assert_eq!(err.found.kind, TokenKind::RBrace);
    }

    #[test]
    fn test_while_loop() {
        let node = parse("while (x * y) {\n  x = y;\n}", Goal::WhileDeclaration)
            .result
            .unwrap();

        match &node {
            AstNode::While {
                condition, body, ..
            } => {
                assert_eq!(condition.arity(), 3);
                assert_eq!(body.len(), 1);
                assert_eq!(body[0].location().line, 2);
                assert!(matches!(
                    &body[0],
                    AstNode::Assignment { binding: BindingKind::Plain, target, .. } if target == "x"
                ));
            }
            _ => panic!("Expected while loop"),
        }
    }

    #[test]
    fn test_try_with_catches_and_finally() {
        let source = r#"
            try {
                const result = 1;
            } catch (err) {
                err;
            } catch {
                "fallback";
            } finally {
                done = 1;
            }
        "#;
        let node = parse(source, Goal::TryCatch).result.unwrap();

        match &node {
            AstNode::TryCatch { body, handlers, .. } => {
                assert_eq!(body.len(), 1);
                assert_eq!(handlers.len(), 3);
                assert_eq!(handlers[0].binding(), Some("err"));
                assert!(!handlers[0].is_finally());
                assert_eq!(handlers[1].binding(), None);
                assert!(!handlers[1].is_finally());
                assert!(handlers[2].is_finally());
                assert_eq!(handlers[2].location().line, 8);
            }
            _ => panic!("Expected try-catch"),
        }
        assert_eq!(node.catch_clauses().count(), 2);
        assert_eq!(node.finally_body().map(|b| b.len()), Some(1));
    }

    #[test]
    fn test_try_finally_only() {
        let node = parse("try { a; } finally { b; }", Goal::TryCatch)
            .result
            .unwrap();
        assert_eq!(node.catch_clauses().count(), 0);
        assert!(node.finally_body().is_some());
    }

    #[test]
    fn test_try_without_handler_rejected() {
        let err = parse("try { const result = 1; }", Goal::TryCatch)
            .result
            .unwrap_err();
        assert_eq!(err.expected, vec![TokenKind::Catch, TokenKind::Finally]);
        assert_eq!(err.found.kind, TokenKind::Eof);
    }

    #[test]
    fn test_catch_after_finally_rejected() {
        let err = parse(
            "try { a; } finally { b; } catch { c; }",
            Goal::TryCatch,
        )
        .result
        .unwrap_err();
        assert_eq!(err.expected, vec![TokenKind::Eof]);
        assert_eq!(err.found.kind, TokenKind::Catch);
    }
}
