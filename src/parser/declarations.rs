//! Declaration parsing implementation
//!
//! This module handles the two declaration goals:
//!
//! - Function declarations: `function name(a, b) { ... }`
//! - Object declarations: `const name = { key: value, nested: { ... } }`
//!
//! # Grammar
//!
//! ```text
//! function_declaration ::= "function" IDENT "(" params ")" "{" statements "}"
//! params               ::= IDENT ("," IDENT)*
//! object_declaration   ::= "const" IDENT "=" "{" object_entries "}"
//! object_entries       ::= object_entry ("," object_entry)*
//! object_entry         ::= IDENT ":" (expression | "{" object_entries "}")
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::{Token, TokenKind};
use crate::parser::parse::{Parser, SyntaxError};

impl Parser {
    /// Parse function declaration: function name(params) { body }
    pub(crate) fn parse_function_declaration(&mut self) -> Result<AstNode, SyntaxError> {
        let loc = self.expect_token(TokenKind::Function)?.location;
        let name = self.expect_identifier()?;

        self.expect_token(TokenKind::LParen)?;
        let params = self.parse_parameter_list()?;
        self.expect_token(TokenKind::RParen)?;

        let body = self.parse_block()?;

        Ok(AstNode::FunctionDeclaration {
            name,
            params,
            body,
            location: loc,
        })
    }

    /// Parse parameter list: one or more comma-separated identifiers
    pub(crate) fn parse_parameter_list(&mut self) -> Result<Vec<Param>, SyntaxError> {
        let mut params = Vec::new();

        loop {
            let token = self.expect_token(TokenKind::Identifier)?;
            params.push(Param {
                name: token.lexeme,
                location: token.location,
            });

            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }

        Ok(params)
    }

    /// Parse object declaration: const name = { entries }
    pub(crate) fn parse_object_declaration(&mut self) -> Result<AstNode, SyntaxError> {
        let loc = self.expect_token(TokenKind::Const)?.location;
        let name = self.expect_identifier()?;
        self.expect_token(TokenKind::Equals)?;

        self.expect_token(TokenKind::LBrace)?;
        let entries = self.parse_object_entries()?;
        self.expect_token(TokenKind::RBrace)?;

        Ok(AstNode::ObjectDeclaration {
            name,
            entries,
            location: loc,
        })
    }

    /// Parse one or more comma-separated `key: value` entries, stopping before
    /// the closing brace of the outermost object.
    ///
    /// Nested objects are tracked on an explicit stack of open levels; each
    /// level keeps its parent's finished entries and the key it will be
    /// stored under.
    fn parse_object_entries(&mut self) -> Result<Vec<ObjectEntry>, SyntaxError> {
        let mut current = Vec::new();
        let mut parents: Vec<(Vec<ObjectEntry>, Token)> = Vec::new();

        loop {
            let key = self.expect_token(TokenKind::Identifier)?;
            self.expect_token(TokenKind::Colon)?;

            if self.match_token(TokenKind::LBrace) {
                parents.push((std::mem::take(&mut current), key));
                continue;
            }

            let value = self.parse_expression()?;
            current.push(ObjectEntry {
                key: key.lexeme,
                value: ObjectValue::Expression(Box::new(value)),
                location: key.location,
            });

            // Close finished levels until one continues with another entry
            while !self.match_token(TokenKind::Comma) {
                let Some((siblings, key)) = parents.pop() else {
                    return Ok(current);
                };
                self.expect_token(TokenKind::RBrace)?;
                let nested = std::mem::replace(&mut current, siblings);
                current.push(ObjectEntry {
                    key: key.lexeme,
                    value: ObjectValue::Object(nested),
                    location: key.location,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::lexer::TokenKind;
    use crate::parser::parse::{parse, Goal};

    #[test]
    fn test_parameters_in_order() {
        let node = parse("function f(a, b, c, d) { a; }", Goal::FunctionDeclaration)
            .result
            .unwrap();
        match &node {
            AstNode::FunctionDeclaration { params, .. } => {
                let names: Vec<_> = params.iter().map(|p| p.name.as_str()).collect();
                assert_eq!(names, vec!["a", "b", "c", "d"]);
                assert_eq!(params[1].location, SourceLocation::new(1, 15));
            }
            _ => panic!("Expected function declaration"),
        }
    }

    #[test]
    fn test_empty_parameter_list_rejected() {
        let err = parse("function f() { a; }", Goal::FunctionDeclaration)
            .result
            .unwrap_err();
        assert_eq!(err.expected, vec![TokenKind::Identifier]);
        assert_eq!(err.found.kind, TokenKind::RParen);
    }

    #[test]
    fn test_trailing_comma_in_parameters_rejected() {
        let err = parse("function f(a,) { a; }", Goal::FunctionDeclaration)
            .result
            .unwrap_err();
        assert_eq!(err.expected, vec![TokenKind::Identifier]);
    }

    #[test]
    fn test_flat_object() {
        let node = parse(
            r#"const point = { x: 1, label: "origin", y: z }"#,
            Goal::ObjectDeclaration,
        )
        .result
        .unwrap();

        match &node {
            AstNode::ObjectDeclaration { name, entries, .. } => {
                assert_eq!(name, "point");
                let keys: Vec<_> = entries.iter().map(|e| e.key.as_str()).collect();
                assert_eq!(keys, vec!["x", "label", "y"]);
                match &entries[1].value {
                    ObjectValue::Expression(expr) => assert!(matches!(
                        expr.as_ref(),
                        AstNode::Literal { kind: LiteralKind::String, value, .. } if value == "origin"
                    )),
                    _ => panic!("Expected expression value"),
                }
                match &entries[2].value {
                    ObjectValue::Expression(expr) => {
                        assert!(matches!(expr.as_ref(), AstNode::Identifier(n, _) if n == "z"))
                    }
                    _ => panic!("Expected expression value"),
                }
            }
            _ => panic!("Expected object declaration"),
        }
    }

    #[test]
    fn test_nested_object() {
        let node = parse(
            "const config = { server: { host: name, limits: { max: 10 } }, debug: 0 }",
            Goal::ObjectDeclaration,
        )
        .result
        .unwrap();

        assert_eq!(
            node.to_string(),
            "(object-declaration config ((object-items server ((host name) \
             (object-items limits ((max (number 10)))))) (debug (number 0))))"
        );
    }

    #[test]
    fn test_deeply_nested_object() {
        let depth = 5000;
        let mut source = String::from("const deep = { ");
        for i in 0..depth {
            source.push_str(&format!("k{}: {{ ", i));
        }
        source.push_str("leaf: 1");
        source.push_str(&" }".repeat(depth + 1));

        let node = parse(&source, Goal::ObjectDeclaration).result.unwrap();
        let AstNode::ObjectDeclaration { entries, .. } = &node else {
            panic!("Expected object declaration");
        };

        let mut levels = 0;
        let mut entry = &entries[0];
        while let ObjectValue::Object(nested) = &entry.value {
            assert_eq!(entry.key, format!("k{}", levels));
            levels += 1;
            entry = &nested[0];
        }
        assert_eq!(levels, depth);
        assert_eq!(entry.key, "leaf");

        let printed = node.to_string();
        let head = "(object-declaration deep ((object-items k0 ((object-items k1 ";
        assert!(printed.starts_with(head));
        assert!(printed.contains("((leaf (number 1)))"));
    }

    #[test]
    fn test_unclosed_nested_object_rejected() {
        let err = parse("const o = { a: { b: 1 }", Goal::ObjectDeclaration)
            .result
            .unwrap_err();
        assert_eq!(err.expected, vec![TokenKind::RBrace, TokenKind::Comma]);
        assert_eq!(err.found.kind, TokenKind::Eof);
    }

    #[test]
    fn test_empty_object_rejected() {
        let err = parse("const o = { }", Goal::ObjectDeclaration)
            .result
            .unwrap_err();
        assert_eq!(err.expected, vec![TokenKind::Identifier]);
        assert_eq!(err.found.kind, TokenKind::RBrace);
    }

    #[test]
    fn test_object_requires_const() {
        let err = parse("let o = { a: 1 }", Goal::ObjectDeclaration)
            .result
            .unwrap_err();
        assert_eq!(err.expected, vec![TokenKind::Const]);
    }
}
