//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including the error type, goal symbols, helper methods, and the main parse
//! entry points.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, token lookahead, expected-set bookkeeping
//! - `declarations`: function and object declarations
//! - `statements`: statement lists, `return`, `while`, `try`/`catch`/`finally`
//! - `expressions`: expression alternatives and `while` conditions
//!
//! # Goal symbols
//!
//! There is no combined "program" grammar. The caller picks one [`Goal`] per
//! call and the whole input must match it.
//!
//! # Error reporting
//!
//! Every time the parser tests the current token against a kind, that kind is
//! remembered until a token is consumed. When no alternative matches, the
//! remembered kinds become the `expected` set of the [`SyntaxError`].

use crate::parser::ast::*;
use crate::parser::lexer::{LexError, Lexer, LexerConfig, Token, TokenKind};
use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Fatal grammar error: the token stream matched no alternative.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Syntax error at line {}, column {}: expected {}, found {found}",
    .location.line,
    .location.column,
    describe_expected(.expected)
)]
pub struct SyntaxError {
    pub location: SourceLocation,
    pub expected: Vec<TokenKind>,
    pub found: Token,
}

fn describe_expected(expected: &[TokenKind]) -> String {
    match expected {
        [] => "nothing".to_string(),
        [only] => only.to_string(),
        [init @ .., last] => {
            let head: Vec<String> = init.iter().map(|k| k.to_string()).collect();
            format!("one of {} or {}", head.join(", "), last)
        }
    }
}

/// Grammar rule used as the entry point of a parse call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Goal {
    FunctionDeclaration,
    WhileDeclaration,
    TryCatch,
    ObjectDeclaration,
}

impl Goal {
    pub const ALL: [Goal; 4] = [
        Goal::FunctionDeclaration,
        Goal::WhileDeclaration,
        Goal::TryCatch,
        Goal::ObjectDeclaration,
    ];

    /// Grammar rule name
    pub fn rule_name(self) -> &'static str {
        match self {
            Goal::FunctionDeclaration => "function_declaration",
            Goal::WhileDeclaration => "while_declaration",
            Goal::TryCatch => "try_catch",
            Goal::ObjectDeclaration => "object_declaration",
        }
    }
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rule_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown goal '{0}' (expected function, while, try or object)")]
pub struct UnknownGoal(pub String);

impl FromStr for Goal {
    type Err = UnknownGoal;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "function" | "function_declaration" => Ok(Goal::FunctionDeclaration),
            "while" | "while_declaration" => Ok(Goal::WhileDeclaration),
            "try" | "try_catch" => Ok(Goal::TryCatch),
            "object" | "object_declaration" => Ok(Goal::ObjectDeclaration),
            other => Err(UnknownGoal(other.to_string())),
        }
    }
}

/// Everything a parse call reports: the tree or the first syntax error,
/// plus the lexical diagnostics collected along the way.
#[derive(Debug)]
pub struct ParseOutput {
    pub result: Result<AstNode, SyntaxError>,
    pub diagnostics: Vec<LexError>,
}

/// Parse `source` as `goal` with the default lexer configuration.
pub fn parse(source: &str, goal: Goal) -> ParseOutput {
    parse_with(source, goal, LexerConfig::default())
}

pub fn parse_with(source: &str, goal: Goal, config: LexerConfig) -> ParseOutput {
    let mut parser = Parser::with_config(source, config);
    let result = parser.parse(goal);
    ParseOutput {
        result,
        diagnostics: parser.into_diagnostics(),
    }
}

/// Recursive descent parser for the script grammar
pub struct Parser {
    lexer: Lexer,
    lookahead: VecDeque<Token>,
    expected: Vec<TokenKind>,
}

impl Parser {
    pub fn new(source: &str) -> Self {
        Self::with_config(source, LexerConfig::default())
    }

    pub fn with_config(source: &str, config: LexerConfig) -> Self {
        Self {
            lexer: Lexer::with_config(source, config),
            lookahead: VecDeque::new(),
            expected: Vec::new(),
        }
    }

    /// Parse the entire input as `goal`.
    pub fn parse(&mut self, goal: Goal) -> Result<AstNode, SyntaxError> {
        log::debug!("parsing input as {}", goal);

        let node = match goal {
            Goal::FunctionDeclaration => self.parse_function_declaration()?,
            Goal::WhileDeclaration => self.parse_while_declaration()?,
            Goal::TryCatch => self.parse_try_catch()?,
            Goal::ObjectDeclaration => self.parse_object_declaration()?,
        };

        if !self.check(TokenKind::Eof) {
            return Err(self.unexpected());
        }

        log::debug!("parsed {} at line {}", node.tag(), node.location().line);
        Ok(node)
    }

    /// Lexical diagnostics gathered so far.
    pub fn diagnostics(&self) -> &[LexError] {
        self.lexer.diagnostics()
    }

    pub fn into_diagnostics(self) -> Vec<LexError> {
        self.lexer.into_diagnostics()
    }

    // ===== Helper methods =====

    fn fill(&mut self, n: usize) {
        while self.lookahead.len() <= n {
            let reported = self.lexer.diagnostics().len();
            let token = self.lexer.next_token();
            for diagnostic in &self.lexer.diagnostics()[reported..] {
                log::warn!("{}", diagnostic);
            }
            self.lookahead.push_back(token);
        }
    }

    pub(crate) fn peek(&mut self) -> &Token {
        self.peek_ahead(0)
    }

    pub(crate) fn peek_ahead(&mut self, n: usize) -> &Token {
        self.fill(n);
        &self.lookahead[n]
    }

    pub(crate) fn peek_kind(&mut self) -> TokenKind {
        self.peek().kind
    }

    /// Test the current token, recording `kind` in the expected set on a miss.
    pub(crate) fn check(&mut self, kind: TokenKind) -> bool {
        if self.peek_kind() == kind {
            true
        } else {
            self.expected.push(kind);
            false
        }
    }

    pub(crate) fn check_any(&mut self, kinds: &[TokenKind]) -> bool {
        if kinds.contains(&self.peek_kind()) {
            true
        } else {
            self.expected.extend_from_slice(kinds);
            false
        }
    }

    pub(crate) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        // Eof is sticky
        if token.kind != TokenKind::Eof {
            self.lookahead.pop_front();
        }
        log::trace!("consumed {}", token);
        self.expected.clear();
        token
    }

    /// Build a syntax error at the current token from the expected set.
    pub(crate) fn unexpected(&mut self) -> SyntaxError {
        let mut expected = std::mem::take(&mut self.expected);
        expected.sort();
        expected.dedup();
        let found = self.peek().clone();
        SyntaxError {
            location: found.location,
            expected,
            found,
        }
    }

    pub(crate) fn expect_token(&mut self, kind: TokenKind) -> Result<Token, SyntaxError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected())
        }
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<String, SyntaxError> {
        self.expect_token(TokenKind::Identifier).map(|t| t.lexeme)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_function() {
        let source = "function main(x) { return x; }";
        let mut parser = Parser::new(source);
        let node = parser.parse(Goal::FunctionDeclaration).unwrap();

        match &node {
            AstNode::FunctionDeclaration {
                name,
                params,
                body,
                location,
            } => {
                assert_eq!(name, "main");
                assert_eq!(params.len(), 1);
                assert_eq!(body.len(), 1);
                assert_eq!(*location, SourceLocation::new(1, 1));
            }
            _ => panic!("Expected function declaration"),
        }
        assert!(parser.diagnostics().is_empty());
    }

    #[test]
    fn test_trailing_input_rejected() {
        let output = parse("function f(x) { x; } x", Goal::FunctionDeclaration);
        let err = output.result.unwrap_err();
        assert_eq!(err.expected, vec![TokenKind::Eof]);
        assert_eq!(err.found.kind, TokenKind::Identifier);
        assert_eq!(err.location, SourceLocation::new(1, 22));
    }

    #[test]
    fn test_wrong_goal_reports_expected_keyword() {
        let output = parse("while (x) { x; }", Goal::FunctionDeclaration);
        let err = output.result.unwrap_err();
        assert_eq!(err.expected, vec![TokenKind::Function]);
        assert_eq!(err.found.kind, TokenKind::While);
    }

    #[test]
    fn test_syntax_error_message() {
        let output = parse("function f() { x; }", Goal::FunctionDeclaration);
        let err = output.result.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Syntax error at line 1, column 12: expected identifier, found ')'"
        );
    }

    #[test]
    fn test_diagnostics_survive_syntax_error() {
        let output = parse("function f(x) { x # }", Goal::FunctionDeclaration);
        assert!(output.result.is_err());
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.diagnostics[0].character, '#');
    }

    #[test]
    fn test_goal_from_str() {
        assert_eq!("function".parse(), Ok(Goal::FunctionDeclaration));
        assert_eq!("while_declaration".parse(), Ok(Goal::WhileDeclaration));
        assert_eq!("try".parse(), Ok(Goal::TryCatch));
        assert_eq!("object".parse(), Ok(Goal::ObjectDeclaration));
        assert_eq!(
            "program".parse::<Goal>(),
            Err(UnknownGoal("program".to_string()))
        );
        for goal in Goal::ALL {
            assert_eq!(goal.rule_name().parse(), Ok(goal));
        }
    }
}
