//! Script source parser
//!
//! This module transforms source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens, plus illegal-character diagnostics)
//! - [`parse`]: Parsing (tokens → AST) for one goal symbol per call
//! - [`ast`]: AST node definitions
//!
//! # Supported Grammar
//!
//! A small JavaScript-like subset:
//! - Function declarations with one or more parameters
//! - `var`/`let`/`const` declarations and plain reassignment
//! - `return` statements
//! - Arithmetic operation chains over identifiers (`+ - * /`)
//! - `while` loops whose condition is `x`, `x op y` or `x op y cmp z`
//! - `try` with any number of `catch` clauses and an optional `finally`
//! - `const` object declarations with nested objects
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with token lookahead.
//! No external parser generator dependencies.

pub mod ast;
mod declarations;
mod expressions;
pub mod lexer;
pub mod parse;
mod statements;

pub use parse::{parse, parse_with, Goal, ParseOutput, Parser, SyntaxError};
