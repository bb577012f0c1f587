//! # Introduction
//!
//! astty parses a small JavaScript-like language into an abstract syntax tree
//! and shows the result in a terminal viewer.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Parser (one goal symbol) → AST → Viewer / s-expression
//! ```
//!
//! 1. [`parser`]: tokenises the source and builds an AST. Illegal characters
//!    are collected as diagnostics; the first grammar error aborts the parse.
//! 2. [`ui`]: ratatui-based TUI; not part of the stable library API.
//!
//! ## Example
//!
//! ```
//! use astty::parser::{parse, Goal};
//!
//! let output = parse("function add(x, y) { return x; }", Goal::FunctionDeclaration);
//! let root = output.result.unwrap();
//! assert_eq!(
//!     root.to_string(),
//!     "(function-declaration add (x y) ((return x)))"
//! );
//! ```

pub mod parser;
pub mod ui;
