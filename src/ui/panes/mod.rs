//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`source`]: Source code display with lexer-driven highlighting and error line marker
//! - [`tree`]: Indented AST outline with the selected row
//! - [`diagnostics`]: Illegal characters and the syntax error
//! - [`status`]: Status bar with goal, parse result and keybindings
//!
//! Each pane module exports a stateless `render_*` function; scroll offsets
//! live in [`App`](crate::ui::App) and are clamped by the renderers.

pub mod diagnostics;
pub mod source;
pub mod status;
pub mod tree;

// Re-export render functions for convenience
pub use diagnostics::render_diagnostics_pane;
pub use source::{render_source_pane, SourceRenderData};
pub use status::render_status_bar;
pub use tree::render_tree_pane;
