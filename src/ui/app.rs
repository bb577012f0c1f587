//! Main TUI application state and logic

use crate::parser::ast::SourceLocation;
use crate::parser::lexer::{tokenize_with, LexError, LexerConfig, Token};
use crate::parser::{Goal, ParseOutput, SyntaxError};
use crate::ui::outline::{outline, OutlineRow};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Tree,
    Diagnostics,
}

impl FocusedPane {
    /// Move focus to the next pane (source -> tree -> diagnostics)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Tree,
            FocusedPane::Tree => FocusedPane::Diagnostics,
            FocusedPane::Diagnostics => FocusedPane::Source,
        }
    }
}

/// The main application state
pub struct App {
    pub source_code: String,
    pub goal: Goal,

    /// Tokens used for highlighting, from the same lexer configuration as the parse
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<LexError>,
    pub syntax_error: Option<SyntaxError>,
    pub rows: Vec<OutlineRow>,

    pub focused_pane: FocusedPane,
    pub selected_row: usize,

    /// Per-pane scroll offsets
    pub source_scroll: usize,
    pub tree_scroll: usize,
    pub diagnostics_scroll: usize,
    /// Source lines visible at the last render, 0 before the first one
    pub source_view_height: usize,

    pub should_quit: bool,
    pub status_message: String,
}

impl App {
    /// Create a new app from a finished parse of `source_code`
    pub fn new(source_code: String, goal: Goal, config: LexerConfig, output: ParseOutput) -> Self {
        let (tokens, _) = tokenize_with(&source_code, config);
        let (rows, syntax_error) = match output.result {
            Ok(root) => (outline(&root), None),
            Err(err) => (Vec::new(), Some(err)),
        };

        let status_message = match &syntax_error {
            Some(err) => format!("Parse failed at line {}", err.location.line),
            None if output.diagnostics.is_empty() => "Parsed successfully".to_string(),
            None => format!(
                "Parsed with {} illegal character(s)",
                output.diagnostics.len()
            ),
        };

        let mut app = App {
            source_code,
            goal,
            tokens,
            diagnostics: output.diagnostics,
            syntax_error,
            rows,
            focused_pane: FocusedPane::Tree,
            selected_row: 0,
            source_scroll: 0,
            tree_scroll: 0,
            diagnostics_scroll: 0,
            source_view_height: 0,
            should_quit: false,
            status_message,
        };
        if app.syntax_error.is_some() {
            app.jump_to_error();
        }
        app
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Source line of the selected tree row
    pub fn selected_line(&self) -> Option<usize> {
        self.rows.get(self.selected_row).map(|row| row.line)
    }

    fn error_location(&self) -> Option<SourceLocation> {
        self.syntax_error.as_ref().map(|e| e.location)
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // Panes on top, status bar at bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        // Left: source | Right: tree over diagnostics
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(main_chunks[0]);

        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(columns[1]);

        // Account for borders (2), min 1
        self.source_view_height = columns[0].height.saturating_sub(2).max(1) as usize;

        let source_data = super::panes::SourceRenderData {
            source: &self.source_code,
            tokens: &self.tokens,
            diagnostics: &self.diagnostics,
            selected_line: self.selected_line(),
            error_location: self.error_location(),
        };
        super::panes::render_source_pane(
            frame,
            columns[0],
            &source_data,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        let tree_message = self
            .syntax_error
            .as_ref()
            .map(|_| "No tree: the input did not parse. See diagnostics.");
        super::panes::render_tree_pane(
            frame,
            right_rows[0],
            &self.rows,
            tree_message,
            self.selected_row,
            self.focused_pane == FocusedPane::Tree,
            &mut self.tree_scroll,
        );

        super::panes::render_diagnostics_pane(
            frame,
            right_rows[1],
            &self.diagnostics,
            self.syntax_error.as_ref(),
            self.focused_pane == FocusedPane::Diagnostics,
            &mut self.diagnostics_scroll,
        );

        super::panes::render_status_bar(
            frame,
            main_chunks[1],
            &self.status_message,
            self.goal,
            self.syntax_error.is_none(),
        );
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Tree => {
                    self.selected_row = self.selected_row.saturating_sub(1);
                    self.follow_selection();
                }
                FocusedPane::Source => {
                    self.source_scroll = self.source_scroll.saturating_sub(1);
                }
                FocusedPane::Diagnostics => {
                    self.diagnostics_scroll = self.diagnostics_scroll.saturating_sub(1);
                }
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Tree => {
                    if self.selected_row + 1 < self.rows.len() {
                        self.selected_row += 1;
                    }
                    self.follow_selection();
                }
                FocusedPane::Source => {
                    self.source_scroll = self.source_scroll.saturating_add(1);
                }
                FocusedPane::Diagnostics => {
                    self.diagnostics_scroll = self.diagnostics_scroll.saturating_add(1);
                }
            },
            KeyCode::Enter => {
                self.jump_to_error();
            }
            _ => {}
        }
    }

    /// Scroll the source pane so the selected row's line is on screen
    fn follow_selection(&mut self) {
        let Some(line) = self.selected_line() else {
            return;
        };
        let idx = line.saturating_sub(1);
        let height = self.source_view_height;
        if idx < self.source_scroll {
            self.source_scroll = idx;
        } else if height > 0 && idx >= self.source_scroll + height {
            self.source_scroll = idx + 1 - height;
        }
    }

    fn jump_to_error(&mut self) {
        match self.error_location() {
            Some(loc) => {
                self.source_scroll = loc.line.saturating_sub(1);
                self.focused_pane = FocusedPane::Source;
                self.status_message = format!(
                    "Syntax error at line {}, column {}",
                    loc.line, loc.column
                );
            }
            None => {
                self.status_message = "No syntax error".to_string();
            }
        }
    }
}
