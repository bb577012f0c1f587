//! Source code pane rendering with syntax highlighting
//!
//! Highlighting is driven by the real lexer output, so what is colored as a
//! keyword here is exactly what the parser sees as a keyword.
//!
//! # Features
//!
//! - Token coloring for keywords, strings, numbers and punctuation
//! - Characters the lexer rejected are underlined in the error color
//! - The line of the selected tree row is highlighted
//! - The line of a syntax error is painted red

use crate::parser::ast::SourceLocation;
use crate::parser::lexer::{LexError, Token, TokenKind};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Everything the source pane draws from
pub struct SourceRenderData<'a> {
    pub source: &'a str,
    pub tokens: &'a [Token],
    pub diagnostics: &'a [LexError],
    pub selected_line: Option<usize>,
    pub error_location: Option<SourceLocation>,
}

fn token_style(kind: TokenKind) -> Style {
    match kind {
        k if k.is_keyword() => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
        TokenKind::String => Style::default().fg(DEFAULT_THEME.string),
        TokenKind::Number => Style::default().fg(DEFAULT_THEME.number),
        TokenKind::LParen | TokenKind::RParen | TokenKind::LBrace | TokenKind::RBrace => {
            Style::default().fg(DEFAULT_THEME.primary) // Brackets
        }
        _ => Style::default().fg(DEFAULT_THEME.fg),
    }
}

/// Style every character of one source line from the tokens that start on it.
fn highlight_line<'a>(
    line_no: usize,
    text: &'a str,
    tokens: &[Token],
    diagnostics: &[LexError],
) -> Line<'a> {
    let chars: Vec<char> = text.chars().collect();
    let mut styles = vec![Style::default().fg(DEFAULT_THEME.fg); chars.len()];

    for token in tokens.iter().filter(|t| t.location.line == line_no) {
        let start = token.location.column.saturating_sub(1);
        let end = (start + token.width()).min(chars.len());
        for style in styles.iter_mut().take(end).skip(start) {
            *style = token_style(token.kind);
        }
    }

    for diag in diagnostics.iter().filter(|d| d.location.line == line_no) {
        if let Some(style) = styles.get_mut(diag.location.column.saturating_sub(1)) {
            *style = Style::default()
                .fg(DEFAULT_THEME.error)
                .add_modifier(Modifier::UNDERLINED);
        }
    }

    // Merge runs of equal style into spans
    let mut spans = Vec::new();
    let mut run = String::new();
    let mut run_style = None;
    for (ch, style) in chars.into_iter().zip(styles) {
        if run_style != Some(style) && !run.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut run), run_style.unwrap_or_default()));
        }
        run_style = Some(style);
        run.push(ch);
    }
    if !run.is_empty() {
        spans.push(Span::styled(run, run_style.unwrap_or_default()));
    }

    Line::from(spans)
}

/// Render the source code pane
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    data: &SourceRenderData,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Source Code ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let lines: Vec<&str> = data.source.lines().collect();
    let total_lines = lines.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders (2), min 1

    if total_lines > visible_height {
        *scroll_offset = (*scroll_offset).min(total_lines - visible_height);
    } else {
        *scroll_offset = 0;
    }

    let error_line = data.error_location.map(|loc| loc.line);

    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(idx, text)| {
            let line_num = idx + 1;
            let is_error = error_line == Some(line_num);
            let is_selected = data.selected_line == Some(line_num);

            let num_style = if is_error {
                Style::default()
                    .fg(DEFAULT_THEME.error)
                    .add_modifier(Modifier::BOLD)
            } else if is_selected {
                Style::default()
                    .fg(DEFAULT_THEME.secondary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment)
            };

            let mut content = highlight_line(line_num, text, data.tokens, data.diagnostics);
            if is_error {
                // White text on red for visibility
                let error_style = Style::default()
                    .bg(DEFAULT_THEME.error)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD);
                for span in &mut content.spans {
                    span.style = error_style;
                }
            } else if is_selected {
                let bg = Style::default().bg(DEFAULT_THEME.current_line_bg);
                for span in &mut content.spans {
                    span.style = span.style.patch(bg);
                }
            }

            let mut spans = vec![Span::styled(format!("{:4} ", line_num), num_style)];
            spans.extend(content.spans);
            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::tokenize;

    #[test]
    fn test_highlight_covers_whole_line() {
        let source = "var s = \"hi\"; @";
        let (tokens, diagnostics) = tokenize(source);
        let line = highlight_line(1, source, &tokens, &diagnostics);

        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, source);

        let keyword = &line.spans[0];
        assert_eq!(keyword.content, "var");
        assert_eq!(keyword.style, token_style(TokenKind::Var));

        let string = line
            .spans
            .iter()
            .find(|s| s.content.contains("hi"))
            .unwrap();
        assert_eq!(string.content, "\"hi\"");

        let illegal = line.spans.last().unwrap();
        assert_eq!(illegal.content, "@");
        assert!(illegal.style.add_modifier.contains(Modifier::UNDERLINED));
    }
}
