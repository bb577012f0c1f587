//! Diagnostics pane rendering: lexical errors and the syntax error, if any

use crate::parser::lexer::LexError;
use crate::parser::SyntaxError;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

/// Render the diagnostics pane
pub fn render_diagnostics_pane(
    frame: &mut Frame,
    area: Rect,
    diagnostics: &[LexError],
    syntax_error: Option<&SyntaxError>,
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
        .title(" Diagnostics ")
        .borders(Borders::ALL)
        .border_style(border_style);

    if diagnostics.is_empty() && syntax_error.is_none() {
        let paragraph = Paragraph::new("(no diagnostics)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.success));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let warning = Style::default().fg(DEFAULT_THEME.secondary);
    let error = Style::default()
        .fg(DEFAULT_THEME.error)
        .add_modifier(Modifier::BOLD);

    let all_items: Vec<ListItem> = diagnostics
        .iter()
        .map(|d| ListItem::new(d.to_string()).style(warning))
        .chain(syntax_error.map(|e| ListItem::new(e.to_string()).style(error)))
        .collect();

    let total_items = all_items.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders, min 1

    if total_items > visible_height {
        *scroll_offset = (*scroll_offset).min(total_items - visible_height);
    } else {
        *scroll_offset = 0;
    }

    let visible_items: Vec<ListItem> = all_items
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .collect();

    let list = List::new(visible_items).block(block);
    frame.render_widget(list, area);
}
