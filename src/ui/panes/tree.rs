//! AST outline pane rendering

use crate::ui::outline::{OutlineRow, RowKind};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn row_style(kind: RowKind) -> Style {
    match kind {
        RowKind::Declaration => Style::default()
            .fg(DEFAULT_THEME.type_name)
            .add_modifier(Modifier::BOLD),
        RowKind::Handler | RowKind::Entry => Style::default().fg(DEFAULT_THEME.function),
        RowKind::Statement => Style::default().fg(DEFAULT_THEME.keyword),
        RowKind::Literal => Style::default().fg(DEFAULT_THEME.number),
        RowKind::Condition | RowKind::Param => Style::default().fg(DEFAULT_THEME.secondary),
        RowKind::Expression => Style::default().fg(DEFAULT_THEME.fg),
    }
}

/// Render the AST outline pane.
///
/// `message` replaces the tree when there is nothing to show (failed parse).
pub fn render_tree_pane(
    frame: &mut Frame,
    area: Rect,
    rows: &[OutlineRow],
    message: Option<&str>,
    selected: usize,
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
        .title(" Syntax Tree ")
        .borders(Borders::ALL)
        .border_style(border_style);

    if rows.is_empty() {
        let paragraph = Paragraph::new(message.unwrap_or("(no tree)"))
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.error));
        frame.render_widget(paragraph, area);
        return;
    }

    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    // Keep the selected row inside the window
    if selected < *scroll_offset {
        *scroll_offset = selected;
    } else if selected >= *scroll_offset + visible_height {
        *scroll_offset = selected + 1 - visible_height;
    }

    let lines: Vec<Line> = rows
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(idx, row)| {
            let indent = "  ".repeat(row.depth);
            let marker = if idx == selected { "▸ " } else { "  " };
            let mut style = row_style(row.kind);
            if idx == selected {
                style = style.bg(DEFAULT_THEME.current_line_bg);
            }
            Line::from(vec![
                Span::styled(marker, Style::default().fg(DEFAULT_THEME.secondary)),
                Span::raw(indent),
                Span::styled(row.label.clone(), style),
                Span::styled(
                    format!("  :{}", row.line),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
            ])
        })
        .collect();

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}
