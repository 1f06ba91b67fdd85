//! Scrollable help overlay listing the key bindings

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Stylize,
    symbols::border,
    text::Line,
    widgets::{Block, Clear, Padding, Paragraph, Widget},
};

/// Number of lines in the help text, for scroll bounds.
#[must_use]
pub fn line_count() -> usize {
    help_text().lines().count()
}

/// Render the centered help popup over `area`.
pub fn render_overlay(area: Rect, buf: &mut Buffer, scroll_offset: usize) {
    let popup_width = (area.width as f32 * 0.6) as u16;
    let popup_height = (area.height as f32 * 0.7) as u16;
    let popup_area = Rect {
        x: area.x + (area.width.saturating_sub(popup_width)) / 2,
        y: area.y + (area.height.saturating_sub(popup_height)) / 2,
        width: popup_width,
        height: popup_height,
    };

    Clear.render(popup_area, buf);

    let lines: Vec<&str> = help_text().lines().collect();
    let visible_height = popup_height.saturating_sub(2) as usize;
    let start = scroll_offset.min(lines.len());
    let end = (start + visible_height).min(lines.len());
    let body = lines[start..end].join("\n");

    let block = Block::bordered()
        .padding(Padding::horizontal(1))
        .title(Line::from(" dcmtree help ".bold()).centered())
        .border_set(border::ROUNDED);

    Paragraph::new(body).block(block).render(popup_area, buf);
}

const fn help_text() -> &'static str {
    r#"Navigation:
  ?                    - Show this help
  q/Esc                - Quit
  1                    - Sort tree by filename
  2                    - Sort tree by tags
  3                    - Sort tree by tags, only showing tags with different values

  Enter/Space          - Toggle expand/collapse
  j/down/ctrl+n        - Move down the visible tree
  k/up/ctrl+p          - Move up the visible tree
  h/left               - Collapse node or move to parent
  l/right              - Expand node or move to first child
  H/shift+left         - Move to parent
  L/shift+right        - Move to first child (expands the node)
  J/shift+down         - Move to next node on the same level
  K/shift+up           - Move to previous node on the same level
  g                    - Jump to root
  G                    - Jump to last visible node
  0/^                  - Move to first sibling
  $                    - Move to last sibling
  e                    - Expand current node and siblings
  c                    - Collapse current node and siblings
  E                    - Expand current subtree recursively
  C                    - Collapse current subtree recursively

  ctrl+u               - Move half page up
  ctrl+d               - Move half page down
  ctrl+f/page-down     - Move page down
  ctrl+b/page-up       - Move page up

Search:
  /                    - Incremental search (2 characters minimum)
  n                    - Jump to next match
  N                    - Jump to previous match
"#
}
