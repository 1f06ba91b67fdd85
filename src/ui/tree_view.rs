//! Tree view widget rendering the visible nodes of a `TagTree`

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, StatefulWidget, Widget},
};

use crate::tree::TagTree;

/// Scroll state kept across frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeViewState {
    /// Index into the visible list of the first rendered row.
    pub offset: usize,
}

/// Stateful widget drawing the tree with indentation, expansion markers and
/// a highlighted cursor row. The cursor row is kept inside the viewport by
/// adjusting the scroll offset on every render.
pub struct TreeView<'a> {
    tree: &'a TagTree,
    block: Option<Block<'a>>,
    highlight_style: Style,
}

impl<'a> TreeView<'a> {
    /// Create a tree view over the given tree.
    #[must_use]
    pub const fn new(tree: &'a TagTree) -> Self {
        Self {
            tree,
            block: None,
            highlight_style: Style::new(),
        }
    }

    /// Set the surrounding block.
    #[must_use]
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    /// Set the style of the cursor row.
    #[must_use]
    pub const fn highlight_style(mut self, style: Style) -> Self {
        self.highlight_style = style;
        self
    }
}

/// Clamp `offset` so the selected row lies inside a window of `height` rows.
fn scrolled_offset(selected: usize, offset: usize, height: usize, len: usize) -> usize {
    let offset = offset.min(len.saturating_sub(1));
    if selected < offset {
        selected
    } else if selected >= offset + height {
        selected + 1 - height
    } else {
        offset
    }
}

impl StatefulWidget for TreeView<'_> {
    type State = TreeViewState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let area = self.block.as_ref().map_or(area, |b| {
            let inner = b.inner(area);
            b.clone().render(area, buf);
            inner
        });
        if area.height == 0 || area.width == 0 {
            return;
        }

        let visible = self.tree.visible_with_depth();
        let selected = visible
            .iter()
            .position(|&(id, _)| id == self.tree.cursor())
            .unwrap_or(0);

        let height = area.height as usize;
        state.offset = scrolled_offset(selected, state.offset, height, visible.len());

        let end = (state.offset + height).min(visible.len());
        for (row, &(id, depth)) in visible[state.offset..end].iter().enumerate() {
            let node = self.tree.node(id);
            let marker = if node.is_leaf() {
                "  "
            } else if node.expanded {
                "▾ "
            } else {
                "▸ "
            };

            let style = if id == self.tree.cursor() {
                self.highlight_style
            } else {
                Style::new()
            };

            let line = Line::from(vec![
                Span::raw("  ".repeat(depth)),
                Span::raw(marker),
                Span::styled(node.label.as_str(), style),
            ]);
            buf.set_line(area.x, area.y + row as u16, &line, area.width);
        }
    }
}
