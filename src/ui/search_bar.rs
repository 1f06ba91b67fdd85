//! Single-line search input state and widget

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

/// Editable single-line query buffer.
///
/// The cursor is a character index, not a byte index, so multi-byte input
/// edits stay on character boundaries.
#[derive(Debug, Clone, Default)]
pub struct SearchInput {
    buffer: String,
    cursor: usize,
}

impl SearchInput {
    /// Create an empty input.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The current query text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Whether the buffer holds no text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    fn byte_index(&self) -> usize {
        self.buffer
            .char_indices()
            .nth(self.cursor)
            .map_or(self.buffer.len(), |(i, _)| i)
    }

    /// Insert a character at the cursor position.
    pub fn insert_char(&mut self, c: char) {
        let byte_idx = self.byte_index();
        self.buffer.insert(byte_idx, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let byte_idx = self.byte_index();
            let prev_byte_idx = self.buffer[..byte_idx]
                .char_indices()
                .next_back()
                .map_or(0, |(i, _)| i);
            self.buffer.remove(prev_byte_idx);
            self.cursor -= 1;
        }
    }

    /// Delete the character at the cursor.
    pub fn delete(&mut self) {
        let byte_idx = self.byte_index();
        if byte_idx < self.buffer.len() {
            self.buffer.remove(byte_idx);
        }
    }

    /// Move the cursor one character left.
    pub const fn cursor_left(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    /// Move the cursor one character right.
    pub fn cursor_right(&mut self) {
        if self.cursor < self.buffer.chars().count() {
            self.cursor += 1;
        }
    }

    /// Move the cursor to the start of the line.
    pub const fn cursor_home(&mut self) {
        self.cursor = 0;
    }

    /// Move the cursor past the last character.
    pub fn cursor_end(&mut self) {
        self.cursor = self.buffer.chars().count();
    }

    /// Clear the buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }
}

/// Widget drawing the query line with a `/` prefix and, while editing, a
/// highlighted cursor cell.
pub struct SearchBar<'a> {
    input: &'a SearchInput,
    active: bool,
    block: Option<Block<'a>>,
}

impl<'a> SearchBar<'a> {
    /// Create a search bar over the given input state.
    #[must_use]
    pub const fn new(input: &'a SearchInput, active: bool) -> Self {
        Self {
            input,
            active,
            block: None,
        }
    }

    /// Set the surrounding block.
    #[must_use]
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for SearchBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![Span::raw("/")];

        if self.active {
            let before: String = self.input.buffer.chars().take(self.input.cursor).collect();
            let at: String = self
                .input
                .buffer
                .chars()
                .skip(self.input.cursor)
                .take(1)
                .collect();
            let after: String = self.input.buffer.chars().skip(self.input.cursor + 1).collect();

            let cursor_cell = if at.is_empty() { " ".to_owned() } else { at };
            spans.push(Span::raw(before));
            spans.push(Span::styled(
                cursor_cell,
                Style::new().add_modifier(Modifier::REVERSED),
            ));
            spans.push(Span::raw(after));
        } else {
            spans.push(Span::raw(self.input.text().to_owned()));
        }

        let paragraph = Paragraph::new(Line::from(spans));
        match self.block {
            Some(block) => paragraph.block(block).render(area, buf),
            None => paragraph.render(area, buf),
        }
    }
}
