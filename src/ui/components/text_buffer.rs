//! Editable field contents with a cursor.
//!
//! Keyboard capture belongs to the host; the buffer only applies edits.

/// Field text plus a cursor, in bytes, always on a char boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
    cursor: usize,
}

impl TextBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Cursor position in bytes.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether the buffer holds no text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Replaces the contents and moves the cursor to the end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.text.len();
    }

    /// Clear the buffer.
    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Insert a character at the cursor.
    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Insert text at the cursor.
    pub fn insert_str(&mut self, s: &str) {
        self.text.insert_str(self.cursor, s);
        self.cursor += s.len();
    }

    /// Removes the char before the cursor. Returns whether anything changed.
    pub fn backspace(&mut self) -> bool {
        match self.prev_boundary() {
            Some(prev) => {
                self.text.replace_range(prev..self.cursor, "");
                self.cursor = prev;
                true
            }
            None => false,
        }
    }

    /// Removes the char under the cursor. Returns whether anything changed.
    pub fn delete(&mut self) -> bool {
        match self.next_boundary() {
            Some(next) => {
                self.text.replace_range(self.cursor..next, "");
                true
            }
            None => false,
        }
    }

    /// Move the cursor one char left.
    pub fn move_left(&mut self) {
        if let Some(prev) = self.prev_boundary() {
            self.cursor = prev;
        }
    }

    /// Move the cursor one char right.
    pub fn move_right(&mut self) {
        if let Some(next) = self.next_boundary() {
            self.cursor = next;
        }
    }

    /// Move the cursor to the start.
    pub fn move_to_start(&mut self) {
        self.cursor = 0;
    }

    /// Move the cursor to the end.
    pub fn move_to_end(&mut self) {
        self.cursor = self.text.len();
    }

    /// Deletes back to the start of the previous word, skipping whitespace
    /// directly before the cursor first.
    pub fn delete_word_backward(&mut self) -> bool {
        let head = &self.text[..self.cursor];
        let trimmed = head.trim_end();
        let start = trimmed
            .char_indices()
            .rev()
            .find(|(_, c)| c.is_whitespace())
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        if start == self.cursor {
            return false;
        }
        self.text.replace_range(start..self.cursor, "");
        self.cursor = start;
        true
    }

    fn prev_boundary(&self) -> Option<usize> {
        self.text[..self.cursor].char_indices().next_back().map(|(i, _)| i)
    }

    fn next_boundary(&self) -> Option<usize> {
        self.text[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
    }
}
