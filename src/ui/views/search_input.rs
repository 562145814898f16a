//! Search input view.
//!
//! Owns the text field and the clear affordance. Every edit is a change
//! event: the field is trimmed into a [`Query`] which the caller hands to the
//! search root. The input never holds the committed query itself.

use maud::{html, Markup, Render};

use crate::domain::Query;
use crate::ui::components::TextBuffer;

/// An edit applied to the search field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEdit {
    /// Type a character at the cursor.
    Insert(char),
    /// Paste text at the cursor.
    InsertStr(String),
    Backspace,
    Delete,
    DeleteWordBackward,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
    /// Replace the whole field value.
    Replace(String),
}

/// The search text box with its clear ("X") link.
#[derive(Debug, Clone, Default)]
pub struct SearchInput {
    field: TextBuffer,
    clear_visible: bool,
}

impl SearchInput {
    /// Creates an empty input with the clear link hidden.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies an edit and reports the resulting query.
    pub fn apply(&mut self, edit: InputEdit) -> Query {
        match edit {
            InputEdit::Insert(c) => self.field.insert_char(c),
            InputEdit::InsertStr(s) => self.field.insert_str(&s),
            InputEdit::Backspace => {
                self.field.backspace();
            }
            InputEdit::Delete => {
                self.field.delete();
            }
            InputEdit::DeleteWordBackward => {
                self.field.delete_word_backward();
            }
            InputEdit::CursorLeft => self.field.move_left(),
            InputEdit::CursorRight => self.field.move_right(),
            InputEdit::CursorHome => self.field.move_to_start(),
            InputEdit::CursorEnd => self.field.move_to_end(),
            InputEdit::Replace(text) => self.field.set_text(text),
        }
        self.on_change()
    }

    /// Reads the field after a change event.
    pub fn on_change(&mut self) -> Query {
        let query = Query::normalize(self.field.text());
        self.clear_visible = !query.is_empty();
        query
    }

    /// Empties the field and hides the clear link.
    pub fn clear(&mut self) -> Query {
        self.field.clear();
        self.clear_visible = false;
        Query::empty()
    }

    /// Raw field text as displayed.
    pub fn value(&self) -> &str {
        self.field.text()
    }

    /// Cursor position in the field.
    pub fn cursor(&self) -> usize {
        self.field.cursor()
    }

    /// Whether the clear link is shown.
    pub fn is_clear_visible(&self) -> bool {
        self.clear_visible
    }
}

impl Render for SearchInput {
    fn render(&self) -> Markup {
        let clear_style = (!self.clear_visible).then_some("display: none;");
        html! {
            div id="search-box" {
                input autocomplete="off" type="search" id="search" placeholder="Search..." value=(self.value());
                a href="#" id="search-clear" style=[clear_style] { "X" }
            }
        }
    }
}
