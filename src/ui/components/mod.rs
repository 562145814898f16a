//! Reusable UI pieces.
//!
//! Components here hold no fetch state; views compose them.

mod entity_row;
mod text_buffer;

pub use entity_row::EntityRow;
pub use text_buffer::TextBuffer;
