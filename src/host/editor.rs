use crate::host::{Editor, ScrollPosition};
use std::ops::Range;

/// In-memory [`Editor`] over a string.
///
/// The selection is a byte range. Like a real editor, replacing the whole
/// document resets the viewport to the top.
#[derive(Debug, Clone, Default)]
pub struct BufferEditor {
    text: String,
    selection: Option<Range<usize>>,
    scroll: ScrollPosition,
}

impl BufferEditor {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            selection: None,
            scroll: ScrollPosition::default(),
        }
    }

    /// Select `range`. Ranges that are empty, out of bounds, or not on
    /// character boundaries clear the selection instead.
    pub fn select(&mut self, range: Range<usize>) {
        let valid = range.start < range.end
            && range.end <= self.text.len()
            && self.text.is_char_boundary(range.start)
            && self.text.is_char_boundary(range.end);
        self.selection = valid.then_some(range);
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn has_selection(&self) -> bool {
        self.selection.is_some()
    }
}

impl Editor for BufferEditor {
    fn selection(&self) -> Option<String> {
        self.selection
            .as_ref()
            .map(|range| self.text[range.clone()].to_string())
    }

    fn value(&self) -> String {
        self.text.clone()
    }

    fn replace_selection(&mut self, text: &str) {
        match self.selection.take() {
            Some(range) => self.text.replace_range(range, text),
            None => self.text.push_str(text),
        }
    }

    fn set_value(&mut self, text: &str) {
        self.text = text.to_string();
        self.selection = None;
        self.scroll = ScrollPosition::default();
    }

    fn scroll_position(&self) -> ScrollPosition {
        self.scroll
    }

    fn scroll_to(&mut self, position: ScrollPosition) {
        self.scroll = position;
    }
}
