use std::ops::Range;

use taskcalc_core::{Signal, SubId, signal};
use unicode_segmentation::UnicodeSegmentation;

/// A form field the calculator can read from and write to.
///
/// Handles are cheap clones of a shared field; writing through one is seen by
/// every other handle.
pub trait FieldHandle {
    fn value(&self) -> String;
    fn set_value(&self, value: &str);
}

/// find prev/next grapheme boundaries around a byte index
fn prev_grapheme_boundary(text: &str, byte: usize) -> usize {
    let mut last = 0usize;
    for (i, _) in text.grapheme_indices(true) {
        if i >= byte {
            break;
        }
        last = i;
    }
    last
}

fn next_grapheme_boundary(text: &str, byte: usize) -> usize {
    for (i, _) in text.grapheme_indices(true) {
        if i > byte {
            return i;
        }
    }
    text.len()
}

/// Editable text with a caret. `selection` holds byte offsets on grapheme
/// boundaries; an empty range is a plain caret.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextFieldState {
    pub text: String,
    pub selection: Range<usize>,
}

impl TextFieldState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        let mut state = Self::new();
        state.set_text(text);
        state
    }

    /// Replaces the whole text and parks the caret at the end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        let end = self.text.len();
        self.selection = end..end;
    }

    /// Selection as an ordered byte range inside the text. Extending the
    /// selection leftwards leaves `selection.end` before `selection.start`.
    fn ordered_selection(&self) -> Range<usize> {
        let len = self.text.len();
        let start = self.selection.start.min(self.selection.end).min(len);
        let end = self.selection.start.max(self.selection.end).min(len);
        start..end
    }

    pub fn insert_text(&mut self, text: &str) {
        let Range { start, end } = self.ordered_selection();

        self.text.replace_range(start..end, text);
        let new_pos = start + text.len();
        self.selection = new_pos..new_pos;
    }

    pub fn delete_backward(&mut self) {
        if self.selection.start == self.selection.end {
            let pos = self.selection.start.min(self.text.len());
            if pos > 0 {
                let prev = prev_grapheme_boundary(&self.text, pos);
                self.text.replace_range(prev..pos, "");
                self.selection = prev..prev;
            }
        } else {
            self.insert_text("");
        }
    }

    pub fn delete_forward(&mut self) {
        if self.selection.start == self.selection.end {
            let pos = self.selection.start.min(self.text.len());
            if pos < self.text.len() {
                let next = next_grapheme_boundary(&self.text, pos);
                self.text.replace_range(pos..next, "");
            }
        } else {
            self.insert_text("");
        }
    }

    pub fn move_cursor(&mut self, delta: isize, extend_selection: bool) {
        let mut pos = self.selection.end.min(self.text.len());
        if delta < 0 {
            for _ in 0..delta.unsigned_abs() {
                pos = prev_grapheme_boundary(&self.text, pos);
            }
        } else {
            for _ in 0..delta.unsigned_abs() {
                pos = next_grapheme_boundary(&self.text, pos);
            }
        }
        if extend_selection {
            self.selection.end = pos;
        } else {
            self.selection = pos..pos;
        }
    }

    pub fn select_all(&mut self) {
        self.selection = 0..self.text.len();
    }

    pub fn selected_text(&self) -> &str {
        self.text.get(self.ordered_selection()).unwrap_or("")
    }
}

/// In-memory input element. Its state lives in a [`Signal`], so observers see
/// every edit and every programmatic write.
#[derive(Clone)]
pub struct InputField {
    state: Signal<TextFieldState>,
}

impl Default for InputField {
    fn default() -> Self {
        Self::new("")
    }
}

impl InputField {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            state: signal(TextFieldState::with_text(text)),
        }
    }

    pub fn state(&self) -> TextFieldState {
        self.state.get()
    }

    /// Applies an edit and notifies observers.
    pub fn edit(&self, f: impl FnOnce(&mut TextFieldState)) {
        self.state.update(f);
    }

    /// Calls `f` with the new text after every change.
    pub fn on_change(&self, f: impl Fn(&str) + 'static) -> SubId {
        self.state.subscribe(move |s| f(&s.text))
    }

    pub fn remove_on_change(&self, id: SubId) -> bool {
        self.state.unsubscribe(id)
    }

    pub fn same_field(&self, other: &InputField) -> bool {
        self.state.ptr_eq(&other.state)
    }
}

impl FieldHandle for InputField {
    fn value(&self) -> String {
        self.state.with(|s| s.text.clone())
    }

    fn set_value(&self, value: &str) {
        self.state.update(|s| s.set_text(value));
    }
}
