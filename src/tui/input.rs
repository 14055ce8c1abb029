//! Input field handling for the terminal user interface.

use crossterm::event::KeyCode;

/// A single-line text input with cursor position tracking.
#[derive(Clone, Default)]
pub struct InputField {
    pub value: String,
    pub cursor: usize,
}

impl InputField {
    /// Create a new empty input field.
    pub fn new() -> Self {
        InputField::default()
    }

    /// Create an input field with initial text value.
    pub fn with_value(value: &str) -> Self {
        InputField {
            value: value.to_string(),
            cursor: value.chars().count(),
        }
    }

    /// Byte offset of the cursor within the value.
    fn byte_cursor(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    /// Insert a character at the current cursor position.
    pub fn handle_char(&mut self, c: char) {
        let at = self.byte_cursor();
        self.value.insert(at, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor.
    pub fn handle_backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_cursor();
            self.value.remove(at);
        }
    }

    /// Delete the character at the cursor position.
    pub fn handle_delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            let at = self.byte_cursor();
            self.value.remove(at);
        }
    }

    /// Clear the field entirely.
    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    /// Route a key press into this field. Returns true if the value changed.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char(c) => {
                self.handle_char(c);
                true
            }
            KeyCode::Backspace => {
                let had = self.cursor > 0;
                self.handle_backspace();
                had
            }
            KeyCode::Delete => {
                let had = self.cursor < self.value.chars().count();
                self.handle_delete();
                had
            }
            KeyCode::Left => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                }
                false
            }
            KeyCode::Right => {
                if self.cursor < self.value.chars().count() {
                    self.cursor += 1;
                }
                false
            }
            KeyCode::Home => {
                self.cursor = 0;
                false
            }
            KeyCode::End => {
                self.cursor = self.value.chars().count();
                false
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editing_keeps_cursor_consistent() {
        let mut field = InputField::with_value("abc");
        field.handle_key(KeyCode::Left);
        field.handle_char('X');
        assert_eq!(field.value, "abXc");

        field.handle_backspace();
        assert_eq!(field.value, "abc");
    }

    #[test]
    fn handle_key_reports_value_changes() {
        let mut field = InputField::new();
        assert!(field.handle_key(KeyCode::Char('a')));
        assert!(!field.handle_key(KeyCode::Left));
        assert!(field.handle_key(KeyCode::Backspace));
        assert!(!field.handle_key(KeyCode::Backspace));
    }
}
