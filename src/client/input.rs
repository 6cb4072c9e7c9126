//! Composer key handling.
//!
//! Enter submits; Shift+Enter inserts a literal line break. Every other key
//! edits the input buffer and never submits.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Enter,
    Backspace,
    Char(char),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub shift: bool,
}

impl KeyPress {
    #[must_use]
    pub fn plain(key: Key) -> Self {
        Self { key, shift: false }
    }

    #[must_use]
    pub fn shifted(key: Key) -> Self {
        Self { key, shift: true }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Submit,
    Insert(char),
    DeleteBack,
}

/// Map a key press to the composer action it triggers.
#[must_use]
pub fn classify(press: KeyPress) -> KeyAction {
    match press.key {
        Key::Enter if press.shift => KeyAction::Insert('\n'),
        Key::Enter => KeyAction::Submit,
        Key::Backspace => KeyAction::DeleteBack,
        Key::Char(c) => KeyAction::Insert(c),
    }
}

/// Apply a non-submitting action to the input buffer.
///
/// Returns `true` when the caller should submit the buffer instead.
pub fn apply(action: KeyAction, input: &mut String) -> bool {
    match action {
        KeyAction::Submit => return true,
        KeyAction::Insert(c) => input.push(c),
        KeyAction::DeleteBack => {
            input.pop();
        }
    }
    false
}

#[cfg(test)]
#[path = "input_test.rs"]
mod tests;
