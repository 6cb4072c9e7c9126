use super::*;

#[test]
fn enter_submits() {
    assert_eq!(classify(KeyPress::plain(Key::Enter)), KeyAction::Submit);
}

#[test]
fn shift_enter_inserts_line_break() {
    assert_eq!(classify(KeyPress::shifted(Key::Enter)), KeyAction::Insert('\n'));
}

#[test]
fn shifted_chars_are_plain_inserts() {
    assert_eq!(classify(KeyPress::shifted(Key::Char('A'))), KeyAction::Insert('A'));
}

#[test]
fn apply_edits_buffer() {
    let mut input = String::from("gm");
    assert!(!apply(KeyAction::Insert('\n'), &mut input));
    assert!(!apply(KeyAction::Insert('!'), &mut input));
    assert_eq!(input, "gm\n!");
    assert!(!apply(KeyAction::DeleteBack, &mut input));
    assert_eq!(input, "gm\n");
}

#[test]
fn apply_submit_leaves_buffer_untouched() {
    let mut input = String::from("gm");
    assert!(apply(KeyAction::Submit, &mut input));
    assert_eq!(input, "gm");
}

#[test]
fn backspace_on_empty_is_harmless() {
    let mut input = String::new();
    assert!(!apply(KeyAction::DeleteBack, &mut input));
    assert!(input.is_empty());
}
