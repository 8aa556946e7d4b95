//! Property-based tests for the text field editor.
//!
//! Arbitrary key sequences over multi-byte input must keep the cursor on a
//! character boundary and inside the text.

use huddle_app::{KeyInput, TextInput};
use proptest::prelude::*;

fn key_strategy() -> impl Strategy<Value = KeyInput> {
    prop_oneof![
        4 => prop::sample::select(vec!['a', 'é', '字', '🦀', ' ']).prop_map(KeyInput::Char),
        1 => Just(KeyInput::Backspace),
        1 => Just(KeyInput::Delete),
        1 => Just(KeyInput::Left),
        1 => Just(KeyInput::Right),
        1 => Just(KeyInput::Home),
        1 => Just(KeyInput::End),
        1 => Just(KeyInput::Enter),
    ]
}

#[test]
fn cursor_stays_within_text() {
    proptest!(|(keys in prop::collection::vec(key_strategy(), 0..64))| {
        let mut input = TextInput::new();
        for key in keys {
            input.handle_key(key);
            prop_assert!(input.cursor() <= input.text().chars().count());
        }
    });
}

#[test]
fn typing_appends_in_order() {
    proptest!(|(text in "\\PC{0,32}")| {
        let mut input = TextInput::new();
        for c in text.chars() {
            input.handle_key(KeyInput::Char(c));
        }
        prop_assert_eq!(input.text(), text.as_str());
        prop_assert_eq!(input.cursor(), text.chars().count());
    });
}

#[test]
fn take_empties_field() {
    let mut input = TextInput::new();
    for c in "draft".chars() {
        input.handle_key(KeyInput::Char(c));
    }

    assert_eq!(input.take(), "draft");
    assert!(input.text().is_empty());
    assert_eq!(input.cursor(), 0);
}
