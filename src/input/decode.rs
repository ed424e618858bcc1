// src/input/decode.rs

use evdev::{EventType, InputEvent};

use crate::types::{ButtonEvent, KeyCode};

/// `value` of a key event when the key goes up.
pub const KEY_RELEASE: i32 = 0;
/// `value` of a key event when the key goes down.
pub const KEY_PRESS: i32 = 1;
/// `value` of a key event emitted by autorepeat while a key is held.
pub const KEY_REPEAT: i32 = 2;

/// Convert a raw device event into a button edge.
///
/// Non-key events (sync reports, relative axes, misc scancodes, ...) and
/// autorepeat are discarded.
pub fn decode(event: &InputEvent) -> Option<ButtonEvent> {
    if event.event_type() != EventType::KEY {
        return None;
    }
    edge(event.code(), event.value())
}

/// Map a key event value to a press or release of `code`.
pub fn edge(code: KeyCode, value: i32) -> Option<ButtonEvent> {
    match value {
        KEY_PRESS => Some(ButtonEvent::press(code)),
        KEY_RELEASE => Some(ButtonEvent::release(code)),
        _ => None,
    }
}
