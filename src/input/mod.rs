// src/input/mod.rs

//! Button input from an evdev device.
//!
//! - [`device`] opens and checks the device node, lists keys held down at
//!   startup and spawns the reader task that feeds the runtime.
//! - [`decode`] turns raw input events into [`ButtonEvent`]s, dropping
//!   everything that is not a key press or release.
//!
//! [`ButtonEvent`]: crate::types::ButtonEvent

pub mod decode;
pub mod device;

pub use decode::{decode, edge};
pub use device::{log_pressed_keys, open_device, spawn_reader, BUTTON_CHANNEL_CAPACITY};
