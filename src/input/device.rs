// src/input/device.rs

use std::path::Path;

use evdev::{Device, EventType};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::errors::{PomoError, Result};
use crate::input::decode::decode;
use crate::types::{ButtonEvent, KeyCode};

/// Buffer between the device reader and the runtime.
pub const BUTTON_CHANNEL_CAPACITY: usize = 64;

/// Open `path` and make sure it can report key/button events.
pub fn open_device(path: &Path) -> Result<Device> {
    let device = Device::open(path)
        .map_err(|e| PomoError::DeviceError(format!("cannot open {}: {e}", path.display())))?;

    if !device.supported_events().contains(EventType::KEY) {
        return Err(PomoError::DeviceError(format!(
            "device {} does not support key/button events",
            path.display()
        )));
    }

    info!(
        path = %path.display(),
        name = device.name().unwrap_or("<unnamed>"),
        "opened input device"
    );
    Ok(device)
}

/// Log every key currently held down on the device and return their codes.
pub fn log_pressed_keys(device: &Device) -> Vec<KeyCode> {
    let keys = match device.get_key_state() {
        Ok(keys) => keys,
        Err(e) => {
            warn!(error = %e, "could not read current key state");
            return Vec::new();
        }
    };

    keys.iter()
        .map(|key| {
            info!(code = %format!("0x{:02x}", key.code()), key = ?key, "key currently pressed");
            key.code()
        })
        .collect()
}

/// Spawn a task that reads the device and forwards button edges.
///
/// The returned receiver closes when the device stream ends or fails; the
/// error is logged by the reader task.
pub fn spawn_reader(
    device: Device,
    capacity: usize,
) -> Result<(mpsc::Receiver<ButtonEvent>, JoinHandle<()>)> {
    let mut stream = device.into_event_stream()?;
    let (tx, rx) = mpsc::channel::<ButtonEvent>(capacity);

    let handle = tokio::spawn(async move {
        info!("input reader started");

        loop {
            let event = match stream.next_event().await {
                Ok(event) => event,
                Err(e) => {
                    error!(error = %e, "reading input device failed");
                    break;
                }
            };

            let Some(button) = decode(&event) else {
                continue;
            };

            debug!(%button, "button event");
            if tx.send(button).await.is_err() {
                debug!("runtime dropped the button channel");
                break;
            }
        }

        info!("input reader finished");
    });

    Ok((rx, handle))
}
