use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossterm::event::{read, Event, KeyCode};

use super::key_latch::KeyLatch;

/// How long a keypress counts as "held". Terminals never report key
/// releases, so this is the hold window.
const KEY_TIMEOUT: Duration = Duration::from_millis(250);

/// Owns the listener thread that turns terminal key events into latch
/// updates: hex-pad keys via the QWERTY map, space for pause, escape
/// for quit.
pub struct KeyManager {
    latch: Arc<KeyLatch>,
    stop: Arc<AtomicBool>,
    _listener: JoinHandle<()>,
}

impl KeyManager {
    pub fn new() -> KeyManager {
        let latch = Arc::new(KeyLatch::new(KEY_TIMEOUT));
        let stop = Arc::new(AtomicBool::new(false));
        let listener = event_listener(latch.clone(), stop.clone());
        KeyManager {
            latch,
            stop,
            _listener: listener,
        }
    }

    pub fn latch(&self) -> Arc<KeyLatch> {
        self.latch.clone()
    }
}

impl Drop for KeyManager {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        // The listener notices after its next event; not worth joining.
    }
}

/// Starts a thread that reads terminal events and feeds the latch.
fn event_listener(latch: Arc<KeyLatch>, stop: Arc<AtomicBool>) -> JoinHandle<()> {
    thread::spawn(move || loop {
        let event = match read() {
            Ok(event) => event,
            Err(e) => {
                log::error!("failed to read terminal event: {}", e);
                latch.request_quit();
                break;
            }
        };
        log::trace!("terminal event {:?}", event);

        if stop.load(Ordering::Relaxed) {
            break;
        }

        if let Event::Key(key_event) = event {
            match key_event.code {
                KeyCode::Esc => latch.request_quit(),
                KeyCode::Char(' ') => latch.request_pause(),
                KeyCode::Char(c) => {
                    if let Some(key) = map_key(c) {
                        latch.press(key);
                    }
                }
                _ => {}
            }
        }
    })
}

/// The original COSMAC-style layout:
///
/// ```text
/// CHIP-8 pad    QWERTY
/// 1 2 3 C       1 2 3 4
/// 4 5 6 D       q w e r
/// 7 8 9 E       a s d f
/// A 0 B F       z x c v
/// ```
fn map_key(c: char) -> Option<u8> {
    match c.to_ascii_lowercase() {
        '1' => Some(0x1),
        '2' => Some(0x2),
        '3' => Some(0x3),
        '4' => Some(0xC),
        'q' => Some(0x4),
        'w' => Some(0x5),
        'e' => Some(0x6),
        'r' => Some(0xD),
        'a' => Some(0x7),
        's' => Some(0x8),
        'd' => Some(0x9),
        'f' => Some(0xE),
        'z' => Some(0xA),
        'x' => Some(0x0),
        'c' => Some(0xB),
        'v' => Some(0xF),
        _ => None,
    }
}
