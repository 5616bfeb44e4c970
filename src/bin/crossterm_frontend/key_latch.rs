use std::sync::Mutex;
use std::time::{Duration, Instant};

use chip8_emulator::emulator::keypad::NUM_KEYS;

/// A thread-safe latch of which CHIP-8 keys are currently held, plus
/// pending pause/quit requests.
///
/// Terminals only deliver key-press events, never releases, so a key
/// counts as held for `timeout` after its last press and then expires.
/// Wrap it in an `std::sync::Arc` and share it between the listener
/// thread and the event source.
pub struct KeyLatch {
    timeout: Duration,
    inner: Mutex<Inner>,
}

struct Inner {
    pressed_at: [Option<Instant>; NUM_KEYS],
    pause_requests: u32,
    quit: bool,
}

impl KeyLatch {
    pub fn new(timeout: Duration) -> KeyLatch {
        KeyLatch {
            timeout,
            inner: Mutex::new(Inner {
                pressed_at: [None; NUM_KEYS],
                pause_requests: 0,
                quit: false,
            }),
        }
    }

    /// Record a press of key 0x0-0xF, refreshing its hold window.
    pub fn press(&self, key: u8) {
        let mut inner = self.inner.lock().unwrap();
        inner.pressed_at[(key & 0xF) as usize] = Some(Instant::now());
    }

    pub fn request_pause(&self) {
        self.inner.lock().unwrap().pause_requests += 1;
    }

    pub fn request_quit(&self) {
        self.inner.lock().unwrap().quit = true;
    }

    /// Snapshot of which keys are currently held (pressed and not yet
    /// expired). Expired entries are cleared as a side effect.
    pub fn held(&self) -> [bool; NUM_KEYS] {
        let mut inner = self.inner.lock().unwrap();
        let mut held = [false; NUM_KEYS];
        for (key, slot) in inner.pressed_at.iter_mut().enumerate() {
            match slot {
                Some(at) if at.elapsed() < self.timeout => held[key] = true,
                _ => *slot = None,
            }
        }
        held
    }

    /// Take all pause requests accumulated since the last call.
    pub fn take_pause_requests(&self) -> u32 {
        let mut inner = self.inner.lock().unwrap();
        std::mem::replace(&mut inner.pause_requests, 0)
    }

    pub fn take_quit(&self) -> bool {
        let mut inner = self.inner.lock().unwrap();
        std::mem::replace(&mut inner.quit, false)
    }
}
