/// An external event delivered to the controller at the start of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    /// Key 0x0-0xF went down.
    KeyDown(u8),
    /// Key 0x0-0xF went up.
    KeyUp(u8),
    /// Toggle between Running and Paused.
    TogglePause,
    /// Halt the machine.
    Quit,
}

/// Something that can be polled for pending external events.
///
/// Implementations must not block: `poll` pushes whatever has arrived
/// since the previous tick and returns.
pub trait EventSource {
    fn poll(&mut self, events: &mut Vec<ControlEvent>);
}

/// An event source that never produces any events.
pub struct NullEvents;

impl EventSource for NullEvents {
    fn poll(&mut self, _events: &mut Vec<ControlEvent>) {}
}
