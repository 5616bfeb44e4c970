//! The CHIP-8 machine and the pieces it is built from.

pub mod config;
pub mod controller;
pub mod framebuffer;
pub mod input;
pub mod instruction;
pub mod keypad;
pub mod machine;
pub mod output;

pub use config::Config;
pub use controller::{Controller, RunState};
pub use framebuffer::Framebuffer;
pub use input::{ControlEvent, EventSource, NullEvents};
pub use keypad::Keypad;
pub use machine::{Machine, MachineError};
pub use output::{NullRenderer, Renderer};
