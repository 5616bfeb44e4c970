/// Emulator configuration, passed explicitly into the controller.
///
/// Only `instructions_per_second` affects execution; the colors and scale
/// are render-only hints for the frontend and never change opcode
/// semantics.
#[derive(Debug, Clone)]
pub struct Config {
    /// Target CPU clock rate. Historically around 700 for most programs.
    pub instructions_per_second: u32,
    /// Foreground (pixel on) color, RGBA8888.
    pub foreground: u32,
    /// Background (pixel off) color, RGBA8888.
    pub background: u32,
    /// Integer scale factor for frontends that can upscale.
    pub scale: u32,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            instructions_per_second: 700,
            foreground: 0xFFFF_FFFF, // white
            background: 0x0000_00FF, // black
            scale: 4,
        }
    }
}

impl Config {
    /// How many machine cycles to run per 60 Hz tick, at least one.
    pub fn cycles_per_tick(&self) -> u32 {
        (self.instructions_per_second / 60).max(1)
    }
}
