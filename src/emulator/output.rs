use crate::emulator::config::Config;
use crate::emulator::framebuffer::Framebuffer;

/// Something that can rasterize the framebuffer.
///
/// The controller hands over a read-only snapshot once per tick together
/// with the render-only parts of the configuration (colors, scale).
pub trait Renderer {
    fn present(&mut self, framebuffer: &Framebuffer, config: &Config);

    /// Called every tick with the sound timer's state. Frontends with an
    /// audio device start or stop their tone here.
    fn tone(&mut self, _active: bool) {}
}

/// A renderer that draws nothing. Useful headless and in tests.
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn present(&mut self, _framebuffer: &Framebuffer, _config: &Config) {}
}
