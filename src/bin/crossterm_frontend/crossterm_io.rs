use std::io::{stdout, Write};
use std::sync::Arc;

use crossterm::style::{Color, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue};

use chip8_emulator::emulator::framebuffer::{HEIGHT, WIDTH};
use chip8_emulator::emulator::keypad::NUM_KEYS;
use chip8_emulator::emulator::{Config, ControlEvent, EventSource, Framebuffer, Renderer};

use super::key_latch::KeyLatch;

/// Turns the key latch into controller events: quit and pause requests
/// pass straight through, and changes in the held-key snapshot become
/// KeyDown/KeyUp pairs.
pub struct CrosstermEvents {
    latch: Arc<KeyLatch>,
    held: [bool; NUM_KEYS],
}

impl CrosstermEvents {
    pub fn new(latch: Arc<KeyLatch>) -> CrosstermEvents {
        CrosstermEvents {
            latch,
            held: [false; NUM_KEYS],
        }
    }
}

impl EventSource for CrosstermEvents {
    fn poll(&mut self, events: &mut Vec<ControlEvent>) {
        if self.latch.take_quit() {
            events.push(ControlEvent::Quit);
        }
        for _ in 0..self.latch.take_pause_requests() {
            events.push(ControlEvent::TogglePause);
        }

        let held = self.latch.held();
        for key in 0..NUM_KEYS {
            if held[key] && !self.held[key] {
                events.push(ControlEvent::KeyDown(key as u8));
            } else if !held[key] && self.held[key] {
                events.push(ControlEvent::KeyUp(key as u8));
            }
        }
        self.held = held;
    }
}

/// Draws the framebuffer into the alternate screen, two characters per
/// pixel, only touching cells that changed since the previous frame.
pub struct CrosstermRenderer {
    cells: [[bool; WIDTH]; HEIGHT],
    tone_active: bool,
}

impl CrosstermRenderer {
    pub fn new(config: &Config) -> crossterm::Result<CrosstermRenderer> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            EnterAlternateScreen,
            cursor::Hide,
            SetForegroundColor(rgb(config.foreground)),
            SetBackgroundColor(rgb(config.background)),
            Clear(ClearType::All)
        )?;
        draw_border()?;
        Ok(CrosstermRenderer {
            cells: [[false; WIDTH]; HEIGHT],
            tone_active: false,
        })
    }

    fn draw_frame(&mut self, framebuffer: &Framebuffer) -> crossterm::Result<()> {
        let mut out = stdout();
        for y in 0..HEIGHT {
            for x in 0..WIDTH {
                let pixel = framebuffer.pixel(x, y);
                if self.cells[y][x] != pixel {
                    self.cells[y][x] = pixel;
                    queue!(out, cursor::MoveTo(2 * x as u16 + 1, y as u16 + 1))?;
                    write!(out, "{}", if pixel { "██" } else { "  " })?;
                }
            }
        }
        out.flush()?;
        Ok(())
    }
}

impl Renderer for CrosstermRenderer {
    fn present(&mut self, framebuffer: &Framebuffer, _config: &Config) {
        if let Err(e) = self.draw_frame(framebuffer) {
            log::warn!("failed to draw frame: {}", e);
        }
    }

    fn tone(&mut self, active: bool) {
        // No audio device in a terminal; ring the bell on the rising edge.
        if active && !self.tone_active {
            let mut out = stdout();
            let _ = write!(out, "\x07");
            let _ = out.flush();
        }
        self.tone_active = active;
    }
}

impl Drop for CrosstermRenderer {
    fn drop(&mut self) {
        let _ = execute!(stdout(), LeaveAlternateScreen, cursor::Show);
        let _ = terminal::disable_raw_mode();
    }
}

fn draw_border() -> crossterm::Result<()> {
    let mut out = stdout();
    let right = 2 * WIDTH as u16 + 1;
    let bottom = HEIGHT as u16 + 1;
    for y in 0..=bottom {
        for x in 0..=right {
            let c = match (x, y) {
                (0, 0) => '┏',
                (x, 0) if x == right => '┓',
                (0, y) if y == bottom => '┗',
                (x, y) if x == right && y == bottom => '┛',
                (_, y) if y == 0 || y == bottom => '━',
                (x, _) if x == 0 || x == right => '┃',
                _ => continue,
            };
            queue!(out, cursor::MoveTo(x, y))?;
            write!(out, "{}", c)?;
        }
    }
    out.flush()?;
    Ok(())
}

/// RGBA8888 word to a terminal color; the alpha byte is dropped.
fn rgb(color: u32) -> Color {
    Color::Rgb {
        r: (color >> 24) as u8,
        g: (color >> 16) as u8,
        b: (color >> 8) as u8,
    }
}
