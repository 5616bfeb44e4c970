use std::num::ParseIntError;
use std::path::PathBuf;

use structopt::StructOpt;

use chip8_emulator::emulator::{Config, Controller, Machine};

mod crossterm_io;
mod key_latch;
mod key_manager;

use crossterm_io::{CrosstermEvents, CrosstermRenderer};
use key_manager::KeyManager;

/// Run a CHIP-8 program in the terminal.
///
/// Keys 1-4, q-r, a-f and z-v map onto the hex pad; space pauses,
/// escape quits.
#[derive(StructOpt)]
struct Opt {
    /// The program to execute
    #[structopt(parse(from_os_str))]
    input: PathBuf,

    /// Instructions per second
    #[structopt(long, default_value = "700")]
    ips: u32,

    /// Foreground color as RGBA8888 hex
    #[structopt(long, default_value = "FFFFFFFF", parse(try_from_str = parse_rgba))]
    fg: u32,

    /// Background color as RGBA8888 hex
    #[structopt(long, default_value = "000000FF", parse(try_from_str = parse_rgba))]
    bg: u32,
}

fn parse_rgba(s: &str) -> Result<u32, ParseIntError> {
    u32::from_str_radix(s.trim_start_matches("0x"), 16)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();

    let opt = Opt::from_args();
    log::info!("Executing {:?}", &opt.input);
    let program = std::fs::read(&opt.input)?;

    let mut machine = Machine::new();
    machine.load(&program)?;

    let config = Config {
        instructions_per_second: opt.ips,
        foreground: opt.fg,
        background: opt.bg,
        ..Config::default()
    };

    let key_manager = KeyManager::new();
    let events = CrosstermEvents::new(key_manager.latch());
    let renderer = CrosstermRenderer::new(&config)?;

    let mut controller = Controller::new(machine, config, events, renderer);
    controller.run();

    Ok(())
}
