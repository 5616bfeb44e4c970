use std::path::PathBuf;

use structopt::StructOpt;

use chip8_emulator::emulator::{Config, Controller, Machine, NullEvents, NullRenderer};

/// Run a CHIP-8 program headless: no display, no input, no sound.
/// Mostly useful with RUST_LOG=trace to watch what a program does.
#[derive(StructOpt)]
struct Opt {
    /// The program to execute
    #[structopt(parse(from_os_str))]
    input: PathBuf,

    /// Instructions per second
    #[structopt(long, default_value = "700")]
    ips: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let opt = Opt::from_args();
    log::info!("Executing {:?}", &opt.input);
    let program = std::fs::read(&opt.input)?;

    let mut machine = Machine::new();
    machine.load(&program)?;

    let config = Config {
        instructions_per_second: opt.ips,
        ..Config::default()
    };

    // Runs until the program faults; headless there is no quit key.
    let mut controller = Controller::new(machine, config, NullEvents, NullRenderer);
    controller.run();

    Ok(())
}
