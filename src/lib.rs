/*!

An emulator for the CHIP-8 virtual machine as described at
https://en.wikipedia.org/wiki/CHIP-8#Virtual_machine_description.

# Crossterm Frontend

If you want to try the emulator on some programs, there is a ready-to-use
terminal frontend you can run with
`cargo run --release --bin crossterm_frontend -- <program>`.
The keys 1-4, q-r, a-f and z-v map onto the 16-key CHIP-8 pad;
space pauses and escape quits.

# Library

The core of the crate is [`Machine`](emulator::Machine), which owns all
addressable state (memory, registers, stack, timers, keypad, framebuffer)
and executes one instruction per `cycle` call.

```rust
use chip8_emulator::emulator::Machine;

let mut machine = Machine::new();

// Load a program at address 0x200, then run one fetch/decode/execute cycle.
let clear_display = [0x00, 0xE0];
machine.load(&clear_display).unwrap();
machine.cycle().unwrap();
```

Individual instructions can also be executed directly, which is how most of
the opcode tests are written.

```rust
use chip8_emulator::emulator::Machine;
use chip8_emulator::emulator::instruction::{Instruction, Addr, Imm, Reg};

let mut machine = Machine::new();

machine.execute(Instruction::LoadImm(Reg(0xA), Imm(35))).unwrap();
machine.execute(Instruction::Jump(Addr(0x250))).unwrap();
```

# Running a whole program

[`Controller`](emulator::Controller) wraps a machine in the run/pause/halt
state machine and paces execution: a configurable number of instructions per
second, timers at 60 Hz, and one framebuffer hand-off per tick. Input events
and rendering go through the [`EventSource`](emulator::EventSource) and
[`Renderer`](emulator::Renderer) traits, so the controller itself is frontend
agnostic; see `src/bin/crossterm_frontend` for a complete implementation.

*/

pub mod emulator;
pub mod util;
