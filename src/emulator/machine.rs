//! The machine itself: memory, registers, stack, timers and the
//! fetch/decode/execute cycle, as described at
//! https://en.wikipedia.org/wiki/CHIP-8#Virtual_machine_description.

use crate::emulator::framebuffer::{self, Framebuffer};
use crate::emulator::instruction::{Addr, Imm, Instruction, Reg};
use crate::emulator::keypad::Keypad;
use crate::util::opcode::Opcode;

pub const MEM_SIZE: usize = 4096;
const ADDR_MASK: u16 = 0x0FFF;
const NUM_REGISTERS: usize = 16;
const STACK_DEPTH: usize = 12;
const ENTRY_POINT: u16 = 0x200;
const GLYPH_BYTES: u16 = 5;

// Standard hexadecimal glyph bitmaps, loaded at address 0 and addressed
// through FX29. The byte values are a fixed external contract.
const FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

#[derive(thiserror::Error, Debug)]
pub enum MachineError {
    #[error("program of {size} bytes does not fit in {max} bytes of memory")]
    ProgramTooLarge { size: usize, max: usize },
    #[error("call stack overflow at {pc:#06X} (depth {depth})")]
    StackOverflow { pc: u16, depth: usize },
}

/// The addressable state of one CHIP-8 machine and its execution engine.
///
/// All buffers are owned exclusively by the machine; the renderer gets a
/// shared reference to the framebuffer, and the input adapter mutates the
/// keypad through [`Machine::key_down`] / [`Machine::key_up`].
pub struct Machine {
    ram: [u8; MEM_SIZE],
    v: [u8; NUM_REGISTERS],
    i: u16,
    pc: u16,
    stack: [u16; STACK_DEPTH],
    stack_depth: usize,
    delay_timer: u8,
    sound_timer: u8,
    keypad: Keypad,
    framebuffer: Framebuffer,
}

impl Machine {
    /// Create a machine with zeroed state, the glyph table in low memory
    /// and the program counter at the entry point.
    pub fn new() -> Machine {
        let mut ram = [0; MEM_SIZE];
        ram[..FONT.len()].copy_from_slice(&FONT);

        Machine {
            ram,
            v: [0; NUM_REGISTERS],
            i: 0,
            pc: ENTRY_POINT,
            stack: [0; STACK_DEPTH],
            stack_depth: 0,
            delay_timer: 0,
            sound_timer: 0,
            keypad: Keypad::new(),
            framebuffer: Framebuffer::new(),
        }
    }

    /// Copy a program into memory at the entry point.
    ///
    /// An oversized program is a load-time error and nothing is copied.
    pub fn load(&mut self, program: &[u8]) -> Result<(), MachineError> {
        let max = MEM_SIZE - ENTRY_POINT as usize;
        if program.len() > max {
            return Err(MachineError::ProgramTooLarge {
                size: program.len(),
                max,
            });
        }
        let start = ENTRY_POINT as usize;
        self.ram[start..start + program.len()].copy_from_slice(program);
        self.pc = ENTRY_POINT;
        Ok(())
    }

    /// Run one fetch/decode/execute cycle.
    pub fn cycle(&mut self) -> Result<(), MachineError> {
        let opcode = self.fetch();
        let instruction = Instruction::decode(opcode);
        log::trace!(
            "{:#06X}: {:#06X} {:?}",
            self.pc.wrapping_sub(2),
            opcode.value(),
            instruction
        );
        self.execute(instruction)
    }

    /// Read the two bytes at PC and advance PC past them. Opcodes that
    /// redirect control flow see the already-advanced PC.
    fn fetch(&mut self) -> Opcode {
        let high = self.read(self.pc);
        let low = self.read(self.pc.wrapping_add(1));
        self.pc = self.pc.wrapping_add(2);
        Opcode::from_bytes(high, low)
    }

    /// Apply a single instruction's effect.
    pub fn execute(&mut self, instruction: Instruction) -> Result<(), MachineError> {
        match instruction {
            Instruction::ClearScreen => {
                self.framebuffer.clear();
            }

            Instruction::Return => {
                if self.stack_depth == 0 {
                    // Underflow policy: a return with nothing pushed is a
                    // no-op; PC keeps its post-fetch value.
                    log::warn!("return with empty call stack at {:#06X}", self.pc);
                } else {
                    self.stack_depth -= 1;
                    self.pc = self.stack[self.stack_depth];
                }
            }

            Instruction::Jump(Addr(addr)) => {
                self.pc = addr;
            }

            Instruction::Call(Addr(addr)) => {
                if self.stack_depth == STACK_DEPTH {
                    return Err(MachineError::StackOverflow {
                        pc: self.pc.wrapping_sub(2),
                        depth: STACK_DEPTH,
                    });
                }
                self.stack[self.stack_depth] = self.pc;
                self.stack_depth += 1;
                self.pc = addr;
            }

            Instruction::SkipEqImm(Reg(x), Imm(nn)) => {
                if self.v[x as usize] == nn {
                    self.skip();
                }
            }

            Instruction::SkipNeImm(Reg(x), Imm(nn)) => {
                if self.v[x as usize] != nn {
                    self.skip();
                }
            }

            Instruction::SkipEqReg(Reg(x), Reg(y)) => {
                if self.v[x as usize] == self.v[y as usize] {
                    self.skip();
                }
            }

            Instruction::LoadImm(Reg(x), Imm(nn)) => {
                self.v[x as usize] = nn;
            }

            Instruction::AddImm(Reg(x), Imm(nn)) => {
                self.v[x as usize] = self.v[x as usize].wrapping_add(nn);
            }

            Instruction::Move(Reg(x), Reg(y)) => {
                self.v[x as usize] = self.v[y as usize];
            }

            Instruction::Or(Reg(x), Reg(y)) => {
                self.v[x as usize] |= self.v[y as usize];
            }

            Instruction::And(Reg(x), Reg(y)) => {
                self.v[x as usize] &= self.v[y as usize];
            }

            Instruction::Xor(Reg(x), Reg(y)) => {
                self.v[x as usize] ^= self.v[y as usize];
            }

            // For every ALU opcode below, the flag lands in VF *before*
            // the result lands in VX, so an opcode targeting VF itself
            // overwrites the flag with the result. Last write wins.
            Instruction::Add(Reg(x), Reg(y)) => {
                let (sum, carry) = self.v[x as usize].overflowing_add(self.v[y as usize]);
                self.v[0xF] = carry as u8;
                self.v[x as usize] = sum;
            }

            Instruction::Sub(Reg(x), Reg(y)) => {
                let (vx, vy) = (self.v[x as usize], self.v[y as usize]);
                self.v[0xF] = (vy <= vx) as u8;
                self.v[x as usize] = vx.wrapping_sub(vy);
            }

            Instruction::ShiftRight(Reg(x)) => {
                let vx = self.v[x as usize];
                self.v[0xF] = vx & 1;
                self.v[x as usize] = vx >> 1;
            }

            Instruction::SubReversed(Reg(x), Reg(y)) => {
                let (vx, vy) = (self.v[x as usize], self.v[y as usize]);
                self.v[0xF] = (vx <= vy) as u8;
                self.v[x as usize] = vy.wrapping_sub(vx);
            }

            Instruction::ShiftLeft(Reg(x)) => {
                let vx = self.v[x as usize];
                self.v[0xF] = vx >> 7;
                self.v[x as usize] = vx << 1;
            }

            Instruction::SkipNeReg(Reg(x), Reg(y)) => {
                if self.v[x as usize] != self.v[y as usize] {
                    self.skip();
                }
            }

            Instruction::LoadIndex(Addr(addr)) => {
                self.i = addr;
            }

            Instruction::JumpOffset(Addr(addr)) => {
                self.pc = addr.wrapping_add(self.v[0] as u16);
            }

            Instruction::Random(Reg(x), Imm(nn)) => {
                self.v[x as usize] = rand::random::<u8>() & nn;
            }

            Instruction::Draw(Reg(x), Reg(y), Imm(n)) => {
                self.draw_sprite(x, y, n);
            }

            Instruction::SkipKeyPressed(Reg(x)) => {
                if self.keypad.is_pressed(self.v[x as usize]) {
                    self.skip();
                }
            }

            Instruction::SkipKeyReleased(Reg(x)) => {
                if !self.keypad.is_pressed(self.v[x as usize]) {
                    self.skip();
                }
            }

            Instruction::ReadDelay(Reg(x)) => {
                self.v[x as usize] = self.delay_timer;
            }

            Instruction::WaitKey(Reg(x)) => {
                match self.keypad.first_pressed() {
                    Some(key) => self.v[x as usize] = key,
                    // No key held: rewind PC so the same instruction is
                    // fetched again next cycle. The machine keeps cycling,
                    // which keeps input polling and timers alive.
                    None => self.pc = self.pc.wrapping_sub(2),
                }
            }

            Instruction::SetDelay(Reg(x)) => {
                self.delay_timer = self.v[x as usize];
            }

            Instruction::SetSound(Reg(x)) => {
                self.sound_timer = self.v[x as usize];
            }

            Instruction::AddIndex(Reg(x)) => {
                self.i = self.i.wrapping_add(self.v[x as usize] as u16);
            }

            Instruction::LoadGlyph(Reg(x)) => {
                self.i = self.v[x as usize] as u16 * GLYPH_BYTES;
            }

            Instruction::StoreBcd(Reg(x)) => {
                let value = self.v[x as usize];
                self.write(self.i, value / 100);
                self.write(self.i.wrapping_add(1), value / 10 % 10);
                self.write(self.i.wrapping_add(2), value % 10);
            }

            Instruction::StoreRegisters(Reg(x)) => {
                for offset in 0..=x as u16 {
                    self.write(self.i.wrapping_add(offset), self.v[offset as usize]);
                }
            }

            Instruction::LoadRegisters(Reg(x)) => {
                for offset in 0..=x as u16 {
                    self.v[offset as usize] = self.read(self.i.wrapping_add(offset));
                }
            }

            Instruction::Unknown(word) => {
                // PC has already advanced past it; skip the cycle and
                // keep the machine running.
                log::debug!("unknown opcode {:#06X} at {:#06X}", word, self.pc.wrapping_sub(2));
            }
        }
        Ok(())
    }

    /// XOR an N-row sprite from memory[I..] into the framebuffer at
    /// (VX mod WIDTH, VY mod HEIGHT), clipping at the screen edges.
    /// VF becomes 1 if any set pixel was cleared.
    fn draw_sprite(&mut self, x: u8, y: u8, n: u8) {
        let x0 = self.v[x as usize] as usize % framebuffer::WIDTH;
        let y0 = self.v[y as usize] as usize % framebuffer::HEIGHT;

        let mut collision = false;
        for row in 0..n as usize {
            let py = y0 + row;
            if py >= framebuffer::HEIGHT {
                break;
            }
            let bits = self.read(self.i.wrapping_add(row as u16));
            for col in 0..8 {
                let px = x0 + col;
                if px >= framebuffer::WIDTH {
                    break;
                }
                if bits & (0x80 >> col) != 0 {
                    collision |= self.framebuffer.toggle(px, py);
                }
            }
        }
        self.v[0xF] = collision as u8;
    }

    /// Decrement both countdown timers if nonzero. Driven at 60 Hz by the
    /// controller, never by opcode execution.
    pub fn tick_timers(&mut self) {
        if self.delay_timer > 0 {
            self.delay_timer -= 1;
        }
        if self.sound_timer > 0 {
            self.sound_timer -= 1;
        }
    }

    /// Whether the tone should currently be playing.
    pub fn sound_active(&self) -> bool {
        self.sound_timer > 0
    }

    pub fn key_down(&mut self, key: u8) {
        self.keypad.press(key);
    }

    pub fn key_up(&mut self, key: u8) {
        self.keypad.release(key);
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn register(&self, x: u8) -> u8 {
        self.v[(x & 0xF) as usize]
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    // Memory accesses during execution mask addresses to 12 bits so a
    // malformed program wraps instead of indexing out of bounds.
    fn read(&self, addr: u16) -> u8 {
        self.ram[(addr & ADDR_MASK) as usize]
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.ram[(addr & ADDR_MASK) as usize] = value;
    }

    fn skip(&mut self) {
        self.pc = self.pc.wrapping_add(2);
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}
