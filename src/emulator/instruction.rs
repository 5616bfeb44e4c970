use crate::util::opcode::Opcode;

/// A wrapper for 12-bit addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Addr(pub u16);

/// A wrapper for 4-bit register indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reg(pub u8);

/// A wrapper for 8-bit immediates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Imm(pub u8);

/// A single decoded instruction from the CHIP-8 instruction set.
///
/// Any 16-bit word decodes to *some* variant; bit patterns outside the
/// instruction set become [`Instruction::Unknown`], which the machine
/// skips at dispatch time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    ClearScreen,
    /// 00EE
    Return,
    /// 1NNN
    Jump(Addr),
    /// 2NNN
    Call(Addr),
    /// 3XNN
    SkipEqImm(Reg, Imm),
    /// 4XNN
    SkipNeImm(Reg, Imm),
    /// 5XY0
    SkipEqReg(Reg, Reg),
    /// 6XNN
    LoadImm(Reg, Imm),
    /// 7XNN
    AddImm(Reg, Imm),
    /// 8XY0
    Move(Reg, Reg),
    /// 8XY1
    Or(Reg, Reg),
    /// 8XY2
    And(Reg, Reg),
    /// 8XY3
    Xor(Reg, Reg),
    /// 8XY4
    Add(Reg, Reg),
    /// 8XY5
    Sub(Reg, Reg),
    /// 8XY6
    ShiftRight(Reg),
    /// 8XY7: VX = VY - VX
    SubReversed(Reg, Reg),
    /// 8XYE
    ShiftLeft(Reg),
    /// 9XY0
    SkipNeReg(Reg, Reg),
    /// ANNN
    LoadIndex(Addr),
    /// BNNN: PC = V0 + NNN
    JumpOffset(Addr),
    /// CXNN
    Random(Reg, Imm),
    /// DXYN
    Draw(Reg, Reg, Imm),
    /// EX9E
    SkipKeyPressed(Reg),
    /// EXA1
    SkipKeyReleased(Reg),
    /// FX07
    ReadDelay(Reg),
    /// FX0A
    WaitKey(Reg),
    /// FX15
    SetDelay(Reg),
    /// FX18
    SetSound(Reg),
    /// FX1E
    AddIndex(Reg),
    /// FX29
    LoadGlyph(Reg),
    /// FX33
    StoreBcd(Reg),
    /// FX55
    StoreRegisters(Reg),
    /// FX65
    LoadRegisters(Reg),
    /// Anything else.
    Unknown(u16),
}

impl Instruction {
    pub fn decode(opcode: Opcode) -> Instruction {
        match opcode.nibbles() {
            (0, 0, 0xE, 0) => Instruction::ClearScreen,
            (0, 0, 0xE, 0xE) => Instruction::Return,
            (1, _, _, _) => Instruction::Jump(Addr(opcode.nnn())),
            (2, _, _, _) => Instruction::Call(Addr(opcode.nnn())),
            (3, x, _, _) => Instruction::SkipEqImm(Reg(x), Imm(opcode.nn())),
            (4, x, _, _) => Instruction::SkipNeImm(Reg(x), Imm(opcode.nn())),
            (5, x, y, 0) => Instruction::SkipEqReg(Reg(x), Reg(y)),
            (6, x, _, _) => Instruction::LoadImm(Reg(x), Imm(opcode.nn())),
            (7, x, _, _) => Instruction::AddImm(Reg(x), Imm(opcode.nn())),
            (8, x, y, 0) => Instruction::Move(Reg(x), Reg(y)),
            (8, x, y, 1) => Instruction::Or(Reg(x), Reg(y)),
            (8, x, y, 2) => Instruction::And(Reg(x), Reg(y)),
            (8, x, y, 3) => Instruction::Xor(Reg(x), Reg(y)),
            (8, x, y, 4) => Instruction::Add(Reg(x), Reg(y)),
            (8, x, y, 5) => Instruction::Sub(Reg(x), Reg(y)),
            (8, x, _, 6) => Instruction::ShiftRight(Reg(x)),
            (8, x, y, 7) => Instruction::SubReversed(Reg(x), Reg(y)),
            (8, x, _, 0xE) => Instruction::ShiftLeft(Reg(x)),
            (9, x, y, 0) => Instruction::SkipNeReg(Reg(x), Reg(y)),
            (0xA, _, _, _) => Instruction::LoadIndex(Addr(opcode.nnn())),
            (0xB, _, _, _) => Instruction::JumpOffset(Addr(opcode.nnn())),
            (0xC, x, _, _) => Instruction::Random(Reg(x), Imm(opcode.nn())),
            (0xD, x, y, n) => Instruction::Draw(Reg(x), Reg(y), Imm(n)),
            (0xE, x, 9, 0xE) => Instruction::SkipKeyPressed(Reg(x)),
            (0xE, x, 0xA, 1) => Instruction::SkipKeyReleased(Reg(x)),
            (0xF, x, 0, 7) => Instruction::ReadDelay(Reg(x)),
            (0xF, x, 0, 0xA) => Instruction::WaitKey(Reg(x)),
            (0xF, x, 1, 5) => Instruction::SetDelay(Reg(x)),
            (0xF, x, 1, 8) => Instruction::SetSound(Reg(x)),
            (0xF, x, 1, 0xE) => Instruction::AddIndex(Reg(x)),
            (0xF, x, 2, 9) => Instruction::LoadGlyph(Reg(x)),
            (0xF, x, 3, 3) => Instruction::StoreBcd(Reg(x)),
            (0xF, x, 5, 5) => Instruction::StoreRegisters(Reg(x)),
            (0xF, x, 6, 5) => Instruction::LoadRegisters(Reg(x)),
            _ => Instruction::Unknown(opcode.value()),
        }
    }

    pub fn decode_word(value: u16) -> Instruction {
        Instruction::decode(Opcode::new(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0x00E0 => Instruction::ClearScreen ; "clear screen")]
    #[test_case(0x00EE => Instruction::Return ; "return from subroutine")]
    #[test_case(0x1025 => Instruction::Jump(Addr(0x025)) ; "jump")]
    #[test_case(0x2037 => Instruction::Call(Addr(0x037)) ; "call")]
    #[test_case(0x3A08 => Instruction::SkipEqImm(Reg(0xA), Imm(8)) ; "skip eq imm")]
    #[test_case(0x4A08 => Instruction::SkipNeImm(Reg(0xA), Imm(8)) ; "skip ne imm")]
    #[test_case(0x5AB0 => Instruction::SkipEqReg(Reg(0xA), Reg(0xB)) ; "skip eq reg")]
    #[test_case(0x6B23 => Instruction::LoadImm(Reg(0xB), Imm(0x23)) ; "load imm")]
    #[test_case(0x7CA1 => Instruction::AddImm(Reg(0xC), Imm(0xA1)) ; "add imm")]
    #[test_case(0x8AB0 => Instruction::Move(Reg(0xA), Reg(0xB)) ; "move reg")]
    #[test_case(0x8DE1 => Instruction::Or(Reg(0xD), Reg(0xE)) ; "or")]
    #[test_case(0x8DE2 => Instruction::And(Reg(0xD), Reg(0xE)) ; "and")]
    #[test_case(0x8DE3 => Instruction::Xor(Reg(0xD), Reg(0xE)) ; "xor")]
    #[test_case(0x8AB4 => Instruction::Add(Reg(0xA), Reg(0xB)) ; "add reg")]
    #[test_case(0x8AB5 => Instruction::Sub(Reg(0xA), Reg(0xB)) ; "sub reg")]
    #[test_case(0x8AB6 => Instruction::ShiftRight(Reg(0xA)) ; "shift right")]
    #[test_case(0x8AB7 => Instruction::SubReversed(Reg(0xA), Reg(0xB)) ; "sub reversed")]
    #[test_case(0x8A0E => Instruction::ShiftLeft(Reg(0xA)) ; "shift left")]
    #[test_case(0x9AB0 => Instruction::SkipNeReg(Reg(0xA), Reg(0xB)) ; "skip ne reg")]
    #[test_case(0xA025 => Instruction::LoadIndex(Addr(0x025)) ; "load index")]
    #[test_case(0xB025 => Instruction::JumpOffset(Addr(0x025)) ; "jump offset")]
    #[test_case(0xCA23 => Instruction::Random(Reg(0xA), Imm(0x23)) ; "random")]
    #[test_case(0xDABC => Instruction::Draw(Reg(0xA), Reg(0xB), Imm(0xC)) ; "draw")]
    #[test_case(0xEA9E => Instruction::SkipKeyPressed(Reg(0xA)) ; "skip key pressed")]
    #[test_case(0xEAA1 => Instruction::SkipKeyReleased(Reg(0xA)) ; "skip key released")]
    #[test_case(0xFA07 => Instruction::ReadDelay(Reg(0xA)) ; "read delay")]
    #[test_case(0xFA0A => Instruction::WaitKey(Reg(0xA)) ; "wait key")]
    #[test_case(0xFA15 => Instruction::SetDelay(Reg(0xA)) ; "set delay")]
    #[test_case(0xFA18 => Instruction::SetSound(Reg(0xA)) ; "set sound")]
    #[test_case(0xFA1E => Instruction::AddIndex(Reg(0xA)) ; "add index")]
    #[test_case(0xFA29 => Instruction::LoadGlyph(Reg(0xA)) ; "load glyph")]
    #[test_case(0xFA33 => Instruction::StoreBcd(Reg(0xA)) ; "store bcd")]
    #[test_case(0xFA55 => Instruction::StoreRegisters(Reg(0xA)) ; "store registers")]
    #[test_case(0xFA65 => Instruction::LoadRegisters(Reg(0xA)) ; "load registers")]
    fn opcodes_are_decoded_correctly(word: u16) -> Instruction {
        Instruction::decode_word(word)
    }

    #[test_case(0x0123 ; "machine code routine")]
    #[test_case(0x5AB1 ; "bad skip discriminant")]
    #[test_case(0x8AB8 ; "bad alu discriminant")]
    #[test_case(0x9AB9 ; "bad skip ne discriminant")]
    #[test_case(0xE0FF ; "bad key discriminant")]
    #[test_case(0xF0FF ; "bad misc discriminant")]
    fn unrecognized_patterns_decode_to_unknown(word: u16) {
        assert_eq!(Instruction::decode_word(word), Instruction::Unknown(word));
    }

    #[test]
    fn decode_never_panics() {
        // Exhaustive: every 16-bit word decodes to some variant.
        for word in 0..=0xFFFFu16 {
            let _ = Instruction::decode_word(word);
        }
    }
}
