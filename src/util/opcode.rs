/// A 16-bit CHIP-8 instruction word with accessors for the
/// conventional operand fields: a 12-bit address (`NNN`), an 8-bit
/// immediate (`NN`), a 4-bit immediate (`N`) and two 4-bit register
/// indices (`X` and `Y`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opcode(u16);

impl Opcode {
    pub fn new(value: u16) -> Opcode {
        Opcode(value)
    }

    /// Build an opcode from the two memory bytes it was fetched from,
    /// high byte first.
    pub fn from_bytes(high: u8, low: u8) -> Opcode {
        Opcode(((high as u16) << 8) | low as u16)
    }

    pub fn value(self) -> u16 {
        self.0
    }

    /// The top nibble, which selects the opcode group.
    pub fn group(self) -> u8 {
        (self.0 >> 12) as u8
    }

    /// The low 12 bits: an address or long constant.
    pub fn nnn(self) -> u16 {
        self.0 & 0x0FFF
    }

    /// The low byte: an 8-bit immediate or secondary discriminant.
    pub fn nn(self) -> u8 {
        (self.0 & 0x00FF) as u8
    }

    /// The low nibble: a 4-bit immediate or sub-op discriminant.
    pub fn n(self) -> u8 {
        (self.0 & 0x000F) as u8
    }

    /// The second nibble: first register index.
    pub fn x(self) -> u8 {
        ((self.0 >> 8) & 0x0F) as u8
    }

    /// The third nibble: second register index.
    pub fn y(self) -> u8 {
        ((self.0 >> 4) & 0x0F) as u8
    }

    /// All four nibbles, high to low. Convenient for match-based dispatch.
    pub fn nibbles(self) -> (u8, u8, u8, u8) {
        (self.group(), self.x(), self.y(), self.n())
    }
}
