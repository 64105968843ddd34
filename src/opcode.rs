/// # Opcodes
///
/// CHIP-8 opcodes are 16 bits, fetched big-endian. Behaviour is cased on:
/// - `(n, _, _, _)` the instruction family
/// - `(_, _, _, n)` or `(_, _, n, n)` the operation within some families
///
/// The remaining nibbles carry operands:
/// - `[_nnn]` a 12-bit address or immediate
/// - `[__nn]` an 8-bit immediate
/// - `[_x__]` register VX, or the range V0..=VX
/// - `[__y_]` register VY
/// - `[___n]` a 4-bit immediate (sprite height)
pub trait Opcode {
    /// The opcode's four nibbles, most significant first.
    fn nibbles(&self) -> (u8, u8, u8, u8);

    /// `[f___]`
    fn family(&self) -> u8;

    /// `[_x__]`
    fn x(&self) -> usize;

    /// `[__y_]`
    fn y(&self) -> usize;

    /// `[___n]`
    fn n(&self) -> u8;

    /// `[__nn]`
    fn nn(&self) -> u8;

    /// `[_nnn]`
    fn nnn(&self) -> u16;
}

impl Opcode for u16 {
    fn nibbles(&self) -> (u8, u8, u8, u8) {
        (self.family(), self.x() as u8, self.y() as u8, self.n())
    }

    fn family(&self) -> u8 {
        (self >> 12) as u8
    }

    fn x(&self) -> usize {
        ((self & 0x0F00) >> 8) as usize
    }

    fn y(&self) -> usize {
        ((self & 0x00F0) >> 4) as usize
    }

    fn n(&self) -> u8 {
        (self & 0x000F) as u8
    }

    fn nn(&self) -> u8 {
        (self & 0x00FF) as u8
    }

    fn nnn(&self) -> u16 {
        self & 0x0FFF
    }
}
