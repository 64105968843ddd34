use crate::error::Fault;
use crate::memory::{Chip8MemoryMap, MemoryMap};

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// register conventionally used for carry, borrow and collision output
pub const FLAG: usize = 0xF;

/// number of return addresses the call stack can hold
pub const STACK_DEPTH: usize = 16;

/// The FrameBuffer is indexed as [y][x], origin top-left
pub type FrameBuffer = [[bool; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

/// # Machine state
///
/// Everything a CHIP-8 program can observe or change:
/// - 4K of memory, glyphs at the bottom and the program from 0x200
/// - V0..VF 8-bit registers; VF doubles as the flag register
/// - I, a 16-bit address register
/// - the program counter, always pointing at the next instruction
/// - a 16-entry return stack. `sp` indexes the most recent entry, so a call
///   pre-increments and entry 0 is never used
/// - the 64x32 frame buffer
/// - the keypad latch, bit i set while key i is held
/// - delay and sound timers, counting down at 60Hz
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Machine {
    pub memory: Chip8MemoryMap,
    pub v: [u8; 16],
    pub i: u16,
    pub pc: u16,
    pub sp: u8,
    pub stack: [u16; STACK_DEPTH],
    pub display: FrameBuffer,
    pub keypad: u16,
    pub delay_timer: u8,
    pub sound_timer: u8,
}

impl Machine {
    /// a machine with the glyph table installed, nothing loaded, and the pc
    /// at the program entry point
    pub fn new() -> Self {
        let memory = Chip8MemoryMap::new();
        let pc = memory.program_addr;
        Machine {
            memory,
            v: [0; 16],
            i: 0,
            pc,
            sp: 0,
            stack: [0; STACK_DEPTH],
            display: [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            keypad: 0,
            delay_timer: 0,
            sound_timer: 0,
        }
    }

    /// read the instruction word at the program counter without advancing it
    pub fn fetch(&self) -> Result<u16, Fault> {
        self.memory.get_word(self.pc)
    }

    pub fn push_return(&mut self, addr: u16) -> Result<(), Fault> {
        if self.sp as usize >= STACK_DEPTH - 1 {
            return Err(Fault::StackOverflow);
        }
        self.sp += 1;
        self.stack[self.sp as usize] = addr;
        Ok(())
    }

    pub fn pop_return(&mut self) -> Result<u16, Fault> {
        if self.sp == 0 {
            return Err(Fault::StackUnderflow);
        }
        let addr = self.stack[self.sp as usize];
        self.sp -= 1;
        Ok(addr)
    }

    /// one 60Hz timer tick; each timer stops at zero independently
    pub fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }

    /// hop over the next instruction
    pub fn skip_if(&mut self, condition: bool) {
        if condition {
            self.pc = self.pc.wrapping_add(2);
        }
    }

    pub fn is_key_pressed(&self, key: u8) -> bool {
        key < 16 && self.keypad & (1 << key) != 0
    }

    /// whether the beeper should currently be sounding
    pub fn sound_active(&self) -> bool {
        self.sound_timer > 0
    }

    pub fn clear_display(&mut self) {
        self.display = [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_machine() {
        let m = Machine::new();
        assert_eq!(m.pc, 0x200);
        assert_eq!(m.sp, 0);
        assert_eq!(m.v, [0; 16]);
        assert!(m.display.iter().flatten().all(|&px| !px));
    }

    #[test]
    fn test_stack_push_pop() -> Result<(), Fault> {
        let mut m = Machine::new();
        m.push_return(0x202)?;
        m.push_return(0x300)?;
        assert_eq!(m.sp, 2);
        assert_eq!(m.pop_return()?, 0x300);
        assert_eq!(m.pop_return()?, 0x202);
        assert_eq!(m.sp, 0);
        Ok(())
    }

    #[test]
    fn test_stack_underflow() {
        let mut m = Machine::new();
        assert_eq!(m.pop_return(), Err(Fault::StackUnderflow));
        assert_eq!(m.sp, 0);
    }

    #[test]
    fn test_stack_overflow() {
        let mut m = Machine::new();
        for n in 0..15 {
            m.push_return(n).unwrap();
        }
        assert_eq!(m.sp, 15);
        assert_eq!(m.push_return(0xbad), Err(Fault::StackOverflow));
        assert_eq!(m.sp, 15);
        assert_eq!(m.stack[15], 14);
    }

    #[test]
    fn test_timers_floor_independently() {
        let mut m = Machine::new();
        m.delay_timer = 2;
        m.sound_timer = 1;
        m.tick_timers();
        assert_eq!((m.delay_timer, m.sound_timer), (1, 0));
        m.tick_timers();
        m.tick_timers();
        assert_eq!((m.delay_timer, m.sound_timer), (0, 0));
    }

    #[test]
    fn test_key_latch() {
        let mut m = Machine::new();
        m.keypad = 0b1000_0000_0000_0010;
        assert!(m.is_key_pressed(1));
        assert!(m.is_key_pressed(15));
        assert!(!m.is_key_pressed(0));
        // VX can hold values past the keypad
        assert!(!m.is_key_pressed(16));
    }
}
