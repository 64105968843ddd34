/// # interpreter
///
/// One `step` is one CHIP-8 instruction:
///  1. latch the keypad mask handed in by the caller
///  2. fetch the big-endian word at the pc (fatal if it runs off the end of
///     memory) and move the pc past it
///  3. decode and execute; jumps assign the pc outright, skips add a further 2
///  4. if the caller says this step lands on a 60Hz boundary, tick the timers
///
/// The step reports whether it ran a clear or draw instruction, so whoever is
/// driving knows when to redraw; a draw counts even if no pixel flipped. Faults put the pc back on the offending instruction
/// and are returned with it; unknown opcodes are logged and skipped.
use log::{trace, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{Chip8Error, Fault};
use crate::instruction::Instruction;
use crate::memory::{MemoryMap, CHIP8_GLYPH_BYTES};
use crate::state::{Machine, DISPLAY_HEIGHT, DISPLAY_WIDTH, FLAG};

pub struct Chip8Interpreter<R: Rng = StdRng> {
    machine: Machine,
    rng: R,
}

impl Chip8Interpreter<StdRng> {
    pub fn new(machine: Machine) -> Self {
        Self::with_rng(machine, StdRng::from_entropy())
    }

    /// reproducible CXNN
    pub fn with_seed(machine: Machine, seed: u64) -> Self {
        Self::with_rng(machine, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Chip8Interpreter<R> {
    pub fn with_rng(machine: Machine, rng: R) -> Self {
        Chip8Interpreter { machine, rng }
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut Machine {
        &mut self.machine
    }

    /// run one instruction; returns true if it was 00E0 or DXYN, whether or
    /// not any pixel actually changed
    pub fn step(&mut self, keypad: u16, tick: bool) -> Result<bool, Chip8Error> {
        self.machine.keypad = keypad;

        let pc = self.machine.pc;
        let opcode = self
            .machine
            .fetch()
            .map_err(|fault| Chip8Error::Fetch { pc, fault })?;
        self.machine.pc = pc.wrapping_add(2);

        let instruction = Instruction::decode(opcode);
        trace!(
            "{:#05x}: {:04X} {:?} v{:02X?} i{:04X}",
            pc,
            opcode,
            instruction,
            self.machine.v,
            self.machine.i
        );

        let display_changed = match self.execute(instruction) {
            Ok(changed) => changed,
            Err(fault) => {
                self.machine.pc = pc;
                return Err(Chip8Error::Execute { pc, opcode, fault });
            }
        };

        if tick {
            self.machine.tick_timers();
        }
        Ok(display_changed)
    }

    /// apply a single instruction to the machine, assuming the pc has
    /// already moved past it
    pub fn execute(&mut self, instruction: Instruction) -> Result<bool, Fault> {
        use Instruction::*;
        let m = &mut self.machine;
        match instruction {
            ClearScreen => {
                m.clear_display();
                return Ok(true);
            }
            Return => m.pc = m.pop_return()?,
            Jump(addr) => m.pc = addr,
            Call(addr) => {
                m.push_return(m.pc)?;
                m.pc = addr;
            }
            SkipIfEqual { x, nn } => m.skip_if(m.v[x] == nn),
            SkipIfNotEqual { x, nn } => m.skip_if(m.v[x] != nn),
            SkipIfRegsEqual { x, y } => m.skip_if(m.v[x] == m.v[y]),
            SkipIfRegsNotEqual { x, y } => m.skip_if(m.v[x] != m.v[y]),
            Load { x, nn } => m.v[x] = nn,
            AddImmediate { x, nn } => m.v[x] = m.v[x].wrapping_add(nn),
            Move { x, y } => m.v[x] = m.v[y],
            Or { x, y } => m.v[x] |= m.v[y],
            And { x, y } => m.v[x] &= m.v[y],
            Xor { x, y } => m.v[x] ^= m.v[y],
            // for the flag-setting ALU ops both operands are read up front,
            // then VF, then VX; so with X = F the result wins over the flag
            AddRegs { x, y } => {
                let (sum, carry) = m.v[x].overflowing_add(m.v[y]);
                set_with_flag(m, x, sum, carry as u8);
            }
            Sub { x, y } => {
                let (vx, vy) = (m.v[x], m.v[y]);
                set_with_flag(m, x, vx.wrapping_sub(vy), (vx > vy) as u8);
            }
            ShiftRight { x } => {
                let vx = m.v[x];
                set_with_flag(m, x, vx >> 1, vx & 0x1);
            }
            SubReverse { x, y } => {
                let (vx, vy) = (m.v[x], m.v[y]);
                set_with_flag(m, x, vy.wrapping_sub(vx), (vy > vx) as u8);
            }
            ShiftLeft { x } => {
                let vx = m.v[x];
                set_with_flag(m, x, vx << 1, vx >> 7);
            }
            LoadIndex(addr) => m.i = addr,
            JumpOffset(addr) => m.pc = u16::from(m.v[0]) + addr,
            Random { x, nn } => m.v[x] = self.rng.gen::<u8>() & nn,
            Draw { x, y, n } => {
                draw_sprite(m, x, y, n);
                return Ok(true);
            }
            SkipIfKey { x } => m.skip_if(m.is_key_pressed(m.v[x])),
            SkipIfNotKey { x } => m.skip_if(!m.is_key_pressed(m.v[x])),
            ReadDelay { x } => m.v[x] = m.delay_timer,
            WaitKey { x } => {
                if m.keypad == 0 {
                    // come back to this instruction next step
                    m.pc = m.pc.wrapping_sub(2);
                } else {
                    m.v[x] = (15 - m.keypad.leading_zeros()) as u8;
                }
            }
            SetDelay { x } => m.delay_timer = m.v[x],
            SetSound { x } => m.sound_timer = m.v[x],
            AddIndex { x } => m.i = m.i.wrapping_add(u16::from(m.v[x])),
            LoadGlyph { x } => {
                m.i = m.memory.font_addr + u16::from(m.v[x]) * CHIP8_GLYPH_BYTES
            }
            StoreBcd { x } => {
                let vx = m.v[x];
                m.memory.write(&[vx / 100, vx / 10 % 10, vx % 10], m.i)?;
            }
            StoreRegs { x } => {
                let regs = m.v;
                m.memory.write(&regs[..=x], m.i)?;
            }
            LoadRegs { x } => {
                let bytes = m.memory.get_ro_slice(m.i, x + 1)?;
                m.v[..=x].copy_from_slice(bytes);
            }
            Unknown(op) => warn!(
                "ignoring unknown opcode {:04X} at {:#05x}",
                op,
                m.pc.wrapping_sub(2)
            ),
        }
        Ok(false)
    }
}

fn set_with_flag(m: &mut Machine, x: usize, value: u8, flag: u8) {
    m.v[FLAG] = flag;
    m.v[x] = value;
}

/// XOR an 8xN sprite from memory[I..] onto the frame buffer at (VX, VY),
/// wrapping at the edges. VF ends up 1 if any lit pixel was switched off.
fn draw_sprite(m: &mut Machine, x: usize, y: usize, n: u8) {
    let (x0, y0) = (m.v[x] as usize, m.v[y] as usize);
    m.v[FLAG] = 0;
    let mut collision = false;
    for row in 0..n as usize {
        let sprite = m.memory.get_byte_wrapping(m.i as usize + row);
        let py = (y0 + row) % DISPLAY_HEIGHT;
        for col in 0..8 {
            if sprite & (0x80 >> col) == 0 {
                continue;
            }
            let px = &mut m.display[py][(x0 + col) % DISPLAY_WIDTH];
            collision |= *px;
            *px = !*px;
        }
    }
    m.v[FLAG] = collision as u8;
}
