//! # chip8vm
//!
//! A CHIP-8 virtual machine: 4K of memory, sixteen 8-bit registers, a
//! 16-deep call stack, a 64x32 monochrome display, a hex keypad and two
//! 60Hz countdown timers.
//!
//! ## Design
//!
//! * the interpreter is pure state in, state out; no terminal, clock or
//!   keyboard needed to test it
//! * one `step` is one instruction; the caller hands in the keypad mask and
//!   says whether this step is also a 60Hz timer tick
//! * display, input and sound are traits so alternatives can be plugged in;
//!   starting with a TUI in-console
//! * instructions run as fast as possible then sleep to hold the configured
//!   rate; so not quite authentic
//! * bad programs halt with an error naming the instruction, they never
//!   panic or scribble over neighbouring state
//!
//! Model
//!
//! ```text
//! Environment
//!  |-- display, input, sound, config
//!  |-- interpreter(machine, rng)
//!  |    |-- loader: glyphs at 0x000, program at 0x200
//!  |    `-- instruction decode
//!  `-- main loop
//!       |-- keys = input.keypad()
//!       |-- changed = interpreter.step(keys, tick_divider.tick())
//!       |-- if changed { display.draw(frame) }
//!       |-- beep while the sound timer is non-zero
//!       `-- sleep out the rest of 1/cpu_hz
//! ```
//!
//! ```
//! use chip8vm::{load_program, Chip8Interpreter};
//!
//! // V1 = 5; V1 += 3
//! let machine = load_program(&[0x61, 0x05, 0x71, 0x03]).unwrap();
//! let mut interpreter = Chip8Interpreter::with_seed(machine, 0);
//! interpreter.step(0, false).unwrap();
//! interpreter.step(0, false).unwrap();
//! assert_eq!(interpreter.machine().v[1], 8);
//! ```
pub mod config;
pub mod display;
pub mod environment;
pub mod error;
pub mod input;
pub mod instruction;
pub mod interpreter;
pub mod loader;
pub mod memory;
pub mod opcode;
pub mod sound;
pub mod state;
pub mod timer;

pub use config::{Config, Keymap};
pub use environment::Environment;
pub use error::{Chip8Error, ConfigError, Fault, LoadError};
pub use instruction::Instruction;
pub use interpreter::Chip8Interpreter;
pub use loader::{load_file, load_program, load_reader};
pub use state::{FrameBuffer, Machine, DISPLAY_HEIGHT, DISPLAY_WIDTH};
pub use timer::TickDivider;
