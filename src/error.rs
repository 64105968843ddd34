use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Problems getting a program into memory. Always fatal.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unable to open program {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unable to read program: {0}")]
    Read(#[from] io::Error),
    #[error("program is at least {len} bytes but only {max} bytes of memory are available")]
    /// `len` is only a lower bound when reading from a stream
    TooLarge { len: usize, max: usize },
}

/// Conditions that halt the machine mid-program.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    #[error("access of {len} byte(s) at {addr:#05x} is outside memory")]
    AddressOutOfRange { addr: u16, len: usize },
    #[error("call stack overflow")]
    StackOverflow,
    #[error("return with an empty call stack")]
    StackUnderflow,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("timer rate must be non-zero")]
    ZeroTimerRate,
    #[error("instruction rate {cpu_hz}Hz is slower than timer rate {timer_hz}Hz")]
    CpuSlowerThanTimers { cpu_hz: u32, timer_hz: u32 },
}

/// Top-level error for anything driving the interpreter.
#[derive(Debug, Error)]
pub enum Chip8Error {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("halted fetching instruction at {pc:#05x}: {fault}")]
    Fetch {
        pc: u16,
        #[source]
        fault: Fault,
    },
    #[error("halted at {pc:#05x} executing {opcode:#06x}: {fault}")]
    Execute {
        pc: u16,
        opcode: u16,
        #[source]
        fault: Fault,
    },
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("sound error: {0}")]
    Sound(String),
}
