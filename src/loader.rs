use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::info;

use crate::error::LoadError;
use crate::memory::CHIP8_MAX_PROGRAM_BYTES;
use crate::state::Machine;

/// Build a machine with `program` copied in at 0x200 and the pc pointing at it
pub fn load_program(program: &[u8]) -> Result<Machine, LoadError> {
    if program.len() > CHIP8_MAX_PROGRAM_BYTES {
        return Err(LoadError::TooLarge {
            len: program.len(),
            max: CHIP8_MAX_PROGRAM_BYTES,
        });
    }
    let mut machine = Machine::new();
    // length was checked above, so this can't run off the end
    machine
        .memory
        .load_program(program)
        .map_err(|_| LoadError::TooLarge {
            len: program.len(),
            max: CHIP8_MAX_PROGRAM_BYTES,
        })?;
    info!(
        "loaded {} byte program at {:#05x}",
        program.len(),
        machine.pc
    );
    Ok(machine)
}

/// load unknown len of data from a reader
pub fn load_reader(reader: &mut impl Read) -> Result<Machine, LoadError> {
    // read one byte past the limit so oversized programs are noticed without
    // slurping an arbitrarily large (or endless) source
    let mut buf = Vec::new();
    reader
        .by_ref()
        .take(CHIP8_MAX_PROGRAM_BYTES as u64 + 1)
        .read_to_end(&mut buf)?;
    if buf.len() > CHIP8_MAX_PROGRAM_BYTES {
        return Err(LoadError::TooLarge {
            len: buf.len(),
            max: CHIP8_MAX_PROGRAM_BYTES,
        });
    }
    load_program(&buf)
}

pub fn load_file(path: impl AsRef<Path>) -> Result<Machine, LoadError> {
    let path = path.as_ref();
    let mut f = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    info!("loading program from {}", path.display());
    load_reader(&mut f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryMap, CHIP8_FONT};
    use std::io;
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_program_load_ok() -> Result<(), LoadError> {
        let m = load_program(&[0x00, 0xe0])?; // clear screen
        assert_eq!(m.pc, 0x200);
        assert_eq!(m.memory.get_ro_slice(0x200, 2).unwrap(), &[0x00, 0xe0]);
        assert_eq!(m.memory.get_ro_slice(0, 80).unwrap(), &CHIP8_FONT[..]);
        assert_eq!(m.v, [0; 16]);
        assert_eq!(m.i, 0);
        Ok(())
    }

    #[test]
    fn test_program_fills_memory_exactly() -> Result<(), LoadError> {
        let program = vec![0x12; CHIP8_MAX_PROGRAM_BYTES];
        let m = load_program(&program)?;
        assert_eq!(m.memory.get_ro_slice(0xfff, 1).unwrap(), &[0x12]);
        Ok(())
    }

    #[test]
    fn test_program_too_large() {
        let program = vec![0; CHIP8_MAX_PROGRAM_BYTES + 1];
        match load_program(&program) {
            Err(LoadError::TooLarge { len, max }) => {
                assert_eq!(len, 3585);
                assert_eq!(max, 3584);
            }
            other => panic!("expected TooLarge, got {:?}", other),
        }
    }

    #[test]
    fn test_reader_too_large_stops_past_the_limit() {
        let mut src: &[u8] = &[0; 5000];
        match load_reader(&mut src) {
            Err(LoadError::TooLarge { len, max }) => {
                assert_eq!(len, max + 1);
            }
            other => panic!("expected TooLarge, got {:?}", other),
        }
        // the rest of the source is left unread
        assert_eq!(src.len(), 5000 - (CHIP8_MAX_PROGRAM_BYTES + 1));
    }

    #[test]
    fn test_endless_reader_is_too_large() {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let res = load_reader(&mut io::repeat(0));
            let _ = tx.send(matches!(res, Err(LoadError::TooLarge { .. })));
        });
        assert_eq!(rx.recv_timeout(Duration::from_secs(5)), Ok(true));
    }

    #[test]
    fn test_reader_ok() -> Result<(), LoadError> {
        let mut src: &[u8] = &[0x61, 0x05, 0x71, 0x03];
        let m = load_reader(&mut src)?;
        assert_eq!(
            m.memory.get_ro_slice(0x200, 4).unwrap(),
            &[0x61, 0x05, 0x71, 0x03]
        );
        Ok(())
    }

    #[test]
    fn test_missing_file_is_an_error() {
        match load_file("definitely/not/a/rom.ch8") {
            Err(LoadError::Open { path, .. }) => {
                assert_eq!(path, Path::new("definitely/not/a/rom.ch8"))
            }
            other => panic!("expected Open error, got {:?}", other),
        }
    }
}
