use crossterm::event::{poll, read, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal;
use log::debug;
use std::collections::HashMap;
use std::io;
use std::time::{Duration, Instant};

use crate::config::Keymap;

/// map of characters read from the keyboard to what the chip8 might expect
/// where '1' => 0x01 and 'a' => 0x0a
const CHIP8_LITERAL_KEYMAP: [(char, u8); 16] = [
    ('0', 0x00),
    ('1', 0x01),
    ('2', 0x02),
    ('3', 0x03),
    ('4', 0x04),
    ('5', 0x05),
    ('6', 0x06),
    ('7', 0x07),
    ('8', 0x08),
    ('9', 0x09),
    ('a', 0x0a),
    ('b', 0x0b),
    ('c', 0x0c),
    ('d', 0x0d),
    ('e', 0x0e),
    ('f', 0x0f),
];

/// ditto using left-hand side of qwerty keyboard
/// ```text
/// |1|2|3|C|      |1|2|3|4|
/// |4|5|6|D|  ->  |Q|W|E|R|
/// |7|8|9|E|  ->  |A|S|D|F|
/// |A|0|B|F|      |Z|X|C|V|
/// ```
const CHIP8_CONVENTIONAL_KEYMAP: [(char, u8); 16] = [
    ('x', 0x00),
    ('1', 0x01),
    ('2', 0x02),
    ('3', 0x03),
    ('q', 0x04),
    ('w', 0x05),
    ('e', 0x06),
    ('a', 0x07),
    ('s', 0x08),
    ('d', 0x09),
    ('z', 0x0a),
    ('c', 0x0b),
    ('4', 0x0c),
    ('r', 0x0d),
    ('f', 0x0e),
    ('v', 0x0f),
];

/// terminals only report presses (and auto-repeat), never releases, so a
/// key counts as held for this long after the last press we saw
const KEY_HOLD: Duration = Duration::from_millis(120);

/// reads keypresses
pub trait Input {
    /// the current keypad as a bitmask, bit i set while key i is held
    fn keypad(&mut self) -> Result<u16, io::Error>;

    /// whether the user has asked to leave
    fn quit_requested(&self) -> bool {
        false
    }
}

fn keymap_table(keymap: Keymap) -> HashMap<char, u8> {
    match keymap {
        Keymap::Conventional => HashMap::from(CHIP8_CONVENTIONAL_KEYMAP),
        Keymap::Literal => HashMap::from(CHIP8_LITERAL_KEYMAP),
    }
}

/// tracks when each key was last pressed, independent of where the presses
/// come from
struct HeldKeys {
    last_pressed: [Option<Instant>; 16],
}

impl HeldKeys {
    fn new() -> Self {
        HeldKeys {
            last_pressed: [None; 16],
        }
    }

    fn press(&mut self, key: u8, at: Instant) {
        self.last_pressed[key as usize] = Some(at);
    }

    fn mask(&self, now: Instant) -> u16 {
        self.last_pressed
            .iter()
            .enumerate()
            .filter(|(_, t)| matches!(t, Some(t) if now.duration_since(*t) < KEY_HOLD))
            .fold(0, |mask, (key, _)| mask | 1 << key)
    }
}

/// simple implementation of Input, using STDIN in raw mode
pub struct StdinInput {
    held: HeldKeys,
    keymap: HashMap<char, u8>,
    quit: bool,
}

impl StdinInput {
    pub fn new(keymap: Keymap) -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        Ok(StdinInput {
            held: HeldKeys::new(),
            keymap: keymap_table(keymap),
            quit: false,
        })
    }

    fn handle_key(&mut self, evt: KeyEvent, now: Instant) {
        match evt.code {
            KeyCode::Esc => self.quit = true,
            KeyCode::Char('c') if evt.modifiers.contains(KeyModifiers::CONTROL) => {
                self.quit = true
            }
            KeyCode::Char(key) => match self.keymap.get(&key.to_ascii_lowercase()) {
                Some(&mapped_key) => self.held.press(mapped_key, now),
                None => debug!("can't map {:?} to a CHIP-8 key", key),
            },
            other => debug!("ignoring key {:?}", other),
        }
    }

    fn read_stdin(&mut self) -> Result<(), io::Error> {
        while poll(Duration::from_millis(0))? {
            let now = Instant::now();
            match read()? {
                Event::Key(evt) => self.handle_key(evt, now),
                other => debug!("ignoring event {:?}", other),
            }
        }
        Ok(())
    }
}

impl Drop for StdinInput {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

impl Input for StdinInput {
    fn keypad(&mut self) -> Result<u16, io::Error> {
        self.read_stdin()?;
        Ok(self.held.mask(Instant::now()))
    }

    fn quit_requested(&self) -> bool {
        self.quit
    }
}

/// dummy Input implementation for testing: replays a script of keypad
/// masks, one per call, then repeats the last forever
pub struct DummyInput {
    script: Vec<u16>,
    calls: usize,
}

impl DummyInput {
    pub fn new(keypad: u16) -> Self {
        DummyInput {
            script: vec![keypad],
            calls: 0,
        }
    }

    pub fn scripted(script: &[u16]) -> Self {
        DummyInput {
            script: Vec::from(script),
            calls: 0,
        }
    }
}

impl Input for DummyInput {
    fn keypad(&mut self) -> Result<u16, io::Error> {
        let idx = self.calls.min(self.script.len().saturating_sub(1));
        self.calls += 1;
        Ok(self.script.get(idx).copied().unwrap_or(0))
    }
}
