use std::time::{Duration, Instant};

use log::{debug, error, info};
use rand::Rng;

use crate::config::Config;
use crate::display::Display;
use crate::error::Chip8Error;
use crate::input::Input;
use crate::interpreter::Chip8Interpreter;
use crate::sound::Sound;
use crate::timer::TickDivider;

/// Wires an interpreter up to its display, input and sound, and runs it at
/// `config.cpu_hz` with the timers ticking at `config.timer_hz`.
pub struct Environment<'a, R: Rng> {
    interpreter: Chip8Interpreter<R>,
    display: &'a mut dyn Display,
    input: &'a mut dyn Input,
    sound: &'a mut dyn Sound,
    config: Config,
    ticks: TickDivider,
    beeping: bool,
}

impl<'a, R: Rng> Environment<'a, R> {
    pub fn new(
        interpreter: Chip8Interpreter<R>,
        display: &'a mut dyn Display,
        input: &'a mut dyn Input,
        sound: &'a mut dyn Sound,
        config: Config,
    ) -> Result<Self, Chip8Error> {
        config.validate()?;
        let ticks = TickDivider::new(config.cpu_hz, config.timer_hz)?;
        Ok(Environment {
            interpreter,
            display,
            input,
            sound,
            config,
            ticks,
            beeping: false,
        })
    }

    pub fn interpreter(&self) -> &Chip8Interpreter<R> {
        &self.interpreter
    }

    /// run until the input asks to quit, `max_cycles` runs out, or the
    /// program faults. Returns the number of instructions executed.
    pub fn main_loop(&mut self) -> Result<u64, Chip8Error> {
        let cycle_time = Duration::from_secs(1) / self.config.cpu_hz;
        let mut cycles = 0u64;
        info!(
            "running at {}Hz, timers at {}Hz",
            self.config.cpu_hz, self.config.timer_hz
        );

        let result = loop {
            if self.input.quit_requested() {
                info!("quit requested after {} cycles", cycles);
                break Ok(cycles);
            }
            if self.config.max_cycles.map_or(false, |max| cycles >= max) {
                debug!("cycle limit reached");
                break Ok(cycles);
            }

            let start = Instant::now();
            if let Err(e) = self.cycle() {
                break Err(e);
            }
            cycles += 1;

            // instructions run as fast as possible then sleep, so wall-clock
            // timing looks right even though each one takes no time at all
            if self.config.throttle {
                if let Some(remaining) = cycle_time.checked_sub(start.elapsed()) {
                    spin_sleep::sleep(remaining);
                }
            }
        };

        // never leave the beeper on, but don't let that hide why we stopped
        if self.beeping {
            if let Err(e) = self.set_beeping(false) {
                if result.is_err() {
                    error!("{}", e);
                } else {
                    return Err(e);
                }
            }
        }
        result
    }

    /// one instruction plus everything that hangs off it
    pub fn cycle(&mut self) -> Result<(), Chip8Error> {
        let keypad = self.input.keypad()?;
        let tick = self.ticks.tick();
        if self.interpreter.step(keypad, tick)? {
            self.display.draw(&self.interpreter.machine().display)?;
        }

        let active = self.interpreter.machine().sound_active();
        if active != self.beeping {
            self.set_beeping(active)?;
        }
        Ok(())
    }

    fn set_beeping(&mut self, on: bool) -> Result<(), Chip8Error> {
        let res = if on {
            self.sound.beep()
        } else {
            self.sound.stop()
        };
        res.map_err(|e| Chip8Error::Sound(e.to_string()))?;
        self.beeping = on;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::DummyDisplay;
    use crate::error::Fault;
    use crate::input::DummyInput;
    use crate::loader::load_program;
    use crate::sound::Mute;
    use std::error::Error;

    /// counts beeps and stops
    #[derive(Default)]
    struct RecordingSound {
        events: Vec<bool>,
    }

    impl Sound for RecordingSound {
        fn beep(&mut self) -> Result<(), Box<dyn Error>> {
            self.events.push(true);
            Ok(())
        }

        fn stop(&mut self) -> Result<(), Box<dyn Error>> {
            self.events.push(false);
            Ok(())
        }
    }

    fn config(max_cycles: u64) -> Config {
        Config {
            throttle: false,
            max_cycles: Some(max_cycles),
            seed: Some(1),
            ..Config::default()
        }
    }

    #[test]
    fn test_runs_to_cycle_limit() -> Result<(), Chip8Error> {
        let mut display = DummyDisplay::new();
        let mut input = DummyInput::new(0);
        let mut sound = Mute::new();
        // jump to self
        let interp = Chip8Interpreter::with_seed(load_program(&[0x12, 0x00])?, 1);
        let mut env = Environment::new(interp, &mut display, &mut input, &mut sound, config(100))?;
        assert_eq!(env.main_loop()?, 100);
        assert_eq!(env.interpreter().machine().pc, 0x200);
        drop(env);
        assert_eq!(display.frames_drawn, 0);
        Ok(())
    }

    #[test]
    fn test_draws_only_on_display_change() -> Result<(), Chip8Error> {
        let mut display = DummyDisplay::new();
        let mut input = DummyInput::new(0);
        let mut sound = Mute::new();
        // V0 = 0, I = glyph 0, draw it, then spin
        let program = [0x60, 0x00, 0xF0, 0x29, 0xD0, 0x05, 0x12, 0x06];
        let interp = Chip8Interpreter::with_seed(load_program(&program)?, 1);
        let mut env = Environment::new(interp, &mut display, &mut input, &mut sound, config(20))?;
        env.main_loop()?;
        drop(env);
        assert_eq!(display.frames_drawn, 1);
        // glyph 0 has 14 lit pixels
        assert_eq!(display.lit_pixels(), 14);
        Ok(())
    }

    #[test]
    fn test_beeper_follows_sound_timer() -> Result<(), Chip8Error> {
        let mut display = DummyDisplay::new();
        let mut input = DummyInput::new(0);
        let mut sound = RecordingSound::default();
        // V0 = 2, ST = V0, spin
        let program = [0x60, 0x02, 0xF0, 0x18, 0x12, 0x04];
        let interp = Chip8Interpreter::with_seed(load_program(&program)?, 1);
        let mut env = Environment::new(interp, &mut display, &mut input, &mut sound, config(100))?;
        env.main_loop()?;
        assert_eq!(env.interpreter().machine().sound_timer, 0);
        drop(env);
        assert_eq!(sound.events, vec![true, false]);
        Ok(())
    }

    #[test]
    fn test_beeper_stopped_on_exit() -> Result<(), Chip8Error> {
        let mut display = DummyDisplay::new();
        let mut input = DummyInput::new(0);
        let mut sound = RecordingSound::default();
        // V0 = 0xFF, ST = V0, spin; stops long before the timer runs out
        let program = [0x60, 0xFF, 0xF0, 0x18, 0x12, 0x04];
        let interp = Chip8Interpreter::with_seed(load_program(&program)?, 1);
        let mut env = Environment::new(interp, &mut display, &mut input, &mut sound, config(10))?;
        env.main_loop()?;
        drop(env);
        assert_eq!(sound.events, vec![true, false]);
        Ok(())
    }

    #[test]
    fn test_fault_stops_the_loop() {
        let mut display = DummyDisplay::new();
        let mut input = DummyInput::new(0);
        let mut sound = Mute::new();
        let interp = Chip8Interpreter::with_seed(load_program(&[0x00, 0xEE]).unwrap(), 1);
        let mut env =
            Environment::new(interp, &mut display, &mut input, &mut sound, config(10)).unwrap();
        match env.main_loop() {
            Err(Chip8Error::Execute { pc: 0x200, .. }) => {}
            other => panic!("expected a fault, got {:?}", other),
        }
    }

    /// starts fine but can't be silenced
    struct StuckSound;

    impl Sound for StuckSound {
        fn beep(&mut self) -> Result<(), Box<dyn Error>> {
            Ok(())
        }

        fn stop(&mut self) -> Result<(), Box<dyn Error>> {
            Err("speaker stuck".into())
        }
    }

    #[test]
    fn test_fault_survives_failing_beeper() {
        let mut display = DummyDisplay::new();
        let mut input = DummyInput::new(0);
        let mut sound = StuckSound;
        // V0 = 0xFF, ST = V0, return with nothing on the stack
        let program = [0x60, 0xFF, 0xF0, 0x18, 0x00, 0xEE];
        let interp = Chip8Interpreter::with_seed(load_program(&program).unwrap(), 1);
        let mut env =
            Environment::new(interp, &mut display, &mut input, &mut sound, config(10)).unwrap();
        match env.main_loop() {
            Err(Chip8Error::Execute {
                pc: 0x204,
                fault: Fault::StackUnderflow,
                ..
            }) => {}
            other => panic!("expected the stack fault, got {:?}", other),
        }
    }

    #[test]
    fn test_failing_beeper_reported_on_clean_exit() {
        let mut display = DummyDisplay::new();
        let mut input = DummyInput::new(0);
        let mut sound = StuckSound;
        // V0 = 0xFF, ST = V0, spin
        let program = [0x60, 0xFF, 0xF0, 0x18, 0x12, 0x04];
        let interp = Chip8Interpreter::with_seed(load_program(&program).unwrap(), 1);
        let mut env =
            Environment::new(interp, &mut display, &mut input, &mut sound, config(10)).unwrap();
        assert!(matches!(env.main_loop(), Err(Chip8Error::Sound(_))));
    }

    #[test]
    fn test_key_wait_uses_input() -> Result<(), Chip8Error> {
        let mut display = DummyDisplay::new();
        // nothing for three cycles, then key 7
        let mut input = DummyInput::scripted(&[0, 0, 0, 1 << 7]);
        let mut sound = Mute::new();
        // wait for key into V4, then spin
        let program = [0xF4, 0x0A, 0x12, 0x02];
        let interp = Chip8Interpreter::with_seed(load_program(&program)?, 1);
        let mut env = Environment::new(interp, &mut display, &mut input, &mut sound, config(4))?;
        env.main_loop()?;
        assert_eq!(env.interpreter().machine().v[4], 7);
        assert_eq!(env.interpreter().machine().pc, 0x202);
        Ok(())
    }

    #[test]
    fn test_rejects_bad_config() {
        let mut display = DummyDisplay::new();
        let mut input = DummyInput::new(0);
        let mut sound = Mute::new();
        let interp = Chip8Interpreter::with_seed(load_program(&[]).unwrap(), 1);
        let bad = Config {
            timer_hz: 0,
            ..config(1)
        };
        assert!(matches!(
            Environment::new(interp, &mut display, &mut input, &mut sound, bad),
            Err(Chip8Error::Config(_))
        ));
    }

    #[test]
    fn test_throttled_loop_takes_wall_clock_time() -> Result<(), Chip8Error> {
        let mut display = DummyDisplay::new();
        let mut input = DummyInput::new(0);
        let mut sound = Mute::new();
        let interp = Chip8Interpreter::with_seed(load_program(&[0x12, 0x00])?, 1);
        let c = Config {
            throttle: true,
            cpu_hz: 1000,
            ..config(50)
        };
        let mut env = Environment::new(interp, &mut display, &mut input, &mut sound, c)?;
        let start = Instant::now();
        env.main_loop()?;
        // 50 cycles at 1kHz; allow a little slack for the first one
        assert!(start.elapsed() >= Duration::from_millis(45));
        Ok(())
    }
}
