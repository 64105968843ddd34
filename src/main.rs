use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use log::{error, info};

use chip8vm::config::{DEFAULT_CPU_HZ, DEFAULT_TIMER_HZ};
use chip8vm::display::MonoTermDisplay;
use chip8vm::input::StdinInput;
use chip8vm::sound::{Mute, SimpleBeep, Sound};
use chip8vm::{load_file, Chip8Interpreter, Config, Environment, Keymap};

/// Run a CHIP-8 program in the terminal
#[derive(Parser, Debug)]
#[command(name = "chip8vm", version, about)]
struct Args {
    /// program image to load at 0x200
    rom: PathBuf,

    /// instructions per second
    #[arg(long, default_value_t = DEFAULT_CPU_HZ)]
    hz: u32,

    /// timer decrements per second
    #[arg(long, default_value_t = DEFAULT_TIMER_HZ)]
    timer_hz: u32,

    /// seed for the random number instruction
    #[arg(long)]
    seed: Option<u64>,

    /// stop after this many instructions
    #[arg(long)]
    cycles: Option<u64>,

    /// don't use the PC speaker
    #[arg(long)]
    mute: bool,

    /// run as fast as possible
    #[arg(long)]
    unthrottled: bool,

    #[arg(long, value_enum, default_value_t = Keymap::Conventional)]
    keymap: Keymap,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            cpu_hz: self.hz,
            timer_hz: self.timer_hz,
            throttle: !self.unthrottled,
            seed: self.seed,
            max_cycles: self.cycles,
            mute: self.mute,
            keymap: self.keymap,
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let config = args.config();
    config.validate()?;

    // load before touching the terminal so errors are readable
    let machine = load_file(&args.rom)?;
    let interpreter = match config.seed {
        Some(seed) => Chip8Interpreter::with_seed(machine, seed),
        None => Chip8Interpreter::new(machine),
    };

    let mut display = MonoTermDisplay::new()?;
    let mut input = StdinInput::new(config.keymap)?;
    let mut sound: Box<dyn Sound> = if config.mute {
        Box::new(Mute::new())
    } else {
        Box::new(SimpleBeep::new())
    };

    let mut env = Environment::new(
        interpreter,
        &mut display,
        &mut input,
        sound.as_mut(),
        config,
    )?;
    let cycles = env.main_loop()?;
    info!("ran {} cycles", cycles);
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let result = run(args);

    // shove some junk on stdout to stop the cli messing up the last frame
    for _ in 0..12 {
        println!();
    }
    if let Err(e) = result {
        error!("{}", e);
        eprintln!("chip8vm: {}", e);
        std::process::exit(1);
    }
}
