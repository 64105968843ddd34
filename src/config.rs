use clap::ValueEnum;

use crate::error::ConfigError;

/// which keys on a qwerty keyboard stand in for the hex keypad
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Keymap {
    /// 1234/QWER/ASDF/ZXCV laid out like the COSMAC VIP keypad
    Conventional,
    /// 0-9 and a-f type their own value
    Literal,
}

/// Knobs for the driving loop. The interpreter itself needs none of these;
/// they decide how fast it is stepped and what it is connected to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// instructions per second
    pub cpu_hz: u32,
    /// delay/sound timer decrements per second
    pub timer_hz: u32,
    /// sleep between instructions to hold `cpu_hz` in wall-clock time
    pub throttle: bool,
    /// fixed seed for CXNN; random each run otherwise
    pub seed: Option<u64>,
    /// stop after this many instructions
    pub max_cycles: Option<u64>,
    pub mute: bool,
    pub keymap: Keymap,
}

pub const DEFAULT_CPU_HZ: u32 = 500;
pub const DEFAULT_TIMER_HZ: u32 = 60;

impl Default for Config {
    fn default() -> Self {
        Config {
            cpu_hz: DEFAULT_CPU_HZ,
            timer_hz: DEFAULT_TIMER_HZ,
            throttle: true,
            seed: None,
            max_cycles: None,
            mute: false,
            keymap: Keymap::Conventional,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timer_hz == 0 {
            return Err(ConfigError::ZeroTimerRate);
        }
        if self.cpu_hz < self.timer_hz {
            return Err(ConfigError::CpuSlowerThanTimers {
                cpu_hz: self.cpu_hz,
                timer_hz: self.timer_hz,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let c = Config::default();
        assert_eq!(c.cpu_hz, 500);
        assert_eq!(c.timer_hz, 60);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_timer_rate() {
        let c = Config {
            timer_hz: 0,
            ..Config::default()
        };
        assert_eq!(c.validate(), Err(ConfigError::ZeroTimerRate));
    }

    #[test]
    fn test_rejects_slow_cpu() {
        let c = Config {
            cpu_hz: 50,
            ..Config::default()
        };
        assert_eq!(
            c.validate(),
            Err(ConfigError::CpuSlowerThanTimers {
                cpu_hz: 50,
                timer_hz: 60
            })
        );
    }
}
