//! The delay and sound timers count down at 60Hz whatever the instruction
//! rate is. The interpreter only decrements them when told a tick is due;
//! `TickDivider` works out which steps those are.

use crate::error::ConfigError;

/// Spreads `timer_hz` ticks evenly over every `cpu_hz` steps, using an
/// accumulator so that rates which don't divide evenly (500/60) still come
/// out exact over a whole second.
#[derive(Debug, Clone)]
pub struct TickDivider {
    cpu_hz: u32,
    timer_hz: u32,
    // wide enough that acc + timer_hz can't overflow for any u32 rates
    acc: u64,
}

impl TickDivider {
    pub fn new(cpu_hz: u32, timer_hz: u32) -> Result<Self, ConfigError> {
        if timer_hz == 0 {
            return Err(ConfigError::ZeroTimerRate);
        }
        if cpu_hz < timer_hz {
            return Err(ConfigError::CpuSlowerThanTimers { cpu_hz, timer_hz });
        }
        Ok(TickDivider {
            cpu_hz,
            timer_hz,
            acc: 0,
        })
    }

    /// call once per step; true when this step should also tick the timers
    pub fn tick(&mut self) -> bool {
        self.acc += u64::from(self.timer_hz);
        if self.acc >= u64::from(self.cpu_hz) {
            self.acc -= u64::from(self.cpu_hz);
            true
        } else {
            false
        }
    }
}

impl Iterator for TickDivider {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        Some(self.tick())
    }
}
