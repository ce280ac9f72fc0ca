//! Real-time scheduling policy for the day/time cycle.
//!
//! The clock only decides how often `advance_time` runs. Speed changes the
//! call frequency and never the transition itself.

use log::trace;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

use crate::config::ClockConfig;
use crate::numbers::millis_to_u64;

/// Fast-forward multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Speed {
    #[default]
    #[serde(rename = "1x")]
    X1,
    #[serde(rename = "2x")]
    X2,
    #[serde(rename = "4x")]
    X4,
}

impl Speed {
    pub const ALL: [Self; 3] = [Self::X1, Self::X2, Self::X4];

    #[must_use]
    pub const fn multiplier(self) -> u32 {
        match self {
            Self::X1 => 1,
            Self::X2 => 2,
            Self::X4 => 4,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::X1 => "1x",
            Self::X2 => "2x",
            Self::X4 => "4x",
        }
    }

    /// Next speed in the 1x → 2x → 4x → 1x rotation.
    #[must_use]
    pub const fn cycle(self) -> Self {
        match self {
            Self::X1 => Self::X2,
            Self::X2 => Self::X4,
            Self::X4 => Self::X1,
        }
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown speed `{0}` (expected 1x, 2x or 4x)")]
pub struct ParseSpeedError(pub String);

impl FromStr for Speed {
    type Err = ParseSpeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|speed| speed.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ParseSpeedError(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClockStatus {
    Stopped,
    Running,
    Suspended,
}

/// Converts elapsed wall time into whole time-of-day ticks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clock {
    config: ClockConfig,
    speed: Speed,
    status: ClockStatus,
    accumulated_ms: u64,
}

impl Clock {
    #[must_use]
    pub const fn new(config: ClockConfig) -> Self {
        Self {
            config,
            speed: config.default_speed,
            status: ClockStatus::Stopped,
            accumulated_ms: 0,
        }
    }

    #[must_use]
    pub const fn status(&self) -> ClockStatus {
        self.status
    }

    #[must_use]
    pub const fn speed(&self) -> Speed {
        self.speed
    }

    pub const fn set_speed(&mut self, speed: Speed) {
        self.speed = speed;
    }

    /// Wall time between ticks at the current speed.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        let ms = (self.config.base_tick_ms / u64::from(self.speed.multiplier())).max(1);
        Duration::from_millis(ms)
    }

    /// Begin or continue counting elapsed time.
    pub const fn start(&mut self) {
        self.status = ClockStatus::Running;
    }

    /// Freeze the clock, keeping any partial interval.
    pub const fn suspend(&mut self) {
        if matches!(self.status, ClockStatus::Running) {
            self.status = ClockStatus::Suspended;
        }
    }

    pub const fn resume(&mut self) {
        if matches!(self.status, ClockStatus::Suspended) {
            self.status = ClockStatus::Running;
        }
    }

    /// Halt the clock and discard any partial interval.
    pub const fn stop(&mut self) {
        self.status = ClockStatus::Stopped;
        self.accumulated_ms = 0;
    }

    /// Report elapsed wall time and return how many ticks are now due.
    ///
    /// Returns 0 unless the clock is running. At most
    /// `max_catch_up_ticks` are returned per call; the overflow is dropped.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if !matches!(self.status, ClockStatus::Running) {
            return 0;
        }
        let interval = millis_to_u64(self.tick_interval().as_millis());
        self.accumulated_ms = self
            .accumulated_ms
            .saturating_add(millis_to_u64(elapsed.as_millis()));
        let due = self.accumulated_ms / interval;
        self.accumulated_ms %= interval;

        let max = self.config.max_catch_up_ticks;
        let ticks = u32::try_from(due).unwrap_or(u32::MAX);
        if ticks > max {
            trace!("clock dropping {} ticks beyond catch-up limit", ticks - max);
            return max;
        }
        if ticks > 0 {
            trace!("clock due {ticks} tick(s) at {}", self.speed);
        }
        ticks
    }
}
