//! Session and clock configuration.
//!
//! Every field has a serde default so partial JSON documents are accepted.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clock::Speed;
use crate::constants::{DEFAULT_BASE_TICK_MS, DEFAULT_HISTORY_LIMIT, DEFAULT_MAX_CATCH_UP_TICKS};

/// Errors raised when configuration invariants are violated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionConfigError {
    #[error("base tick interval must be greater than zero")]
    ZeroTickInterval,
    #[error("base tick interval {base_tick_ms}ms is too fine to divide at {speed}")]
    IntervalTooFine { base_tick_ms: u64, speed: Speed },
    #[error("max catch-up ticks must be at least 1")]
    ZeroCatchUp,
}

/// Real-time pacing for the day/time cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockConfig {
    /// Milliseconds between time-of-day phases at 1x speed.
    #[serde(default = "ClockConfig::default_base_tick_ms")]
    pub base_tick_ms: u64,
    #[serde(default)]
    pub default_speed: Speed,
    /// Upper bound on ticks applied from a single elapsed-time report.
    #[serde(default = "ClockConfig::default_max_catch_up_ticks")]
    pub max_catch_up_ticks: u32,
}

impl ClockConfig {
    const fn default_base_tick_ms() -> u64 {
        DEFAULT_BASE_TICK_MS
    }

    const fn default_max_catch_up_ticks() -> u32 {
        DEFAULT_MAX_CATCH_UP_TICKS
    }

    /// # Errors
    ///
    /// Returns an error if the interval is zero, cannot be divided by the
    /// fastest speed, or catch-up is disabled.
    pub fn validate(&self) -> Result<(), SessionConfigError> {
        if self.base_tick_ms == 0 {
            return Err(SessionConfigError::ZeroTickInterval);
        }
        let fastest = Speed::X4;
        if self.base_tick_ms < u64::from(fastest.multiplier()) {
            return Err(SessionConfigError::IntervalTooFine {
                base_tick_ms: self.base_tick_ms,
                speed: fastest,
            });
        }
        if self.max_catch_up_ticks == 0 {
            return Err(SessionConfigError::ZeroCatchUp);
        }
        Ok(())
    }
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            base_tick_ms: Self::default_base_tick_ms(),
            default_speed: Speed::default(),
            max_catch_up_ticks: Self::default_max_catch_up_ticks(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub clock: ClockConfig,
    /// Number of undo snapshots retained; zero disables history.
    #[serde(default = "SessionConfig::default_history_limit")]
    pub history_limit: usize,
}

impl SessionConfig {
    const fn default_history_limit() -> usize {
        DEFAULT_HISTORY_LIMIT
    }

    /// Parse and validate a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or fails validation.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns an error if the clock configuration is invalid.
    pub fn validate(&self) -> Result<(), SessionConfigError> {
        self.clock.validate()
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            clock: ClockConfig::default(),
            history_limit: Self::default_history_limit(),
        }
    }
}
