//! Centralized balance and tuning constants for Dayloop game logic.
//!
//! These values define the deterministic math for the routine simulation.
//! Keeping them together ensures that gameplay can only be adjusted via
//! code changes reviewed in version control.

// Vitals -------------------------------------------------------------------
pub const VITAL_MIN: i32 = 0;
pub const VITAL_MAX: i32 = 100;

pub(crate) const INITIAL_ENERGY: i32 = 80;
pub(crate) const INITIAL_HYGIENE: i32 = 70;
pub(crate) const INITIAL_HUNGER: i32 = 60;

// Action deltas ------------------------------------------------------------
pub(crate) const ACTION_ENERGY_GAIN: i32 = 10;
pub(crate) const ACTION_HUNGER_DECAY: i32 = 5;

// Mood thresholds ----------------------------------------------------------
pub(crate) const MOOD_EXHAUSTED_ENERGY: i32 = 20;
pub(crate) const MOOD_HUNGRY_HUNGER: i32 = 30;
pub(crate) const MOOD_GRUBBY_HYGIENE: i32 = 30;
pub(crate) const MOOD_HAPPY_MEAN: i32 = 80;
pub(crate) const MOOD_CONTENT_MEAN: i32 = 50;

// Score --------------------------------------------------------------------
pub const POINTS_PER_COMPLETION: u32 = 10;

// Day cycle ----------------------------------------------------------------
pub(crate) const FIRST_DAY: u32 = 1;

// Session configuration defaults -------------------------------------------
pub(crate) const DEFAULT_BASE_TICK_MS: u64 = 60_000;
pub(crate) const DEFAULT_MAX_CATCH_UP_TICKS: u32 = 8;
pub(crate) const DEFAULT_HISTORY_LIMIT: usize = 64;
