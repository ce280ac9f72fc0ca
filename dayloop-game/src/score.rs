//! Score projections derived from the completion set.
//!
//! Score is never stored. Both observed projections (points and a
//! `count/total` progress label) come from the same completion count.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::constants::POINTS_PER_COMPLETION;
use crate::numbers::len_to_u32;
use crate::state::GameState;

/// Points for the current day: completions × 10.
#[must_use]
pub fn score(state: &GameState) -> u32 {
    len_to_u32(state.completed_actions.len()).saturating_mul(POINTS_PER_COMPLETION)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub points: u32,
    pub completed: u32,
    pub total: u32,
}

impl ScoreCard {
    #[must_use]
    pub fn from_state(state: &GameState) -> Self {
        Self {
            points: score(state),
            completed: len_to_u32(state.completed_actions.len()),
            total: len_to_u32(Catalog::global().len()),
        }
    }

    /// Progress rendered as `completed/total`.
    #[must_use]
    pub fn progress_label(&self) -> String {
        format!("{}/{}", self.completed, self.total)
    }

    #[must_use]
    pub const fn is_perfect_day(&self) -> bool {
        self.total > 0 && self.completed >= self.total
    }
}
