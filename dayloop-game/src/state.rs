use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::hash::Hasher;
use thiserror::Error;
use twox_hash::XxHash64;

use crate::catalog::{Catalog, Room};
use crate::constants::FIRST_DAY;
use crate::score::{ScoreCard, score};
use crate::vitals::{CharacterVitals, Mood};

/// Cyclic phase of the in-game day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    #[default]
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    pub const ALL: [Self; 4] = [Self::Morning, Self::Afternoon, Self::Evening, Self::Night];

    /// Following phase; night wraps back to morning.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Morning => Self::Afternoon,
            Self::Afternoon => Self::Evening,
            Self::Evening => Self::Night,
            Self::Night => Self::Morning,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
            Self::Night => "night",
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot contents that cannot be repaired on load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateLoadError {
    #[error("day counter must start at 1, found 0")]
    ZeroDay,
}

/// Complete mutable game aggregate. Only the core's transitions produce new values.
///
/// Deserialization rejects `day == 0` and drops completion ids the catalog
/// does not know.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "GameStateRepr")]
pub struct GameState {
    pub(crate) day: u32,
    pub(crate) is_playing: bool,
    pub(crate) current_room: Room,
    #[serde(default)]
    pub(crate) completed_actions: BTreeSet<String>,
    pub(crate) character: CharacterVitals,
    pub(crate) time_of_day: TimeOfDay,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GameStateRepr {
    day: u32,
    is_playing: bool,
    current_room: Room,
    #[serde(default)]
    completed_actions: BTreeSet<String>,
    character: CharacterVitals,
    time_of_day: TimeOfDay,
}

impl TryFrom<GameStateRepr> for GameState {
    type Error = StateLoadError;

    fn try_from(raw: GameStateRepr) -> Result<Self, Self::Error> {
        if raw.day == 0 {
            return Err(StateLoadError::ZeroDay);
        }
        let catalog = Catalog::global();
        let mut completed_actions = raw.completed_actions;
        completed_actions.retain(|id| {
            let known = catalog.find_object(id).is_some();
            if !known {
                warn!("dropping unknown completed object `{id}`");
            }
            known
        });
        Ok(Self {
            day: raw.day,
            is_playing: raw.is_playing,
            current_room: raw.current_room,
            completed_actions,
            character: raw.character,
            time_of_day: raw.time_of_day,
        })
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::initial()
    }
}

impl GameState {
    /// Fixed starting state used for new sessions and every reset.
    #[must_use]
    pub const fn initial() -> Self {
        Self {
            day: FIRST_DAY,
            is_playing: false,
            current_room: Room::Bedroom,
            completed_actions: BTreeSet::new(),
            character: CharacterVitals::initial(),
            time_of_day: TimeOfDay::Morning,
        }
    }

    #[must_use]
    pub const fn day(&self) -> u32 {
        self.day
    }

    #[must_use]
    pub const fn is_playing(&self) -> bool {
        self.is_playing
    }

    #[must_use]
    pub const fn current_room(&self) -> Room {
        self.current_room
    }

    #[must_use]
    pub const fn completed_actions(&self) -> &BTreeSet<String> {
        &self.completed_actions
    }

    #[must_use]
    pub fn is_completed(&self, object_id: &str) -> bool {
        self.completed_actions.contains(object_id)
    }

    #[must_use]
    pub const fn character(&self) -> &CharacterVitals {
        &self.character
    }

    #[must_use]
    pub const fn time_of_day(&self) -> TimeOfDay {
        self.time_of_day
    }

    #[must_use]
    pub fn mood(&self) -> Mood {
        self.character.mood()
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        score(self)
    }

    #[must_use]
    pub fn score_card(&self) -> ScoreCard {
        ScoreCard::from_state(self)
    }

    /// Deterministic hash of the canonical serialized form.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let bytes = serde_json::to_vec(self).unwrap_or_default();
        let mut hasher = XxHash64::with_seed(0);
        hasher.write(&bytes);
        hasher.finish()
    }
}
