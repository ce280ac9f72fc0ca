use std::fmt;

use dayloop_game::{Catalog, GameState, Intent, Room};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Policy interface for automated play strategies.
pub trait PlayerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Choose the next intent, or `None` to let only the clock run this step.
    fn next_intent(&mut self, state: &GameState) -> Option<Intent>;
}

/// Built-in gameplay strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameplayStrategy {
    /// Works through every room in order, then sleeps the day away.
    Diligent,
    /// Seeded random intents, including invalid ones.
    Wanderer,
    /// Taps the first object in the current room forever.
    Repeater,
    /// Issues no intents.
    Idle,
}

impl GameplayStrategy {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            GameplayStrategy::Diligent => "Diligent",
            GameplayStrategy::Wanderer => "Wanderer",
            GameplayStrategy::Repeater => "Repeater",
            GameplayStrategy::Idle => "Idle",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn PlayerPolicy + Send> {
        match self {
            GameplayStrategy::Diligent => Box::new(DiligentPolicy),
            GameplayStrategy::Wanderer => Box::new(WandererPolicy::new(seed)),
            GameplayStrategy::Repeater => Box::new(RepeaterPolicy),
            GameplayStrategy::Idle => Box::new(IdlePolicy),
        }
    }
}

impl fmt::Display for GameplayStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

struct DiligentPolicy;
struct RepeaterPolicy;
struct IdlePolicy;

impl PlayerPolicy for DiligentPolicy {
    fn name(&self) -> &'static str {
        "diligent"
    }

    fn next_intent(&mut self, state: &GameState) -> Option<Intent> {
        let catalog = Catalog::global();
        let pending = |room: Room| {
            catalog
                .objects_in(room)
                .iter()
                .find(|object| !state.is_completed(object.id))
        };

        if let Some(object) = pending(state.current_room()) {
            return Some(Intent::activate(object.id));
        }
        let next_room = Room::ALL
            .into_iter()
            .find(|room| pending(*room).is_some());
        Some(next_room.map_or(Intent::AdvanceTime, Intent::EnterRoom))
    }
}

impl PlayerPolicy for RepeaterPolicy {
    fn name(&self) -> &'static str {
        "repeater"
    }

    fn next_intent(&mut self, state: &GameState) -> Option<Intent> {
        Catalog::global()
            .objects_in(state.current_room())
            .first()
            .map(|object| Intent::activate(object.id))
    }
}

impl PlayerPolicy for IdlePolicy {
    fn name(&self) -> &'static str {
        "idle"
    }

    fn next_intent(&mut self, _state: &GameState) -> Option<Intent> {
        None
    }
}

const GHOST_OBJECT: &str = "ghost";

struct WandererPolicy {
    rng: ChaCha20Rng,
    objects: Vec<&'static str>,
}

impl WandererPolicy {
    fn new(seed: u64) -> Self {
        let objects = Catalog::global()
            .iter()
            .map(|(_, object)| object.id)
            .collect();
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            objects,
        }
    }
}

impl PlayerPolicy for WandererPolicy {
    fn name(&self) -> &'static str {
        "wanderer"
    }

    fn next_intent(&mut self, _state: &GameState) -> Option<Intent> {
        let roll: u32 = self.rng.gen_range(0..100);
        let intent = match roll {
            0 => Intent::Reset,
            1..=3 => Intent::TogglePlay,
            4..=8 => Intent::activate(GHOST_OBJECT),
            9..=18 => Intent::AdvanceTime,
            19..=48 => {
                let room = Room::ALL[self.rng.gen_range(0..Room::ALL.len())];
                Intent::EnterRoom(room)
            }
            _ => {
                let id = self.objects[self.rng.gen_range(0..self.objects.len())];
                Intent::activate(id)
            }
        };
        Some(intent)
    }
}
