//! Object activation rules.

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Action, Catalog, Room};
use crate::constants::{ACTION_ENERGY_GAIN, ACTION_HUNGER_DECAY, VITAL_MAX};
use crate::session::{InteractionEvent, SessionEvent, Transition};
use crate::state::GameState;
use crate::vitals::VitalEffect;

/// Rejected activation requests. Rejection never changes state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InteractionError {
    #[error("object `{object_id}` is not in the catalog")]
    InvalidObject { object_id: String },
    #[error("object `{object_id}` is in the {object_room}, not the {current_room}")]
    ObjectNotInCurrentRoom {
        object_id: String,
        object_room: Room,
        current_room: Room,
    },
}

/// Vitals change applied when an action completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionDelta {
    pub energy: VitalEffect,
    pub hygiene: VitalEffect,
    pub hunger: VitalEffect,
}

impl Action {
    /// Energy always rises; showers restore hygiene, eating restores hunger,
    /// and everything else costs a little hunger.
    #[must_use]
    pub const fn delta(self) -> ActionDelta {
        let energy = VitalEffect::Add(ACTION_ENERGY_GAIN);
        match self {
            Self::Shower => ActionDelta {
                energy,
                hygiene: VitalEffect::Set(VITAL_MAX),
                hunger: VitalEffect::Unchanged,
            },
            Self::Eat => ActionDelta {
                energy,
                hygiene: VitalEffect::Unchanged,
                hunger: VitalEffect::Set(VITAL_MAX),
            },
            _ => ActionDelta {
                energy,
                hygiene: VitalEffect::Unchanged,
                hunger: VitalEffect::Add(-ACTION_HUNGER_DECAY),
            },
        }
    }
}

/// Activate `object_id` in the current room.
///
/// Activating an object already completed today returns the state unchanged
/// with no events.
///
/// # Errors
///
/// Returns [`InteractionError::InvalidObject`] for ids missing from the catalog
/// and [`InteractionError::ObjectNotInCurrentRoom`] when the object lives in a
/// different room than `state.current_room`.
pub fn activate(state: &GameState, object_id: &str) -> Result<Transition, InteractionError> {
    let (object_room, object) = Catalog::global().find_object(object_id).ok_or_else(|| {
        InteractionError::InvalidObject {
            object_id: object_id.to_string(),
        }
    })?;

    if object_room != state.current_room {
        return Err(InteractionError::ObjectNotInCurrentRoom {
            object_id: object_id.to_string(),
            object_room,
            current_room: state.current_room,
        });
    }

    if state.is_completed(object.id) {
        debug!("{} already completed on day {}", object.id, state.day);
        return Ok(Transition::unchanged(state.clone()));
    }

    let mut next = state.clone();
    next.completed_actions.insert(object.id.to_string());
    let delta = object.action.delta();
    next.character.apply(delta.energy, delta.hygiene, delta.hunger);

    let event = InteractionEvent {
        object_id: object.id.to_string(),
        action: object.action,
        room: object_room,
        day: next.day,
        time_of_day: next.time_of_day,
        vitals: next.character.clone(),
    };
    Ok(Transition::with_event(next, SessionEvent::ObjectActivated(event)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::enter_room;

    fn in_room(room: Room) -> GameState {
        enter_room(&GameState::initial(), room).state
    }

    #[test]
    fn shower_restores_hygiene_only() {
        let state = in_room(Room::Bathroom);
        let transition = activate(&state, "shower").unwrap();
        let vitals = transition.state.character();
        assert_eq!(vitals.hygiene(), 100);
        assert_eq!(vitals.energy(), 90);
        assert_eq!(vitals.hunger(), 60);
        assert!(transition.state.is_completed("shower"));
        assert_eq!(transition.events.len(), 1);

        let again = activate(&transition.state, "shower").unwrap();
        assert_eq!(again.state, transition.state);
        assert!(again.events.is_empty());
    }

    #[test]
    fn eating_restores_hunger_only() {
        let state = in_room(Room::Kitchen);
        let vitals = activate(&state, "table").unwrap().state.character;
        assert_eq!(vitals.hunger(), 100);
        assert_eq!(vitals.energy(), 90);
        assert_eq!(vitals.hygiene(), 70);
    }

    #[test]
    fn other_actions_cost_hunger() {
        let state = GameState::initial();
        let vitals = activate(&state, "bed").unwrap().state.character;
        assert_eq!(vitals.energy(), 90);
        assert_eq!(vitals.hygiene(), 70);
        assert_eq!(vitals.hunger(), 55);
    }

    #[test]
    fn energy_caps_at_max() {
        let state = GameState::initial();
        let state = activate(&state, "bed").unwrap().state;
        let state = activate(&state, "wardrobe").unwrap().state;
        let state = activate(&state, "nightstand").unwrap().state;
        assert_eq!(state.character().energy(), 100);
        assert_eq!(state.character().hunger(), 45);
    }

    #[test]
    fn unknown_object_is_rejected() {
        let state = GameState::initial();
        let err = activate(&state, "jacuzzi").unwrap_err();
        assert_eq!(
            err,
            InteractionError::InvalidObject {
                object_id: "jacuzzi".to_string()
            }
        );
    }

    #[test]
    fn object_outside_current_room_is_rejected() {
        let state = in_room(Room::Gym);
        let err = activate(&state, "bed").unwrap_err();
        assert_eq!(
            err,
            InteractionError::ObjectNotInCurrentRoom {
                object_id: "bed".to_string(),
                object_room: Room::Bedroom,
                current_room: Room::Gym,
            }
        );
        assert_eq!(
            err.to_string(),
            "object `bed` is in the bedroom, not the gym"
        );
    }

    #[test]
    fn activation_event_carries_post_delta_vitals() {
        let state = in_room(Room::Bathroom);
        let transition = activate(&state, "sink").unwrap();
        let event = transition.events[0].as_activation().unwrap();
        assert_eq!(event.object_id, "sink");
        assert_eq!(event.action, Action::Brush);
        assert_eq!(event.room, Room::Bathroom);
        assert_eq!(event.vitals, transition.state.character);
    }

    #[test]
    fn delta_table_matches_action_families() {
        assert_eq!(Action::Shower.delta().hygiene, VitalEffect::Set(100));
        assert_eq!(Action::Eat.delta().hunger, VitalEffect::Set(100));
        assert_eq!(Action::Snack.delta().hunger, VitalEffect::Add(-5));
        assert_eq!(Action::Cardio.delta().energy, VitalEffect::Add(10));
    }
}
