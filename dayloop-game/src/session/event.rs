//! Notifications emitted by committed transitions.
//!
//! Observers are told what happened after the new state is in place; they
//! receive shared references only and cannot alter the outcome.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

use crate::catalog::{Action, Room};
use crate::state::TimeOfDay;
use crate::vitals::CharacterVitals;

/// Payload for a successful (non-repeat) object activation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionEvent {
    pub object_id: String,
    pub action: Action,
    pub room: Room,
    pub day: u32,
    pub time_of_day: TimeOfDay,
    /// Vitals after the action's delta was applied.
    pub vitals: CharacterVitals,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionEvent {
    ObjectActivated(InteractionEvent),
    RoomEntered { room: Room },
    PlayToggled { is_playing: bool },
    TimeAdvanced { day: u32, time_of_day: TimeOfDay },
    DayStarted { day: u32 },
    SessionReset,
}

impl SessionEvent {
    #[must_use]
    pub const fn as_activation(&self) -> Option<&InteractionEvent> {
        match self {
            Self::ObjectActivated(event) => Some(event),
            _ => None,
        }
    }
}

/// External collaborator (audio, haptics, analytics) reacting to events.
pub trait GameObserver {
    fn on_event(&mut self, event: &SessionEvent);
}

impl<F> GameObserver for F
where
    F: FnMut(&SessionEvent),
{
    fn on_event(&mut self, event: &SessionEvent) {
        self(event);
    }
}

/// Recording observer; clones share one buffer.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<SessionEvent>>>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn snapshot(&self) -> Vec<SessionEvent> {
        self.events.borrow().clone()
    }

    #[must_use]
    pub fn activations(&self) -> Vec<InteractionEvent> {
        self.events
            .borrow()
            .iter()
            .filter_map(SessionEvent::as_activation)
            .cloned()
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl GameObserver for EventLog {
    fn on_event(&mut self, event: &SessionEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_log_clones_share_buffer() {
        let log = EventLog::new();
        let mut sink = log.clone();
        sink.on_event(&SessionEvent::SessionReset);
        sink.on_event(&SessionEvent::DayStarted { day: 2 });
        assert_eq!(log.len(), 2);
        assert!(log.activations().is_empty());
        log.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn closures_act_as_observers() {
        let mut count = 0;
        {
            let mut observer = |_: &SessionEvent| count += 1;
            observer.on_event(&SessionEvent::PlayToggled { is_playing: true });
        }
        assert_eq!(count, 1);
    }

    #[test]
    fn events_serialize_with_kind_tag() {
        let json = serde_json::to_string(&SessionEvent::RoomEntered { room: Room::Gym }).unwrap();
        assert_eq!(json, r#"{"kind":"room_entered","room":"gym"}"#);
    }
}
