//! Session orchestration: the intent reducer and the controller that owns
//! the single mutable game state.

mod event;
mod history;

pub use event::{EventLog, GameObserver, InteractionEvent, SessionEvent};
pub use history::History;

use log::{debug, info};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::time::Duration;

use crate::catalog::Room;
use crate::clock::{Clock, ClockStatus, Speed};
use crate::config::SessionConfig;
use crate::cycle::advance_time;
use crate::interaction::{InteractionError, activate};
use crate::state::GameState;

/// Events produced by a single transition.
pub type EventBatch = SmallVec<[SessionEvent; 2]>;

/// Result of applying one intent: the next snapshot plus what happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: GameState,
    pub events: EventBatch,
}

impl Transition {
    #[must_use]
    pub fn unchanged(state: GameState) -> Self {
        Self {
            state,
            events: EventBatch::new(),
        }
    }

    #[must_use]
    pub fn with_event(state: GameState, event: SessionEvent) -> Self {
        let mut events = EventBatch::new();
        events.push(event);
        Self { state, events }
    }
}

/// Player-facing command or clock tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", content = "target", rename_all = "snake_case")]
pub enum Intent {
    EnterRoom(Room),
    Activate(String),
    TogglePlay,
    Reset,
    AdvanceTime,
}

impl Intent {
    #[must_use]
    pub fn activate(object_id: impl Into<String>) -> Self {
        Self::Activate(object_id.into())
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::EnterRoom(_) => "enter_room",
            Self::Activate(_) => "activate",
            Self::TogglePlay => "toggle_play",
            Self::Reset => "reset",
            Self::AdvanceTime => "advance_time",
        }
    }
}

/// Move to `room`. Nothing else changes.
#[must_use]
pub fn enter_room(state: &GameState, room: Room) -> Transition {
    let mut next = state.clone();
    next.current_room = room;
    Transition::with_event(next, SessionEvent::RoomEntered { room })
}

#[must_use]
pub fn toggle_play(state: &GameState) -> Transition {
    let mut next = state.clone();
    next.is_playing = !state.is_playing;
    let is_playing = next.is_playing;
    Transition::with_event(next, SessionEvent::PlayToggled { is_playing })
}

/// Unconditionally return the fixed initial state.
#[must_use]
pub fn reset() -> Transition {
    Transition::with_event(GameState::initial(), SessionEvent::SessionReset)
}

/// Pure reducer from one snapshot to the next.
///
/// # Errors
///
/// Only [`Intent::Activate`] can fail; see [`activate`].
pub fn reduce(state: &GameState, intent: &Intent) -> Result<Transition, InteractionError> {
    match intent {
        Intent::EnterRoom(room) => Ok(enter_room(state, *room)),
        Intent::Activate(object_id) => activate(state, object_id),
        Intent::TogglePlay => Ok(toggle_play(state)),
        Intent::Reset => Ok(reset()),
        Intent::AdvanceTime => Ok(advance_time(state)),
    }
}

/// Outcome of replaying a recorded intent stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayOutcome {
    pub state: GameState,
    /// Index into the intent stream paired with the rejection reason.
    pub rejected: Vec<(usize, InteractionError)>,
}

/// Fold `intents` over `start`, skipping rejected commands.
#[must_use]
pub fn replay(start: GameState, intents: &[Intent]) -> ReplayOutcome {
    let mut state = start;
    let mut rejected = Vec::new();
    for (index, intent) in intents.iter().enumerate() {
        match reduce(&state, intent) {
            Ok(transition) => state = transition.state,
            Err(err) => rejected.push((index, err)),
        }
    }
    ReplayOutcome { state, rejected }
}

/// Handle returned by [`SessionController::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

/// Owns the game state and applies commands to it in arrival order.
pub struct SessionController {
    state: GameState,
    clock: Clock,
    history: History,
    observers: Vec<(ObserverId, Box<dyn GameObserver>)>,
    next_observer: u64,
}

impl fmt::Debug for SessionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionController")
            .field("state", &self.state)
            .field("clock", &self.clock)
            .field("history", &self.history.len())
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl SessionController {
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self::from_state(GameState::initial(), config)
    }

    /// Adopt a restored snapshot as-is. No transition logic runs.
    #[must_use]
    pub fn from_state(state: GameState, config: SessionConfig) -> Self {
        let mut session = Self {
            state,
            clock: Clock::new(config.clock),
            history: History::new(config.history_limit),
            observers: Vec::new(),
            next_observer: 0,
        };
        session.sync_clock();
        session
    }

    #[must_use]
    pub const fn state(&self) -> &GameState {
        &self.state
    }

    #[must_use]
    pub const fn clock(&self) -> &Clock {
        &self.clock
    }

    #[must_use]
    pub const fn speed(&self) -> Speed {
        self.clock.speed()
    }

    pub const fn set_speed(&mut self, speed: Speed) {
        self.clock.set_speed(speed);
    }

    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.history.len()
    }

    /// Register a collaborator notified after each committed transition.
    pub fn subscribe(&mut self, observer: impl GameObserver + 'static) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Drop a registered observer. Returns `false` for unknown handles.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(registered, _)| *registered != id);
        self.observers.len() != before
    }

    /// Apply `intent`. Rejected intents leave the state untouched.
    ///
    /// # Errors
    ///
    /// Propagates [`InteractionError`] from object activation.
    pub fn dispatch(&mut self, intent: Intent) -> Result<&GameState, InteractionError> {
        let transition = reduce(&self.state, &intent).inspect_err(|err| {
            debug!("rejected {}: {err}", intent.label());
        })?;
        self.commit(&intent, transition);
        Ok(&self.state)
    }

    fn commit(&mut self, intent: &Intent, transition: Transition) {
        let Transition { state, events } = transition;
        if matches!(intent, Intent::Reset) {
            self.history.clear();
            self.clock.stop();
            self.state = state;
            info!("session reset");
        } else if state != self.state {
            let previous = std::mem::replace(&mut self.state, state);
            self.history.record(previous);
        }
        self.sync_clock();
        debug!(
            "applied {} -> day {} {} in {} ({} events)",
            intent.label(),
            self.state.day,
            self.state.time_of_day,
            self.state.current_room,
            events.len()
        );
        for event in &events {
            for (_, observer) in &mut self.observers {
                observer.on_event(event);
            }
        }
    }

    fn sync_clock(&mut self) {
        if self.state.is_playing {
            match self.clock.status() {
                ClockStatus::Stopped => self.clock.start(),
                ClockStatus::Suspended => self.clock.resume(),
                ClockStatus::Running => {}
            }
        } else {
            self.clock.suspend();
        }
    }

    pub fn enter_room(&mut self, room: Room) -> &GameState {
        let transition = enter_room(&self.state, room);
        self.apply(&Intent::EnterRoom(room), transition)
    }

    /// # Errors
    ///
    /// See [`activate`].
    pub fn activate(&mut self, object_id: &str) -> Result<&GameState, InteractionError> {
        self.dispatch(Intent::activate(object_id))
    }

    pub fn toggle_play(&mut self) -> &GameState {
        let transition = toggle_play(&self.state);
        self.apply(&Intent::TogglePlay, transition)
    }

    pub fn reset(&mut self) -> &GameState {
        self.apply(&Intent::Reset, reset())
    }

    /// Advance the day/time cycle by one phase regardless of play state.
    pub fn advance_time(&mut self) -> &GameState {
        let transition = advance_time(&self.state);
        self.apply(&Intent::AdvanceTime, transition)
    }

    fn apply(&mut self, intent: &Intent, transition: Transition) -> &GameState {
        self.commit(intent, transition);
        &self.state
    }

    /// Scheduler entry point: feed elapsed wall time, apply due ticks.
    ///
    /// Returns the number of `advance_time` steps applied. Paused sessions
    /// never advance.
    pub fn pump(&mut self, elapsed: Duration) -> u32 {
        if !self.state.is_playing {
            return 0;
        }
        let ticks = self.clock.advance(elapsed);
        for _ in 0..ticks {
            self.advance_time();
        }
        ticks
    }

    /// Restore the snapshot before the most recent change.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.history.undo() else {
            return false;
        };
        debug!("undo to day {} {}", previous.day, previous.time_of_day);
        self.state = previous;
        self.sync_clock();
        true
    }

    /// Release the clock and hand back the final state.
    #[must_use]
    pub fn into_state(mut self) -> GameState {
        self.clock.stop();
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::TimeOfDay;

    fn fast_config() -> SessionConfig {
        let mut config = SessionConfig::default();
        config.clock.base_tick_ms = 1_000;
        config
    }

    #[test]
    fn enter_room_changes_only_the_room() {
        let state = GameState::initial();
        let next = enter_room(&state, Room::Kitchen).state;
        assert_eq!(next.current_room(), Room::Kitchen);
        let back = enter_room(&next, Room::Bedroom).state;
        assert_eq!(back, state);
    }

    #[test]
    fn reset_discards_everything() {
        let mut session = SessionController::default();
        session.toggle_play();
        session.enter_room(Room::Gym);
        session.activate("weights").unwrap();
        session.advance_time();
        assert_ne!(session.state(), &GameState::initial());

        session.reset();
        assert_eq!(session.state(), &GameState::initial());
        assert_eq!(session.undo_depth(), 0);
        assert_eq!(session.clock().status(), ClockStatus::Stopped);
    }

    #[test]
    fn rejected_intent_leaves_state_identical() {
        let mut session = SessionController::default();
        session.enter_room(Room::Gym);
        let before = session.state().clone();
        let depth = session.undo_depth();
        let err = session.activate("bed").unwrap_err();
        assert!(matches!(err, InteractionError::ObjectNotInCurrentRoom { .. }));
        assert_eq!(session.state(), &before);
        assert_eq!(session.undo_depth(), depth);
    }

    #[test]
    fn observers_see_activations_but_not_repeats() {
        let log = EventLog::new();
        let mut session = SessionController::default();
        session.subscribe(log.clone());
        session.activate("bed").unwrap();
        session.activate("bed").unwrap();
        let activations = log.activations();
        assert_eq!(activations.len(), 1);
        assert_eq!(activations[0].object_id, "bed");
    }

    #[test]
    fn unsubscribed_observers_stop_receiving_events() {
        let kept = EventLog::new();
        let dropped = EventLog::new();
        let mut session = SessionController::default();
        session.subscribe(kept.clone());
        let id = session.subscribe(dropped.clone());

        session.activate("bed").unwrap();
        assert!(session.unsubscribe(id));
        assert!(!session.unsubscribe(id));
        session.activate("wardrobe").unwrap();

        assert_eq!(kept.activations().len(), 2);
        assert_eq!(dropped.activations().len(), 1);
    }

    #[test]
    fn pump_respects_pause() {
        let mut session = SessionController::new(fast_config());
        assert_eq!(session.pump(Duration::from_secs(5)), 0);
        assert_eq!(session.state().time_of_day(), TimeOfDay::Morning);

        session.toggle_play();
        assert_eq!(session.pump(Duration::from_millis(2_000)), 2);
        assert_eq!(session.state().time_of_day(), TimeOfDay::Evening);

        session.toggle_play();
        assert_eq!(session.pump(Duration::from_secs(30)), 0);
        assert_eq!(session.state().time_of_day(), TimeOfDay::Evening);
        assert_eq!(session.clock().status(), ClockStatus::Suspended);
    }

    #[test]
    fn speed_only_changes_tick_frequency() {
        let mut slow = SessionController::new(fast_config());
        let mut fast = SessionController::new(fast_config());
        fast.set_speed(Speed::X4);
        slow.toggle_play();
        fast.toggle_play();

        for _ in 0..4 {
            slow.pump(Duration::from_millis(1_000));
        }
        fast.pump(Duration::from_millis(1_000));

        assert_eq!(slow.state(), fast.state());
        assert_eq!(fast.state().day(), 2);
    }

    #[test]
    fn undo_walks_back_snapshots() {
        let mut session = SessionController::default();
        session.enter_room(Room::Kitchen);
        session.activate("table").unwrap();
        assert!(session.undo());
        assert!(!session.state().is_completed("table"));
        assert_eq!(session.state().current_room(), Room::Kitchen);
        assert!(session.undo());
        assert_eq!(session.state(), &GameState::initial());
        assert!(!session.undo());
    }

    #[test]
    fn replay_matches_live_session() {
        let intents = vec![
            Intent::EnterRoom(Room::Bathroom),
            Intent::activate("shower"),
            Intent::activate("bed"),
            Intent::AdvanceTime,
            Intent::activate("shower"),
        ];
        let outcome = replay(GameState::initial(), &intents);
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(outcome.rejected[0].0, 2);

        let mut session = SessionController::default();
        for intent in intents {
            let _ = session.dispatch(intent);
        }
        assert_eq!(session.state(), &outcome.state);
        assert_eq!(session.state().fingerprint(), outcome.state.fingerprint());
    }

    #[test]
    fn intents_serialize_for_scripting() {
        let json = serde_json::to_string(&Intent::activate("tv")).unwrap();
        assert_eq!(json, r#"{"intent":"activate","target":"tv"}"#);
        let parsed: Intent = serde_json::from_str(r#"{"intent":"advance_time"}"#).unwrap();
        assert_eq!(parsed, Intent::AdvanceTime);
    }

    #[test]
    fn restored_playing_state_resumes_clock() {
        let playing = toggle_play(&GameState::initial()).state;
        let session = SessionController::from_state(playing, fast_config());
        assert_eq!(session.clock().status(), ClockStatus::Running);
    }
}
