//! Dayloop Game Engine
//!
//! Platform-agnostic simulation core for the Dayloop daily-routine game.
//! This crate provides all game rules without UI, audio, or platform-specific
//! dependencies; presentation layers render [`GameState`] and forward intents.

pub mod catalog;
pub mod clock;
pub mod config;
pub mod constants;
pub mod cycle;
pub mod interaction;
pub mod numbers;
pub mod score;
pub mod session;
pub mod state;
pub mod vitals;

// Re-export commonly used types
pub use catalog::{Action, Catalog, ParseRoomError, Room, RoomObject};
pub use clock::{Clock, ClockStatus, ParseSpeedError, Speed};
pub use config::{ClockConfig, SessionConfig, SessionConfigError};
pub use cycle::advance_time;
pub use interaction::{ActionDelta, InteractionError, activate};
pub use score::{ScoreCard, score};
pub use session::{
    EventLog, GameObserver, InteractionEvent, Intent, ObserverId, ReplayOutcome,
    SessionController, SessionEvent, Transition, enter_room, reduce, replay, reset, toggle_play,
};
pub use state::{GameState, StateLoadError, TimeOfDay};
pub use vitals::{CharacterVitals, Mood, VitalEffect, clamp_vital, derive_mood};

/// Trait for abstracting save/load operations
/// Platform-specific implementations should provide this
pub trait GameStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Save game state
    ///
    /// # Errors
    ///
    /// Returns an error if the game state cannot be saved.
    fn save_game(&self, save_name: &str, game_state: &GameState) -> Result<(), Self::Error>;

    /// Load game state
    ///
    /// # Errors
    ///
    /// Returns an error if the game state cannot be loaded.
    fn load_game(&self, save_name: &str) -> Result<Option<GameState>, Self::Error>;

    /// Delete saved game
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be deleted.
    fn delete_save(&self, save_name: &str) -> Result<(), Self::Error>;
}

/// Entry point binding a session configuration to a storage backend.
pub struct GameEngine<S>
where
    S: GameStorage,
{
    config: SessionConfig,
    storage: S,
}

impl<S> GameEngine<S>
where
    S: GameStorage,
{
    /// Create a new game engine with the provided configuration and storage
    pub const fn new(config: SessionConfig, storage: S) -> Self {
        Self { config, storage }
    }

    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Start a fresh session from the fixed initial state.
    #[must_use]
    pub fn new_session(&self) -> SessionController {
        SessionController::new(self.config)
    }

    /// Persist the session's current state.
    ///
    /// # Errors
    ///
    /// Returns an error if the game state cannot be saved.
    pub fn save_session(
        &self,
        save_name: &str,
        session: &SessionController,
    ) -> Result<(), S::Error> {
        self.storage.save_game(save_name, session.state())
    }

    /// Restore a session from storage without replaying any transitions.
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be read.
    pub fn load_session(&self, save_name: &str) -> anyhow::Result<Option<SessionController>>
    where
        S::Error: Into<anyhow::Error>,
    {
        let Some(state) = self.storage.load_game(save_name).map_err(Into::into)? else {
            return Ok(None);
        };
        log::debug!("restored `{save_name}` at day {}", state.day());
        Ok(Some(SessionController::from_state(state, self.config)))
    }

    /// Remove a save slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the save cannot be deleted.
    pub fn delete_save(&self, save_name: &str) -> Result<(), S::Error> {
        self.storage.delete_save(save_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::convert::Infallible;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct MemoryStorage {
        saves: Rc<RefCell<HashMap<String, String>>>,
    }

    #[derive(Debug, thiserror::Error)]
    #[error(transparent)]
    struct MemoryError(#[from] serde_json::Error);

    impl GameStorage for MemoryStorage {
        type Error = MemoryError;

        fn save_game(&self, save_name: &str, game_state: &GameState) -> Result<(), Self::Error> {
            let json = serde_json::to_string(game_state)?;
            self.saves.borrow_mut().insert(save_name.to_string(), json);
            Ok(())
        }

        fn load_game(&self, save_name: &str) -> Result<Option<GameState>, Self::Error> {
            self.saves
                .borrow()
                .get(save_name)
                .map(|json| serde_json::from_str(json))
                .transpose()
                .map_err(MemoryError::from)
        }

        fn delete_save(&self, save_name: &str) -> Result<(), Self::Error> {
            self.saves.borrow_mut().remove(save_name);
            Ok(())
        }
    }

    struct NullStorage;

    impl GameStorage for NullStorage {
        type Error = Infallible;

        fn save_game(&self, _: &str, _: &GameState) -> Result<(), Self::Error> {
            Ok(())
        }

        fn load_game(&self, _: &str) -> Result<Option<GameState>, Self::Error> {
            Ok(None)
        }

        fn delete_save(&self, _: &str) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    #[test]
    fn engine_saves_and_restores_sessions() {
        let engine = GameEngine::new(SessionConfig::default(), MemoryStorage::default());
        let mut session = engine.new_session();
        session.enter_room(Room::Kitchen);
        session.activate("table").unwrap();
        session.advance_time();
        engine.save_session("slot-one", &session).unwrap();

        let restored = engine
            .load_session("slot-one")
            .unwrap()
            .expect("save exists");
        assert_eq!(restored.state(), session.state());
        assert_eq!(restored.undo_depth(), 0);
        assert!(engine.load_session("missing-slot").unwrap().is_none());

        engine.delete_save("slot-one").unwrap();
        assert!(engine.load_session("slot-one").unwrap().is_none());
    }

    #[test]
    fn load_session_checks_snapshot_invariants() {
        let storage = MemoryStorage::default();
        let engine = GameEngine::new(SessionConfig::default(), storage.clone());
        let vitals =
            r#""character":{"energy":80,"hygiene":70,"hunger":60},"timeOfDay":"morning""#;
        storage.saves.borrow_mut().insert(
            "zero-day".into(),
            format!(r#"{{"day":0,"isPlaying":false,"currentRoom":"bedroom",{vitals}}}"#),
        );
        storage.saves.borrow_mut().insert(
            "stale-ids".into(),
            format!(
                r#"{{"day":2,"isPlaying":false,"currentRoom":"bedroom",
                "completedActions":["ghost","phantom","bed"],{vitals}}}"#
            ),
        );

        assert!(engine.load_session("zero-day").is_err());

        let mut session = engine.load_session("stale-ids").unwrap().expect("save exists");
        assert_eq!(session.state().day(), 2);
        assert_eq!(session.state().score(), 10);
        assert_eq!(session.state().score_card().progress_label(), "1/15");
        session.activate("bed").unwrap();
        session.activate("wardrobe").unwrap();
        assert_eq!(session.state().score(), 20);
    }

    #[test]
    fn null_storage_never_restores() {
        let engine = GameEngine::new(SessionConfig::default(), NullStorage);
        let session = engine.new_session();
        engine.save_session("any", &session).unwrap();
        assert!(engine.load_session("any").unwrap().is_none());
    }
}
