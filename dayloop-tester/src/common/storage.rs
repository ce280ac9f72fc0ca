use std::fs;
use std::io::{self, ErrorKind};
use std::path::PathBuf;

use dayloop_game::{GameState, GameStorage};

/// One pretty-printed JSON file per save slot under `root`.
#[derive(Debug, Clone)]
pub struct JsonDirStorage {
    root: PathBuf,
}

impl JsonDirStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn slot(&self, save_name: &str) -> PathBuf {
        self.root.join(format!("{save_name}.json"))
    }
}

impl GameStorage for JsonDirStorage {
    type Error = io::Error;

    fn save_game(&self, save_name: &str, game_state: &GameState) -> Result<(), Self::Error> {
        fs::create_dir_all(&self.root)?;
        let payload = serde_json::to_vec_pretty(game_state)?;
        fs::write(self.slot(save_name), payload)
    }

    fn load_game(&self, save_name: &str) -> Result<Option<GameState>, Self::Error> {
        match fs::read(self.slot(save_name)) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn delete_save(&self, save_name: &str) -> Result<(), Self::Error> {
        match fs::remove_file(self.slot(save_name)) {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(err),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dayloop_game::{Room, enter_room};

    fn temp_root(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "dayloop-storage-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    #[test]
    fn save_load_delete_cycle() {
        let storage = JsonDirStorage::new(temp_root("cycle"));
        let state = enter_room(&GameState::initial(), Room::Gym).state;

        storage.save_game("slot", &state).unwrap();
        assert_eq!(storage.load_game("slot").unwrap(), Some(state));

        storage.delete_save("slot").unwrap();
        assert_eq!(storage.load_game("slot").unwrap(), None);
        storage.delete_save("slot").unwrap();
        let _ = fs::remove_dir_all(&storage.root);
    }

    #[test]
    fn corrupt_slot_is_an_error() {
        let storage = JsonDirStorage::new(temp_root("corrupt"));
        fs::create_dir_all(&storage.root).unwrap();
        fs::write(storage.slot("bad"), b"{not json").unwrap();
        let err = storage.load_game("bad").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
        let _ = fs::remove_dir_all(&storage.root);
    }
}
