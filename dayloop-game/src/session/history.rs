use std::collections::VecDeque;

use crate::state::GameState;

/// Bounded stack of prior snapshots for undo.
#[derive(Debug, Clone, Default)]
pub struct History {
    snapshots: VecDeque<GameState>,
    limit: usize,
}

impl History {
    #[must_use]
    pub const fn new(limit: usize) -> Self {
        Self {
            snapshots: VecDeque::new(),
            limit,
        }
    }

    /// Remember `state`, evicting the oldest snapshot once full.
    pub fn record(&mut self, state: GameState) {
        if self.limit == 0 {
            return;
        }
        if self.snapshots.len() == self.limit {
            self.snapshots.pop_front();
        }
        self.snapshots.push_back(state);
    }

    pub fn undo(&mut self) -> Option<GameState> {
        self.snapshots.pop_back()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
