//! Per-frame input snapshot.
//!
//! A snapshot only records which keys are down this frame (level-triggered).
//! Edge detection, where a transition needs it, is done by the consumer that
//! remembers the previous frame.

use std::collections::HashSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Fire,
    Pause,
    Restart,
    Escape,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pressed: HashSet<Key>,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style helper, mostly for drivers and tests.
    pub fn with(mut self, key: Key) -> Self {
        self.pressed.insert(key);
        self
    }

    pub fn press(&mut self, key: Key) {
        self.pressed.insert(key);
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }
}

impl FromIterator<Key> for InputSnapshot {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        Self {
            pressed: iter.into_iter().collect(),
        }
    }
}
