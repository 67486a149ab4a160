//! Keyboard state
//!
//! The host feeds raw key identifiers (DOM `KeyboardEvent.key` values); the
//! game reads the held set once per tick.

use std::collections::HashSet;

use crate::sim::TickInput;

pub const KEY_UP: &str = "ArrowUp";
pub const KEY_DOWN: &str = "ArrowDown";
pub const KEY_LEFT: &str = "ArrowLeft";
pub const KEY_RIGHT: &str = "ArrowRight";
pub const KEY_CONFIRM: &str = "Enter";

/// Live map of which keys are held
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<String>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: &str) {
        self.held.insert(key.to_string());
    }

    pub fn release(&mut self, key: &str) {
        self.held.remove(key);
    }

    pub fn is_held(&self, key: &str) -> bool {
        self.held.contains(key)
    }

    /// Forget everything (e.g. on restart)
    pub fn clear(&mut self) {
        self.held.clear();
    }

    /// Directional state for one tick
    pub fn tick_input(&self) -> TickInput {
        TickInput {
            up: self.is_held(KEY_UP),
            down: self.is_held(KEY_DOWN),
            left: self.is_held(KEY_LEFT),
            right: self.is_held(KEY_RIGHT),
        }
    }
}

/// Upgrade slot selected by a number key ("1" is slot 0)
pub fn upgrade_slot_for_key(key: &str) -> Option<usize> {
    let digit: usize = key.parse().ok()?;
    digit.checked_sub(1)
}
