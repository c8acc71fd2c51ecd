//! Keyboard state tracking
//!
//! Arrow keys and WASD steer the basket; space or `p` toggles pause.

use std::collections::HashSet;

use crate::sim::TickInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Direction {
    Left,
    Right,
    Up,
    Down,
}

fn direction_for(key: &str) -> Option<Direction> {
    match key {
        "arrowleft" | "a" => Some(Direction::Left),
        "arrowright" | "d" => Some(Direction::Right),
        "arrowup" | "w" => Some(Direction::Up),
        "arrowdown" | "s" => Some(Direction::Down),
        _ => None,
    }
}

/// True for keys that toggle pause (`KeyboardEvent.key` values)
pub fn is_pause_key(key: &str) -> bool {
    key == " " || key.eq_ignore_ascii_case("p")
}

/// Held directions plus a latched pause toggle
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashSet<Direction>,
    pause_requested: bool,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press. Returns true if the key is bound to the game
    /// (the caller should then suppress the browser default).
    pub fn key_down(&mut self, key: &str) -> bool {
        if is_pause_key(key) {
            self.pause_requested = true;
            return true;
        }
        match direction_for(&key.to_lowercase()) {
            Some(dir) => {
                self.held.insert(dir);
                true
            }
            None => false,
        }
    }

    pub fn key_up(&mut self, key: &str) {
        if let Some(dir) = direction_for(&key.to_lowercase()) {
            self.held.remove(&dir);
        }
    }

    /// Forget held keys (focus lost: key-up events will never arrive)
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    /// Input for the next tick. The pause toggle is delivered once.
    pub fn take_tick_input(&mut self) -> TickInput {
        let input = TickInput {
            left: self.held.contains(&Direction::Left),
            right: self.held.contains(&Direction::Right),
            up: self.held.contains(&Direction::Up),
            down: self.held.contains(&Direction::Down),
            pause: self.pause_requested,
        };
        self.pause_requested = false;
        input
    }
}
