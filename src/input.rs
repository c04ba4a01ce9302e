//! Keyboard state as the simulation sees it.
//!
//! `InputState` mirrors which of the three game keys are currently held.
//! Hosts feed it press/release events by key code name ("ArrowLeft",
//! "ArrowRight", "Space"); everything else is left to the host.

use std::collections::HashMap;

use crossterm::event::KeyCode;
use tracing::{trace, warn};

/// Ticks a key stays held after its last press/repeat on terminals that
/// never report releases.  OS key repeat runs at 15 Hz or faster, so at 30
/// ticks/sec a held key is refreshed before it expires.
pub const HOLD_WINDOW: u64 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Fire,
}

impl Key {
    pub fn from_code(code: &str) -> Option<Key> {
        match code {
            "ArrowLeft" => Some(Key::Left),
            "ArrowRight" => Some(Key::Right),
            "Space" => Some(Key::Fire),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Key::Left => "ArrowLeft",
            Key::Right => "ArrowRight",
            Key::Fire => "Space",
        }
    }
}

/// What the host should do with the event after `set_key`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyDisposition {
    /// A game key: suppress the host's default handling.
    Consumed,
    /// Not a game key: the host keeps its default handling.
    Ignored,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub move_left: bool,
    pub move_right: bool,
    pub fire: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_key(&mut self, code: &str, pressed: bool) -> KeyDisposition {
        let Some(key) = Key::from_code(code) else {
            trace!(code, pressed, "ignoring key");
            return KeyDisposition::Ignored;
        };
        match key {
            Key::Left => self.move_left = pressed,
            Key::Right => self.move_right = pressed,
            Key::Fire => self.fire = pressed,
        }
        KeyDisposition::Consumed
    }
}

/// Name a terminal key code the way `InputState::set_key` expects.
pub fn code_name(code: &KeyCode) -> String {
    match code {
        KeyCode::Left => "ArrowLeft".to_string(),
        KeyCode::Right => "ArrowRight".to_string(),
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) if c.is_ascii_alphabetic() => {
            format!("Key{}", c.to_ascii_uppercase())
        }
        other => format!("{:?}", other),
    }
}

// ── Release synthesis ─────────────────────────────────────────────────────────

/// Tracks the tick each game key was last seen pressed.
///
/// Classic terminals only send presses (repeated by the OS while held), so
/// releases have to be inferred from silence.  Terminals with the keyboard
/// enhancement protocol send real releases; then nothing expires here.
#[derive(Debug, Default)]
pub struct HeldKeys {
    last_seen: HashMap<Key, u64>,
    reports_release: bool,
}

impl HeldKeys {
    pub fn new(reports_release: bool) -> Self {
        Self {
            last_seen: HashMap::new(),
            reports_release,
        }
    }

    /// Build from the answer to crossterm's keyboard enhancement query.  A
    /// failed query counts as unsupported.
    pub fn for_terminal(supports_enhancement: std::io::Result<bool>) -> Self {
        let reports_release = match supports_enhancement {
            Ok(supported) => supported,
            Err(err) => {
                warn!(error = %err, "keyboard enhancement query failed");
                false
            }
        };
        Self::new(reports_release)
    }

    pub fn reports_release(&self) -> bool {
        self.reports_release
    }

    pub fn pressed(&mut self, key: Key, tick: u64) {
        self.last_seen.insert(key, tick);
    }

    pub fn released(&mut self, key: Key) {
        self.last_seen.remove(&key);
    }

    /// Keys whose hold window ran out by `tick`.  They are forgotten, so each
    /// expiry is reported once.
    pub fn expire(&mut self, tick: u64) -> Vec<Key> {
        if self.reports_release {
            return Vec::new();
        }
        let mut expired: Vec<Key> = self
            .last_seen
            .iter()
            .filter(|&(_, &last)| tick.saturating_sub(last) > HOLD_WINDOW)
            .map(|(&key, _)| key)
            .collect();
        expired.sort_by_key(|k| k.code());
        for key in &expired {
            self.last_seen.remove(key);
        }
        expired
    }
}
