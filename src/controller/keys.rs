//! Key code aliases and chord tracking.
//!
//! Input arrives as numeric key codes. A static table names the codes the
//! outline reacts to, and a [`HeldKeys`] set remembers which codes are down
//! so that modifier chords resolve only while the modifier is still held.

use std::collections::HashSet;

/// Numeric code of a physical key.
///
pub type KeyCodeValue = u16;

/// Specifying the keys the outline gives a name to.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAlias {
    Backspace,
    Tab,
    Enter,
    Shift,
    Ctrl,
    Alt,
    Esc,
    Space,
    Up,
    Down,
    Delete,
    R,
}

const KEY_ALIASES: [(KeyCodeValue, KeyAlias); 12] = [
    (8, KeyAlias::Backspace),
    (9, KeyAlias::Tab),
    (13, KeyAlias::Enter),
    (16, KeyAlias::Shift),
    (17, KeyAlias::Ctrl),
    (18, KeyAlias::Alt),
    (27, KeyAlias::Esc),
    (32, KeyAlias::Space),
    (38, KeyAlias::Up),
    (40, KeyAlias::Down),
    (46, KeyAlias::Delete),
    (82, KeyAlias::R),
];

impl KeyAlias {
    pub fn from_code(code: KeyCodeValue) -> Option<KeyAlias> {
        KEY_ALIASES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, alias)| *alias)
    }

    pub fn code(self) -> KeyCodeValue {
        KEY_ALIASES
            .iter()
            .find(|(_, alias)| *alias == self)
            .map(|(code, _)| *code)
            .unwrap_or_default()
    }

    pub fn name(self) -> &'static str {
        match self {
            KeyAlias::Backspace => "backspace",
            KeyAlias::Tab => "tab",
            KeyAlias::Enter => "enter",
            KeyAlias::Shift => "shift",
            KeyAlias::Ctrl => "ctrl",
            KeyAlias::Alt => "alt",
            KeyAlias::Esc => "esc",
            KeyAlias::Space => "space",
            KeyAlias::Up => "up",
            KeyAlias::Down => "down",
            KeyAlias::Delete => "delete",
            KeyAlias::R => "r",
        }
    }
}

/// Represents what a key press asks the outline to do.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Rename,
    Remove,
    NavigatePrev,
    NavigateNext,
    AddChild,
    NewRoot,
}

/// Set of key codes currently held down.
///
#[derive(Debug, Clone, Default)]
pub struct HeldKeys {
    codes: HashSet<KeyCodeValue>,
}

impl HeldKeys {
    /// Record a key down. Returns false for auto-repeat of a held key.
    ///
    pub fn press(&mut self, code: KeyCodeValue) -> bool {
        self.codes.insert(code)
    }

    pub fn release(&mut self, code: KeyCodeValue) {
        self.codes.remove(&code);
    }

    pub fn is_held(&self, alias: KeyAlias) -> bool {
        self.codes.contains(&alias.code())
    }

    /// Resolve a freshly pressed key against the keys already held.
    ///
    pub fn resolve(&self, pressed: KeyAlias) -> Option<KeyAction> {
        let ctrl = self.is_held(KeyAlias::Ctrl);
        match pressed {
            KeyAlias::R if ctrl => Some(KeyAction::NewRoot),
            _ if ctrl => None,
            KeyAlias::Space => Some(KeyAction::Rename),
            KeyAlias::Delete => Some(KeyAction::Remove),
            KeyAlias::Up => Some(KeyAction::NavigatePrev),
            KeyAlias::Down => Some(KeyAction::NavigateNext),
            KeyAlias::Tab => Some(KeyAction::AddChild),
            _ => None,
        }
    }
}
