use crate::controller::keys::{KeyAlias, KeyCodeValue};
use crate::error::AppResult;
use crate::session::Session;
use crate::store::PersistenceStore;
use anyhow::Result;
use crossterm::{
    event,
    event::{Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
};
use log::*;
use std::{sync::mpsc, thread, time::Duration};

/// Specify terminal event poll rate in milliseconds.
///
const TICK_RATE_IN_MS: u64 = 60;

/// Specify different terminal event types.
///
#[derive(Debug)]
pub enum Event<I> {
    Input(I),
    Tick,
}

/// Specify struct for managing terminal events channel.
///
pub struct Handler {
    rx: mpsc::Receiver<Event<KeyEvent>>,
    _tx: mpsc::Sender<Event<KeyEvent>>,
}

impl Handler {
    /// Return new instance after spawning new input polling thread.
    ///
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let tx_clone = tx.clone();
        thread::spawn(move || loop {
            let tick_rate = Duration::from_millis(TICK_RATE_IN_MS);
            match event::poll(tick_rate) {
                Ok(true) => {
                    if let Ok(CrosstermEvent::Key(key)) = event::read() {
                        if tx_clone.send(Event::Input(key)).is_err() {
                            break;
                        }
                    }
                }
                Ok(false) => {}
                Err(e) => {
                    error!("Failed to poll terminal events: {}", e);
                    break;
                }
            }
            if tx_clone.send(Event::Tick).is_err() {
                break;
            }
        });
        Handler { rx, _tx: tx }
    }

    /// Receive next terminal event and handle it accordingly. Returns result
    /// with value true if should continue or false if exit was requested.
    ///
    pub fn handle_next<P: PersistenceStore>(&self, session: &mut Session<P>) -> Result<bool> {
        match self.rx.recv()? {
            Event::Input(event) if event.kind == KeyEventKind::Press => {
                Ok(handle_key(event, session).unwrap_or_else(|e| {
                    error!("Failed to handle key event: {}", e);
                    true
                }))
            }
            Event::Input(_) | Event::Tick => Ok(true),
        }
    }
}

impl Default for Handler {
    fn default() -> Self {
        Handler::new()
    }
}

/// Apply one key press to the session. Returns false when exit was requested.
///
pub fn handle_key<P: PersistenceStore>(event: KeyEvent, session: &mut Session<P>) -> AppResult<bool> {
    if event.code == KeyCode::Char('c') && event.modifiers.contains(KeyModifiers::CONTROL) {
        debug!("Processing exit terminal event '{:?}'...", event);
        return Ok(false);
    }

    if session.is_editing() {
        match event.code {
            KeyCode::Enter => {
                if !session.submit()? {
                    debug!("Ignoring blank label");
                }
            }
            KeyCode::Esc => session.cancel(),
            KeyCode::Backspace => session.backspace(),
            KeyCode::Char(c) => session.type_char(c),
            _ => {}
        }
        return Ok(true);
    }

    match event.code {
        KeyCode::Char('q') => {
            debug!("Processing exit terminal event '{:?}'...", event);
            return Ok(false);
        }
        KeyCode::Enter => {
            session.rename_selected()?;
        }
        KeyCode::Char('a') => {
            session.add_child_selected()?;
        }
        KeyCode::Char('f') => {
            session.toggle_fold_selected();
        }
        code => {
            let chord = chord_codes(code, event.modifiers);
            if !chord.is_empty() {
                session.press(&chord)?;
            }
        }
    }
    Ok(true)
}

/// Translate a terminal key and its modifiers into the key codes held for
/// it, modifiers first.
///
pub fn chord_codes(code: KeyCode, modifiers: KeyModifiers) -> Vec<KeyCodeValue> {
    let Some(key) = key_code(code) else {
        return vec![];
    };
    let mut codes = vec![];
    if modifiers.contains(KeyModifiers::SHIFT) {
        codes.push(KeyAlias::Shift.code());
    }
    if modifiers.contains(KeyModifiers::CONTROL) {
        codes.push(KeyAlias::Ctrl.code());
    }
    if modifiers.contains(KeyModifiers::ALT) {
        codes.push(KeyAlias::Alt.code());
    }
    codes.push(key);
    codes
}

/// Key code of a terminal key, using the numbering of browser key events.
///
fn key_code(code: KeyCode) -> Option<KeyCodeValue> {
    let value = match code {
        KeyCode::Backspace => KeyAlias::Backspace.code(),
        KeyCode::Tab => KeyAlias::Tab.code(),
        KeyCode::Enter => KeyAlias::Enter.code(),
        KeyCode::Esc => KeyAlias::Esc.code(),
        KeyCode::Char(' ') => KeyAlias::Space.code(),
        KeyCode::Up => KeyAlias::Up.code(),
        KeyCode::Down => KeyAlias::Down.code(),
        KeyCode::Delete => KeyAlias::Delete.code(),
        KeyCode::Char(c) if c.is_ascii_alphanumeric() => c.to_ascii_uppercase() as KeyCodeValue,
        _ => return None,
    };
    Some(value)
}
