mod footer;
mod log;
mod outline;

use super::Frame;
use crate::logger::LogBuffer;
use crate::session::Session;
use crate::store::PersistenceStore;
use footer::footer;
use self::log::log;
use outline::outline;
use ratatui::layout::{Constraint, Direction, Layout};

const LOG_HEIGHT: u16 = 7;
const FOOTER_HEIGHT: u16 = 1;

/// Render the whole screen: the outline above, the log pane and the footer
/// below it.
///
pub fn render<P: PersistenceStore>(frame: &mut Frame, session: &Session<P>, logs: &LogBuffer) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(LOG_HEIGHT),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .split(frame.size());
    outline(frame, chunks[0], session);
    log(frame, chunks[1], logs);
    footer(frame, chunks[2], session.is_editing());
}
