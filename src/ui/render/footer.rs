use super::Frame;
use crate::ui::widgets::styling;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

const BROWSE_HOTKEYS: &[(&str, &str)] = &[
    ("↑/↓", "navigate"),
    ("space/enter", "rename"),
    ("tab/a", "add child"),
    ("ctrl+r", "new root"),
    ("del", "remove"),
    ("f", "fold"),
    ("q", "quit"),
];

const EDIT_HOTKEYS: &[(&str, &str)] = &[("enter", "save"), ("esc", "cancel")];

/// Render the footer listing the hotkeys of the current mode.
///
pub fn footer(frame: &mut Frame, size: Rect, editing: bool) {
    let hotkeys = if editing { EDIT_HOTKEYS } else { BROWSE_HOTKEYS };
    let mut spans = vec![];
    for (key, action) in hotkeys {
        spans.push(Span::styled(format!(" {}", key), styling::hotkey_style()));
        spans.push(Span::styled(format!(": {} ", action), styling::normal_text_style()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), size);
}
