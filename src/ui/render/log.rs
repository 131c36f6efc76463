use super::Frame;
use crate::logger::LogBuffer;
use crate::ui::widgets::styling;
use ratatui::{
    layout::Rect,
    widgets::{Block, Borders, List, ListItem},
};

/// Render the most recent log lines that fit the pane.
///
pub fn log(frame: &mut Frame, size: Rect, logs: &LogBuffer) {
    let block = Block::default()
        .title("Log")
        .borders(Borders::ALL)
        .border_style(styling::normal_block_border_style());

    let lines = logs.lines();
    let capacity = size.height.saturating_sub(2) as usize;
    let skip = lines.len().saturating_sub(capacity);
    let items: Vec<ListItem> = lines
        .into_iter()
        .skip(skip)
        .map(ListItem::new)
        .collect();

    let list = List::new(items)
        .style(styling::normal_text_style())
        .block(block);
    frame.render_widget(list, size);
}
