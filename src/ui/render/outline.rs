use super::Frame;
use crate::session::Session;
use crate::store::PersistenceStore;
use crate::surface::VisibleItem;
use crate::ui::widgets::styling;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

const BLOCK_TITLE: &str = "Outline";
const INDENT: &str = "  ";
const EMPTY_HINT: &str = "Empty outline. Press ctrl+r to add a root node.";

/// Render the outline as it stands on the surface, one line per visible
/// item.
///
pub fn outline<P: PersistenceStore>(frame: &mut Frame, size: Rect, session: &Session<P>) {
    let mut block = Block::default()
        .title(BLOCK_TITLE)
        .borders(Borders::ALL)
        .border_style(styling::normal_block_border_style());
    if session.is_editing() {
        block = block
            .border_style(styling::active_block_border_style())
            .title(Span::styled(BLOCK_TITLE, styling::active_block_title_style()));
    }

    let visible = session.controller().surface().visible_items();
    if visible.is_empty() {
        let hint = Paragraph::new(EMPTY_HINT)
            .style(styling::marker_style())
            .block(block);
        frame.render_widget(hint, size);
        return;
    }

    let items: Vec<ListItem> = visible.iter().map(line).map(ListItem::new).collect();
    let mut list_state = ListState::default();
    list_state.select(visible.iter().position(|item| item.attrs.selected));
    let editing = visible.iter().position(|item| !item.attrs.read_only);
    if list_state.selected().is_none() {
        list_state.select(editing);
    }

    let list = List::new(items)
        .style(styling::normal_text_style())
        .block(block);
    frame.render_stateful_widget(list, size, &mut list_state);

    // Place the cursor at the end of the open label field.
    if let Some(index) = editing {
        let item = &visible[index];
        let row = index.saturating_sub(list_state.offset()) as u16;
        let column = prefix_width(item) + item.attrs.value.chars().count();
        if row + 2 < size.height {
            frame.set_cursor(size.x + 1 + column as u16, size.y + 1 + row);
        }
    }
}

fn line(item: &VisibleItem) -> Line<'static> {
    let style = if !item.attrs.read_only {
        styling::editing_item_style()
    } else if item.attrs.selected {
        styling::active_list_item_style()
    } else {
        styling::normal_text_style()
    };
    Line::from(vec![
        Span::raw(INDENT.repeat(item.depth)),
        Span::styled(format!("{} ", marker(item)), styling::marker_style()),
        Span::styled(item.attrs.value.clone(), style),
    ])
}

fn marker(item: &VisibleItem) -> &'static str {
    match (item.has_children, item.folded) {
        (true, true) => "▸",
        (true, false) => "▾",
        (false, _) => "•",
    }
}

fn prefix_width(item: &VisibleItem) -> usize {
    INDENT.len() * item.depth + 2
}
