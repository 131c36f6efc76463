use ratatui::style::{Color, Modifier, Style};

/// Return the border style for active blocks.
///
pub fn active_block_border_style() -> Style {
    Style::default().fg(Color::Cyan)
}

/// Return the border style for normal blocks.
///
pub fn normal_block_border_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Return the title style for active blocks.
///
pub fn active_block_title_style() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}

/// Return the style for the selected outline item.
///
pub fn active_list_item_style() -> Style {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
}

/// Return the style for a label field that is open for editing.
///
pub fn editing_item_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::UNDERLINED)
}

/// Return the style for the fold markers.
///
pub fn marker_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Return the style for normal text.
///
pub fn normal_text_style() -> Style {
    Style::default()
}

/// Return the style for hotkey names in the footer.
///
pub fn hotkey_style() -> Style {
    Style::default().add_modifier(Modifier::BOLD)
}
