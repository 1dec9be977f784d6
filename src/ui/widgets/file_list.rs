// src/ui/widgets/file_list.rs
//! File browser list widget.

use std::path::Path;

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState},
};

use crate::fs::DirEntry;
use crate::ui::icons::{NOW_PLAYING, icon_for_entry};

pub fn render_file_list(
    f: &mut Frame<'_>,
    area: Rect,
    title: &str,
    entries: &[DirEntry],
    now_playing: Option<&Path>,
    state: &mut ListState,
) {
    let items: Vec<ListItem> = entries
        .iter()
        .map(|entry| {
            if now_playing == Some(entry.path.as_path()) {
                ListItem::new(format!("{NOW_PLAYING} {}", entry.name))
                    .style(Style::default().fg(Color::Green))
            } else {
                ListItem::new(format!("{} {}", icon_for_entry(entry), entry.name))
            }
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title.to_string()))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol(">> ");

    f.render_stateful_widget(list, area, state);
}
