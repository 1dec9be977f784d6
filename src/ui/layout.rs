// src/ui/layout.rs
//! Splits the terminal into the browser columns and the visualizer pane.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Files,
    Player,
    Artwork,
}

#[derive(Debug, Clone, Copy)]
pub struct SectionVisibility {
    pub files: bool,
    pub player: bool,
    pub artwork: bool,
    pub visualizer: bool,
}

impl Default for SectionVisibility {
    fn default() -> Self {
        Self {
            files: true,
            player: true,
            artwork: true,
            visualizer: true,
        }
    }
}

impl SectionVisibility {
    /// Toggle a section by number (1-4).
    pub fn toggle(&mut self, section: usize) {
        match section {
            1 => self.files = !self.files,
            2 => self.player = !self.player,
            3 => self.artwork = !self.artwork,
            4 => self.visualizer = !self.visualizer,
            _ => {}
        }
    }
}

pub struct ComputedLayout {
    /// Visible columns, left to right.
    pub columns: Vec<(Section, Rect)>,
    pub visualizer_area: Option<Rect>,
}

pub fn compute_layout(area: Rect, visibility: &SectionVisibility) -> ComputedLayout {
    let any_column = visibility.files || visibility.player || visibility.artwork;

    let (main_area, visualizer_area) = match (visibility.visualizer, any_column) {
        (true, true) => {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(area);
            (Some(rows[0]), Some(rows[1]))
        }
        (true, false) => (None, Some(area)),
        (false, _) => (Some(area), None),
    };

    let mut sections = Vec::new();
    if visibility.files {
        sections.push((Section::Files, 22u32));
    }
    if visibility.player {
        sections.push((Section::Player, 50));
    }
    if visibility.artwork {
        sections.push((Section::Artwork, 28));
    }

    let columns = match main_area {
        Some(main) if !sections.is_empty() => {
            let sum: u32 = sections.iter().map(|(_, w)| w).sum();
            let rects = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(
                    sections
                        .iter()
                        .map(|(_, w)| Constraint::Ratio(*w, sum))
                        .collect::<Vec<_>>(),
                )
                .split(main);
            sections
                .iter()
                .zip(rects.iter())
                .map(|((s, _), r)| (*s, *r))
                .collect()
        }
        _ => Vec::new(),
    };

    ComputedLayout {
        columns,
        visualizer_area,
    }
}
