// src/ui/widgets/player_panel.rs
//! Player information panel widget.

use std::time::Duration;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
};

use crate::audio::TrackMetadata;

/// What the panel shows besides the tags.
pub struct PlaybackStatus<'a> {
    pub metadata: Option<&'a TrackMetadata>,
    pub elapsed: Duration,
    pub is_playing: bool,
    pub is_paused: bool,
    /// Current visualization mode and colour scheme.
    pub visual: (&'a str, &'a str),
}

pub fn render_player_panel(f: &mut Frame<'_>, area: Rect, status: &PlaybackStatus<'_>) {
    f.render_widget(Block::default().borders(Borders::ALL).title("2: Player"), area);

    let inner = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(area);

    let text = match status.metadata {
        Some(meta) => {
            let song = meta.song_info();
            let mut lines = vec![
                format!("Title: {}", song.title),
                format!("Artist: {}", song.artist),
                format!("Album: {}", song.album),
            ];
            lines.extend(meta.tags.iter().map(|(k, v)| format!("{k}: {v}")));
            lines.extend(meta.properties.iter().map(|(k, v)| format!("{k}: {v}")));
            lines.join("\n")
        }
        None => "No track playing".to_string(),
    };
    f.render_widget(Paragraph::new(text).wrap(Wrap { trim: true }), inner[0]);

    let play_pause_icon = if !status.is_playing {
        Span::styled(" ⏵ ", Style::default().fg(Color::Gray))
    } else if status.is_paused {
        Span::styled(" ⏵ ", Style::default().fg(Color::Yellow))
    } else {
        Span::styled(" ⏸ ", Style::default().fg(Color::Green))
    };
    let controls = Line::from(vec![
        Span::styled(" ⏮ ", Style::default().fg(Color::Cyan)),
        Span::raw(" "),
        Span::styled(" ⏹ ", Style::default().fg(Color::Red)),
        Span::raw(" "),
        play_pause_icon,
        Span::raw(" "),
        Span::styled(" ⏭ ", Style::default().fg(Color::Cyan)),
    ]);
    f.render_widget(Paragraph::new(controls).alignment(Alignment::Center), inner[1]);

    let (mode, scheme) = status.visual;
    f.render_widget(
        Paragraph::new(format!("viz: {mode}  scheme: {scheme}"))
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        inner[2],
    );

    let total = status.metadata.map_or(Duration::ZERO, |m| m.duration);
    let ratio = if total.is_zero() {
        0.0
    } else {
        (status.elapsed.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0)
    };
    f.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(Color::Magenta).add_modifier(Modifier::ITALIC))
            .ratio(ratio)
            .label(time_label(status.elapsed, total)),
        inner[3],
    );
}

/// `mm:ss / mm:ss`.
pub fn time_label(elapsed: Duration, total: Duration) -> String {
    let fmt = |d: Duration| format!("{:02}:{:02}", d.as_secs() / 60, d.as_secs() % 60);
    format!("{} / {}", fmt(elapsed), fmt(total))
}
