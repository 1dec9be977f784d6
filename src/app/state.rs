// src/app/state.rs
//! Application state: browser, player, and the visualizer they feed.

use std::{
    path::{Path, PathBuf},
    sync::mpsc::{self, Receiver, Sender},
    thread,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use crossterm::event::KeyEvent;
use image::DynamicImage;
use ratatui::{
    Frame,
    widgets::{Block, Borders, ListState},
};
use ratatui_image::picker::Picker;
use tracing::{info, warn};

use crate::{
    audio::{MusicPlayer, TrackMetadata, load_metadata},
    config::{Settings, SourceKind},
    fs::{DirEntry, load_entries, tail_path},
    ui::{
        keybindings::{Action, key_to_action},
        layout::{Section, SectionVisibility, compute_layout},
        widgets::{
            FrameView, PlaybackStatus, pane_pixel_size, render_artwork, render_file_list,
            render_player_panel,
        },
    },
    visualizer::{self, CaptureSource, VisualizationController},
};

/// Upper bound on how long the event loop sleeps between checks.
const MAX_IDLE: Duration = Duration::from_millis(250);

pub struct App {
    pub current_dir: PathBuf,
    pub entries: Vec<DirEntry>,
    pub state: ListState,
    pub selected: usize,

    pub player: MusicPlayer,
    pub metadata: Option<TrackMetadata>,

    picker: Picker,
    pub artwork: Option<DynamicImage>,

    meta_tx: Sender<TrackMetadata>,
    meta_rx: Receiver<TrackMetadata>,

    pub visualizer: VisualizationController,
    frame_rx: Receiver<visualizer::Frame>,
    latest_frame: Option<visualizer::Frame>,

    pub visibility: SectionVisibility,
    settings: Settings,
    config_path: Option<PathBuf>,
}

impl App {
    /// Build the app rooted at `start_dir`. Call after the terminal is in raw mode
    /// so the image picker can query it.
    pub fn new(settings: Settings, config_path: Option<PathBuf>, start_dir: PathBuf) -> Result<Self> {
        let entries = load_entries(&start_dir)?;
        let mut state = ListState::default();
        state.select(Some(0));

        let picker = Picker::from_query_stdio().unwrap_or_else(|_| Picker::from_fontsize((8, 12)));
        let (meta_tx, meta_rx) = mpsc::channel();

        let player = MusicPlayer::new();
        let mut visualizer = build_controller(&settings, &player);
        let frame_rx = visualizer.subscribe();
        visualizer.start();

        Ok(Self {
            current_dir: start_dir,
            entries,
            state,
            selected: 0,
            player,
            metadata: None,
            picker,
            artwork: None,
            meta_tx,
            meta_rx,
            visualizer,
            frame_rx,
            latest_frame: None,
            visibility: SectionVisibility::default(),
            settings,
            config_path,
        })
    }

    /// Handle a key event and return true if the app should quit.
    pub fn on_key(&mut self, key: KeyEvent) -> bool {
        let action = key_to_action(&key);
        if apply_visualizer_action(&mut self.visualizer, action) {
            return false;
        }

        match action {
            Action::ToggleSection(d) => self.visibility.toggle(d),
            Action::Down => {
                if self.selected + 1 < self.entries.len() {
                    self.selected += 1;
                }
            }
            Action::Up => self.selected = self.selected.saturating_sub(1),
            Action::Enter => self.open_selected(),
            Action::Back => {
                if let Some(parent) = self.current_dir.parent().map(Path::to_path_buf) {
                    self.change_dir(parent);
                }
            }
            Action::TogglePause => {
                if let Err(err) = self.player.toggle_pause() {
                    warn!(error = %format!("{err:#}"), "pause failed");
                }
            }
            Action::Stop => {
                if let Err(err) = self.player.stop() {
                    warn!(error = %format!("{err:#}"), "stop failed");
                }
            }
            Action::NextTrack => self.play_adjacent_track(1),
            Action::PreviousTrack => self.play_adjacent_track(-1),
            Action::Quit => return true,
            _ => {}
        }

        self.state.select(Some(self.selected));
        false
    }

    /// Run a visualizer tick if due and collect emitted frames.
    pub fn pump_visualizer(&mut self, now: Instant) {
        self.visualizer.pump(now, self.player.is_audible());
        if let Some(frame) = self.frame_rx.try_iter().last() {
            self.latest_frame = Some(frame);
        }
    }

    /// How long the event loop may block before something needs attention.
    pub fn next_wakeup(&self, now: Instant) -> Duration {
        self.visualizer
            .time_until_next_tick(now)
            .map_or(MAX_IDLE, |d| d.min(MAX_IDLE))
    }

    /// Take any metadata the background loader has finished.
    pub fn process_metadata(&mut self) {
        while let Ok(meta) = self.meta_rx.try_recv() {
            if self.player.requested_track() != Some(meta.path.as_path()) {
                continue;
            }
            self.visualizer.set_song_info(meta.song_info());
            self.artwork = meta
                .artwork
                .as_deref()
                .and_then(|bytes| image::load_from_memory(bytes).ok());
            self.metadata = Some(meta);
        }
    }

    pub fn draw(&mut self, f: &mut Frame<'_>) {
        let now_playing = self.player.current_track();
        let layout = compute_layout(f.area(), &self.visibility);

        for (section, area) in layout.columns {
            match section {
                Section::Files => {
                    let title = format!("1:  {}", tail_path(&self.current_dir, 3));
                    render_file_list(
                        f,
                        area,
                        &title,
                        &self.entries,
                        now_playing.as_deref(),
                        &mut self.state,
                    );
                }
                Section::Player => {
                    let effects = self.visualizer.effects();
                    let status = PlaybackStatus {
                        metadata: self.metadata.as_ref(),
                        elapsed: self.player.position(),
                        is_playing: self.player.is_playing(),
                        is_paused: self.player.is_paused(),
                        visual: (effects.mode.name(), effects.color_scheme_name()),
                    };
                    render_player_panel(f, area, &status);
                }
                Section::Artwork => {
                    render_artwork(f, area, &mut self.picker, self.artwork.as_ref());
                }
            }
        }

        if let Some(area) = layout.visualizer_area {
            let block = Block::default()
                .borders(Borders::ALL)
                .title(format!("4: Visualizer [{}]", self.visualizer.effects().mode));
            let (w, h) = pane_pixel_size(block.inner(area));
            self.visualizer.set_size(w, h);
            f.render_widget(FrameView::new(self.latest_frame.as_ref()).block(block), area);
        }
    }

    /// Stop everything and remember the visual selections.
    pub fn shutdown(&mut self) -> Result<()> {
        self.visualizer.stop();
        if let Err(err) = self.player.stop() {
            warn!(error = %format!("{err:#}"), "stop failed");
        }

        self.settings.remember(self.visualizer.effects());
        match &self.config_path {
            Some(path) => self.settings.save_to(path),
            None => self.settings.save(),
        }
        .context("saving settings")?;
        info!("settings saved");
        Ok(())
    }

    fn change_dir(&mut self, dir: PathBuf) {
        match load_entries(&dir) {
            Ok(entries) => {
                self.entries = entries;
                self.current_dir = dir;
                self.selected = 0;
            }
            Err(err) => warn!(error = %format!("{err:#}"), "cannot open directory"),
        }
    }

    fn open_selected(&mut self) {
        let Some(entry) = self.entries.get(self.selected).cloned() else {
            return;
        };
        if entry.is_dir {
            self.change_dir(entry.path);
        } else if entry.is_audio() {
            self.start_track(&entry.path);
        }
    }

    fn start_track(&mut self, path: &Path) {
        if let Err(err) = self.player.play(path) {
            warn!(error = %format!("{err:#}"), "play failed");
            return;
        }
        self.metadata = None;
        self.artwork = None;
        self.visualizer.set_song_info(visualizer::SongInfo::default());

        let tx = self.meta_tx.clone();
        let path = path.to_path_buf();
        thread::spawn(move || match load_metadata(&path) {
            Ok(meta) => {
                let _ = tx.send(meta);
            }
            Err(err) => warn!(error = %format!("{err:#}"), "metadata unavailable"),
        });
    }

    /// `direction`: 1 for next, -1 for previous. Wraps around the folder.
    fn play_adjacent_track(&mut self, direction: i32) {
        let audio: Vec<usize> = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_audio())
            .map(|(i, _)| i)
            .collect();
        if audio.is_empty() {
            return;
        }

        let current = self
            .player
            .requested_track()
            .and_then(|p| audio.iter().position(|&i| self.entries[i].path == p));
        let len = audio.len() as i32;
        let pos = match current {
            Some(pos) => (pos as i32 + direction).rem_euclid(len) as usize,
            None if direction > 0 => 0,
            None => audio.len() - 1,
        };

        let idx = audio[pos];
        let path = self.entries[idx].path.clone();
        self.selected = idx;
        self.start_track(&path);
    }
}

fn build_controller(settings: &Settings, player: &MusicPlayer) -> VisualizationController {
    let config = settings.controller_config(1, 1);
    let mut controller = match settings.visualizer.source {
        SourceKind::Simulated => VisualizationController::new(config),
        SourceKind::Capture => {
            let source = CaptureSource::new(config.bands, player.sample_buffer());
            VisualizationController::with_source(config, Box::new(source))
        }
    };
    settings.apply_to(&mut controller);
    controller
}

/// Visualizer shortcuts. Returns false for actions that are not the visualizer's.
pub fn apply_visualizer_action(controller: &mut VisualizationController, action: Action) -> bool {
    match action {
        Action::CycleVisualization => {
            let mode = controller.cycle_visualization_mode();
            info!(%mode, "visualization mode");
        }
        Action::CycleColorScheme => {
            let scheme = controller.cycle_color_scheme();
            info!(scheme, "color scheme");
        }
        Action::CycleBackground => {
            controller.cycle_background_pattern();
        }
        Action::ToggleEffect(effect) => {
            controller.toggle(effect);
        }
        _ => return false,
    }
    true
}
