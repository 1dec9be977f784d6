// src/ui/tui.rs
//! Terminal setup and the main event loop.

use std::{io, path::PathBuf, time::Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event as CEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::{app::App, config::Settings};

type Term = Terminal<CrosstermBackend<io::Stdout>>;

pub fn run(settings: Settings, config_path: Option<PathBuf>, start_dir: PathBuf) -> Result<()> {
    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;

    let result = App::new(settings, config_path, start_dir).and_then(|mut app| {
        let outcome = event_loop(&mut terminal, &mut app);
        let saved = app.shutdown();
        outcome.and(saved)
    });

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

fn event_loop(terminal: &mut Term, app: &mut App) -> Result<()> {
    loop {
        app.process_metadata();
        app.pump_visualizer(Instant::now());
        terminal.draw(|f| app.draw(f))?;

        if event::poll(app.next_wakeup(Instant::now()))? {
            if let CEvent::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.on_key(key) {
                    return Ok(());
                }
            }
        }
    }
}
