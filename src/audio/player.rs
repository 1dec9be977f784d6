// src/audio/player.rs
//! rodio playback on a dedicated thread, driven over a command channel.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use ringbuf::traits::*;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use tracing::{debug, info, warn};

use super::sample_capture::{SampleBuffer, SampleCapture, new_sample_buffer};

/// How often the audio thread checks whether the current track ran out.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

enum PlayerCommand {
    Play(PathBuf),
    Pause,
    Resume,
    Stop,
}

/// Flags the audio thread publishes for the UI thread.
#[derive(Default)]
struct Shared {
    playing: AtomicBool,
    paused: AtomicBool,
    position_ms: AtomicU64,
    /// Set only once the audio thread has actually started the track.
    track: Mutex<Option<PathBuf>>,
}

impl Shared {
    fn set_playing(&self, path: PathBuf) {
        if let Ok(mut track) = self.track.lock() {
            *track = Some(path);
        }
        self.playing.store(true, Ordering::SeqCst);
        self.paused.store(false, Ordering::SeqCst);
    }

    fn set_idle(&self) {
        if let Ok(mut track) = self.track.lock() {
            *track = None;
        }
        self.playing.store(false, Ordering::SeqCst);
        self.paused.store(false, Ordering::SeqCst);
        self.position_ms.store(0, Ordering::SeqCst);
    }

    fn track(&self) -> Option<PathBuf> {
        self.track.lock().ok().and_then(|track| track.clone())
    }
}

pub struct MusicPlayer {
    cmd_tx: Sender<PlayerCommand>,
    shared: Arc<Shared>,
    sample_buffer: SampleBuffer,
    requested: Option<PathBuf>,
}

impl MusicPlayer {
    /// Spawn the audio thread. Without an output device, commands are accepted and ignored.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let shared = Arc::new(Shared::default());
        let sample_buffer = new_sample_buffer();

        let thread_shared = Arc::clone(&shared);
        let thread_buffer = Arc::clone(&sample_buffer);
        thread::spawn(move || audio_thread(rx, thread_shared, thread_buffer));

        Self {
            cmd_tx: tx,
            shared,
            sample_buffer,
            requested: None,
        }
    }

    /// Stop whatever is playing and start `path`.
    pub fn play(&mut self, path: &Path) -> Result<()> {
        self.send(PlayerCommand::Play(path.to_path_buf()))?;
        self.requested = Some(path.to_path_buf());
        Ok(())
    }

    pub fn pause(&mut self) -> Result<()> {
        self.send(PlayerCommand::Pause)
    }

    pub fn resume(&mut self) -> Result<()> {
        self.send(PlayerCommand::Resume)
    }

    /// Pause when playing, resume when paused.
    pub fn toggle_pause(&mut self) -> Result<()> {
        if self.is_paused() {
            self.resume()
        } else {
            self.pause()
        }
    }

    pub fn stop(&mut self) -> Result<()> {
        self.requested = None;
        self.send(PlayerCommand::Stop)
    }

    /// True while a track is loaded, paused or not.
    pub fn is_playing(&self) -> bool {
        self.shared.playing.load(Ordering::SeqCst)
    }

    pub fn is_paused(&self) -> bool {
        self.shared.paused.load(Ordering::SeqCst)
    }

    /// Whether sound is actually coming out, which is what the visualizer follows.
    pub fn is_audible(&self) -> bool {
        self.is_playing() && !self.is_paused()
    }

    pub fn position(&self) -> Duration {
        Duration::from_millis(self.shared.position_ms.load(Ordering::SeqCst))
    }

    /// The track the audio thread is playing. `None` once it ends or fails to start.
    pub fn current_track(&self) -> Option<PathBuf> {
        self.shared.track()
    }

    /// The last track handed to [`MusicPlayer::play`], whether or not it started.
    pub fn requested_track(&self) -> Option<&Path> {
        self.requested.as_deref()
    }

    /// Mono samples of what is being played, newest last.
    pub fn sample_buffer(&self) -> SampleBuffer {
        Arc::clone(&self.sample_buffer)
    }

    fn send(&self, cmd: PlayerCommand) -> Result<()> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| anyhow!("audio thread is no longer running"))
    }
}

impl Default for MusicPlayer {
    fn default() -> Self {
        Self::new()
    }
}

fn audio_thread(rx: Receiver<PlayerCommand>, shared: Arc<Shared>, buffer: SampleBuffer) {
    let (_stream, handle) = match OutputStream::try_default() {
        Ok(output) => output,
        Err(err) => {
            warn!(%err, "no audio output device; playback disabled");
            while rx.recv().is_ok() {}
            return;
        }
    };
    let mut sink: Option<Sink> = None;

    loop {
        match rx.recv_timeout(POLL_INTERVAL) {
            Ok(PlayerCommand::Play(path)) => {
                if let Some(old) = sink.take() {
                    old.stop();
                }
                if let Ok(mut buf) = buffer.lock() {
                    buf.clear();
                }
                match start_sink(&handle, &path, &buffer) {
                    Ok(new_sink) => {
                        info!(path = %path.display(), "playing");
                        shared.set_playing(path);
                        sink = Some(new_sink);
                    }
                    Err(err) => {
                        warn!(path = %path.display(), error = %format!("{err:#}"), "cannot play file");
                        shared.set_idle();
                    }
                }
            }
            Ok(PlayerCommand::Pause) => {
                if let Some(s) = &sink {
                    s.pause();
                    shared.paused.store(true, Ordering::SeqCst);
                }
            }
            Ok(PlayerCommand::Resume) => {
                if let Some(s) = &sink {
                    s.play();
                    shared.paused.store(false, Ordering::SeqCst);
                }
            }
            Ok(PlayerCommand::Stop) => {
                if let Some(s) = sink.take() {
                    s.stop();
                }
                shared.set_idle();
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        if let Some(s) = &sink {
            if s.empty() {
                debug!("track finished");
                sink = None;
                shared.set_idle();
            } else {
                let ms = s.get_pos().as_millis() as u64;
                shared.position_ms.store(ms, Ordering::SeqCst);
            }
        }
    }

    if let Some(s) = sink.take() {
        s.stop();
    }
}

fn start_sink(handle: &OutputStreamHandle, path: &Path, buffer: &SampleBuffer) -> Result<Sink> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let source = Decoder::new(BufReader::new(file))
        .with_context(|| format!("decoding {}", path.display()))?;
    let sink = Sink::try_new(handle).context("creating audio sink")?;
    sink.append(SampleCapture::new(source.convert_samples::<f32>(), Arc::clone(buffer)));
    sink.play();
    Ok(sink)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_is_published_only_while_playing() {
        let shared = Shared::default();
        assert_eq!(shared.track(), None);

        shared.set_playing(PathBuf::from("/music/a.flac"));
        assert!(shared.playing.load(Ordering::SeqCst));
        assert_eq!(shared.track(), Some(PathBuf::from("/music/a.flac")));

        // Natural end and failed starts both go through set_idle.
        shared.set_idle();
        assert!(!shared.playing.load(Ordering::SeqCst));
        assert_eq!(shared.track(), None);
    }
}
