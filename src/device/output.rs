use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use lofty::prelude::*;
use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, error, warn};

use crate::config::DeviceSettings;
use crate::error::DeviceFault;

use super::sink::create_sink_at;
use super::types::{AudioDevice, DeviceEvent, Subscription};

#[derive(Debug)]
enum DeviceCmd {
    Load { path: PathBuf, events: Subscription },
    Play,
    Pause,
    Seek(f64),
    SetVolume(f32),
    Quit,
}

/// Audio output through the default `rodio` stream, driven from its own
/// thread.
pub struct RodioDevice {
    tx: Sender<DeviceCmd>,
    join: Option<JoinHandle<()>>,
}

impl RodioDevice {
    pub fn spawn(settings: &DeviceSettings) -> Self {
        let (tx, rx) = mpsc::channel::<DeviceCmd>();
        let tick = Duration::from_millis(settings.tick_ms.max(10));
        let join = thread::Builder::new()
            .name("tryza-audio".to_string())
            .spawn(move || audio_thread(rx, tick))
            .map_err(|e| error!("failed to start audio thread: {e}"))
            .ok();

        Self { tx, join }
    }

    fn send(&self, cmd: DeviceCmd) {
        if let Err(e) = self.tx.send(cmd) {
            debug!("audio thread gone, dropping {:?}", e.0);
        }
    }

    /// Stop playback and wait for the audio thread to exit.
    pub fn shutdown(&mut self) {
        let _ = self.tx.send(DeviceCmd::Quit);
        if let Some(h) = self.join.take() {
            let _ = h.join();
        }
    }
}

impl Drop for RodioDevice {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl AudioDevice for RodioDevice {
    fn load(&mut self, source: &Path, events: Subscription) {
        self.send(DeviceCmd::Load {
            path: source.to_path_buf(),
            events,
        });
    }

    fn play(&mut self) {
        self.send(DeviceCmd::Play);
    }

    fn pause(&mut self) {
        self.send(DeviceCmd::Pause);
    }

    fn seek(&mut self, seconds: f64) {
        self.send(DeviceCmd::Seek(seconds));
    }

    fn set_volume(&mut self, volume: f64) {
        self.send(DeviceCmd::SetVolume(volume.clamp(0.0, 1.0) as f32));
    }
}

/// The loaded track and its clock.
struct Loaded {
    path: PathBuf,
    sink: Sink,
    // Track start time and accumulated elapsed when paused.
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl Loaded {
    fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }

    fn is_playing(&self) -> bool {
        self.started_at.is_some()
    }
}

fn read_duration(path: &Path) -> Option<Duration> {
    lofty::read_from_path(path)
        .ok()
        .map(|tagged| tagged.properties().duration())
        .filter(|d| !d.is_zero())
}

fn audio_thread(rx: Receiver<DeviceCmd>, tick: Duration) {
    let stream = match OutputStreamBuilder::open_default_stream() {
        Ok(mut stream) => {
            // rodio logs to stderr when OutputStream is dropped; the terminal
            // belongs to the UI.
            stream.log_on_drop(false);
            Some(stream)
        }
        Err(e) => {
            error!("no audio output device: {e}");
            None
        }
    };

    let mut current: Option<Loaded> = None;
    // Outlives a failed load so a later `play` can still report back.
    let mut events: Option<Subscription> = None;
    let mut volume: f32 = 1.0;

    let report = |events: &Option<Subscription>, event: DeviceEvent| {
        if let Some(sub) = events {
            sub.emit(event);
        }
    };

    loop {
        match rx.recv_timeout(tick) {
            Ok(DeviceCmd::Load { path, events: sub }) => {
                if let Some(old) = current.take() {
                    old.sink.stop();
                }
                events = Some(sub);

                let Some(stream) = stream.as_ref() else {
                    report(
                        &events,
                        DeviceEvent::Error(DeviceFault::new(
                            DeviceFault::ABORTED,
                            "no audio output device",
                        )),
                    );
                    continue;
                };

                match open(stream, &path, Duration::ZERO, volume) {
                    Ok((sink, duration)) => {
                        if let Some(d) = duration.or_else(|| read_duration(&path)) {
                            report(&events, DeviceEvent::DurationChange(d.as_secs_f64()));
                        }
                        report(&events, DeviceEvent::CanPlay);
                        current = Some(Loaded {
                            path,
                            sink,
                            started_at: None,
                            accumulated: Duration::ZERO,
                        });
                    }
                    Err(fault) => {
                        warn!("load failed: {fault}");
                        report(&events, DeviceEvent::Error(fault));
                    }
                }
            }

            Ok(DeviceCmd::Play) => match current.as_mut() {
                Some(loaded) => {
                    if !loaded.is_playing() {
                        loaded.sink.play();
                        loaded.started_at = Some(Instant::now());
                    }
                }
                None => report(
                    &events,
                    DeviceEvent::Error(DeviceFault::new(
                        DeviceFault::ABORTED,
                        "nothing loaded to play",
                    )),
                ),
            },

            Ok(DeviceCmd::Pause) => {
                if let Some(loaded) = current.as_mut() {
                    loaded.sink.pause();
                    if let Some(st) = loaded.started_at.take() {
                        loaded.accumulated += st.elapsed();
                    }
                }
            }

            Ok(DeviceCmd::Seek(seconds)) => {
                // Rebuild the sink and skip into the file; also revives a
                // sink that already drained.
                let (Some(stream), Some(loaded)) = (stream.as_ref(), current.as_mut()) else {
                    continue;
                };
                let target = Duration::try_from_secs_f64(seconds).unwrap_or_default();
                match open(stream, &loaded.path, target, volume) {
                    Ok((sink, _)) => {
                        loaded.sink.stop();
                        if loaded.is_playing() {
                            sink.play();
                            loaded.started_at = Some(Instant::now());
                        }
                        loaded.sink = sink;
                        loaded.accumulated = target;
                        report(&events, DeviceEvent::TimeUpdate(target.as_secs_f64()));
                    }
                    Err(fault) => report(&events, DeviceEvent::Error(fault)),
                }
            }

            Ok(DeviceCmd::SetVolume(v)) => {
                volume = v;
                if let Some(loaded) = current.as_ref() {
                    loaded.sink.set_volume(v);
                }
            }

            Ok(DeviceCmd::Quit) => {
                if let Some(loaded) = current.take() {
                    loaded.sink.stop();
                }
                break;
            }

            Err(RecvTimeoutError::Timeout) => {
                let Some(loaded) = current.as_mut() else {
                    continue;
                };
                if !loaded.is_playing() {
                    continue;
                }
                if loaded.sink.empty() {
                    loaded.accumulated = loaded.elapsed();
                    loaded.started_at = None;
                    report(&events, DeviceEvent::Ended);
                } else {
                    report(&events, DeviceEvent::TimeUpdate(loaded.elapsed().as_secs_f64()));
                }
            }

            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}

fn open(
    stream: &OutputStream,
    path: &Path,
    start_at: Duration,
    volume: f32,
) -> Result<(Sink, Option<Duration>), DeviceFault> {
    let opened = create_sink_at(stream, path, start_at)?;
    opened.sink.set_volume(volume);
    Ok((opened.sink, opened.duration))
}
