use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use crate::library::Catalog;
use crate::playback::{Cue, Event, PlaybackState, Transition};

use super::types::{AudioDevice, DeviceEvent, LoadToken, Signal, SignalSink, Subscription};

/// Keeps an [`AudioDevice`] in step with the playback state.
pub struct DeviceBridge<D> {
    device: D,
    live: Arc<AtomicU64>,
    inbox: Arc<dyn SignalSink>,
}

impl<D: AudioDevice> DeviceBridge<D> {
    /// Device events will be delivered to `inbox`.
    pub fn new(device: D, inbox: impl SignalSink + 'static) -> Self {
        Self {
            device,
            live: Arc::new(AtomicU64::new(0)),
            inbox: Arc::new(inbox),
        }
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    /// Token of the current subscription. Zero before the first load.
    pub fn token(&self) -> LoadToken {
        self.live.load(Ordering::Acquire)
    }

    /// Invalidate the current event source and open a new one.
    fn resubscribe(&mut self) -> Subscription {
        let token = self.live.fetch_add(1, Ordering::AcqRel) + 1;
        Subscription::new(token, Arc::clone(&self.live), Arc::clone(&self.inbox))
    }

    fn load(&mut self, state: &PlaybackState, catalog: &Catalog) {
        let Some(track) = catalog.get(state.current) else {
            return;
        };
        let events = self.resubscribe();
        debug!(track_id = %track.id, token = events.token(), "loading track");
        self.device.load(&catalog.resolve(&track.audio), events);
        if state.is_playing {
            self.device.play();
        }
    }

    /// Bring the device up to `state` at startup: output level, plus the
    /// current track loaded (and started if `state` says so).
    pub fn prime(&mut self, state: &PlaybackState, catalog: &Catalog) {
        self.device.set_volume(state.output_volume());
        self.load(state, catalog);
    }

    /// Issue the commands that take the device from `prev` to `t.state`.
    pub fn sync(&mut self, prev: &PlaybackState, t: &Transition, catalog: &Catalog) {
        let next = &t.state;

        match t.cue {
            Some(Cue::Load) => self.load(next, catalog),
            Some(Cue::Restart) => {
                self.device.seek(0.0);
                if next.is_playing {
                    self.device.play();
                } else if prev.is_playing {
                    self.device.pause();
                }
            }
            Some(Cue::Seek(seconds)) => self.device.seek(seconds),
            None => {}
        }

        let positioned = matches!(t.cue, Some(Cue::Load | Cue::Restart));
        if !positioned && prev.is_playing != next.is_playing {
            if next.is_playing {
                self.device.play();
            } else {
                self.device.pause();
            }
        }

        if prev.output_volume() != next.output_volume() {
            self.device.set_volume(next.output_volume());
        }
    }

    /// Translate a device signal into a playback event.
    ///
    /// Signals from a load that has since been replaced are dropped, even if
    /// they were queued before the replacement.
    pub fn translate(&self, signal: Signal) -> Option<Event> {
        let current = self.token();
        if signal.token != current {
            debug!(
                token = signal.token,
                current,
                event = ?signal.event,
                "dropping stale device event"
            );
            return None;
        }

        Some(match signal.event {
            DeviceEvent::TimeUpdate(t) => Event::DeviceTimeUpdate(t),
            DeviceEvent::DurationChange(d) => Event::DeviceDurationKnown(d),
            DeviceEvent::Ended => Event::DeviceEnded,
            DeviceEvent::Error(fault) => Event::DeviceError(fault),
            DeviceEvent::CanPlay => Event::DeviceReady,
        })
    }
}
