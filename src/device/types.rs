//! Device contract and the event plumbing shared by all devices.

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::Sender;

use crate::error::DeviceFault;

/// Identifies one `load` on a device. Events carry the token of the load
/// they belong to.
pub type LoadToken = u64;

/// Events a device reports about the track it has loaded.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceEvent {
    /// Playback position in seconds.
    TimeUpdate(f64),
    /// Track length in seconds.
    DurationChange(f64),
    Ended,
    Error(DeviceFault),
    /// The loaded track is ready to play.
    CanPlay,
}

/// A device event tagged with the load it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub token: LoadToken,
    pub event: DeviceEvent,
}

/// Where device signals go. Called from the device's own thread.
pub trait SignalSink: Send + Sync {
    /// Returns false once nobody is listening.
    fn deliver(&self, signal: Signal) -> bool;
}

impl SignalSink for Sender<Signal> {
    fn deliver(&self, signal: Signal) -> bool {
        self.send(signal).is_ok()
    }
}

/// Event source handed to the device with each `load`.
///
/// Once the bridge subscribes for a newer load, emitting through an older
/// subscription is a no-op.
#[derive(Clone)]
pub struct Subscription {
    token: LoadToken,
    live: Arc<AtomicU64>,
    sink: Arc<dyn SignalSink>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("token", &self.token)
            .field("live", &self.is_live())
            .finish_non_exhaustive()
    }
}

impl Subscription {
    pub(super) fn new(token: LoadToken, live: Arc<AtomicU64>, sink: Arc<dyn SignalSink>) -> Self {
        Self { token, live, sink }
    }

    pub fn token(&self) -> LoadToken {
        self.token
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire) == self.token
    }

    /// Queue `event` for the player. Returns false when the subscription is
    /// stale or the player is gone.
    pub fn emit(&self, event: DeviceEvent) -> bool {
        if !self.is_live() {
            return false;
        }
        self.sink.deliver(Signal {
            token: self.token,
            event,
        })
    }
}

/// A media-playback device.
///
/// Commands return immediately. Outcomes, including failures of `play`, are
/// reported later through the subscription given to the latest `load`.
pub trait AudioDevice {
    /// Replace whatever is loaded with `source`, paused at zero.
    fn load(&mut self, source: &Path, events: Subscription);
    fn play(&mut self);
    fn pause(&mut self);
    fn seek(&mut self, seconds: f64);
    /// Output level in `[0, 1]`.
    fn set_volume(&mut self, volume: f64);
}
