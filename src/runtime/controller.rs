use std::collections::BTreeMap;
use std::sync::mpsc::Sender;

use tracing::info;

use crate::device::{AudioDevice, DeviceBridge, Signal, SignalSink};
use crate::library::{Catalog, Track};
use crate::playback::{Cue, Event, Intent, PlaybackState, RandomSource, transition};
use crate::store::{PlayCountStore, Preferences, StoreHandle, Theme};

/// Everything that enters the player's single event queue.
#[derive(Debug)]
pub enum Input {
    Intent(Intent),
    /// A raw device event, still tagged with its load.
    Device(Signal),
    ToggleTheme,
    Quit,
}

/// Device signals join the same queue as key presses.
impl SignalSink for Sender<Input> {
    fn deliver(&self, signal: Signal) -> bool {
        self.send(Input::Device(signal)).is_ok()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Owns the playback state and applies inputs to it one at a time.
pub struct Controller<D, R> {
    catalog: Catalog,
    state: PlaybackState,
    bridge: DeviceBridge<D>,
    counts: PlayCountStore,
    prefs: Preferences,
    theme: Theme,
    rng: R,
}

impl<D: AudioDevice, R: RandomSource> Controller<D, R> {
    /// Device events are queued on `inbox`; the caller drains the matching
    /// receiver into [`Controller::handle`].
    pub fn new(
        catalog: Catalog,
        initial: PlaybackState,
        device: D,
        inbox: Sender<Input>,
        store: StoreHandle,
        rng: R,
    ) -> Self {
        let prefs = Preferences::new(store.clone());
        let mut bridge = DeviceBridge::new(device, inbox);
        bridge.prime(&initial, &catalog);

        Self {
            theme: prefs.theme(),
            counts: PlayCountStore::new(store),
            prefs,
            catalog,
            state: initial,
            bridge,
            rng,
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn device(&self) -> &D {
        self.bridge.device()
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.catalog.get(self.state.current)
    }

    pub fn play_counts(&self) -> BTreeMap<String, u64> {
        self.counts.snapshot()
    }

    /// Apply one queued input atomically.
    pub fn handle(&mut self, input: Input) -> Flow {
        match input {
            Input::Intent(intent) => self.apply(intent.into()),
            Input::Device(signal) => {
                if let Some(event) = self.bridge.translate(signal) {
                    self.apply(event);
                }
            }
            Input::ToggleTheme => {
                self.theme = self.theme.toggled();
                self.prefs.set_theme(self.theme);
            }
            Input::Quit => return Flow::Quit,
        }
        Flow::Continue
    }

    /// Run `event` through the transition function and carry out its effects.
    fn apply(&mut self, event: Event) {
        let t = transition(&self.state, event, self.catalog.len(), &mut self.rng);

        if t.count_play {
            if let Some(track) = self.catalog.get(t.state.current) {
                self.counts.increment(&track.id);
            }
        }

        self.bridge.sync(&self.state, &t, &self.catalog);

        if t.state.volume != self.state.volume {
            self.prefs.set_volume(t.state.volume);
        }
        if t.cue == Some(Cue::Load) {
            if let Some(track) = self.catalog.get(t.state.current) {
                info!(index = t.state.current, track = %track.display(), "track changed");
            }
        }

        self.state = t.state;
    }
}
