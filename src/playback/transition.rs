use super::event::Event;
use super::selector::{RandomSource, TrackSelector};
use super::state::PlaybackState;

/// Device time updates within this many seconds of a commanded position are
/// treated as the device echoing that command.
pub const SEEK_ECHO_TOLERANCE: f64 = 0.25;

/// `Previous` past this point restarts the current track instead.
const RESTART_THRESHOLD: f64 = 3.0;

/// Starting playback before this point makes a play count-eligible.
const COUNT_WINDOW: f64 = 1.0;

/// Positional work for the device that a plain state diff cannot express.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cue {
    /// Load the track at `state.current` from scratch.
    Load,
    /// Rewind the loaded track to zero.
    Restart,
    /// Move the loaded track to this many seconds.
    Seek(f64),
}

/// Result of applying one event.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: PlaybackState,
    pub cue: Option<Cue>,
    /// The device confirmed a count-eligible play of the current track.
    pub count_play: bool,
}

impl Transition {
    fn to(state: PlaybackState) -> Self {
        Self {
            state,
            cue: None,
            count_play: false,
        }
    }

    fn cued(state: PlaybackState, cue: Cue) -> Self {
        Self {
            state,
            cue: Some(cue),
            count_play: false,
        }
    }
}

fn restart(prev: &PlaybackState, playing: bool) -> Transition {
    let mut next = prev.clone();
    next.elapsed = 0.0;
    next.pending_seek = Some(0.0);
    next.pending_count = false;
    next.is_playing = playing;
    Transition::cued(next, Cue::Restart)
}

/// Explicit move to `index`: always plays from the top and clears any
/// outstanding error. Landing on the current index rewinds in place, unless
/// the device failed on it; then there may be nothing loaded to rewind, so
/// it is loaded again.
fn jump(prev: &PlaybackState, index: usize) -> Transition {
    if index == prev.current && prev.last_error.is_none() {
        return restart(prev, true);
    }

    let mut next = prev.clone();
    next.current = index;
    next.elapsed = 0.0;
    next.duration = None;
    next.pending_seek = None;
    next.pending_count = false;
    next.is_playing = true;
    next.last_error = None;
    Transition::cued(next, Cue::Load)
}

/// Settle a pending count once the device reports in while playing.
fn confirm_play(state: &mut PlaybackState) -> bool {
    let confirmed = state.is_playing && state.pending_count;
    if confirmed {
        state.pending_count = false;
    }
    confirmed
}

fn advance(prev: &PlaybackState, len: usize, rng: &mut dyn RandomSource) -> Transition {
    if prev.repeat {
        return jump(prev, prev.current);
    }
    match TrackSelector::next(prev, len, rng) {
        Some(index) => jump(prev, index),
        None => Transition::to(prev.clone()),
    }
}

/// Compute the state that follows `prev` after `event`.
///
/// `len` is the catalog length. Every event is accepted: one whose
/// precondition does not hold (empty catalog, out of range index, unknown
/// duration, non-finite input) leaves the state untouched.
pub fn transition(
    prev: &PlaybackState,
    event: Event,
    len: usize,
    rng: &mut dyn RandomSource,
) -> Transition {
    let unchanged = || Transition::to(prev.clone());
    let mut next = prev.clone();

    match event {
        Event::SelectTrack(index) => {
            if index >= len {
                return unchanged();
            }
            jump(prev, index)
        }

        Event::TogglePlayPause => {
            if len == 0 {
                return unchanged();
            }
            next.is_playing = !prev.is_playing;
            // Judged on the position before the toggle; counted on confirmation.
            next.pending_count = next.is_playing && prev.elapsed < COUNT_WINDOW;
            Transition::to(next)
        }

        Event::Next | Event::DeviceEnded => {
            if len == 0 {
                return unchanged();
            }
            advance(prev, len, rng)
        }

        Event::Previous => {
            if len == 0 {
                return unchanged();
            }
            if prev.elapsed > RESTART_THRESHOLD {
                return restart(prev, prev.is_playing);
            }
            match TrackSelector::previous(prev, len) {
                Some(index) => jump(prev, index),
                None => unchanged(),
            }
        }

        Event::Seek(fraction) => {
            let Some(duration) = prev.duration.filter(|d| *d > 0.0) else {
                return unchanged();
            };
            if len == 0 || !fraction.is_finite() {
                return unchanged();
            }
            let target = (fraction.clamp(0.0, 1.0) * duration).clamp(0.0, duration);
            next.elapsed = target;
            next.pending_seek = Some(target);
            Transition::cued(next, Cue::Seek(target))
        }

        Event::SetVolume(fraction) => {
            if !fraction.is_finite() {
                return unchanged();
            }
            let fraction = fraction.clamp(0.0, 1.0);
            if fraction == 0.0 {
                // Keep the last audible level so unmuting restores it.
                next.muted = true;
            } else {
                next.volume = fraction;
                next.muted = false;
            }
            Transition::to(next)
        }

        Event::ToggleMute => {
            next.muted = !prev.muted;
            Transition::to(next)
        }

        Event::ToggleRepeat => {
            next.repeat = !prev.repeat;
            Transition::to(next)
        }

        Event::ToggleShuffle => {
            next.shuffle = !prev.shuffle;
            Transition::to(next)
        }

        Event::DeviceTimeUpdate(t) => {
            if !t.is_finite() || t < 0.0 {
                return unchanged();
            }
            let count_play = confirm_play(&mut next);
            let echo = next
                .pending_seek
                .take()
                .is_some_and(|target| (t - target).abs() <= SEEK_ECHO_TOLERANCE);
            if !echo {
                next.elapsed = match prev.duration {
                    Some(d) => t.min(d),
                    None => t,
                };
            }
            Transition {
                count_play,
                ..Transition::to(next)
            }
        }

        Event::DeviceDurationKnown(d) => {
            if !d.is_finite() || d < 0.0 {
                return unchanged();
            }
            next.duration = Some(d);
            next.elapsed = prev.elapsed.min(d);
            Transition::to(next)
        }

        Event::DeviceError(fault) => {
            next.is_playing = false;
            next.pending_count = false;
            next.last_error = Some(fault);
            Transition::to(next)
        }

        Event::DeviceReady => {
            next.last_error = None;
            Transition {
                count_play: confirm_play(&mut next),
                ..Transition::to(next)
            }
        }
    }
}
