use crate::error::DeviceFault;

/// The authoritative playback record.
///
/// Presentation reads it; only `transition` produces new values.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    /// Index into the catalog. Meaningless while the catalog is empty.
    pub current: usize,
    pub is_playing: bool,
    /// Seconds into the current track.
    pub elapsed: f64,
    /// Track length in seconds, once the device reports it.
    pub duration: Option<f64>,
    /// Level restored on unmute, always in `[0, 1]`.
    pub volume: f64,
    pub muted: bool,
    pub repeat: bool,
    pub shuffle: bool,
    pub last_error: Option<DeviceFault>,
    /// Position most recently commanded to the device. A device time update
    /// echoing it is not applied a second time.
    pub pending_seek: Option<f64>,
    /// Playback was started near the top and the play is counted once the
    /// device confirms it is actually playing.
    pub pending_count: bool,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            current: 0,
            is_playing: false,
            elapsed: 0.0,
            duration: None,
            volume: 1.0,
            muted: false,
            repeat: false,
            shuffle: false,
            last_error: None,
            pending_seek: None,
            pending_count: false,
        }
    }
}

impl PlaybackState {
    /// Initial state with the given volume and modes.
    ///
    /// A zero volume starts muted with a full restore level, so unmuting is
    /// always audible.
    pub fn new(volume: f64, repeat: bool, shuffle: bool) -> Self {
        let volume = if volume.is_finite() {
            volume.clamp(0.0, 1.0)
        } else {
            1.0
        };
        let (volume, muted) = if volume == 0.0 {
            (1.0, true)
        } else {
            (volume, false)
        };

        Self {
            volume,
            muted,
            repeat,
            shuffle,
            ..Self::default()
        }
    }

    /// Level the device should actually output.
    pub fn output_volume(&self) -> f64 {
        if self.muted { 0.0 } else { self.volume }
    }

    /// Fraction of the track played, for progress bars.
    pub fn progress(&self) -> f64 {
        match self.duration {
            Some(d) if d > 0.0 => (self.elapsed / d).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }
}
