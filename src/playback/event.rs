use crate::error::DeviceFault;

/// Everything that can move the playback state forward.
///
/// The first group are user intents emitted by the presentation layer, the
/// `Device*` group are translated from audio-output device events.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Play the track at this catalog index from the start.
    SelectTrack(usize),
    TogglePlayPause,
    Next,
    Previous,
    /// Jump to a fraction of the track length.
    Seek(f64),
    /// Set the volume to a fraction of full scale.
    SetVolume(f64),
    ToggleMute,
    ToggleRepeat,
    ToggleShuffle,

    DeviceTimeUpdate(f64),
    DeviceDurationKnown(f64),
    DeviceEnded,
    DeviceError(DeviceFault),
    DeviceReady,
}

/// The user-intent subset of [`Event`]: all the presentation layer may
/// submit. Device events only enter through the device bridge.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    SelectTrack(usize),
    TogglePlayPause,
    Next,
    Previous,
    Seek(f64),
    SetVolume(f64),
    ToggleMute,
    ToggleRepeat,
    ToggleShuffle,
}

impl From<Intent> for Event {
    fn from(intent: Intent) -> Self {
        match intent {
            Intent::SelectTrack(index) => Self::SelectTrack(index),
            Intent::TogglePlayPause => Self::TogglePlayPause,
            Intent::Next => Self::Next,
            Intent::Previous => Self::Previous,
            Intent::Seek(fraction) => Self::Seek(fraction),
            Intent::SetVolume(fraction) => Self::SetVolume(fraction),
            Intent::ToggleMute => Self::ToggleMute,
            Intent::ToggleRepeat => Self::ToggleRepeat,
            Intent::ToggleShuffle => Self::ToggleShuffle,
        }
    }
}
