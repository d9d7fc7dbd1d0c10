//! Utilities for creating `rodio` sinks from audio files.
//!
//! The helper here encapsulates opening/decoding a file and preparing a
//! paused `Sink` at the requested start position.

use std::fs::File;
use std::io::{BufReader, ErrorKind};
use std::path::Path;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use crate::error::DeviceFault;

pub(super) struct OpenedSink {
    pub sink: Sink,
    /// Length reported by the decoder, when the format carries one.
    pub duration: Option<Duration>,
}

/// Create a paused `Sink` for `path` that starts playback at `start_at`.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    path: &Path,
    start_at: Duration,
) -> Result<OpenedSink, DeviceFault> {
    let file = File::open(path).map_err(|e| {
        let code = match e.kind() {
            ErrorKind::NotFound => DeviceFault::UNSUPPORTED,
            _ => DeviceFault::NETWORK,
        };
        DeviceFault::new(code, format!("cannot open {}: {e}", path.display()))
    })?;

    let decoder = Decoder::new(BufReader::new(file)).map_err(|e| {
        DeviceFault::new(
            DeviceFault::DECODE,
            format!("cannot decode {}: {e}", path.display()),
        )
    })?;
    let duration = decoder.total_duration();

    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    let source = decoder.skip_duration(start_at);

    let sink = Sink::connect_new(stream.mixer());
    sink.append(source);
    sink.pause();
    Ok(OpenedSink { sink, duration })
}
