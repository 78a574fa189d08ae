//! Looping background music.
//!
//! Playback goes through rodio, which drives the default cpal output device
//! and decodes the track itself. Music is optional: callers log failures and
//! carry on without sound.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rodio::decoder::LoopedDecoder;
use rodio::{Decoder, OutputStream, Sink};
use tracing::info;

use crate::error::{Error, Result};

/// Open `path` and decode it as an endlessly repeating source.
pub fn open_looped(path: &Path) -> Result<LoopedDecoder<BufReader<File>>> {
    let file = File::open(path)?;
    Decoder::new_looped(BufReader::new(file))
        .map_err(|e| Error::Audio(format!("cannot decode {}: {e}", path.display())))
}

/// A track playing on repeat for as long as this value lives.
pub struct BackgroundMusic {
    sink: Sink,
    /// Dropping the stream silences the sink.
    _stream: OutputStream,
}

impl BackgroundMusic {
    /// Decode `path` and start it on the default output device at `volume`
    /// (linear, 0.0 to 1.0).
    ///
    /// The file is decoded before the device is opened, so a bad track fails
    /// without touching the audio hardware.
    pub fn start(path: &Path, volume: f32) -> Result<Self> {
        let source = open_looped(path)?;
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| Error::Audio(format!("no audio output: {e}")))?;
        let sink = Sink::try_new(&handle)
            .map_err(|e| Error::Audio(format!("cannot open audio sink: {e}")))?;
        sink.set_volume(volume);
        sink.append(source);
        info!(path = %path.display(), volume, "background music started");
        Ok(Self {
            sink,
            _stream: stream,
        })
    }

    pub fn volume(&self) -> f32 {
        self.sink.volume()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal 16-bit mono PCM WAV of silence.
    fn silent_wav(samples: u32) -> Vec<u8> {
        let rate: u32 = 8_000;
        let data_len = samples * 2;
        let mut out = Vec::with_capacity(44 + data_len as usize);
        out.extend_from_slice(b"RIFF");
        out.extend_from_slice(&(36 + data_len).to_le_bytes());
        out.extend_from_slice(b"WAVEfmt ");
        out.extend_from_slice(&16u32.to_le_bytes());
        out.extend_from_slice(&1u16.to_le_bytes()); // PCM
        out.extend_from_slice(&1u16.to_le_bytes()); // mono
        out.extend_from_slice(&rate.to_le_bytes());
        out.extend_from_slice(&(rate * 2).to_le_bytes());
        out.extend_from_slice(&2u16.to_le_bytes());
        out.extend_from_slice(&16u16.to_le_bytes());
        out.extend_from_slice(b"data");
        out.extend_from_slice(&data_len.to_le_bytes());
        out.resize(44 + data_len as usize, 0);
        out
    }

    #[test]
    fn missing_track_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_looped(&dir.path().join("bg_music.mp3")).err().unwrap();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn garbage_track_is_audio_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bg_music.mp3");
        std::fs::write(&path, b"definitely not audio").unwrap();
        let err = open_looped(&path).err().unwrap();
        assert!(matches!(err, Error::Audio(_)));
    }

    #[test]
    fn wav_track_decodes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bg_music.wav");
        std::fs::write(&path, silent_wav(800)).unwrap();
        assert!(open_looped(&path).is_ok());
    }
}
