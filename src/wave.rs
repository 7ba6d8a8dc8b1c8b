//! Mono 16-bit WAV decode and encode.
//!
//! The pipelines work on plain sample vectors; this module is the thin edge
//! where they meet the file system.

use std::path::Path;

use crate::error::{Error, Result};

/// A mono PCM waveform paired with its sample rate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Waveform {
    pub samples: Vec<i16>,
    pub sample_rate: u32,
}

impl Waveform {
    /// Audio duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }
}

/// Read a mono 16-bit integer WAV file.
///
/// Anything else (multi-channel, float, other bit depths) is rejected up
/// front: the audio → image direction is defined over exactly this format.
pub fn read_mono(path: &Path) -> Result<Waveform> {
    let mut reader = hound::WavReader::open(path).map_err(|e| Error::decode(path, e))?;
    let spec = reader.spec();

    if spec.channels != 1 {
        return Err(Error::InvalidInput(format!(
            "{} has {} channels; only mono WAV input is supported",
            path.display(),
            spec.channels
        )));
    }
    if spec.sample_format != hound::SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(Error::InvalidInput(format!(
            "{} is not 16-bit integer PCM",
            path.display()
        )));
    }

    let samples = reader
        .samples::<i16>()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| Error::decode(path, e))?;

    Ok(Waveform {
        samples,
        sample_rate: spec.sample_rate,
    })
}

/// Write a mono 16-bit integer WAV file.
pub fn write_mono(path: &Path, waveform: &Waveform) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: waveform.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec).map_err(|e| Error::encode(path, e))?;
    for &sample in &waveform.samples {
        writer
            .write_sample(sample)
            .map_err(|e| Error::encode(path, e))?;
    }
    writer.finalize().map_err(|e| Error::encode(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wav_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip.wav");

        let waveform = Waveform {
            samples: vec![0, 32767, -32767, 1234, -1],
            sample_rate: 8000,
        };
        write_mono(&path, &waveform).unwrap();

        let back = read_mono(&path).unwrap();
        assert_eq!(back, waveform);
    }

    #[test]
    fn test_read_rejects_stereo() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");

        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 44100,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for s in [1i16, -1, 2, -2] {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();

        assert!(matches!(read_mono(&path), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_read_missing_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.wav");
        assert!(matches!(read_mono(&path), Err(Error::Decode { .. })));
    }

    #[test]
    fn test_duration() {
        let waveform = Waveform {
            samples: vec![0; 16000],
            sample_rate: 8000,
        };
        assert!((waveform.duration_secs() - 2.0).abs() < f64::EPSILON);
    }
}
