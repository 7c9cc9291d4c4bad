//! WAV sample decoding.
//!
//! Samples are read with `hound`, down-mixed to mono `f32` and brought to the
//! output device rate once, at load time, so playback is a plain copy.

use std::path::Path;

use hound::{SampleFormat, WavReader};
use log::debug;

use super::resample::audio_resample;
use crate::error::Error;

/// A decoded mono clip.
#[derive(Debug, Clone, PartialEq)]
pub struct Clip {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

/// Reads a WAV file and averages its channels into a mono clip.
pub fn read_wav(path: &Path) -> Result<Clip, Error> {
    if !path.is_file() {
        return Err(Error::MissingSample(path.to_path_buf()));
    }
    let mut reader = WavReader::open(path)
        .map_err(|e| Error::SampleDecode(format!("{}: {e}", path.display())))?;
    let spec = reader.spec();
    let interleaved: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|e| Error::SampleDecode(format!("{}: {e}", path.display())))?,
        SampleFormat::Int => {
            let scale = (1_i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|s| s as f32 / scale))
                .collect::<Result<_, _>>()
                .map_err(|e| Error::SampleDecode(format!("{}: {e}", path.display())))?
        }
    };

    let channels = spec.channels.max(1) as usize;
    let samples = if channels == 1 {
        interleaved
    } else {
        interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect()
    };
    debug!(
        "Decoded {} ({} frames, {}Hz, {} channels)",
        path.display(),
        samples.len(),
        spec.sample_rate,
        channels
    );
    Ok(Clip {
        samples,
        sample_rate: spec.sample_rate,
    })
}

/// Reads a WAV file and resamples it to `target_rate`.
pub fn load_clip(path: &Path, target_rate: u32) -> Result<Vec<f32>, Error> {
    let clip = read_wav(path)?;
    audio_resample(&clip.samples, clip.sample_rate, target_rate)
}
