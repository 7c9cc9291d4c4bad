//! Preloaded sample bank playing through the output device.
//!
//! Loading is all-or-nothing: every sample file is checked, the output device is
//! opened, every clip is decoded, and only then is the stream started.

use std::collections::HashSet;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SizedSample, StreamConfig};
use log::{debug, error, info, warn};
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::mpsc::{Sender, channel};

use super::decode::load_clip;
use super::mixer::{ClipHandle, Mixer, PLAY_QUEUE};
use super::{Player, Sample};
use crate::config::{AudioConfig, SampleConfig};
use crate::error::Error;

/// Handles sample playback.
///
/// Owns the output stream for its whole lifetime; dropping the bank stops playback.
pub struct SoundBank {
    clips: Vec<ClipHandle>,
    tx_play: Sender<ClipHandle>,
    _stream: cpal::Stream,
}

fn host() -> Result<cpal::Host, Error> {
    #[cfg(all(
        any(
            target_os = "linux",
            target_os = "dragonfly",
            target_os = "freebsd",
            target_os = "netbsd"
        ),
        feature = "jack"
    ))]
    {
        let id = cpal::available_hosts()
            .into_iter()
            .find(|id| *id == cpal::HostId::Jack)
            .ok_or_else(|| Error::AudioDevice("JACK host is not available".to_string()))?;
        cpal::host_from_id(id).map_err(|e| Error::AudioDevice(e.to_string()))
    }
    #[cfg(any(
        not(any(
            target_os = "linux",
            target_os = "dragonfly",
            target_os = "freebsd",
            target_os = "netbsd"
        )),
        not(feature = "jack")
    ))]
    {
        Ok(cpal::default_host())
    }
}

fn output_device(host: &cpal::Host, config: &AudioConfig) -> Result<cpal::Device, Error> {
    debug!("Available hosts: {:?}", cpal::available_hosts());
    debug!("Default host: {:?}", host.id());

    let Some(device_name) = &config.device else {
        return host
            .default_output_device()
            .ok_or_else(|| Error::AudioDevice("No default output device found".to_string()));
    };

    let devices = host
        .output_devices()
        .map_err(|e| Error::AudioDevice(e.to_string()))?;
    let mut names = HashSet::new();
    for device in devices {
        if let Ok(name) = device.name() {
            if name == *device_name {
                return Ok(device);
            }
            names.insert(name);
        }
    }
    Err(Error::AudioDevice(format!(
        "Requested audio device '{device_name}' not found, available: {names:?}"
    )))
}

impl SoundBank {
    /// Loads every sample and opens the output stream.
    pub fn load(samples: &SampleConfig, audio: &AudioConfig) -> Result<Self, Error> {
        let paths: Vec<_> = Sample::ALL.iter().map(|&s| samples.path(s)).collect();
        if let Some(missing) = paths.iter().find(|p| !p.is_file()) {
            return Err(Error::MissingSample(missing.clone()));
        }

        let host = host()?;
        let device = output_device(&host, audio)?;
        info!(
            "Using output device: {}",
            device.name().unwrap_or_else(|_| "<unnamed>".to_string())
        );

        let supported = device
            .default_output_config()
            .map_err(|e| Error::AudioDevice(e.to_string()))?;
        debug!("Device default config: {:?}", supported);
        let sample_format = supported.sample_format();
        let mut stream_config: StreamConfig = supported.config();
        if let Some(frames) = audio.buffer_frames {
            stream_config.buffer_size = cpal::BufferSize::Fixed(frames);
        }

        let mut clips = Vec::with_capacity(Sample::ALL.len());
        for path in &paths {
            let clip = load_clip(path, stream_config.sample_rate.0)?;
            clips.push(ClipHandle::from(clip));
        }

        let (tx_play, rx_play) = channel(PLAY_QUEUE);
        let mixer = Mixer::new(rx_play, audio.volume, stream_config.channels);
        let stream = match sample_format {
            cpal::SampleFormat::F32 => build_stream::<f32>(&device, &stream_config, mixer),
            cpal::SampleFormat::I16 => build_stream::<i16>(&device, &stream_config, mixer),
            cpal::SampleFormat::U16 => build_stream::<u16>(&device, &stream_config, mixer),
            cpal::SampleFormat::I32 => build_stream::<i32>(&device, &stream_config, mixer),
            other => Err(Error::AudioDevice(format!(
                "Unsupported output sample format '{other}'"
            ))),
        }?;
        stream
            .play()
            .map_err(|e| Error::AudioStream(e.to_string()))?;
        debug!("Using stream config: {:?}", stream_config);

        Ok(Self {
            clips,
            tx_play,
            _stream: stream,
        })
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &StreamConfig,
    mut mixer: Mixer,
) -> Result<cpal::Stream, Error>
where
    T: SizedSample + FromSample<f32>,
{
    let err_fn = move |err| {
        error!("Audio stream error: {}", err);
    };
    let mut scratch: Vec<f32> = Vec::new();
    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                scratch.resize(data.len(), 0.0);
                mixer.fill(&mut scratch);
                for (out, &sample) in data.iter_mut().zip(scratch.iter()) {
                    *out = T::from_sample(sample);
                }
            },
            err_fn,
            None,
        )
        .map_err(|e| Error::AudioStream(e.to_string()))
}

/// Queues a clip for the mixer without waiting. Returns false if it was dropped.
fn enqueue(tx_play: &Sender<ClipHandle>, clip: ClipHandle, sample: Sample) -> bool {
    match tx_play.try_send(clip) {
        Ok(()) => true,
        Err(TrySendError::Full(_)) => {
            debug!("Play queue is full, dropping {sample} sample");
            false
        }
        Err(TrySendError::Closed(_)) => {
            warn!("Output stream is gone, dropping {sample} sample");
            false
        }
    }
}

impl Player for SoundBank {
    fn play(&self, sample: Sample) {
        enqueue(&self.tx_play, self.clips[sample.index()].clone(), sample);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_fails_without_samples() {
        let temp_dir = tempdir().unwrap();
        let samples = SampleConfig {
            dir: temp_dir.path().to_path_buf(),
            ..SampleConfig::default()
        };
        let result = SoundBank::load(&samples, &AudioConfig::default());
        assert!(
            matches!(result, Err(Error::MissingSample(p)) if p == samples.path(Sample::Load))
        );
    }

    #[test]
    fn test_load_fails_when_one_sample_is_missing() {
        let temp_dir = tempdir().unwrap();
        let samples = SampleConfig {
            dir: temp_dir.path().to_path_buf(),
            ..SampleConfig::default()
        };
        for sample in Sample::ALL.iter().filter(|&&s| s != Sample::Bell) {
            std::fs::write(samples.path(*sample), b"").unwrap();
        }
        let result = SoundBank::load(&samples, &AudioConfig::default());
        assert!(
            matches!(result, Err(Error::MissingSample(p)) if p == samples.path(Sample::Bell))
        );
    }

    #[test]
    fn test_full_queue_drops_instead_of_blocking() {
        let (tx, mut rx) = channel(PLAY_QUEUE);
        let clip = ClipHandle::from(vec![0.1; 4]);
        for _ in 0..PLAY_QUEUE {
            assert!(enqueue(&tx, clip.clone(), Sample::Key));
        }
        assert_eq!(tx.capacity(), 0);
        assert!(!enqueue(&tx, clip.clone(), Sample::Key));

        assert!(rx.try_recv().is_ok());
        assert!(enqueue(&tx, clip, Sample::Bell));
    }

    #[test]
    fn test_closed_stream_drops_request() {
        let (tx, rx) = channel(PLAY_QUEUE);
        drop(rx);
        assert!(!enqueue(&tx, ClipHandle::from(vec![0.1]), Sample::Enter));
    }
}
