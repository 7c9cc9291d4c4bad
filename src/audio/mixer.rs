//! Voice mixing for the output stream.
//!
//! The [`Mixer`] lives inside the cpal callback. Play requests reach it through
//! a bounded channel of [`PLAY_QUEUE`] entries; senders use `try_send` and drop
//! the request when the queue is full.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::mpsc::Receiver;

/// Maximum number of overlapping voices; the oldest one is dropped first.
pub const MAX_VOICES: usize = 32;

/// Pending play requests the output callback has not drained yet.
pub const PLAY_QUEUE: usize = 64;

/// A decoded clip shared between the bank and the mixer.
pub type ClipHandle = Arc<[f32]>;

struct Voice {
    clip: ClipHandle,
    position: usize,
}

pub struct Mixer {
    requests: Receiver<ClipHandle>,
    voices: VecDeque<Voice>,
    volume: f32,
    channels: usize,
}

impl Mixer {
    pub fn new(requests: Receiver<ClipHandle>, volume: f32, channels: u16) -> Self {
        Self {
            requests,
            voices: VecDeque::with_capacity(MAX_VOICES),
            volume,
            channels: channels.max(1) as usize,
        }
    }

    /// Number of voices still playing.
    pub fn active(&self) -> usize {
        self.voices.len()
    }

    fn accept_requests(&mut self) {
        while let Ok(clip) = self.requests.try_recv() {
            if clip.is_empty() {
                continue;
            }
            if self.voices.len() == MAX_VOICES {
                self.voices.pop_front();
            }
            self.voices.push_back(Voice { clip, position: 0 });
        }
    }

    /// Fills an interleaved output buffer, writing the same mono mix to every channel.
    pub fn fill(&mut self, out: &mut [f32]) {
        self.accept_requests();
        for frame in out.chunks_mut(self.channels) {
            let mut mixed = 0.0;
            for voice in self.voices.iter_mut() {
                if let Some(sample) = voice.clip.get(voice.position) {
                    mixed += sample;
                    voice.position += 1;
                }
            }
            frame.fill((mixed * self.volume).clamp(-1.0, 1.0));
        }
        self.voices.retain(|v| v.position < v.clip.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::channel;

    fn clip(samples: &[f32]) -> ClipHandle {
        Arc::from(samples)
    }

    #[test]
    fn test_silence_without_requests() {
        let (_tx, rx) = channel(PLAY_QUEUE);
        let mut mixer = Mixer::new(rx, 1.0, 2);
        let mut out = [0.3; 8];
        mixer.fill(&mut out);
        assert_eq!(out, [0.0; 8]);
    }

    #[test]
    fn test_single_voice_is_copied_to_all_channels() {
        let (tx, rx) = channel(PLAY_QUEUE);
        let mut mixer = Mixer::new(rx, 1.0, 2);
        tx.try_send(clip(&[0.1, 0.2])).unwrap();

        let mut out = [9.0; 6];
        mixer.fill(&mut out);
        assert_eq!(out, [0.1, 0.1, 0.2, 0.2, 0.0, 0.0]);
        assert_eq!(mixer.active(), 0);
    }

    #[test]
    fn test_voices_overlap_and_clamp() {
        let (tx, rx) = channel(PLAY_QUEUE);
        let mut mixer = Mixer::new(rx, 1.0, 1);
        tx.try_send(clip(&[0.25, 0.75, 0.5])).unwrap();
        tx.try_send(clip(&[0.25, 0.5])).unwrap();

        let mut out = [0.0; 3];
        mixer.fill(&mut out);
        assert_eq!(out, [0.5, 1.0, 0.5]);
    }

    #[test]
    fn test_voice_continues_across_buffers() {
        let (tx, rx) = channel(PLAY_QUEUE);
        let mut mixer = Mixer::new(rx, 0.5, 1);
        tx.try_send(clip(&[0.2, 0.4, 0.6, 0.8])).unwrap();

        let mut out = [0.0; 2];
        mixer.fill(&mut out);
        assert_eq!(out, [0.1, 0.2]);
        assert_eq!(mixer.active(), 1);
        mixer.fill(&mut out);
        assert_eq!(out, [0.3, 0.4]);
        assert_eq!(mixer.active(), 0);
    }

    #[test]
    fn test_oldest_voice_is_dropped() {
        let (tx, rx) = channel(PLAY_QUEUE);
        let mut mixer = Mixer::new(rx, 1.0, 1);
        for _ in 0..MAX_VOICES + 5 {
            tx.try_send(clip(&[0.0; 16])).unwrap();
        }
        let mut out = [0.0; 1];
        mixer.fill(&mut out);
        assert_eq!(mixer.active(), MAX_VOICES);
    }

    #[test]
    fn test_empty_clip_is_ignored() {
        let (tx, rx) = channel(PLAY_QUEUE);
        let mut mixer = Mixer::new(rx, 1.0, 1);
        tx.try_send(clip(&[])).unwrap();
        let mut out = [0.0; 1];
        mixer.fill(&mut out);
        assert_eq!(mixer.active(), 0);
    }
}
