use std::fmt;

use crate::dispatch::Category;

mod bank;
pub mod decode;
pub mod mixer;
pub mod resample;

pub use bank::SoundBank;

/// The fixed set of typewriter samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sample {
    /// Paper load, played on page jumps.
    Load,
    /// Carriage shift, played on modifiers and navigation keys.
    Shift,
    Delete,
    Space,
    Key,
    Enter,
    Bell,
}

impl Sample {
    pub const ALL: [Sample; 7] = [
        Sample::Load,
        Sample::Shift,
        Sample::Delete,
        Sample::Space,
        Sample::Key,
        Sample::Enter,
        Sample::Bell,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Sample::Load => "load",
            Sample::Shift => "shift",
            Sample::Delete => "delete",
            Sample::Space => "space",
            Sample::Key => "key",
            Sample::Enter => "enter",
            Sample::Bell => "bell",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Something that can fire a sample without waiting for it to finish.
pub trait Player {
    /// Requests playback of `sample`. Must not block and never fails.
    fn play(&self, sample: Sample);

    /// Plays the sample associated with `category`.
    fn trigger(&self, category: Category) {
        self.play(category.sample());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sample_indices_are_distinct() {
        let indices: HashSet<_> = Sample::ALL.iter().map(Sample::index).collect();
        assert_eq!(indices.len(), Sample::ALL.len());
        assert!(indices.iter().all(|&i| i < Sample::ALL.len()));
    }

    #[test]
    fn test_sample_names() {
        let names: Vec<_> = Sample::ALL.iter().map(|s| s.to_string()).collect();
        assert_eq!(
            names,
            vec!["load", "shift", "delete", "space", "key", "enter", "bell"]
        );
    }
}
