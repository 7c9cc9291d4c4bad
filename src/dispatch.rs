//! Key classification and playback dispatch.
//!
//! Each key press is classified into a [`Category`], the consecutive keystroke
//! counter is updated, and the matching sample is fired. Release events are ignored.

use log::{debug, trace};

use crate::audio::{Player, Sample};
use crate::config::BellConfig;
use crate::keyboard::{KeyEvent, KeyIdentity, Transition};

/// Dispatch bucket driving sample selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Enter,
    Space,
    Delete,
    ModifierOrNav,
    PageJump,
    GenericKey,
}

impl Category {
    /// The sample played for this category.
    pub fn sample(&self) -> Sample {
        match self {
            Category::Enter => Sample::Enter,
            Category::Space => Sample::Space,
            Category::Delete => Sample::Delete,
            Category::ModifierOrNav => Sample::Shift,
            Category::PageJump => Sample::Load,
            Category::GenericKey => Sample::Key,
        }
    }
}

/// Classifies a key against the static table. Unrecognized keys are generic.
pub fn classify(identity: KeyIdentity) -> Category {
    use KeyIdentity as K;
    match identity {
        K::Return => Category::Enter,
        K::Space => Category::Space,
        K::Delete | K::BackSpace => Category::Delete,
        K::Up
        | K::Down
        | K::Left
        | K::Right
        | K::ControlL
        | K::ControlR
        | K::ShiftL
        | K::ShiftR
        | K::AltL
        | K::AltR
        | K::Tab
        | K::CapsLock
        | K::Function(1..=12)
        | K::SuperL
        | K::SuperR
        | K::Escape => Category::ModifierOrNav,
        k if k.is_extended() => Category::ModifierOrNav,
        K::PageUp | K::PageDown | K::Home | K::End => Category::PageJump,
        _ => Category::GenericKey,
    }
}

/// Reactive handler owning the consecutive keystroke counter.
pub struct Dispatcher<P> {
    player: P,
    bell: BellConfig,
    consecutive_count: u32,
}

impl<P: Player> Dispatcher<P> {
    pub fn new(player: P, bell: BellConfig) -> Self {
        Self {
            player,
            bell,
            consecutive_count: 0,
        }
    }

    pub fn consecutive_count(&self) -> u32 {
        self.consecutive_count
    }

    /// Handles one key transition, returning the category that was played.
    pub fn handle(&mut self, event: KeyEvent) -> Option<Category> {
        if event.transition != Transition::Press {
            return None;
        }

        let category = classify(event.identity);
        match category {
            Category::Enter => self.consecutive_count = 0,
            Category::Space | Category::GenericKey => self.consecutive_count += 1,
            Category::Delete => {
                self.consecutive_count = self.consecutive_count.saturating_sub(1);
            }
            Category::ModifierOrNav | Category::PageJump => {}
        }
        self.player.trigger(category);
        trace!(
            "{} -> {:?} (count {})",
            event.identity, category, self.consecutive_count
        );

        if self.bell.threshold > 0 && self.consecutive_count == self.bell.threshold {
            if self.bell.play_at_threshold {
                self.player.play(Sample::Bell);
            }
            debug!("Bell threshold {} reached", self.bell.threshold);
            self.consecutive_count = 0;
        }
        Some(category)
    }
}
