//! [`Announcer`] – speaks each segment once.
//!
//! The session re-renders on every step, but speech must only fire when the
//! traveler reaches a new segment of a route (or a new route).  The
//! announcer remembers the last `(route generation, segment)` key and lets
//! text through only when the key changes.

use wayfinder_guidance::Language;

/// Position a spoken line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Spot {
    Segment(usize),
    Arrived,
}

#[derive(Debug, Clone)]
pub struct Announcer {
    last: Option<(u64, Spot)>,
    enabled: bool,
    language: Language,
}

impl Announcer {
    pub fn new(enabled: bool, language: Language) -> Self {
        Self {
            last: None,
            enabled,
            language,
        }
    }

    /// Record that the traveler is at `spot` of route `generation`.
    ///
    /// Returns `true` when this is a new key and voice is on.  The key is
    /// remembered even while muted, so unmuting does not replay it.
    pub fn should_speak(&mut self, generation: u64, spot: Spot) -> bool {
        let key = (generation, spot);
        if self.last == Some(key) {
            return false;
        }
        self.last = Some(key);
        self.enabled
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    /// Forget the last key so the current spot is announced again.
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_key_speaks_once() {
        let mut a = Announcer::new(true, Language::EnglishUs);
        assert!(a.should_speak(1, Spot::Segment(0)));
        assert!(!a.should_speak(1, Spot::Segment(0)));
        assert!(a.should_speak(1, Spot::Segment(1)));
        assert!(a.should_speak(1, Spot::Arrived));
        assert!(!a.should_speak(1, Spot::Arrived));
    }

    #[test]
    fn new_generation_repeats_segment_zero() {
        let mut a = Announcer::new(true, Language::EnglishUs);
        assert!(a.should_speak(1, Spot::Segment(0)));
        assert!(a.should_speak(2, Spot::Segment(0)));
    }

    #[test]
    fn muted_keys_are_not_replayed() {
        let mut a = Announcer::new(false, Language::HindiIn);
        assert!(!a.should_speak(1, Spot::Segment(0)));
        a.set_enabled(true);
        assert!(!a.should_speak(1, Spot::Segment(0)));
        assert!(a.should_speak(1, Spot::Segment(1)));
        assert_eq!(a.language(), Language::HindiIn);
    }

    #[test]
    fn reset_replays_current_key() {
        let mut a = Announcer::new(true, Language::EnglishUs);
        assert!(a.should_speak(3, Spot::Segment(2)));
        a.reset();
        assert!(a.should_speak(3, Spot::Segment(2)));
    }
}
