//! Spoken and on-screen phrases per language.
//!
//! Detailed turn-by-turn instructions are generated in English only.  Other
//! languages speak a generic "proceed" phrase for every segment and a
//! localized arrival message.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Supported interface languages, identified by BCP-47 tag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Language {
    #[default]
    EnglishUs,
    TeluguIn,
    HindiIn,
}

/// Phrase keys with a translation in every [`Language`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phrase {
    Follow,
    Arrived,
    Step,
    VoiceEnabled,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::EnglishUs, Language::TeluguIn, Language::HindiIn];

    /// Resolve a tag: exact match first, then primary subtag (`"te"`), else
    /// English.
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.trim();
        if let Some(lang) = Self::ALL.iter().find(|l| l.tag().eq_ignore_ascii_case(tag)) {
            return *lang;
        }
        let primary = tag.split(['-', '_']).next().unwrap_or_default();
        Self::ALL
            .iter()
            .find(|l| l.tag().split('-').next().is_some_and(|p| p.eq_ignore_ascii_case(primary)))
            .copied()
            .unwrap_or_default()
    }

    pub fn tag(self) -> &'static str {
        match self {
            Language::EnglishUs => "en-US",
            Language::TeluguIn => "te-IN",
            Language::HindiIn => "hi-IN",
        }
    }

    pub fn is_english(self) -> bool {
        self == Language::EnglishUs
    }

    pub fn phrase(self, phrase: Phrase) -> &'static str {
        use Phrase::*;
        match (self, phrase) {
            (Language::EnglishUs, Follow) => "Proceed to next waypoint.",
            (Language::EnglishUs, Arrived) => "You have arrived at your destination.",
            (Language::EnglishUs, Step) => "Step",
            (Language::TeluguIn, Follow) => "తదుపరి పాయింట్‌కి వెళ్లండి.",
            (Language::TeluguIn, Arrived) => "మీరు మీ గమ్యాన్ని చేరుకున్నారు.",
            (Language::TeluguIn, Step) => "దశ",
            (Language::HindiIn, Follow) => "अगले पड़ाव की ओर बढ़ें।",
            (Language::HindiIn, Arrived) => "आप अपने गंतव्य पर पहुंच गए हैं।",
            (Language::HindiIn, Step) => "चरण",
            (_, VoiceEnabled) => "Voice enabled",
        }
    }

    /// What to say for a segment: the detailed instruction in English when
    /// one exists, the generic phrase otherwise.
    pub fn segment_text(self, instruction: Option<&str>) -> String {
        match instruction {
            Some(text) if self.is_english() && !text.is_empty() => text.to_string(),
            _ => self.phrase(Phrase::Follow).to_string(),
        }
    }

    /// Progress line shown under the instruction.
    ///
    /// `segment` is `None` once arrived.
    pub fn progress_label(self, segment: Option<usize>, segments: usize, distance_m: f32) -> String {
        match segment {
            Some(i) => format!(
                "{} {} / {} | Distance: {}m",
                self.phrase(Phrase::Step),
                i + 1,
                segments,
                distance_m
            ),
            None => format!("Total distance: {distance_m}m"),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl From<String> for Language {
    fn from(tag: String) -> Self {
        Language::from_tag(&tag)
    }
}

impl From<Language> for String {
    fn from(lang: Language) -> Self {
        lang.tag().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_resolve_exact_partial_and_fallback() {
        assert_eq!(Language::from_tag("te-IN"), Language::TeluguIn);
        assert_eq!(Language::from_tag("hi-in"), Language::HindiIn);
        assert_eq!(Language::from_tag("te"), Language::TeluguIn);
        assert_eq!(Language::from_tag("en-GB"), Language::EnglishUs);
        assert_eq!(Language::from_tag("fr-FR"), Language::EnglishUs);
        assert_eq!(Language::from_tag(""), Language::EnglishUs);
    }

    #[test]
    fn only_english_speaks_detailed_instructions() {
        let text = "Exit C201 and enter the corridor.";
        assert_eq!(Language::EnglishUs.segment_text(Some(text)), text);
        assert_eq!(Language::EnglishUs.segment_text(None), "Proceed to next waypoint.");
        assert_eq!(
            Language::HindiIn.segment_text(Some(text)),
            Language::HindiIn.phrase(Phrase::Follow)
        );
    }

    #[test]
    fn arrival_is_localized_everywhere() {
        let phrases: Vec<_> = Language::ALL.iter().map(|l| l.phrase(Phrase::Arrived)).collect();
        assert_eq!(phrases.len(), 3);
        assert!(phrases[0] != phrases[1] && phrases[1] != phrases[2]);
    }

    #[test]
    fn progress_labels() {
        assert_eq!(
            Language::EnglishUs.progress_label(Some(0), 2, 10.0),
            "Step 1 / 2 | Distance: 10m"
        );
        assert_eq!(Language::TeluguIn.progress_label(None, 2, 12.5), "Total distance: 12.5m");
    }

    #[test]
    fn serde_uses_tags() {
        let json = serde_json::to_string(&Language::HindiIn).unwrap();
        assert_eq!(json, "\"hi-IN\"");
        let back: Language = serde_json::from_str("\"xx\"").unwrap();
        assert_eq!(back, Language::EnglishUs);
    }
}
