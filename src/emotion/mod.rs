// src/emotion/mod.rs
// Emotion labels plus the pure keyword heuristics the pipeline falls back on.

pub mod classifier;

pub use classifier::EmotionClassifier;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The five affect labels a chat turn can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmotionLabel {
    Happy,
    Sad,
    Angry,
    Worried,
    Neutral,
}

impl EmotionLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmotionLabel::Happy => "happy",
            EmotionLabel::Sad => "sad",
            EmotionLabel::Angry => "angry",
            EmotionLabel::Worried => "worried",
            EmotionLabel::Neutral => "neutral",
        }
    }

    /// All valid labels
    pub fn all() -> Vec<EmotionLabel> {
        vec![
            EmotionLabel::Happy,
            EmotionLabel::Sad,
            EmotionLabel::Angry,
            EmotionLabel::Worried,
            EmotionLabel::Neutral,
        ]
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EmotionLabel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "happy" => Ok(EmotionLabel::Happy),
            "sad" => Ok(EmotionLabel::Sad),
            "angry" => Ok(EmotionLabel::Angry),
            "worried" => Ok(EmotionLabel::Worried),
            "neutral" => Ok(EmotionLabel::Neutral),
            _ => Err(anyhow::anyhow!("Unknown emotion label: {}", s)),
        }
    }
}

/// Keyword rules for the fallback detector, checked in priority order.
/// The first list with any matching substring wins.
const FALLBACK_RULES: [(EmotionLabel, &[&str]); 5] = [
    (
        EmotionLabel::Angry,
        &["angry", "frustrated", "mad", "annoyed", "irritated", "pissed"],
    ),
    (
        EmotionLabel::Sad,
        &["sad", "depressed", "upset", "down", "lonely", "miserable"],
    ),
    (
        EmotionLabel::Worried,
        &["worried", "anxious", "concern", "nervous", "stressed", "scared"],
    ),
    (
        EmotionLabel::Happy,
        &["happy", "joy", "excited", "great", "excellent", "good"],
    ),
    (
        EmotionLabel::Neutral,
        &["think", "consider", "maybe", "perhaps", "wonder", "know", "tell"],
    ),
];

/// Substring-based emotion detection. Intentionally coarse; used whenever the
/// sentiment model is unavailable. Always returns a valid label.
pub fn fallback_emotion(text: &str) -> EmotionLabel {
    let text_lower = text.to_lowercase();
    for (label, keywords) in FALLBACK_RULES {
        if keywords.iter().any(|word| text_lower.contains(word)) {
            return label;
        }
    }
    EmotionLabel::Neutral
}

/// Coarse mood reading of a message, rendered into the prompt block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mood {
    Positive,
    Negative,
    Neutral,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Positive => "positive",
            Mood::Negative => "negative",
            Mood::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Coarse stress reading of a message, rendered into the prompt block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StressLevel {
    Low,
    Moderate,
    High,
}

impl StressLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            StressLevel::Low => "low",
            StressLevel::Moderate => "moderate",
            StressLevel::High => "high",
        }
    }
}

impl fmt::Display for StressLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

const POSITIVE_WORDS: &[&str] = &["happy", "joyful", "good", "great", "relaxed", "content"];
const NEGATIVE_WORDS: &[&str] = &["sad", "angry", "bad", "upset", "miserable", "frustrated"];
const STRESS_WORDS_HIGH: &[&str] = &["overwhelmed", "stressed", "panic", "anxious", "nervous"];
const STRESS_WORDS_MODERATE: &[&str] = &["concerned", "worried", "tense", "pressured"];

/// Keyword scan for mood and stress level. Pure, never fails.
pub fn analyze_mood_and_stress(text: &str) -> (Mood, StressLevel) {
    let text_lower = text.to_lowercase();

    let mood = if POSITIVE_WORDS.iter().any(|w| text_lower.contains(w)) {
        Mood::Positive
    } else if NEGATIVE_WORDS.iter().any(|w| text_lower.contains(w)) {
        Mood::Negative
    } else {
        Mood::Neutral
    };

    let stress = if STRESS_WORDS_HIGH.iter().any(|w| text_lower.contains(w)) {
        StressLevel::High
    } else if STRESS_WORDS_MODERATE.iter().any(|w| text_lower.contains(w)) {
        StressLevel::Moderate
    } else {
        StressLevel::Low
    };

    (mood, stress)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ============================================================================
    // EmotionLabel tests
    // ============================================================================

    #[test]
    fn test_label_round_trip() {
        for label in EmotionLabel::all() {
            let parsed: EmotionLabel = label.as_str().parse().unwrap();
            assert_eq!(parsed, label);
        }
    }

    #[test]
    fn test_label_parse_rejects_unknown() {
        assert!("melancholy".parse::<EmotionLabel>().is_err());
    }

    #[test]
    fn test_label_serde_lowercase() {
        let json = serde_json::to_string(&EmotionLabel::Worried).unwrap();
        assert_eq!(json, "\"worried\"");
        let back: EmotionLabel = serde_json::from_str("\"angry\"").unwrap();
        assert_eq!(back, EmotionLabel::Angry);
    }

    // ============================================================================
    // Fallback detector tests
    // ============================================================================

    #[test]
    fn test_fallback_matches_each_label() {
        assert_eq!(fallback_emotion("I'm so frustrated with this"), EmotionLabel::Angry);
        assert_eq!(fallback_emotion("feeling really lonely tonight"), EmotionLabel::Sad);
        assert_eq!(fallback_emotion("I'm anxious about tomorrow"), EmotionLabel::Worried);
        assert_eq!(fallback_emotion("today was excellent"), EmotionLabel::Happy);
        assert_eq!(fallback_emotion("let me think about it"), EmotionLabel::Neutral);
    }

    #[test]
    fn test_fallback_priority_order() {
        // "mad" (angry) outranks "sad" even though both match
        assert_eq!(fallback_emotion("I'm mad and sad"), EmotionLabel::Angry);
        // "sad" outranks "worried"
        assert_eq!(fallback_emotion("sad and worried"), EmotionLabel::Sad);
    }

    #[test]
    fn test_fallback_defaults_to_neutral() {
        assert_eq!(fallback_emotion("zzz"), EmotionLabel::Neutral);
        assert_eq!(fallback_emotion(""), EmotionLabel::Neutral);
    }

    // ============================================================================
    // Mood/stress analyzer tests
    // ============================================================================

    #[test]
    fn test_mood_and_stress_detection() {
        let (mood, stress) = analyze_mood_and_stress("I feel great but a bit nervous");
        assert_eq!(mood, Mood::Positive);
        assert_eq!(stress, StressLevel::High);

        let (mood, stress) = analyze_mood_and_stress("I'm upset and worried about rent");
        assert_eq!(mood, Mood::Negative);
        assert_eq!(stress, StressLevel::Moderate);

        let (mood, stress) = analyze_mood_and_stress("nothing much to report");
        assert_eq!(mood, Mood::Neutral);
        assert_eq!(stress, StressLevel::Low);
    }
}
