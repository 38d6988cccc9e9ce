use serde::{Deserialize, Serialize};

use crate::adaptive::types::Attempt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PronunciationTier {
    Perfect,
    Good,
    Fair,
    NeedsPractice,
    TryAgain,
}

impl PronunciationTier {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.9 {
            Self::Perfect
        } else if score >= 0.8 {
            Self::Good
        } else if score >= 0.6 {
            Self::Fair
        } else if score >= 0.4 {
            Self::NeedsPractice
        } else {
            Self::TryAgain
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Perfect => "perfect",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::NeedsPractice => "needs_practice",
            Self::TryAgain => "try_again",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PronunciationResult {
    /// Empty when the child never reached this word.
    pub spoken_word: String,
    pub target_word: String,
    pub similarity_score: f64,
    pub phonetic_accuracy: f64,
    pub confidence: f64,
    pub tier: PronunciationTier,
    pub feedback: String,
    pub suggestions: Vec<String>,
}

impl PronunciationResult {
    pub fn is_spoken(&self) -> bool {
        !self.spoken_word.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechAnalysis {
    pub transcript: String,
    pub confidence: f64,
    pub results: Vec<PronunciationResult>,
    pub overall_score: f64,
    pub tier: PronunciationTier,
    pub feedback: String,
    pub recommendations: Vec<String>,
}

impl SpeechAnalysis {
    /// The recognizer heard nothing usable.
    pub fn no_speech() -> Self {
        Self {
            transcript: String::new(),
            confidence: 0.0,
            results: Vec::new(),
            overall_score: 0.0,
            tier: PronunciationTier::TryAgain,
            feedback: "Sorry, we couldn't hear you. Please try again!".to_string(),
            recommendations: vec![
                "Make sure the microphone is working".to_string(),
                "Speak louder and more clearly".to_string(),
                "Reduce the background noise around you".to_string(),
            ],
        }
    }

    /// Scored attempts for the session log. Unspoken words are skipped.
    pub fn attempts(&self) -> Vec<Attempt> {
        self.results
            .iter()
            .filter(|r| r.is_spoken())
            .map(|r| {
                Attempt::new(
                    r.target_word.clone(),
                    r.spoken_word.clone(),
                    r.confidence,
                    r.phonetic_accuracy,
                )
            })
            .collect()
    }
}

/// Recognizer output for one recording.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transcription {
    pub transcript: String,
    pub confidence: f64,
    #[serde(default)]
    pub words: Vec<WordConfidence>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordConfidence {
    pub word: String,
    pub confidence: f64,
}
