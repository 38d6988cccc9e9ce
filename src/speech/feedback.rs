use crate::speech::types::{PronunciationResult, PronunciationTier};

fn owned(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|s| s.to_string()).collect()
}

/// Feedback line and practice suggestions for one word.
pub fn word_feedback(
    tier: PronunciationTier,
    confidence: f64,
    low_confidence_threshold: f64,
) -> (String, Vec<String>) {
    let (feedback, mut suggestions) = match tier {
        PronunciationTier::Perfect => ("Excellent! Perfect pronunciation!", Vec::new()),
        PronunciationTier::Good => (
            "Great! Your pronunciation is very good!",
            owned(&["Try saying it a little more clearly"]),
        ),
        PronunciationTier::Fair => (
            "Pretty good! Let's try again a bit slower",
            owned(&[
                "Say the word more slowly",
                "Pay attention to every syllable",
                "Listen to the example again",
            ]),
        ),
        PronunciationTier::NeedsPractice => (
            "Not quite yet, but don't give up! Try again",
            owned(&[
                "Listen to the correct pronunciation",
                "Break the word into syllables",
                "Practice one syllable first",
                "Ask an older sibling or a parent for help",
            ]),
        ),
        PronunciationTier::TryAgain => (
            "Let's try again! Listen carefully to the example",
            owned(&[
                "Listen to the example several times",
                "Copy the pronunciation exactly like the example",
                "Start with an easier word first",
                "Take a short break and then try again",
            ]),
        ),
    };

    if confidence < low_confidence_threshold {
        suggestions.push("Try speaking louder and more clearly".to_string());
        suggestions.push("Make sure there is no background noise around you".to_string());
    }

    (feedback.to_string(), suggestions)
}

/// Zero-score placeholder for a target word with no spoken counterpart.
pub fn unspoken(target_word: &str) -> PronunciationResult {
    PronunciationResult {
        spoken_word: String::new(),
        target_word: target_word.to_string(),
        similarity_score: 0.0,
        phonetic_accuracy: 0.0,
        confidence: 0.0,
        tier: PronunciationTier::TryAgain,
        feedback: format!("'{target_word}' has not been said yet"),
        suggestions: owned(&["Try saying this word too"]),
    }
}

/// Summary line and recommendations for a whole utterance.
pub fn overall_feedback(
    tier: PronunciationTier,
    spoken_count: usize,
    target_count: usize,
) -> (String, Vec<String>) {
    let (feedback, mut recommendations) = match tier {
        PronunciationTier::Perfect => (
            "Amazing! Your pronunciation is perfect!",
            owned(&["Try some harder words"]),
        ),
        PronunciationTier::Good => (
            "Very good! Your pronunciation is great!",
            owned(&["Keep practicing regularly"]),
        ),
        PronunciationTier::Fair => (
            "Pretty good! There is still a little to improve",
            owned(&[
                "Practice the words that are still hard",
                "Listen to the examples more often",
                "Practice 10-15 minutes every day",
            ]),
        ),
        PronunciationTier::NeedsPractice => (
            "You need more practice, but you are doing well!",
            owned(&[
                "Start with easier words",
                "Practice patiently",
                "Ask a parent or teacher for help",
            ]),
        ),
        PronunciationTier::TryAgain => (
            "Keep going! Let's learn step by step",
            owned(&[
                "Start with very easy words",
                "Listen to the examples several times",
                "Don't rush",
            ]),
        ),
    };

    if spoken_count < target_count {
        recommendations.push("Try saying all the requested words".to_string());
    } else if spoken_count > target_count {
        recommendations.push("Focus only on the requested words".to_string());
    }

    (feedback.to_string(), recommendations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_has_no_suggestions() {
        let (_, suggestions) = word_feedback(PronunciationTier::Perfect, 0.95, 0.6);
        assert!(suggestions.is_empty());
    }

    #[test]
    fn low_confidence_adds_audio_tips() {
        let (_, suggestions) = word_feedback(PronunciationTier::Perfect, 0.3, 0.6);
        assert_eq!(suggestions.len(), 2);
        let (_, suggestions) = word_feedback(PronunciationTier::Good, 0.59, 0.6);
        assert_eq!(suggestions.len(), 3);
    }

    #[test]
    fn count_mismatch_hints() {
        let (_, fewer) = overall_feedback(PronunciationTier::Good, 1, 3);
        assert_eq!(fewer.last().map(String::as_str), Some("Try saying all the requested words"));
        let (_, more) = overall_feedback(PronunciationTier::Good, 4, 3);
        assert_eq!(more.last().map(String::as_str), Some("Focus only on the requested words"));
        let (_, equal) = overall_feedback(PronunciationTier::Good, 3, 3);
        assert_eq!(equal.len(), 1);
    }

    #[test]
    fn unspoken_word_scores_zero() {
        let result = unspoken("bola");
        assert!(!result.is_spoken());
        assert_eq!(result.phonetic_accuracy, 0.0);
        assert!(result.feedback.contains("bola"));
    }
}
