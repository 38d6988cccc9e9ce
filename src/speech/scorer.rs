use crate::adaptive::modeling::trend;
use crate::sanitize::clamp_unit;
use crate::speech::config::ScoringConfig;
use crate::speech::feedback::{overall_feedback, unspoken, word_feedback};
use crate::speech::normalize::normalize_text;
use crate::speech::phonetic::apply_rules;
use crate::speech::similarity::sequence_ratio;
use crate::speech::types::{PronunciationResult, PronunciationTier, SpeechAnalysis, Transcription};

/// Scores spoken words against targets by string similarity.
#[derive(Debug, Clone, Default)]
pub struct PronunciationScorer {
    config: ScoringConfig,
}

impl PronunciationScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Best of the literal and phonetically folded ratios, in `[0, 1]`.
    pub fn word_similarity(&self, spoken: &str, target: &str) -> f64 {
        let spoken = normalize_text(spoken);
        let target = normalize_text(target);

        let literal = sequence_ratio(&spoken, &target);
        let phonetic = sequence_ratio(
            &apply_rules(&spoken, &self.config.phonetic_rules),
            &apply_rules(&target, &self.config.phonetic_rules),
        );
        literal.max(phonetic)
    }

    pub fn score_word(&self, spoken: &str, target: &str, confidence: f64) -> PronunciationResult {
        let confidence = clamp_unit(confidence);
        let similarity_score = self.word_similarity(spoken, target);
        let phonetic_accuracy = clamp_unit(
            similarity_score * self.config.similarity_weight
                + confidence * self.config.confidence_weight,
        );

        let tier = PronunciationTier::from_score(similarity_score);
        let (feedback, suggestions) =
            word_feedback(tier, confidence, self.config.low_confidence_threshold);

        PronunciationResult {
            spoken_word: spoken.to_string(),
            target_word: target.to_string(),
            similarity_score,
            phonetic_accuracy,
            confidence,
            tier,
            feedback,
            suggestions,
        }
    }

    /// Aligns targets to spoken words by position.
    ///
    /// Words are normalized first and empty ones dropped, so each keeps the
    /// confidence given at its original position. A missing confidence falls
    /// back to the mean of the ones given.
    pub fn analyze_utterance(
        &self,
        transcript_words: &[String],
        target_words: &[String],
        confidences: &[f64],
    ) -> SpeechAnalysis {
        let overall_confidence = trend::mean(confidences).map(clamp_unit).unwrap_or(0.0);
        let (spoken, spoken_confidences): (Vec<String>, Vec<f64>) = transcript_words
            .iter()
            .enumerate()
            .flat_map(|(i, word)| {
                let confidence = confidences.get(i).copied().unwrap_or(overall_confidence);
                normalize_text(word)
                    .split_whitespace()
                    .map(|w| (w.to_string(), confidence))
                    .collect::<Vec<_>>()
            })
            .unzip();

        self.analyze_words(
            spoken.join(" "),
            overall_confidence,
            &spoken,
            target_words,
            |i| spoken_confidences[i],
        )
    }

    /// Scores a recognizer result. Per-word confidence comes from the first
    /// case-insensitive match in the recognizer's word list, else the
    /// transcript-level confidence.
    pub fn analyze_transcription(
        &self,
        transcription: &Transcription,
        target_words: &[String],
    ) -> SpeechAnalysis {
        let spoken: Vec<String> = normalize_text(&transcription.transcript)
            .split_whitespace()
            .map(str::to_string)
            .collect();

        let word_confidence = |i: usize| {
            let word = &spoken[i];
            transcription
                .words
                .iter()
                .find(|w| normalize_text(&w.word) == *word)
                .map(|w| w.confidence)
                .unwrap_or(transcription.confidence)
        };

        self.analyze_words(
            transcription.transcript.clone(),
            clamp_unit(transcription.confidence),
            &spoken,
            target_words,
            word_confidence,
        )
    }

    fn analyze_words<F>(
        &self,
        transcript: String,
        confidence: f64,
        spoken: &[String],
        targets: &[String],
        confidence_at: F,
    ) -> SpeechAnalysis
    where
        F: Fn(usize) -> f64,
    {
        let results: Vec<PronunciationResult> = targets
            .iter()
            .enumerate()
            .map(|(i, target)| match spoken.get(i) {
                Some(word) => self.score_word(word, target, confidence_at(i)),
                None => unspoken(target),
            })
            .collect();

        let overall_score = if targets.is_empty() {
            0.0
        } else {
            results.iter().map(|r| r.phonetic_accuracy).sum::<f64>() / targets.len() as f64
        };

        let tier = PronunciationTier::from_score(overall_score);
        let (feedback, recommendations) = overall_feedback(tier, spoken.len(), targets.len());

        tracing::debug!(
            targets = targets.len(),
            spoken = spoken.len(),
            overall_score,
            tier = tier.as_str(),
            "utterance analyzed"
        );

        SpeechAnalysis {
            transcript,
            confidence,
            results,
            overall_score,
            tier,
            feedback,
            recommendations,
        }
    }
}
