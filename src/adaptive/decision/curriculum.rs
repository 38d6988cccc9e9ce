use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::adaptive::config::SamplerParams;
use crate::adaptive::types::{DifficultyLevel, UserProfile};
use crate::adaptive::vocabulary::{Vocabulary, FALLBACK_WORDS};
use crate::error::EngineError;

/// Picks the next practice words: a few weak words for review, the rest new.
pub struct CurriculumSampler<R = ChaCha8Rng> {
    vocabulary: Vocabulary,
    review_divisor: usize,
    rng: R,
}

impl CurriculumSampler<ChaCha8Rng> {
    /// Seeded when `params.seed` is set, otherwise seeded from OS entropy.
    pub fn new(vocabulary: Vocabulary, params: &SamplerParams) -> Self {
        let rng = match params.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self::with_rng(vocabulary, params.review_divisor, rng)
    }
}

impl<R: Rng> CurriculumSampler<R> {
    pub fn with_rng(vocabulary: Vocabulary, review_divisor: usize, rng: R) -> Self {
        Self {
            vocabulary,
            review_divisor: review_divisor.max(1),
            rng,
        }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Never fails: an unusable vocabulary yields the fixed starter words.
    pub fn select_next_words(
        &mut self,
        profile: &UserProfile,
        level: DifficultyLevel,
        count: usize,
    ) -> Vec<String> {
        self.try_select_next_words(profile, level, count)
            .unwrap_or_else(|err| {
                tracing::warn!(
                    error = %err,
                    user_id = %profile.user_id,
                    level = level.as_str(),
                    "word selection failed, using fallback words"
                );
                fallback_words(count)
            })
    }

    pub fn try_select_next_words(
        &mut self,
        profile: &UserProfile,
        level: DifficultyLevel,
        count: usize,
    ) -> Result<Vec<String>, EngineError> {
        let universe = self.vocabulary.words_for(level);
        if universe.is_empty() {
            return Err(EngineError::EmptyVocabulary(level.as_str()));
        }

        let strengths: HashSet<&str> = profile.strengths.iter().map(String::as_str).collect();
        let weaknesses: HashSet<&str> = profile.weaknesses.iter().map(String::as_str).collect();

        let candidates: Vec<&String> = universe
            .iter()
            .filter(|w| !strengths.contains(w.as_str()))
            .collect();
        let review: Vec<&String> = candidates
            .iter()
            .copied()
            .filter(|w| weaknesses.contains(w.as_str()))
            .collect();

        let review_quota = (count / self.review_divisor).max(1).min(review.len());
        let mut selected: Vec<String> = review
            .choose_multiple(&mut self.rng, review_quota)
            .map(|w| (*w).clone())
            .collect();

        // Leftover weak words stay in the fill pool; mastered words only come back below.
        let picked: HashSet<String> = selected.iter().cloned().collect();
        let fill: Vec<&String> = candidates
            .iter()
            .copied()
            .filter(|w| !picked.contains(*w))
            .collect();
        let needed = count.saturating_sub(selected.len());
        selected.extend(fill.choose_multiple(&mut self.rng, needed).map(|w| (*w).clone()));

        // Not enough unmastered words: top up from the whole level.
        let needed = count.saturating_sub(selected.len());
        if needed > 0 {
            let picked: HashSet<String> = selected.iter().cloned().collect();
            let rest: Vec<&String> = universe.iter().filter(|w| !picked.contains(*w)).collect();
            selected.extend(rest.choose_multiple(&mut self.rng, needed).map(|w| (*w).clone()));
        }

        selected.truncate(count);
        Ok(selected)
    }
}

pub fn fallback_words(count: usize) -> Vec<String> {
    FALLBACK_WORDS
        .iter()
        .take(count)
        .map(|w| w.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_vocabulary(words: &[&str]) -> Vocabulary {
        Vocabulary::empty().with_level(
            DifficultyLevel::Easy,
            vec![("basics".to_string(), words.iter().map(|w| w.to_string()).collect())],
        )
    }

    fn sampler(vocabulary: Vocabulary, seed: u64) -> CurriculumSampler {
        CurriculumSampler::with_rng(vocabulary, 3, ChaCha8Rng::seed_from_u64(seed))
    }

    #[test]
    fn mastered_words_are_skipped_while_others_remain() {
        let mut profile = UserProfile::for_new_user("kid", 7);
        profile.strengths = vec!["mama".to_string()];

        for seed in 0..20 {
            let mut s = sampler(tiny_vocabulary(&["mama", "papa", "air"]), seed);
            let words = s.select_next_words(&profile, DifficultyLevel::Easy, 2);
            assert_eq!(words.len(), 2);
            assert!(!words.contains(&"mama".to_string()));
        }
    }

    #[test]
    fn leftover_weak_words_come_before_mastered_ones() {
        let mut profile = UserProfile::for_new_user("kid", 7);
        profile.strengths = vec!["mama".to_string()];
        profile.weaknesses = vec!["papa".to_string(), "air".to_string()];

        for seed in 0..100 {
            let mut s = sampler(tiny_vocabulary(&["mama", "papa", "air"]), seed);
            let mut words = s.select_next_words(&profile, DifficultyLevel::Easy, 2);
            words.sort();
            assert_eq!(words, vec!["air", "papa"], "seed {seed}");
        }
    }

    #[test]
    fn no_duplicates_and_at_most_count() {
        let mut profile = UserProfile::for_new_user("kid", 7);
        profile.weaknesses = vec!["sekolah".to_string(), "guru".to_string()];
        profile.strengths = vec!["buku".to_string()];

        let mut s = sampler(Vocabulary::builtin(), 42);
        for count in [0, 1, 3, 5, 12, 40] {
            let words = s.select_next_words(&profile, DifficultyLevel::Easy, count);
            assert!(words.len() <= count);
            let unique: HashSet<_> = words.iter().collect();
            assert_eq!(unique.len(), words.len());
        }
    }

    #[test]
    fn includes_a_weak_word_for_review() {
        let mut profile = UserProfile::for_new_user("kid", 7);
        profile.weaknesses = vec!["meja".to_string()];

        for seed in 0..20 {
            let mut s = sampler(Vocabulary::builtin(), seed);
            let words = s.select_next_words(&profile, DifficultyLevel::Easy, 3);
            assert!(words.contains(&"meja".to_string()));
        }
    }

    #[test]
    fn tops_up_from_mastered_words_when_short() {
        let mut profile = UserProfile::for_new_user("kid", 7);
        profile.strengths = vec!["mama".to_string(), "papa".to_string()];

        let mut s = sampler(tiny_vocabulary(&["mama", "papa", "air"]), 1);
        let mut words = s.select_next_words(&profile, DifficultyLevel::Easy, 5);
        words.sort();
        assert_eq!(words, vec!["air", "mama", "papa"]);
    }

    #[test]
    fn empty_vocabulary_uses_fallback() {
        let profile = UserProfile::for_new_user("kid", 7);
        let mut s = sampler(Vocabulary::empty(), 3);
        assert_eq!(
            s.select_next_words(&profile, DifficultyLevel::Medium, 3),
            vec!["mama", "papa", "air"]
        );
        assert!(matches!(
            s.try_select_next_words(&profile, DifficultyLevel::Medium, 3),
            Err(EngineError::EmptyVocabulary(_))
        ));
    }

    #[test]
    fn same_seed_same_words() {
        let profile = UserProfile::for_new_user("kid", 7);
        let a = sampler(Vocabulary::builtin(), 9).select_next_words(&profile, DifficultyLevel::Hard, 5);
        let b = sampler(Vocabulary::builtin(), 9).select_next_words(&profile, DifficultyLevel::Hard, 5);
        assert_eq!(a, b);
    }
}
