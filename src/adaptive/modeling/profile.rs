use std::collections::HashMap;

use chrono::Utc;

use crate::adaptive::config::ProfileParams;
use crate::adaptive::modeling::trend;
use crate::adaptive::types::{LearningStyle, Session, UserProfile};
use crate::error::EngineError;
use crate::sanitize::has_invalid_values;

/// Folds the recent session window into a child's persistent profile.
#[derive(Debug, Clone, Default)]
pub struct ProfileAggregator {
    params: ProfileParams,
}

impl ProfileAggregator {
    pub fn new(params: ProfileParams) -> Self {
        Self { params }
    }

    /// Returns the updated profile, or an unmodified copy of `profile` when
    /// there is nothing to learn from or the history is unusable.
    pub fn aggregate(&self, profile: &UserProfile, sessions: &[Session]) -> UserProfile {
        match self.try_aggregate(profile, sessions) {
            Ok(updated) => updated,
            Err(EngineError::EmptyHistory) => profile.clone(),
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    user_id = %profile.user_id,
                    "profile aggregation failed, keeping previous profile"
                );
                profile.clone()
            }
        }
    }

    pub fn try_aggregate(
        &self,
        profile: &UserProfile,
        sessions: &[Session],
    ) -> Result<UserProfile, EngineError> {
        if sessions.is_empty() {
            return Err(EngineError::EmptyHistory);
        }

        let window = tail(sessions, self.params.history_window.max(1));

        let durations: Vec<f64> = window.iter().map(|s| s.duration_minutes).collect();
        if has_invalid_values(&durations) {
            return Err(EngineError::NonFiniteValue("session durations"));
        }

        let word_scores = collect_word_scores(window);
        if word_scores.iter().any(|(_, scores)| has_invalid_values(scores)) {
            return Err(EngineError::NonFiniteValue("attempt scores"));
        }

        let engagement: Vec<f64> = tail(sessions, self.params.style_window.max(1))
            .iter()
            .map(|s| s.engagement_level)
            .collect();
        let avg_engagement =
            trend::mean(&engagement).ok_or(EngineError::EmptyHistory)?;
        if !avg_engagement.is_finite() {
            return Err(EngineError::NonFiniteValue("engagement levels"));
        }

        let mut updated = profile.clone();
        updated.attention_span = trend::mean(&durations).unwrap_or(profile.attention_span);
        if let Some(last) = window.last() {
            updated.current_level = last.difficulty_level;
        }

        for (word, scores) in &word_scores {
            let Some(avg) = trend::mean(scores) else {
                continue;
            };
            if avg >= self.params.mastery_threshold {
                promote(&mut updated.strengths, &mut updated.weaknesses, word);
            } else if avg <= self.params.weakness_threshold {
                promote(&mut updated.weaknesses, &mut updated.strengths, word);
            } else {
                updated.strengths.retain(|w| w != word);
                updated.weaknesses.retain(|w| w != word);
            }
        }
        keep_most_recent(&mut updated.strengths, self.params.max_listed_words);
        keep_most_recent(&mut updated.weaknesses, self.params.max_listed_words);

        // One-way: low engagement moves the child to the generic activity set,
        // high engagement keeps whatever style is already there.
        if avg_engagement < self.params.engaged_threshold
            && updated.learning_style != LearningStyle::Mixed
        {
            tracing::debug!(
                user_id = %profile.user_id,
                from = profile.learning_style.as_str(),
                avg_engagement,
                "switching learning style to mixed"
            );
            updated.learning_style = LearningStyle::Mixed;
        }

        updated.last_updated = Utc::now();
        Ok(updated)
    }
}

fn tail<T>(items: &[T], n: usize) -> &[T] {
    &items[items.len().saturating_sub(n)..]
}

/// Per-word score lists, words in order of first appearance.
fn collect_word_scores(sessions: &[Session]) -> Vec<(String, Vec<f64>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut out: Vec<(String, Vec<f64>)> = Vec::new();

    for attempt in sessions.iter().flat_map(|s| s.attempts.iter()) {
        match index.get(attempt.target_word.as_str()) {
            Some(&i) => out[i].1.push(attempt.score),
            None => {
                index.insert(attempt.target_word.as_str(), out.len());
                out.push((attempt.target_word.clone(), vec![attempt.score]));
            }
        }
    }

    out
}

fn promote(into: &mut Vec<String>, from: &mut Vec<String>, word: &str) {
    from.retain(|w| w != word);
    into.retain(|w| w != word);
    into.push(word.to_string());
}

fn keep_most_recent(list: &mut Vec<String>, max: usize) {
    if list.len() > max {
        let overflow = list.len() - max;
        list.drain(..overflow);
    }
}
