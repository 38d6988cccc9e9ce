use std::collections::HashMap;

use rand::Rng;

use crate::adaptive::modeling::trend;
use crate::adaptive::types::{Attempt, DifficultyLevel, Session, StudyTime, UserProfile};

/// Mean number of mastered attempts per session. Needs at least two sessions.
pub fn learning_velocity(sessions: &[Session], mastery_threshold: f64) -> f64 {
    if sessions.len() < 2 {
        return 0.0;
    }

    let per_session: Vec<f64> = sessions
        .iter()
        .map(|s| s.attempts.iter().filter(|a| a.score >= mastery_threshold).count() as f64)
        .collect();

    trend::mean(&per_session).unwrap_or(0.0)
}

/// Time of day with the best mean session score. Ties keep the earlier slot.
pub fn optimal_study_time(profile: &UserProfile, sessions: &[Session]) -> StudyTime {
    let mut buckets: HashMap<StudyTime, Vec<f64>> = HashMap::new();
    for session in sessions {
        if let Some(score) = session.mean_score() {
            buckets
                .entry(StudyTime::from_hour(session.hour_of_day()))
                .or_default()
                .push(score);
        }
    }

    let mut best: Option<(StudyTime, f64)> = None;
    for slot in [StudyTime::Morning, StudyTime::Afternoon, StudyTime::Evening] {
        let Some(avg) = buckets.get(&slot).and_then(|scores| trend::mean(scores)) else {
            continue;
        };
        if best.map_or(true, |(_, b)| avg > b) {
            best = Some((slot, avg));
        }
    }

    best.map(|(slot, _)| slot)
        .unwrap_or(profile.preferred_session_time)
}

fn base_performance(level: DifficultyLevel) -> f64 {
    match level {
        DifficultyLevel::VeryEasy => 0.9,
        DifficultyLevel::Easy => 0.8,
        DifficultyLevel::Medium => 0.7,
        DifficultyLevel::Hard => 0.6,
        DifficultyLevel::VeryHard => 0.5,
    }
}

/// Standard normal sample via Box-Muller.
fn sample_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(f64::EPSILON);
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

/// Synthetic session for the demo binary. Harder levels score lower.
pub fn simulate_session<R: Rng + ?Sized>(
    user_id: &str,
    words: &[String],
    level: DifficultyLevel,
    rng: &mut R,
) -> Session {
    let base = base_performance(level);
    let attempts = words
        .iter()
        .map(|word| {
            let score = base + 0.15 * sample_normal(rng);
            Attempt::new(word.clone(), word.clone(), rng.gen_range(0.6..1.0), score)
        })
        .collect();

    Session::new(
        user_id,
        level,
        attempts,
        rng.gen_range(5.0..20.0),
        rng.gen_range(0.5..1.0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn session_at(hour: u32, scores: &[f64]) -> Session {
        let attempts = scores.iter().map(|s| Attempt::scored("kata", *s)).collect();
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap();
        Session::new("kid", DifficultyLevel::Easy, attempts, 10.0, 0.8).with_timestamp(ts)
    }

    #[test]
    fn velocity_needs_two_sessions() {
        assert_eq!(learning_velocity(&[session_at(9, &[0.9, 0.9])], 0.8), 0.0);
    }

    #[test]
    fn velocity_counts_mastered_attempts() {
        let sessions = vec![session_at(9, &[0.9, 0.85, 0.2]), session_at(10, &[0.1, 0.95])];
        assert_eq!(learning_velocity(&sessions, 0.8), 1.5);
    }

    #[test]
    fn best_slot_wins() {
        let profile = UserProfile::for_new_user("kid", 7);
        let sessions = vec![
            session_at(8, &[0.4]),
            session_at(14, &[0.6]),
            session_at(19, &[0.9]),
            session_at(20, &[0.8]),
        ];
        assert_eq!(optimal_study_time(&profile, &sessions), StudyTime::Evening);
    }

    #[test]
    fn no_scored_sessions_uses_preference() {
        let mut profile = UserProfile::for_new_user("kid", 7);
        profile.preferred_session_time = StudyTime::Morning;
        assert_eq!(optimal_study_time(&profile, &[session_at(15, &[])]), StudyTime::Morning);
    }

    #[test]
    fn simulated_sessions_stay_in_range() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let words = vec!["mama".to_string(), "papa".to_string(), "air".to_string()];
        for level in DifficultyLevel::ALL {
            let session = simulate_session("kid", &words, level, &mut rng);
            assert_eq!(session.attempts.len(), 3);
            assert!(session.attempts.iter().all(|a| (0.0..=1.0).contains(&a.score)));
            assert!((5.0..20.0).contains(&session.duration_minutes));
            assert!((0.5..1.0).contains(&session.engagement_level));
        }
    }
}
