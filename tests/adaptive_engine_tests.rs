use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use speech_coach::adaptive::decision::CurriculumSampler;
use speech_coach::adaptive::modeling::{ProfileAggregator, SessionAnalyzer};
use speech_coach::adaptive::types::{
    Adjustment, Attempt, DifficultyLevel, EncouragementTier, LearningStyle, Session, UserProfile,
};
use speech_coach::adaptive::{AdaptiveConfig, AdaptiveEngine, Vocabulary};

fn seeded_engine(vocabulary: Vocabulary, seed: u64) -> AdaptiveEngine {
    let config = AdaptiveConfig::default();
    let sampler = CurriculumSampler::with_rng(
        vocabulary,
        config.sampler.review_divisor,
        ChaCha8Rng::seed_from_u64(seed),
    );
    AdaptiveEngine::with_sampler(config, sampler)
}

fn session_with(words: &[(&str, f64)], duration: f64, engagement: f64) -> Session {
    let attempts = words.iter().map(|(w, s)| Attempt::scored(*w, *s)).collect();
    Session::new("kid", DifficultyLevel::Easy, attempts, duration, engagement)
}

#[test]
fn integration_zero_attempt_session_metrics() {
    let session = Session::new("kid", DifficultyLevel::Easy, Vec::new(), 4.0, 0.65);
    let metrics = SessionAnalyzer::default().analyze(&session);

    assert_eq!(metrics.average_score, 0.0);
    assert_eq!(metrics.consistency, 0.0);
    assert_eq!(metrics.improvement_trend, 0.0);
    assert_eq!(metrics.difficulty_appropriateness, 0.5);
    assert_eq!(metrics.engagement_level, 0.65);
}

#[test]
fn integration_strong_history_increases_difficulty() {
    let sessions: Vec<_> = (0..5)
        .map(|_| session_with(&[("bola", 0.95), ("air", 0.93)], 7.0, 0.8))
        .collect();

    let mut engine = seeded_engine(Vocabulary::builtin(), 1);
    assert_eq!(engine.decide_difficulty(&sessions), Adjustment::Increase);

    let profile = UserProfile::for_new_user("kid", 7);
    let recommendation = engine.recommend(&profile, &sessions);
    assert_eq!(recommendation.target_level, DifficultyLevel::Medium);
    assert_eq!(recommendation.encouragement, EncouragementTier::Celebration);
}

#[test]
fn integration_mastered_words_are_not_recommended() {
    let vocabulary = Vocabulary::empty().with_level(
        DifficultyLevel::Easy,
        vec![(
            "basics".to_string(),
            vec!["mama".to_string(), "papa".to_string(), "air".to_string()],
        )],
    );
    let mut profile = UserProfile::for_new_user("kid", 7);
    profile.strengths = vec!["mama".to_string()];

    for seed in 0..10 {
        let mut engine = seeded_engine(vocabulary.clone(), seed);
        let words = engine.select_words(&profile, DifficultyLevel::Easy, 2);
        assert_eq!(words.len(), 2);
        assert!(!words.contains(&"mama".to_string()));
    }
}

#[test]
fn integration_profile_then_recommendation_cycle() {
    let mut engine = seeded_engine(Vocabulary::builtin(), 5);
    let mut profile = UserProfile::for_new_user("kid", 8);
    profile.learning_style = LearningStyle::Visual;

    let sessions = vec![
        session_with(&[("rumah", 0.95), ("meja", 0.3)], 12.0, 0.6),
        session_with(&[("rumah", 0.85), ("meja", 0.2)], 14.0, 0.6),
    ];

    let updated = engine.update_profile(&profile, &sessions);
    assert_eq!(updated.strengths, vec!["rumah".to_string()]);
    assert_eq!(updated.weaknesses, vec!["meja".to_string()]);
    assert_eq!(updated.attention_span, 13.0);
    assert_eq!(updated.learning_style, LearningStyle::Mixed);

    let recommendation = engine.recommend(&updated, &sessions);
    assert!(!recommendation.next_words.contains(&"rumah".to_string()));
    assert!(recommendation.next_words.contains(&"meja".to_string()));
    assert!(recommendation.learning_activities.len() <= 3);
    assert_eq!(recommendation.session_duration_minutes, 10.0);
}

#[test]
fn integration_profile_never_lists_word_twice() {
    let aggregator = ProfileAggregator::default();
    let mut profile = UserProfile::for_new_user("kid", 6);

    let rounds = [0.9, 0.2, 0.95, 0.1];
    for score in rounds {
        let sessions = vec![session_with(&[("susu", score)], 5.0, 0.9)];
        profile = aggregator.aggregate(&profile, &sessions);
        let in_both = profile
            .strengths
            .iter()
            .any(|w| profile.weaknesses.contains(w));
        assert!(!in_both);
    }
    assert_eq!(profile.weaknesses, vec!["susu".to_string()]);
    assert!(profile.strengths.is_empty());
}

#[test]
fn integration_empty_vocabulary_still_recommends() {
    let mut engine = seeded_engine(Vocabulary::empty(), 2);
    let profile = UserProfile::for_new_user("kid", 7);
    let recommendation = engine.recommend(&profile, &[]);

    assert_eq!(
        recommendation.next_words,
        vec!["mama", "papa", "air", "makan", "tidur"]
    );
    assert_eq!(recommendation.encouragement, EncouragementTier::WelcomeIntroduction);
}
