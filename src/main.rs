use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use speech_coach::adaptive::modeling::{learning_velocity, optimal_study_time, simulate_session};
use speech_coach::adaptive::AdaptiveConfig;
use speech_coach::config::Config;
use speech_coach::logging::init_tracing;
use speech_coach::providers::{GoogleSpeechClient, InMemoryStore, ProfileStore};
use speech_coach::services::{PracticeRound, PracticeService};
use speech_coach::speech::{PronunciationScorer, ScoringConfig, Transcription};

const DEMO_USER: &str = "demo-child";
const DEMO_AGE: u32 = 7;
const DEMO_SESSIONS: usize = 6;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let config = Config::from_env();
    let _log_guard = init_tracing(&config.log_level);

    let adaptive_config = AdaptiveConfig::from_env();
    let seed = adaptive_config.sampler.seed.unwrap_or(7);
    let mastery_threshold = adaptive_config.profile.mastery_threshold;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let store = Arc::new(InMemoryStore::new());
    let google = Arc::new(GoogleSpeechClient::from_env());
    if !google.is_available() {
        tracing::info!("GOOGLE_API_KEY not set, recordings cannot be transcribed");
    }

    let service = PracticeService::new(
        config.clone(),
        adaptive_config,
        PronunciationScorer::new(ScoringConfig::from_env()),
        store.clone(),
        google.clone(),
    )
    .with_synthesizer(google);

    if let Err(err) = service.enroll(DEMO_USER, DEMO_AGE).await {
        tracing::error!(error = %err, "enrollment failed");
        return;
    }

    for _ in 0..DEMO_SESSIONS {
        let recommendation = service.recommend_next(DEMO_USER).await;
        let session = simulate_session(
            DEMO_USER,
            &recommendation.next_words,
            recommendation.target_level,
            &mut rng,
        );
        if let Err(err) = store.append_session(&session).await {
            tracing::error!(error = %err, "failed to store simulated session");
            return;
        }
    }

    let recommendation = service.recommend_next(DEMO_USER).await;

    // The child says the first word right and mangles the second.
    let mut heard: Vec<String> = recommendation.next_words.iter().take(2).cloned().collect();
    if let Some(second) = heard.get_mut(1) {
        second.pop();
    }
    let round = PracticeRound {
        user_id: DEMO_USER.to_string(),
        target_words: recommendation.next_words.clone(),
        level: recommendation.target_level,
        duration_minutes: recommendation.session_duration_minutes,
        engagement_level: 0.8,
    };
    let transcription = Transcription {
        transcript: heard.join(" "),
        confidence: 0.85,
        words: Vec::new(),
    };
    let analysis = match service.record_transcription(&round, &transcription).await {
        Ok(analysis) => analysis,
        Err(err) => {
            tracing::error!(error = %err, "failed to record demo round");
            return;
        }
    };

    let profile = match store.get_profile(DEMO_USER).await {
        Ok(Some(profile)) => profile,
        Ok(None) => {
            tracing::error!("demo profile missing");
            return;
        }
        Err(err) => {
            tracing::error!(error = %err, "failed to load demo profile");
            return;
        }
    };
    let history = store
        .get_recent_sessions(DEMO_USER, config.history_window)
        .await
        .unwrap_or_default();

    let velocity = learning_velocity(&history, mastery_threshold);
    let study_time = optimal_study_time(&profile, &history);
    let report = serde_json::json!({
        "profile": profile,
        "recommendation": recommendation,
        "analysis": analysis,
        "learningVelocity": velocity,
        "optimalStudyTime": study_time,
    });

    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(err) => tracing::error!(error = %err, "failed to render report"),
    }
}
