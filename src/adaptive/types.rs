use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::sanitize::clamp_unit;

/// Fixed five-step difficulty ladder. Ordering follows the ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum DifficultyLevel {
    VeryEasy,
    #[default]
    Easy,
    Medium,
    Hard,
    VeryHard,
}

impl DifficultyLevel {
    pub const ALL: [DifficultyLevel; 5] = [
        Self::VeryEasy,
        Self::Easy,
        Self::Medium,
        Self::Hard,
        Self::VeryHard,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryEasy => "very_easy",
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::VeryHard => "very_hard",
        }
    }

    /// Unknown labels resolve to `Easy`, the same level the sampler falls back to.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().replace(|c: char| c == '-' || c == ' ', "_").as_str() {
            "very_easy" => Self::VeryEasy,
            "medium" | "mid" => Self::Medium,
            "hard" => Self::Hard,
            "very_hard" => Self::VeryHard,
            _ => Self::Easy,
        }
    }

    pub fn harder(&self) -> Self {
        match self {
            Self::VeryEasy => Self::Easy,
            Self::Easy => Self::Medium,
            Self::Medium => Self::Hard,
            Self::Hard | Self::VeryHard => Self::VeryHard,
        }
    }

    pub fn easier(&self) -> Self {
        match self {
            Self::VeryHard => Self::Hard,
            Self::Hard => Self::Medium,
            Self::Medium => Self::Easy,
            Self::Easy | Self::VeryEasy => Self::VeryEasy,
        }
    }

    pub fn apply(&self, adjustment: Adjustment) -> Self {
        match adjustment {
            Adjustment::Increase => self.harder(),
            Adjustment::Decrease => self.easier(),
            Adjustment::Maintain => *self,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum Adjustment {
    Increase,
    Decrease,
    #[default]
    Maintain,
}

impl Adjustment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Increase => "increase",
            Self::Decrease => "decrease",
            Self::Maintain => "maintain",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum LearningStyle {
    Visual,
    Auditory,
    Kinesthetic,
    #[default]
    Mixed,
}

impl LearningStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Visual => "visual",
            Self::Auditory => "auditory",
            Self::Kinesthetic => "kinesthetic",
            Self::Mixed => "mixed",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "visual" => Self::Visual,
            "auditory" => Self::Auditory,
            "kinesthetic" => Self::Kinesthetic,
            _ => Self::Mixed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum StudyTime {
    Morning,
    #[default]
    Afternoon,
    Evening,
}

impl StudyTime {
    pub fn from_hour(hour: u32) -> Self {
        if hour < 12 {
            Self::Morning
        } else if hour < 17 {
            Self::Afternoon
        } else {
            Self::Evening
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Morning => "morning",
            Self::Afternoon => "afternoon",
            Self::Evening => "evening",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncouragementTier {
    Celebration,
    PositiveReinforcement,
    GentleMotivation,
    SupportiveComfort,
    WelcomeIntroduction,
}

impl EncouragementTier {
    /// `None` means the child has no sessions yet.
    pub fn from_last_score(score: Option<f64>) -> Self {
        match score {
            None => Self::WelcomeIntroduction,
            Some(s) if s >= 0.8 => Self::Celebration,
            Some(s) if s >= 0.6 => Self::PositiveReinforcement,
            Some(s) if s >= 0.4 => Self::GentleMotivation,
            Some(_) => Self::SupportiveComfort,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Celebration => "celebration",
            Self::PositiveReinforcement => "positive_reinforcement",
            Self::GentleMotivation => "gentle_motivation",
            Self::SupportiveComfort => "supportive_comfort",
            Self::WelcomeIntroduction => "welcome_introduction",
        }
    }

    pub fn character_interaction(&self) -> &'static str {
        match self {
            Self::Celebration => "Imron and Siti throw a special celebration for you!",
            Self::PositiveReinforcement => "Imron gives you a virtual high-five!",
            Self::GentleMotivation => "Siti sings a little song to cheer you on!",
            Self::SupportiveComfort => "Imron and Siti send you a big virtual hug!",
            Self::WelcomeIntroduction => "Imron and Siti introduce themselves!",
        }
    }
}

/// One scored spoken word.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attempt {
    pub target_word: String,
    pub spoken_text: String,
    pub recognizer_confidence: f64,
    pub score: f64,
}

impl Attempt {
    pub fn new(
        target_word: impl Into<String>,
        spoken_text: impl Into<String>,
        recognizer_confidence: f64,
        score: f64,
    ) -> Self {
        Self {
            target_word: target_word.into(),
            spoken_text: spoken_text.into(),
            recognizer_confidence: clamp_unit(recognizer_confidence),
            score: clamp_unit(score),
        }
    }

    /// Attempt that only carries a score; spoken text mirrors the target.
    pub fn scored(target_word: impl Into<String>, score: f64) -> Self {
        let target_word = target_word.into();
        let spoken_text = target_word.clone();
        Self::new(target_word, spoken_text, 1.0, score)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub session_id: String,
    pub user_id: String,
    pub difficulty_level: DifficultyLevel,
    pub attempts: Vec<Attempt>,
    pub duration_minutes: f64,
    pub engagement_level: f64,
    pub timestamp: DateTime<Utc>,
}

impl Session {
    pub fn new(
        user_id: impl Into<String>,
        difficulty_level: DifficultyLevel,
        attempts: Vec<Attempt>,
        duration_minutes: f64,
        engagement_level: f64,
    ) -> Self {
        Self {
            session_id: uuid::Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            difficulty_level,
            attempts,
            duration_minutes: duration_minutes.max(0.0),
            engagement_level: clamp_unit(engagement_level),
            timestamp: Utc::now(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn scores(&self) -> Vec<f64> {
        self.attempts.iter().map(|a| a.score).collect()
    }

    pub fn mean_score(&self) -> Option<f64> {
        if self.attempts.is_empty() {
            return None;
        }
        Some(self.attempts.iter().map(|a| a.score).sum::<f64>() / self.attempts.len() as f64)
    }

    pub fn hour_of_day(&self) -> u32 {
        self.timestamp.hour()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMetrics {
    pub average_score: f64,
    pub consistency: f64,
    pub improvement_trend: f64,
    pub difficulty_appropriateness: f64,
    pub engagement_level: f64,
}

impl SessionMetrics {
    /// Returned when analysis fails for any reason.
    pub fn neutral() -> Self {
        Self {
            average_score: 0.0,
            consistency: 0.0,
            improvement_trend: 0.0,
            difficulty_appropriateness: 0.5,
            engagement_level: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: String,
    pub age: u32,
    pub current_level: DifficultyLevel,
    pub learning_style: LearningStyle,
    pub attention_span: f64,
    pub preferred_session_time: StudyTime,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub motivation_factors: Vec<String>,
    pub last_updated: DateTime<Utc>,
}

impl UserProfile {
    /// Starting level and attention span are picked from the child's age.
    pub fn for_new_user(user_id: impl Into<String>, age: u32) -> Self {
        let (current_level, attention_span) = match age {
            0..=5 => (DifficultyLevel::VeryEasy, 5.0),
            6..=7 => (DifficultyLevel::Easy, 10.0),
            8..=9 => (DifficultyLevel::Easy, 15.0),
            _ => (DifficultyLevel::Medium, 20.0),
        };

        Self {
            user_id: user_id.into(),
            age,
            current_level,
            learning_style: LearningStyle::Mixed,
            attention_span,
            preferred_session_time: StudyTime::Afternoon,
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            motivation_factors: vec![
                "character_interaction".to_string(),
                "achievement_badges".to_string(),
                "point_scoring".to_string(),
            ],
            last_updated: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptiveRecommendation {
    pub next_words: Vec<String>,
    pub difficulty_adjustment: Adjustment,
    pub target_level: DifficultyLevel,
    pub recommended_break: bool,
    pub session_duration_minutes: f64,
    pub encouragement: EncouragementTier,
    pub character_interaction: String,
    pub learning_activities: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ladder_clamps_at_both_ends() {
        assert_eq!(DifficultyLevel::VeryHard.harder(), DifficultyLevel::VeryHard);
        assert_eq!(DifficultyLevel::VeryEasy.easier(), DifficultyLevel::VeryEasy);
        assert_eq!(DifficultyLevel::Medium.harder(), DifficultyLevel::Hard);
        assert_eq!(DifficultyLevel::Medium.easier(), DifficultyLevel::Easy);
    }

    #[test]
    fn ladder_is_ordered() {
        let mut sorted = DifficultyLevel::ALL;
        sorted.sort();
        assert_eq!(sorted, DifficultyLevel::ALL);
        assert!(DifficultyLevel::VeryEasy < DifficultyLevel::VeryHard);
    }

    #[test]
    fn parse_round_trips_labels() {
        for level in DifficultyLevel::ALL {
            assert_eq!(DifficultyLevel::parse(level.as_str()), level);
        }
        assert_eq!(DifficultyLevel::parse("Very Hard"), DifficultyLevel::VeryHard);
        assert_eq!(DifficultyLevel::parse("unknown"), DifficultyLevel::Easy);
    }

    #[test]
    fn encouragement_tiers_follow_last_score() {
        assert_eq!(EncouragementTier::from_last_score(None), EncouragementTier::WelcomeIntroduction);
        assert_eq!(EncouragementTier::from_last_score(Some(0.8)), EncouragementTier::Celebration);
        assert_eq!(
            EncouragementTier::from_last_score(Some(0.65)),
            EncouragementTier::PositiveReinforcement
        );
        assert_eq!(EncouragementTier::from_last_score(Some(0.4)), EncouragementTier::GentleMotivation);
        assert_eq!(EncouragementTier::from_last_score(Some(0.1)), EncouragementTier::SupportiveComfort);
    }

    #[test]
    fn attempt_clamps_inputs() {
        let attempt = Attempt::new("mama", "mama", 1.7, f64::NAN);
        assert_eq!(attempt.recognizer_confidence, 1.0);
        assert_eq!(attempt.score, 0.0);
    }

    #[test]
    fn new_user_profile_depends_on_age() {
        assert_eq!(UserProfile::for_new_user("u", 4).current_level, DifficultyLevel::VeryEasy);
        assert_eq!(UserProfile::for_new_user("u", 9).attention_span, 15.0);
        assert_eq!(UserProfile::for_new_user("u", 12).current_level, DifficultyLevel::Medium);
    }

    #[test]
    fn serializes_levels_in_snake_case() {
        let json = serde_json::to_string(&DifficultyLevel::VeryHard).unwrap();
        assert_eq!(json, "\"very_hard\"");
    }
}
