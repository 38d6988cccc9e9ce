use crate::adaptive::config::AnalyzerParams;
use crate::adaptive::modeling::trend;
use crate::adaptive::types::{Session, SessionMetrics};
use crate::error::EngineError;
use crate::sanitize::has_invalid_values;

/// Reduces one session's attempt scores to scalar performance signals.
#[derive(Debug, Clone, Default)]
pub struct SessionAnalyzer {
    params: AnalyzerParams,
}

impl SessionAnalyzer {
    pub fn new(params: AnalyzerParams) -> Self {
        Self { params }
    }

    /// Never fails: broken input yields [`SessionMetrics::neutral`].
    pub fn analyze(&self, session: &Session) -> SessionMetrics {
        self.try_analyze(session).unwrap_or_else(|err| {
            tracing::warn!(
                error = %err,
                session_id = %session.session_id,
                "session analysis failed, using neutral metrics"
            );
            SessionMetrics::neutral()
        })
    }

    pub fn try_analyze(&self, session: &Session) -> Result<SessionMetrics, EngineError> {
        let scores = session.scores();
        if has_invalid_values(&scores) {
            return Err(EngineError::NonFiniteValue("attempt scores"));
        }
        if !session.engagement_level.is_finite() {
            return Err(EngineError::NonFiniteValue("engagement level"));
        }

        let Some(average_score) = trend::mean(&scores) else {
            return Ok(SessionMetrics {
                average_score: 0.0,
                consistency: 0.0,
                improvement_trend: 0.0,
                difficulty_appropriateness: 0.5,
                engagement_level: session.engagement_level,
            });
        };

        // A lone attempt has zero spread and therefore full consistency.
        let consistency = (1.0 - trend::std_dev(&scores)).max(0.0);

        let improvement_trend = if scores.len() > 1 {
            (trend::slope(&scores) * self.params.trend_scale).clamp(-1.0, 1.0)
        } else {
            0.0
        };

        Ok(SessionMetrics {
            average_score,
            consistency,
            improvement_trend,
            difficulty_appropriateness: difficulty_appropriateness(average_score),
            engagement_level: session.engagement_level,
        })
    }
}

/// Rewards the productive-struggle band over both mastery and failure.
pub fn difficulty_appropriateness(average_score: f64) -> f64 {
    if average_score > 0.9 {
        0.3
    } else if average_score > 0.7 {
        1.0
    } else if average_score > 0.5 {
        0.8
    } else if average_score > 0.3 {
        0.5
    } else {
        0.2
    }
}
