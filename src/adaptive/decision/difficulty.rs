use crate::adaptive::config::DifficultyThresholds;
use crate::adaptive::modeling::{trend, SessionAnalyzer};
use crate::adaptive::types::{Adjustment, Session};

/// Window averages the difficulty rules look at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecentPerformance {
    pub avg_score: f64,
    pub avg_appropriateness: f64,
    pub avg_engagement: f64,
}

pub struct DifficultyPolicy {
    thresholds: DifficultyThresholds,
    analyzer: SessionAnalyzer,
}

impl DifficultyPolicy {
    pub fn new(thresholds: DifficultyThresholds, analyzer: SessionAnalyzer) -> Self {
        Self {
            thresholds,
            analyzer,
        }
    }

    /// Averages analyzer metrics over the last `window` sessions.
    pub fn recent_performance(&self, sessions: &[Session]) -> Option<RecentPerformance> {
        let start = sessions.len().saturating_sub(self.thresholds.window.max(1));
        let metrics: Vec<_> = sessions[start..]
            .iter()
            .map(|s| self.analyzer.analyze(s))
            .collect();

        let scores: Vec<f64> = metrics.iter().map(|m| m.average_score).collect();
        let appropriateness: Vec<f64> =
            metrics.iter().map(|m| m.difficulty_appropriateness).collect();
        let engagement: Vec<f64> = metrics.iter().map(|m| m.engagement_level).collect();

        Some(RecentPerformance {
            avg_score: trend::mean(&scores)?,
            avg_appropriateness: trend::mean(&appropriateness)?,
            avg_engagement: trend::mean(&engagement)?,
        })
    }

    pub fn decide(&self, sessions: &[Session]) -> Adjustment {
        let Some(perf) = self.recent_performance(sessions) else {
            return Adjustment::Maintain;
        };
        let adjustment = self.evaluate(&perf);

        tracing::debug!(
            avg_score = perf.avg_score,
            avg_appropriateness = perf.avg_appropriateness,
            avg_engagement = perf.avg_engagement,
            adjustment = adjustment.as_str(),
            "difficulty decided"
        );
        adjustment
    }

    /// First matching rule wins.
    pub fn evaluate(&self, perf: &RecentPerformance) -> Adjustment {
        let t = &self.thresholds;

        if perf.avg_score >= t.increase_min_score
            && perf.avg_engagement >= t.increase_min_engagement
            && perf.avg_appropriateness < t.increase_max_appropriateness
        {
            return Adjustment::Increase;
        }

        if perf.avg_score <= t.decrease_max_score || perf.avg_engagement <= t.decrease_max_engagement
        {
            return Adjustment::Decrease;
        }

        // Sweet spot.
        if (t.sweet_spot_min_score..=t.sweet_spot_max_score).contains(&perf.avg_score)
            && perf.avg_engagement >= t.sweet_spot_min_engagement
        {
            return Adjustment::Maintain;
        }

        Adjustment::Maintain
    }
}

impl Default for DifficultyPolicy {
    fn default() -> Self {
        Self::new(DifficultyThresholds::default(), SessionAnalyzer::default())
    }
}
