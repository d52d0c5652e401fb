mod config;
pub(crate) mod normalizer;
mod weights;

pub use config::{ConfigurationError, FactorWeights, RatingScale, ScoringConfig};
pub use weights::FactorContribution;

use super::domain::{ClubNeed, Player};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Named inputs to the match score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    Fit,
    Performance,
    Availability,
    NewsImpact,
    Risk,
}

impl Factor {
    pub fn label(&self) -> &'static str {
        match self {
            Factor::Fit => "club fit",
            Factor::Performance => "performance",
            Factor::Availability => "availability",
            Factor::NewsImpact => "news impact",
            Factor::Risk => "risk",
        }
    }
}

/// Per (player, need) sub-scores. All but `risk` lie in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorScores {
    pub fit: f32,
    pub performance: f32,
    pub availability: f32,
    pub news_impact: f32,
    /// Non-negative penalty magnitude.
    pub risk: f32,
    /// Mean confidence of the news that fed `news_impact`, when there was any.
    pub news_confidence: Option<f32>,
}

/// Stateless evaluator holding validated weights and reference scales.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    /// Fails when the weights or rating scale are unusable.
    pub fn new(config: ScoringConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn normalize(&self, player: &Player, need: &ClubNeed, as_of: NaiveDate) -> FactorScores {
        normalizer::normalize(player, need, &self.config, as_of)
    }

    pub fn combine(&self, scores: &FactorScores) -> f32 {
        weights::combine(&self.config.weights, scores)
    }

    pub fn contributions(&self, scores: &FactorScores) -> [FactorContribution; 4] {
        weights::contributions(&self.config.weights, scores)
    }

    pub fn dominant_factor(&self, scores: &FactorScores) -> FactorContribution {
        weights::dominant(&self.config.weights, scores)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_builds_an_engine() {
        let engine = ScoringEngine::new(ScoringConfig::default()).expect("defaults are valid");
        assert_eq!(engine.config(), &ScoringConfig::default());
    }

    #[test]
    fn invalid_config_never_builds_an_engine() {
        let config = ScoringConfig {
            news_window_days: 0,
            ..ScoringConfig::default()
        };
        assert_eq!(
            ScoringEngine::new(config).err(),
            Some(ConfigurationError::NewsWindow)
        );
    }
}
