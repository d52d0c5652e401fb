use serde::{Deserialize, Serialize};

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Named factor weights. `risk_penalty` is a magnitude subtracted from the total.
///
/// The four positive weights and the risk magnitude together form one unit budget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorWeights {
    pub fit: f32,
    pub performance: f32,
    pub availability: f32,
    pub news_impact: f32,
    pub risk_penalty: f32,
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self {
            fit: 0.35,
            performance: 0.25,
            availability: 0.20,
            news_impact: 0.15,
            risk_penalty: 0.05,
        }
    }
}

impl FactorWeights {
    pub fn positive_sum(&self) -> f32 {
        self.fit + self.performance + self.availability + self.news_impact
    }

    /// Positive weights plus the risk magnitude, accumulated in `f64`.
    pub fn total(&self) -> f64 {
        [
            self.fit,
            self.performance,
            self.availability,
            self.news_impact,
            self.risk_penalty,
        ]
        .iter()
        .map(|weight| f64::from(*weight))
        .sum()
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let named = [
            ("fit", self.fit),
            ("performance", self.performance),
            ("availability", self.availability),
            ("news_impact", self.news_impact),
            ("risk_penalty", self.risk_penalty),
        ];
        for (name, value) in named {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigurationError::InvalidWeight { name, value });
            }
        }

        let total = self.total();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ConfigurationError::WeightSum { sum: total as f32 });
        }

        Ok(())
    }
}

/// Reference bounds used to rescale raw player ratings to `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingScale {
    pub min: f32,
    pub max: f32,
}

impl Default for RatingScale {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 10.0,
        }
    }
}

impl RatingScale {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min >= self.max {
            return Err(ConfigurationError::RatingScale {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Tunables supplied when the scoring engine is constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub weights: FactorWeights,
    pub rating_scale: RatingScale,
    /// How far back news mentions count towards the impact signal.
    pub news_window_days: u16,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: FactorWeights::default(),
            rating_scale: RatingScale::default(),
            news_window_days: 7,
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.weights.validate()?;
        self.rating_scale.validate()?;
        if self.news_window_days == 0 {
            return Err(ConfigurationError::NewsWindow);
        }
        Ok(())
    }
}

/// Fatal configuration problem detected while building the engine.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("weight '{name}' must be a finite non-negative number (got {value})")]
    InvalidWeight { name: &'static str, value: f32 },
    #[error("factor weights including risk_penalty must sum to 1.0 (got {sum:.4})")]
    WeightSum { sum: f32 },
    #[error("rating scale requires finite min < max (got {min}..{max})")]
    RatingScale { min: f32, max: f32 },
    #[error("news window must cover at least one day")]
    NewsWindow,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_weights_are_valid() {
        let weights = FactorWeights::default();
        assert!((weights.total() - 1.0).abs() < 1e-6);
        assert!(ScoringConfig::default().validate().is_ok());
    }

    #[test]
    fn positive_weights_of_094_are_rejected() {
        let weights = FactorWeights {
            fit: 0.30,
            performance: 0.25,
            availability: 0.20,
            news_impact: 0.19,
            risk_penalty: 0.05,
        };
        assert!((weights.positive_sum() - 0.94).abs() < 1e-4);
        match weights.validate() {
            Err(ConfigurationError::WeightSum { sum }) => assert!((sum - 0.99).abs() < 1e-4),
            other => panic!("expected weight sum error, got {other:?}"),
        }
    }

    #[test]
    fn risk_magnitude_counts_towards_the_budget() {
        let weights = FactorWeights {
            risk_penalty: 0.0,
            ..FactorWeights::default()
        };
        assert!(matches!(
            weights.validate(),
            Err(ConfigurationError::WeightSum { .. })
        ));
    }

    #[test]
    fn negative_weights_are_rejected() {
        let weights = FactorWeights {
            risk_penalty: -0.05,
            ..FactorWeights::default()
        };
        assert!(matches!(
            weights.validate(),
            Err(ConfigurationError::InvalidWeight {
                name: "risk_penalty",
                ..
            })
        ));
    }

    #[test]
    fn inverted_rating_scale_is_rejected() {
        let scale = RatingScale { min: 10.0, max: 1.0 };
        assert!(matches!(
            scale.validate(),
            Err(ConfigurationError::RatingScale { .. })
        ));
    }
}
