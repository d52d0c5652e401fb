use super::config::FactorWeights;
use super::{Factor, FactorScores};

pub(crate) const SCORE_FLOOR: f32 = 0.0;
pub(crate) const SCORE_CEILING: f32 = 100.0;

/// Weighted share a positive factor adds to the match score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorContribution {
    pub factor: Factor,
    pub points: f32,
}

pub(crate) fn combine(weights: &FactorWeights, scores: &FactorScores) -> f32 {
    let positive: f32 = contributions(weights, scores)
        .iter()
        .map(|contribution| contribution.points)
        .sum();
    let total = positive - weights.risk_penalty * scores.risk;

    if total.is_nan() {
        return SCORE_FLOOR;
    }
    total.clamp(SCORE_FLOOR, SCORE_CEILING)
}

pub(crate) fn contributions(weights: &FactorWeights, scores: &FactorScores) -> [FactorContribution; 4] {
    [
        FactorContribution {
            factor: Factor::Fit,
            points: weights.fit * scores.fit,
        },
        FactorContribution {
            factor: Factor::Performance,
            points: weights.performance * scores.performance,
        },
        FactorContribution {
            factor: Factor::Availability,
            points: weights.availability * scores.availability,
        },
        FactorContribution {
            factor: Factor::NewsImpact,
            points: weights.news_impact * scores.news_impact,
        },
    ]
}

/// Largest positive contribution; earlier factors win exact ties.
pub(crate) fn dominant(weights: &FactorWeights, scores: &FactorScores) -> FactorContribution {
    let [first, rest @ ..] = contributions(weights, scores);
    rest.into_iter().fold(first, |best, candidate| {
        if candidate.points > best.points {
            candidate
        } else {
            best
        }
    })
}
