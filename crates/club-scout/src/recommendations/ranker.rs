use std::cmp::Ordering;

use serde::Serialize;

use super::domain::{Player, Position};
use super::explanation::Explanation;
use super::scoring::FactorScores;
use super::service::RecommendationError;
use super::views::one_decimal;

/// Fully scored candidate awaiting the ranking pass.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub player: Player,
    pub scores: FactorScores,
    pub match_score: f32,
    pub explanation: Explanation,
}

/// Ranked result handed back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub rank: usize,
    pub player: Player,
    pub match_score: f32,
    pub fit_score: f32,
    pub scores: FactorScores,
    pub explanation: Explanation,
}

/// Filters, orders and truncates the full candidate set.
pub fn rank(
    candidates: Vec<ScoredCandidate>,
    limit: usize,
    position_filter: Option<&[Position]>,
) -> Result<Vec<Recommendation>, RecommendationError> {
    if limit == 0 {
        return Err(RecommendationError::InvalidArgument(
            "limit must be a positive integer".to_string(),
        ));
    }

    let mut survivors: Vec<ScoredCandidate> = candidates
        .into_iter()
        .filter(|candidate| candidate.scores.fit > 0.0)
        .filter(|candidate| match position_filter {
            Some(allowed) if !allowed.is_empty() => allowed.contains(&candidate.player.position),
            _ => true,
        })
        .collect();

    survivors.sort_by(compare_candidates);
    survivors.truncate(limit);

    Ok(survivors
        .into_iter()
        .enumerate()
        .map(|(index, candidate)| Recommendation {
            rank: index + 1,
            fit_score: candidate.scores.fit,
            match_score: candidate.match_score,
            scores: candidate.scores,
            explanation: candidate.explanation,
            player: candidate.player,
        })
        .collect())
}

/// Descending by published (one decimal) match score, then fit, then performance;
/// ascending player id last.
pub(crate) fn compare_candidates(left: &ScoredCandidate, right: &ScoredCandidate) -> Ordering {
    one_decimal(right.match_score)
        .total_cmp(&one_decimal(left.match_score))
        .then_with(|| right.scores.fit.total_cmp(&left.scores.fit))
        .then_with(|| right.scores.performance.total_cmp(&left.scores.performance))
        .then_with(|| left.player.id.cmp(&right.player.id))
}
