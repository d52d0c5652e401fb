//! Player-club recommendation scoring.
//!
//! Candidates flow through the normalizer and weighting model one at a time, then through
//! the ranker as a whole set. Data access sits behind [`PlayerSource`] and
//! [`ClubNeedDirectory`] so the scoring path stays free of I/O.

pub mod confidence;
pub mod domain;
pub(crate) mod explanation;
pub mod ranker;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod views;

#[cfg(test)]
mod tests;

pub use confidence::ConfidenceTier;
pub use domain::{
    AgeRange, ClubId, ClubNeed, NewsMention, Player, PlayerId, PlayerSignal, Position,
    PreferredFoot, RequirementPriorities, SignalKind, UnknownPosition,
};
pub use explanation::Explanation;
pub use ranker::{rank, Recommendation, ScoredCandidate};
pub use repository::{ClubNeedDirectory, PlayerSource, SourceError};
pub use router::{recommendation_router, RecommendationPayload, RecommendationQuery, SignalQuery};
pub use scoring::{
    ConfigurationError, Factor, FactorContribution, FactorScores, FactorWeights, RatingScale,
    ScoringConfig, ScoringEngine,
};
pub use service::{
    parse_positions, recommend_from_pool, score_candidates, NeedSelector, RecommendationError,
    RecommendationRequest, RecommendationService, RecommendationSet, DEFAULT_FETCH_TIMEOUT,
    DEFAULT_LIMIT, MAX_LIMIT,
};
pub use views::{FactorBreakdown, PlayerSignalReport, RecommendationResponse, RecommendationView};
