use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};

use super::domain::{ClubId, ClubNeed, Player, PlayerId, Position, UnknownPosition};
use super::explanation::explain;
use super::ranker::{rank, Recommendation, ScoredCandidate};
use super::repository::{ClubNeedDirectory, PlayerSource, SourceError};
use super::scoring::{ConfigurationError, ScoringConfig, ScoringEngine};
use super::views::PlayerSignalReport;

pub const DEFAULT_LIMIT: usize = 5;
pub const MAX_LIMIT: usize = 50;
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(5);

/// How the caller identifies the need to score against.
#[derive(Debug, Clone, PartialEq)]
pub enum NeedSelector {
    Club(ClubId),
    Explicit(ClubNeed),
}

/// Validated-on-entry request for a ranked shortlist.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationRequest {
    pub need: NeedSelector,
    pub limit: Option<usize>,
    pub positions: Option<Vec<Position>>,
    pub as_of: Option<NaiveDate>,
}

impl RecommendationRequest {
    pub fn for_club(club_id: impl Into<String>) -> Self {
        Self {
            need: NeedSelector::Club(ClubId(club_id.into())),
            limit: None,
            positions: None,
            as_of: None,
        }
    }

    pub fn for_need(need: ClubNeed) -> Self {
        Self {
            need: NeedSelector::Explicit(need),
            limit: None,
            positions: None,
            as_of: None,
        }
    }
}

/// Ranked output together with the need it was computed for.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationSet {
    pub need: ClubNeed,
    pub as_of: NaiveDate,
    pub recommendations: Vec<Recommendation>,
}

/// Orchestrates candidate lookup, scoring and ranking for club needs.
pub struct RecommendationService<S, D> {
    engine: Arc<ScoringEngine>,
    players: Arc<S>,
    clubs: Arc<D>,
    fetch_timeout: Duration,
}

impl<S, D> RecommendationService<S, D>
where
    S: PlayerSource + 'static,
    D: ClubNeedDirectory + 'static,
{
    pub fn new(
        players: Arc<S>,
        clubs: Arc<D>,
        config: ScoringConfig,
        fetch_timeout: Duration,
    ) -> Result<Self, ConfigurationError> {
        let engine = Arc::new(ScoringEngine::new(config)?);
        Ok(Self::with_engine(engine, players, clubs, fetch_timeout))
    }

    pub fn with_engine(
        engine: Arc<ScoringEngine>,
        players: Arc<S>,
        clubs: Arc<D>,
        fetch_timeout: Duration,
    ) -> Self {
        Self {
            engine,
            players,
            clubs,
            fetch_timeout,
        }
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    /// Resolve the need, fetch candidates and return the ranked shortlist.
    pub async fn recommend(
        &self,
        request: RecommendationRequest,
    ) -> Result<RecommendationSet, RecommendationError> {
        let limit = validate_limit(request.limit)?;
        let as_of = request.as_of.unwrap_or_else(|| Local::now().date_naive());

        let need = match request.need {
            NeedSelector::Explicit(need) => need,
            NeedSelector::Club(club_id) => {
                let lookup = self.bounded(self.clubs.need_for(&club_id)).await;
                match lookup {
                    Ok(Some(need)) => need,
                    Ok(None) => return Err(RecommendationError::ClubNotFound(club_id)),
                    Err(source) => {
                        warn!(club_id = %club_id, error = %source, "club need lookup failed");
                        return Err(RecommendationError::DataUnavailable(source));
                    }
                }
            }
        };
        validate_need(&need)?;

        let candidates = match self.bounded(self.players.fetch_candidates(&need)).await {
            Ok(candidates) => candidates,
            Err(source) => {
                warn!(club_id = %need.club_id, error = %source, "candidate fetch failed");
                return Err(RecommendationError::DataUnavailable(source));
            }
        };

        let recommendations = recommend_from_pool(
            &self.engine,
            &need,
            candidates,
            limit,
            request.positions.as_deref(),
            as_of,
        )?;

        Ok(RecommendationSet {
            need,
            as_of,
            recommendations,
        })
    }

    /// Active signals and in-window news for one player.
    pub async fn player_signals(
        &self,
        player_id: PlayerId,
        as_of: Option<NaiveDate>,
    ) -> Result<PlayerSignalReport, RecommendationError> {
        let as_of = as_of.unwrap_or_else(|| Local::now().date_naive());

        let player = match self.bounded(self.players.find_player(&player_id)).await {
            Ok(Some(player)) => player,
            Ok(None) => return Err(RecommendationError::PlayerNotFound(player_id)),
            Err(source) => {
                warn!(player_id = %player_id, error = %source, "player lookup failed");
                return Err(RecommendationError::DataUnavailable(source));
            }
        };

        Ok(PlayerSignalReport::build(
            &player,
            self.engine.config().news_window_days,
            as_of,
        ))
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, SourceError>>,
    ) -> Result<T, SourceError> {
        match tokio::time::timeout(self.fetch_timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(SourceError::Timeout(self.fetch_timeout)),
        }
    }
}

/// Score and rank an already-fetched pool. Performs no I/O.
pub fn recommend_from_pool(
    engine: &ScoringEngine,
    need: &ClubNeed,
    players: Vec<Player>,
    limit: usize,
    position_filter: Option<&[Position]>,
    as_of: NaiveDate,
) -> Result<Vec<Recommendation>, RecommendationError> {
    validate_need(need)?;
    let pool_size = players.len();
    let scored = score_candidates(engine, need, players, as_of);
    let ranked = rank(scored, limit, position_filter)?;

    info!(
        club_id = %need.club_id,
        candidates = pool_size,
        returned = ranked.len(),
        "recommendations ranked"
    );
    Ok(ranked)
}

/// Map phase: every candidate is normalized and combined before any ordering happens.
pub fn score_candidates(
    engine: &ScoringEngine,
    need: &ClubNeed,
    players: Vec<Player>,
    as_of: NaiveDate,
) -> Vec<ScoredCandidate> {
    players
        .into_iter()
        .map(|player| {
            let scores = engine.normalize(&player, need, as_of);
            let match_score = engine.combine(&scores);
            if scores.fit == 0.0 {
                debug!(player_id = %player.id, position = %player.position, "position mismatch");
            }
            let explanation = explain(engine, &player, need, &scores, as_of);
            ScoredCandidate {
                player,
                scores,
                match_score,
                explanation,
            }
        })
        .collect()
}

pub fn parse_positions<I, T>(names: I) -> Result<Vec<Position>, RecommendationError>
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    let mut positions = Vec::new();
    for name in names {
        let position: Position = name.as_ref().parse()?;
        if !positions.contains(&position) {
            positions.push(position);
        }
    }
    Ok(positions)
}

fn validate_limit(limit: Option<usize>) -> Result<usize, RecommendationError> {
    let limit = limit.unwrap_or(DEFAULT_LIMIT);
    if (1..=MAX_LIMIT).contains(&limit) {
        Ok(limit)
    } else {
        Err(RecommendationError::InvalidArgument(format!(
            "limit must be between 1 and {MAX_LIMIT} (got {limit})"
        )))
    }
}

fn validate_need(need: &ClubNeed) -> Result<(), RecommendationError> {
    match need.validation_error() {
        Some(message) => Err(RecommendationError::InvalidArgument(message)),
        None => Ok(()),
    }
}

/// Error raised by the recommendation service.
#[derive(Debug, thiserror::Error)]
pub enum RecommendationError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("club '{0}' has no active need profile")]
    ClubNotFound(ClubId),
    #[error("player '{0}' is not in the candidate pool")]
    PlayerNotFound(PlayerId),
    #[error("candidate data unavailable: {0}")]
    DataUnavailable(#[source] SourceError),
}

impl RecommendationError {
    pub fn kind(&self) -> &'static str {
        match self {
            RecommendationError::InvalidArgument(_) => "invalid_argument",
            RecommendationError::ClubNotFound(_) => "club_not_found",
            RecommendationError::PlayerNotFound(_) => "player_not_found",
            RecommendationError::DataUnavailable(_) => "data_unavailable",
        }
    }
}

impl From<UnknownPosition> for RecommendationError {
    fn from(value: UnknownPosition) -> Self {
        Self::InvalidArgument(value.to_string())
    }
}
