use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{ClubId, ClubNeed, PlayerId};
use super::repository::{ClubNeedDirectory, PlayerSource};
use super::service::{
    parse_positions, NeedSelector, RecommendationError, RecommendationRequest,
    RecommendationService,
};
use super::views::RecommendationResponse;

/// JSON body accepted by the recommendation endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendationPayload {
    #[serde(default)]
    pub club_id: Option<String>,
    #[serde(default)]
    pub need: Option<ClubNeed>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub positions: Option<Vec<String>>,
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

/// Query string accepted by the club lookup endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecommendationQuery {
    #[serde(default)]
    pub limit: Option<i64>,
    /// Comma separated position names.
    #[serde(default)]
    pub positions: Option<String>,
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

/// Query string accepted by the player signals endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignalQuery {
    #[serde(default)]
    pub as_of: Option<NaiveDate>,
}

impl RecommendationPayload {
    pub fn into_request(self) -> Result<RecommendationRequest, RecommendationError> {
        let need = match (self.need, self.club_id) {
            (Some(need), _) => NeedSelector::Explicit(need),
            (None, Some(club_id)) if !club_id.trim().is_empty() => {
                NeedSelector::Club(ClubId(club_id.trim().to_string()))
            }
            _ => {
                return Err(RecommendationError::InvalidArgument(
                    "either club_id or need must be provided".to_string(),
                ))
            }
        };

        Ok(RecommendationRequest {
            need,
            limit: convert_limit(self.limit)?,
            positions: self
                .positions
                .map(|names| parse_positions(names))
                .transpose()?,
            as_of: self.as_of,
        })
    }
}

impl RecommendationQuery {
    pub fn into_request(self, club_id: String) -> Result<RecommendationRequest, RecommendationError> {
        let positions = self
            .positions
            .map(|raw| {
                parse_positions(
                    raw.split(',')
                        .map(str::trim)
                        .filter(|name| !name.is_empty()),
                )
            })
            .transpose()?;

        Ok(RecommendationRequest {
            need: NeedSelector::Club(ClubId(club_id)),
            limit: convert_limit(self.limit)?,
            positions,
            as_of: self.as_of,
        })
    }
}

fn convert_limit(limit: Option<i64>) -> Result<Option<usize>, RecommendationError> {
    limit
        .map(|value| {
            usize::try_from(value).map_err(|_| {
                RecommendationError::InvalidArgument(format!(
                    "limit must be a positive integer (got {value})"
                ))
            })
        })
        .transpose()
}

/// Router builder exposing the recommendation endpoints.
pub fn recommendation_router<S, D>(service: Arc<RecommendationService<S, D>>) -> Router
where
    S: PlayerSource + 'static,
    D: ClubNeedDirectory + 'static,
{
    Router::new()
        .route("/api/v1/recommendations", post(recommend_handler::<S, D>))
        .route(
            "/api/v1/recommendations/:club_id",
            get(club_recommendations_handler::<S, D>),
        )
        .route(
            "/api/v1/players/:player_id/signals",
            get(player_signals_handler::<S, D>),
        )
        .with_state(service)
}

pub(crate) async fn recommend_handler<S, D>(
    State(service): State<Arc<RecommendationService<S, D>>>,
    payload: Result<axum::Json<RecommendationPayload>, JsonRejection>,
) -> Response
where
    S: PlayerSource + 'static,
    D: ClubNeedDirectory + 'static,
{
    let axum::Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            return error_response(RecommendationError::InvalidArgument(format!(
                "malformed request body: {}",
                rejection.body_text()
            )))
        }
    };
    let request = match payload.into_request() {
        Ok(request) => request,
        Err(error) => return error_response(error),
    };
    respond(&service, request).await
}

pub(crate) async fn club_recommendations_handler<S, D>(
    State(service): State<Arc<RecommendationService<S, D>>>,
    Path(club_id): Path<String>,
    Query(query): Query<RecommendationQuery>,
) -> Response
where
    S: PlayerSource + 'static,
    D: ClubNeedDirectory + 'static,
{
    let request = match query.into_request(club_id) {
        Ok(request) => request,
        Err(error) => return error_response(error),
    };
    respond(&service, request).await
}

pub(crate) async fn player_signals_handler<S, D>(
    State(service): State<Arc<RecommendationService<S, D>>>,
    Path(player_id): Path<String>,
    Query(query): Query<SignalQuery>,
) -> Response
where
    S: PlayerSource + 'static,
    D: ClubNeedDirectory + 'static,
{
    match service
        .player_signals(PlayerId(player_id), query.as_of)
        .await
    {
        Ok(report) => (StatusCode::OK, axum::Json(report)).into_response(),
        Err(error) => error_response(error),
    }
}

async fn respond<S, D>(
    service: &RecommendationService<S, D>,
    request: RecommendationRequest,
) -> Response
where
    S: PlayerSource + 'static,
    D: ClubNeedDirectory + 'static,
{
    match service.recommend(request).await {
        Ok(set) => {
            let body = RecommendationResponse::from(&set);
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) fn error_response(error: RecommendationError) -> Response {
    let status = match &error {
        RecommendationError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        RecommendationError::ClubNotFound(_) | RecommendationError::PlayerNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        RecommendationError::DataUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    let payload = json!({
        "error": error.to_string(),
        "kind": error.kind(),
    });
    (status, axum::Json(payload)).into_response()
}
