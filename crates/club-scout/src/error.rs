use crate::config::ConfigError;
use crate::recommendations::{ConfigurationError, RecommendationError};
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Scoring(ConfigurationError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Fixture(serde_json::Error),
    Render(serde_json::Error),
    Server(axum::Error),
    Recommendation(RecommendationError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Scoring(err) => write!(f, "scoring configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Fixture(err) => write!(f, "fixture error: {}", err),
            AppError::Render(err) => write!(f, "render error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Recommendation(err) => write!(f, "recommendation error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Scoring(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Fixture(err) => Some(err),
            AppError::Render(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Recommendation(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Recommendation(RecommendationError::InvalidArgument(_)) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Recommendation(
                RecommendationError::ClubNotFound(_) | RecommendationError::PlayerNotFound(_),
            ) => StatusCode::NOT_FOUND,
            AppError::Recommendation(RecommendationError::DataUnavailable(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            AppError::Config(_)
            | AppError::Scoring(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Fixture(_)
            | AppError::Render(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<ConfigurationError> for AppError {
    fn from(value: ConfigurationError) -> Self {
        Self::Scoring(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Fixture(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<RecommendationError> for AppError {
    fn from(value: RecommendationError) -> Self {
        Self::Recommendation(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommendations::SourceError;
    use std::time::Duration;

    #[test]
    fn recommendation_errors_map_to_caller_facing_statuses() {
        let invalid = AppError::from(RecommendationError::InvalidArgument("limit".to_string()));
        assert_eq!(invalid.into_response().status(), StatusCode::BAD_REQUEST);

        let unavailable = AppError::from(RecommendationError::DataUnavailable(
            SourceError::Timeout(Duration::from_millis(10)),
        ));
        assert_eq!(
            unavailable.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn rendering_failures_are_not_reported_as_fixture_errors() {
        let source = serde_json::from_str::<u8>("not json").expect_err("invalid json");
        let error = AppError::Render(source);

        assert!(error.to_string().starts_with("render error"));
        assert!(std::error::Error::source(&error).is_some());
        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn scoring_configuration_errors_are_internal() {
        let error = AppError::from(ConfigurationError::NewsWindow);
        assert!(error.to_string().starts_with("scoring configuration error"));
        assert_eq!(
            error.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
