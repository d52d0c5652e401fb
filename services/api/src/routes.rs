use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use club_scout::recommendations::{
    recommendation_router, ClubNeedDirectory, PlayerSource, RecommendationService,
};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_recommendation_routes<S, D>(
    service: Arc<RecommendationService<S, D>>,
) -> axum::Router
where
    S: PlayerSource + 'static,
    D: ClubNeedDirectory + 'static,
{
    recommendation_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::FixtureStore;
    use axum::body::Body;
    use axum::http::Request;
    use club_scout::recommendations::ScoringConfig;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;
    use tower::ServiceExt;

    fn app(ready: bool) -> axum::Router {
        let store = Arc::new(FixtureStore::seeded().expect("seed fixture is valid json"));
        let service = RecommendationService::new(
            store.clone(),
            store,
            ScoringConfig::default(),
            Duration::from_millis(500),
        )
        .expect("default config is valid");
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(false)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        state.readiness.store(ready, Ordering::Release);

        with_recommendation_routes(Arc::new(service)).layer(Extension(state))
    }

    async fn get(router: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router
            .oneshot(Request::get(uri).body(Body::empty()).expect("request builds"))
            .await
            .expect("route executes");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        let payload = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, payload)
    }

    #[tokio::test]
    async fn health_is_always_ok() {
        let (status, body) = get(app(false), "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn readiness_follows_the_flag() {
        let (status, body) = get(app(false), "/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "initializing");

        let (status, body) = get(app(true), "/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
    }

    #[tokio::test]
    async fn seeded_clubs_are_served() {
        let (status, body) = get(
            app(true),
            "/api/v1/recommendations/barca_1?limit=3&as_of=2025-09-01",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["club_id"], "barca_1");
        assert_eq!(body["club_name"], "FC Barcelona");
        let recommendations = body["recommendations"].as_array().expect("array");
        assert!(!recommendations.is_empty());
        assert!(recommendations.len() <= 3);
        assert_eq!(recommendations[0]["rank"], 1);
    }

    #[tokio::test]
    async fn metrics_render_as_text() {
        let response = app(true)
            .oneshot(Request::get("/metrics").body(Body::empty()).expect("request builds"))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
    }
}
