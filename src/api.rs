// 🌐 HTTP adapter - POST /check_transactions
// Parses the request, runs the assessor, serializes the ratings

use crate::assessment::{RiskAssessor, RiskRateResults};
use crate::error::ApiError;
use crate::transaction::TransactionsInput;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    assessor: Arc<RiskAssessor>,
}

impl AppState {
    pub fn new(assessor: RiskAssessor) -> Self {
        AppState {
            assessor: Arc::new(assessor),
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /health - Health check
async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: crate::VERSION,
    })
}

/// POST /check_transactions - Rate every transaction in the batch
async fn check_transactions(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    if body.is_empty() {
        return Err(ApiError::BadRequest("request body is empty".to_string()));
    }

    let input: TransactionsInput = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("invalid transactions payload: {}", e)))?;

    let assessment_id = Uuid::new_v4();
    let results = state.assessor.assess(&input.transactions);

    info!(
        assessment_id = %assessment_id,
        transactions = input.transactions.len(),
        high = count_label(&results, "high"),
        "Batch assessed"
    );

    pretty_json(&results)
}

fn count_label(results: &RiskRateResults, label: &str) -> usize {
    results.risk_ratings.iter().filter(|l| l.as_str() == label).count()
}

// Indented JSON response body
fn pretty_json<T: Serialize>(value: &T) -> Result<Response, ApiError> {
    let body = serde_json::to_string_pretty(value).map_err(anyhow::Error::from)?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json; charset=utf-8")],
        body,
    )
        .into_response())
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/check_transactions", post(check_transactions))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn app() -> Router {
        create_router(AppState::new(RiskAssessor::default()))
    }

    async fn post_body(body: &'static str) -> (StatusCode, serde_json::Value) {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/check_transactions")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_valid_post() {
        let (status, json) = post_body(
            r#"{
                "transactions": [
                  {"id": 1, "user_id": 1, "amount_us_cents": 200000, "card_id": 1},
                  {"id": 2, "user_id": 1, "amount_us_cents": 600000, "card_id": 1},
                  {"id": 3, "user_id": 1, "amount_us_cents": 1100000, "card_id": 1},
                  {"id": 4, "user_id": 2, "amount_us_cents": 100000, "card_id": 2},
                  {"id": 5, "user_id": 2, "amount_us_cents": 100000, "card_id": 3},
                  {"id": 6, "user_id": 2, "amount_us_cents": 100000, "card_id": 4}
                ]
            }"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            serde_json::json!({
                "risk_ratings": ["low", "medium", "high", "low", "medium", "high"]
            })
        );
    }

    #[tokio::test]
    async fn test_empty_body() {
        let (status, json) = post_body("").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let (status, _) = post_body(r#""transactions": [ {"id": 1, "id": 1}, ] }"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_fields() {
        let (status, _) = post_body(r#"{"transactions": [{"id": 1, "user_id": 1}]}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let (status, json) = post_body(r#"{"transactions": []}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, serde_json::json!({ "risk_ratings": [] }));
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_path() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
