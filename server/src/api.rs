//! HTTP routes.

use axum::{
    Json, Router,
    extract::rejection::JsonRejection,
    routing::{get, post},
};
use log::{info, warn};
use serde_json::{Value, json};
use topup::{BatchResult, PlanRequest, compute, validate_request};

use crate::error::{ApiError, ApiResult};

pub fn app_router() -> Router {
    Router::new()
        .route("/api/rebalance", post(rebalance))
        .route("/health", get(health))
}

/// POST /api/rebalance
async fn rebalance(
    payload: Result<Json<PlanRequest>, JsonRejection>,
) -> ApiResult<Json<BatchResult>> {
    let Json(request) = payload.map_err(|e| {
        warn!("Rejected request body: {}", e.body_text());
        ApiError::BadRequest(e.body_text())
    })?;

    if let Err(e) = validate_request(&request) {
        warn!("Rejected plan request: {e}");
        return Err(e.into());
    }

    let plan = compute(&request.holdings, request.budget);
    info!(
        "Planned {} holdings: {} of {} spent",
        plan.results.len(),
        plan.total_buy_amount,
        request.budget
    );
    Ok(Json(plan))
}

/// GET /health
async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
