use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::app_state::AppState;

/// Liveness
/// GET /health
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

/// Readiness: verifies the database answers
/// GET /health/ready
pub async fn readiness_check(state: web::Data<AppState>) -> HttpResponse {
    match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => HttpResponse::Ok().json(json!({ "status": "ready" })),
        Err(e) => {
            tracing::warn!(error = %e, "readiness probe failed");
            HttpResponse::ServiceUnavailable().json(json!({ "status": "degraded" }))
        }
    }
}
