use actix_web::{web, HttpResponse};
use chrono::Utc;

use cs_shared::types::HealthStatus;
use cs_shared::HealthResponse;

use crate::app::AppState;

/// Handler for GET /api/health
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: HealthStatus::Ok,
        service: "changesentinel-api".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        active_verifications: state.verification_service.active_codes(),
    })
}
