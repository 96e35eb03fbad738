//! Application state and factory
//!
//! This module holds the state shared by every worker and builds the
//! actix-web application around it.

use std::sync::Arc;

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, HttpResponse,
};
use tracing_actix_web::TracingLogger;

use cs_core::{NotificationChannel, VerificationService};
use cs_shared::{error_codes, Environment, ErrorResponse, ServerConfig};

use crate::handlers::error::json_config;
use crate::middleware::cors::create_cors;
use crate::routes::{health::health_check, verification};

/// Verification service behind a type-erased notification channel
pub type SharedVerificationService = VerificationService<dyn NotificationChannel>;

/// Application state that holds shared services
pub struct AppState {
    pub verification_service: Arc<SharedVerificationService>,
}

impl AppState {
    pub fn new(verification_service: Arc<SharedVerificationService>) -> Self {
        Self {
            verification_service,
        }
    }
}

/// Create and configure the application with all dependencies
pub fn create_app(
    state: web::Data<AppState>,
    environment: Environment,
    server: &ServerConfig,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let cors = create_cors(environment, &server.cors);

    App::new()
        .app_data(state)
        .app_data(json_config(server.max_payload_size))
        // Request spans wrap everything, including CORS rejections
        .wrap(cors)
        .wrap(TracingLogger::default())
        .route("/api/health", web::get().to(health_check))
        .service(
            web::scope("/api/v1")
                .service(
                    web::scope("/verification")
                        .route("/send", web::post().to(verification::send_code))
                        .route("/verify", web::post().to(verification::verify_code)),
                )
                .route("", web::get().to(api_documentation)),
        )
        .default_service(web::route().to(not_found))
}

/// API documentation endpoint
async fn api_documentation() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "ChangeSentinel API v1",
        "endpoints": {
            "health": "/api/health",
            "verification": {
                "send": {
                    "path": "/api/v1/verification/send",
                    "method": "POST",
                    "description": "Issue a verification code over SMS or email",
                    "request_body": {
                        "identifier": "string (E.164 phone number or email address)",
                        "channel": "optional string ('sms' or 'email', inferred when omitted)"
                    },
                    "responses": {
                        "200": "Code sent successfully",
                        "400": "Invalid identifier or channel",
                        "429": "Resend requested before the cooldown elapsed",
                        "502": "Provider rejected or failed to deliver the code",
                        "503": "Channel not configured",
                        "504": "Provider did not respond in time"
                    }
                },
                "verify": {
                    "path": "/api/v1/verification/verify",
                    "method": "POST",
                    "description": "Check a previously issued code",
                    "request_body": {
                        "identifier": "string",
                        "code": "string (exactly 6 digits)"
                    },
                    "responses": {
                        "200": "Code accepted and consumed",
                        "400": "Malformed request",
                        "401": "Code does not match",
                        "404": "No code issued, or already used",
                        "410": "Code expired"
                    }
                }
            }
        }
    }))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
