//! CORS middleware configuration for cross-origin requests.
//!
//! Development is permissive so that local front ends and tools can reach the
//! API from any origin. Everywhere else only the configured origins are
//! accepted.

use actix_cors::Cors;
use actix_web::http::{header, Method};

use cs_shared::{CorsConfig, Environment};

/// Creates a CORS middleware instance for the given environment.
pub fn create_cors(environment: Environment, config: &CorsConfig) -> Cors {
    if environment.is_development() {
        create_development_cors(config.max_age)
    } else {
        create_restricted_cors(config)
    }
}

fn create_development_cors(max_age: usize) -> Cors {
    tracing::info!("Configuring CORS for development environment");

    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::ORIGIN,
            header::USER_AGENT,
            header::HeaderName::from_static("x-requested-with"),
        ])
        .expose_headers(exposed_headers())
        .max_age(max_age)
        .supports_credentials()
}

fn create_restricted_cors(config: &CorsConfig) -> Cors {
    tracing::info!(
        origins = config.allowed_origins.len(),
        "Configuring CORS with origin allow-list"
    );

    let mut cors = Cors::default()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
        .expose_headers(exposed_headers())
        .max_age(config.max_age);

    for origin in &config.allowed_origins {
        if origin == "*" {
            tracing::warn!("Ignoring wildcard entry in ALLOWED_ORIGINS");
            continue;
        }
        tracing::info!(origin = %origin, "Adding allowed origin");
        cors = cors.allowed_origin(origin);
    }

    cors
}

fn exposed_headers() -> Vec<header::HeaderName> {
    vec![
        header::RETRY_AFTER,
        header::HeaderName::from_static("x-request-id"),
    ]
}
