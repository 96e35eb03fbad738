//! Mapping from domain failures to HTTP responses

use std::collections::HashMap;

use actix_web::{
    error::{InternalError, JsonPayloadError},
    http::{header, StatusCode},
    web, HttpRequest, HttpResponse, ResponseError,
};
use thiserror::Error;
use validator::ValidationErrors;

use cs_core::{CodeError, IssueError, SendError};
use cs_shared::identifier::IdentifierError;
use cs_shared::{error_codes, ErrorResponse, IntoErrorResponse};

/// Every failure a handler can return
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request data")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Identifier(#[from] IdentifierError),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Issue(#[from] IssueError),

    #[error(transparent)]
    Code(#[from] CodeError),
}

impl IntoErrorResponse for ApiError {
    fn to_error_response(&self) -> ErrorResponse {
        match self {
            ApiError::Validation(errors) => {
                ErrorResponse::new(error_codes::VALIDATION_ERROR, self.to_string())
                    .add_detail("fields", field_messages(errors))
            }
            ApiError::Identifier(err) => {
                ErrorResponse::new(error_codes::IDENTIFIER_INVALID, err.to_string())
            }
            ApiError::BadRequest(message) => {
                ErrorResponse::new(error_codes::BAD_REQUEST, message.clone())
            }
            ApiError::Issue(err) => err.to_error_response(),
            ApiError::Code(err) => err.to_error_response(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Identifier(_) | ApiError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Issue(IssueError::Throttled { .. }) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Issue(IssueError::Delivery(err)) => send_error_status(err),
            ApiError::Code(CodeError::NotFound) => StatusCode::NOT_FOUND,
            ApiError::Code(CodeError::Expired) => StatusCode::GONE,
            ApiError::Code(CodeError::Mismatch) => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        if let ApiError::Issue(err) = self {
            if let Some(retry_after) = err.retry_after() {
                builder.insert_header((header::RETRY_AFTER, retry_after.as_secs().to_string()));
            }
        }
        builder.json(self.to_error_response())
    }
}

fn send_error_status(err: &SendError) -> StatusCode {
    match err {
        SendError::InvalidDestination { .. } => StatusCode::BAD_REQUEST,
        SendError::ChannelUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        SendError::Rejected { .. } | SendError::Transport { .. } => StatusCode::BAD_GATEWAY,
        SendError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
    }
}

fn field_messages(errors: &ValidationErrors) -> HashMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let messages = errors
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

/// JSON extractor config: payload limit plus errors in the shared envelope
pub fn json_config(limit: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
            let response = HttpResponse::build(err.status_code()).json(ErrorResponse::new(
                error_codes::BAD_REQUEST,
                err.to_string(),
            ));
            InternalError::from_response(err, response).into()
        })
}
