use actix_web::{web, HttpResponse};
use tracing_actix_web::RequestId;
use validator::Validate;

use cs_shared::identifier::normalize_identifier;
use cs_shared::ApiResponse;

use super::resolve_channel;
use crate::app::AppState;
use crate::dto::{SendCodeRequest, SendCodeResponse};
use crate::handlers::error::ApiError;

/// Handler for POST /api/v1/verification/send
///
/// Issues a code to the identifier over SMS or email.
///
/// # Request Body
///
/// ```json
/// {
///     "identifier": "+15551234567",
///     "channel": "sms"
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "success": true,
///     "data": {
///         "channel": "sms",
///         "expires_at": "2025-08-14T10:10:00Z",
///         "expires_in": 600,
///         "resend_after": 60
///     },
///     "message": "Verification code sent",
///     "timestamp": "2025-08-14T10:00:00Z",
///     "request_id": "550e8400-e29b-41d4-a716-446655440000"
/// }
/// ```
///
/// ## Errors
/// 400 for bad input, 429 with `Retry-After` inside the cooldown, 502/504 when
/// the provider fails, 503 when the channel is not configured.
pub async fn send_code(
    state: web::Data<AppState>,
    request_id: RequestId,
    request: web::Json<SendCodeRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    request.validate()?;

    let identifier = normalize_identifier(&request.identifier)?;
    let channel = resolve_channel(&identifier, request.channel.as_deref())?;

    tracing::debug!(
        request_id = %request_id,
        identifier = %identifier.masked(),
        channel = %channel,
        "Processing send_code request"
    );

    let receipt = state
        .verification_service
        .issue(identifier.as_str(), identifier.as_str(), channel)
        .await?;

    let data = SendCodeResponse::from_receipt(&receipt, state.verification_service.now());
    Ok(HttpResponse::Ok().json(
        ApiResponse::success(data)
            .with_message("Verification code sent")
            .with_request_id(request_id.to_string()),
    ))
}
