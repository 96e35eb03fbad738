use actix_web::{web, HttpResponse};
use tracing_actix_web::RequestId;
use validator::Validate;

use cs_shared::identifier::normalize_identifier;
use cs_shared::ApiResponse;

use crate::app::AppState;
use crate::dto::{VerifyCodeRequest, VerifyCodeResponse};
use crate::handlers::error::ApiError;

/// Handler for POST /api/v1/verification/verify
///
/// A correct code is consumed: submitting it again answers 404. A wrong code
/// answers 401 and leaves the issued code usable until it expires.
pub async fn verify_code(
    state: web::Data<AppState>,
    request_id: RequestId,
    request: web::Json<VerifyCodeRequest>,
) -> Result<HttpResponse, ApiError> {
    let request = request.into_inner();
    request.validate()?;

    let identifier = normalize_identifier(&request.identifier)?;

    state
        .verification_service
        .verify(identifier.as_str(), request.code.trim())
        .await?;

    Ok(HttpResponse::Ok().json(
        ApiResponse::success(VerifyCodeResponse { verified: true })
            .with_message("Verification successful")
            .with_request_id(request_id.to_string()),
    ))
}
