use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    common::token::Claims,
    controllers,
    handlers::{ErrorResponse, ErrorTypes},
    AppState,
};

// GET /certs - Certificates for every completed course. Missing records are
// created on the way out, so finishing a course is enough to be listed.
#[utoipa::path(
    get,
    path = "/certs",
    description = "Certificate records for the caller's completed courses",
    params(
        ("Authorization" = String, Header, description = "JWT")
    ),
    responses(
        (status = 200, description = "Success", body = [controllers::certs::CertInfo]),
        (status = 401, description = "Bad token", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn get_certs(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Response, Response> {
    match controllers::certs::get_certs(&state, claims.id).await {
        Ok(certs) => {
            let body = json!({
                "data": certs,
            });
            Ok((StatusCode::OK, axum::Json(body)).into_response())
        }
        Err(why) => {
            tracing::error!("could not fetch certs: {}", why);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                axum::Json(ErrorResponse::new(
                    ErrorTypes::InternalError,
                    "Could not fetch certificates",
                )),
            )
                .into_response())
        }
    }
}
