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

// POST /progress/init - Lazy per-user setup, one 0% row per course
#[utoipa::path(
    post,
    path = "/progress/init",
    description = "Creates a 0% row per course on first call; later calls are no-ops",
    params(
        ("Authorization" = String, Header, description = "JWT")
    ),
    responses(
        (status = 200, description = "Success, returns the number of rows created"),
        (status = 401, description = "Bad token", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn init_progress(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Response, Response> {
    match controllers::progress::initialize_user_progress(&state, claims.id).await {
        Ok(created) => {
            let body = json!({
                "data": { "created": created },
            });
            Ok((StatusCode::OK, axum::Json(body)).into_response())
        }
        Err(why) => {
            tracing::error!("could not initialize progress for {}: {}", claims.id, why);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                axum::Json(ErrorResponse::new(
                    ErrorTypes::InternalError,
                    "Could not initialize progress",
                )),
            )
                .into_response())
        }
    }
}

// GET /progress - The caller's raw progress rows
#[utoipa::path(
    get,
    path = "/progress",
    description = "All progress rows for the caller",
    params(
        ("Authorization" = String, Header, description = "JWT")
    ),
    responses(
        (status = 200, description = "Success", body = [controllers::progress::ProgressInfo]),
        (status = 401, description = "Bad token", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn get_progress(
    State(state): State<AppState>,
    claims: Claims,
) -> Result<Response, Response> {
    match controllers::progress::get_user_progress(&state, claims.id).await {
        Ok(rows) => {
            let body = json!({
                "data": rows,
            });
            Ok((StatusCode::OK, axum::Json(body)).into_response())
        }
        Err(why) => {
            tracing::error!("could not fetch progress rows: {}", why);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                axum::Json(ErrorResponse::new(
                    ErrorTypes::InternalError,
                    "Could not fetch progress",
                )),
            )
                .into_response())
        }
    }
}
