use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    common::token::AuthHeader,
    controllers,
    handlers::{ErrorResponse, ErrorTypes},
    AppState,
};

// GET /users/me - Membership profile plus course stats
#[utoipa::path(
    get,
    path = "/users/me",
    description = "The caller's membership profile and their course counts",
    params(
        ("Authorization" = String, Header, description = "JWT")
    ),
    responses(
        (status = 200, description = "Success", body = controllers::user::UserInfoFull),
        (status = 401, description = "Bad token", body = ErrorResponse),
        (status = 500, description = "Membership service or storage failure", body = ErrorResponse)
    )
)]
pub async fn get_me(State(state): State<AppState>, auth: AuthHeader) -> Result<Response, Response> {
    match controllers::user::get_user_info_full(&state, &auth).await {
        Ok(info) => {
            let body = json!({
                "data": info,
            });
            Ok((StatusCode::OK, axum::Json(body)).into_response())
        }
        Err(why) => {
            tracing::error!("could not fetch user info: {}", why);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                axum::Json(ErrorResponse::new(
                    ErrorTypes::InternalError,
                    "Could not fetch user info",
                )),
            )
                .into_response())
        }
    }
}
