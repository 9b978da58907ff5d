use std::fmt::Display;

use axum::{http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub struct AppError(anyhow::Error);
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            axum::Json(ErrorResponse::new(
                ErrorTypes::InternalError,
                &format!("Something went wrong: {}", self.0),
            )),
        )
            .into_response()
    }
}

impl<E: Into<anyhow::Error>> From<E> for AppError {
    fn from(value: E) -> Self {
        Self(value.into())
    }
}

pub mod helpers {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::common::error::{ErrorResponse, ErrorTypes};

    pub fn error_response(
        status: StatusCode,
        error_type: ErrorTypes,
        error_msg: &str,
    ) -> axum::response::Response {
        (
            status,
            axum::Json(ErrorResponse::new(error_type, error_msg)),
        )
            .into_response()
    }
}

// Errors stuff

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    error_type: String,
    error_msg: String,
}

impl ErrorResponse {
    pub fn new(error_type: ErrorTypes, error_msg: &str) -> Self {
        Self {
            error_type: error_type.to_string(),
            error_msg: error_msg.to_owned(),
        }
    }

    pub fn error_msg(&self) -> &str {
        &self.error_msg
    }
}

pub enum ErrorTypes {
    InternalError,
    NotFound,
    JwtTokenExpired,
    NoAuthHeader,
    ActivityUnavailable,
}

impl Display for ErrorTypes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InternalError => write!(f, "server_internal_error"),
            Self::NotFound => write!(f, "not_found"),
            Self::JwtTokenExpired => write!(f, "jwt_token_expired"),
            Self::NoAuthHeader => write!(f, "no_auth_header"),
            Self::ActivityUnavailable => write!(f, "activity_unavailable"),
        }
    }
}
