use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::handlers::{ErrorResponse, ErrorTypes};

// The membership service issues and refreshes these tokens; this side only
// reads the claims out of them.
#[derive(Serialize, Deserialize, Clone)]
pub struct Claims {
    pub id: u32,
    pub exp: i64,
}

impl<S: std::marker::Sync> axum::extract::FromRequestParts<S> for Claims {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get("Authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(|s| s.split_whitespace().last())
            .unwrap_or("");

        match decode::<Claims>(
            token,
            &DecodingKey::from_secret(std::env::var("SECRET_WORD_JWT").unwrap().as_ref()),
            &Validation::default(),
        ) {
            Ok(claims) => Ok(claims.claims),
            Err(why) => {
                tracing::debug!("token rejected: {}", why);
                Err((
                    StatusCode::UNAUTHORIZED,
                    axum::Json(ErrorResponse::new(
                        ErrorTypes::JwtTokenExpired,
                        "Token update requested",
                    )),
                )
                    .into_response())
            }
        }
    }
}

// Claims plus the raw token, for handlers that forward the caller's identity
// to the membership service.
pub struct AuthHeader {
    pub token: String,
    pub claims: Claims,
}

impl<S: std::marker::Sync> axum::extract::FromRequestParts<S> for AuthHeader {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get("Authorization")
            .and_then(|value| value.to_str().ok())
            .and_then(|s| s.split_whitespace().last())
            .unwrap_or("")
            .to_owned();

        if token.is_empty() {
            return Err((
                StatusCode::UNAUTHORIZED,
                axum::Json(ErrorResponse::new(
                    ErrorTypes::NoAuthHeader,
                    "Authorization header is missing",
                )),
            )
                .into_response());
        }

        match decode::<Claims>(
            &token,
            &DecodingKey::from_secret(std::env::var("SECRET_WORD_JWT").unwrap().as_ref()),
            &Validation::default(),
        ) {
            Ok(claims) => Ok(AuthHeader {
                token,
                claims: claims.claims,
            }),
            Err(why) => {
                tracing::debug!("token rejected: {}", why);
                Err((
                    StatusCode::UNAUTHORIZED,
                    axum::Json(ErrorResponse::new(
                        ErrorTypes::JwtTokenExpired,
                        "Token update requested",
                    )),
                )
                    .into_response())
            }
        }
    }
}
