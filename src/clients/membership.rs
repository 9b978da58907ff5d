use anyhow::Context;
use axum::http::{HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::clients;

// The slice of the membership profile this service reads. Sessions and
// credentials stay entirely on the membership side.
#[derive(Default, Serialize, Deserialize, ToSchema)]
pub struct MemberProfile {
    pub username: String,
    pub email: String,
}

pub async fn get_member_profile(
    client: &reqwest::Client,
    auth_token: &str,
) -> anyhow::Result<MemberProfile> {
    let endpoint = std::env::var("MEMBERSHIP_SERVICE_URL")
        .context("MEMBERSHIP_SERVICE_URL is not set")?
        + "/members/me";

    let mut headers = HeaderMap::new();
    headers.insert(
        reqwest::header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", auth_token))?,
    );

    let profile =
        clients::request::get_request_with_headers::<MemberProfile>(client, &endpoint, headers)
            .await?;
    Ok(profile)
}
