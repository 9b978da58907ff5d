use axum::http::HeaderMap;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::common::error::ErrorResponse;

pub async fn get_request_with_headers<R: for<'a> Deserialize<'a>>(
    http_client: &reqwest::Client,
    req_url: &str,
    headers: HeaderMap,
) -> anyhow::Result<R> {
    let response = http_client.get(req_url).headers(headers).send().await?;
    match response.status() {
        StatusCode::OK => {
            // Peer services wrap their payloads in a "data" field
            #[derive(Deserialize)]
            struct Data {
                data: serde_json::Value,
            }
            let resp: Data = response.json().await?;
            Ok(serde_json::from_value(resp.data)?)
        }
        _ => {
            let err = response.json::<ErrorResponse>().await?;
            Err(anyhow::anyhow!(
                "Internal error: could not fetch {}: {}",
                req_url,
                err.error_msg()
            ))
        }
    }
}
