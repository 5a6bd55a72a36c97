// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::{Response, StatusCode};

use crate::error::{AppError, Result};
use crate::models::ApiConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &ApiConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Pass successful responses through; turn the rest into `AppError::Network`.
///
/// A 401 is only logged. Re-authentication is left to the caller.
pub async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::UNAUTHORIZED {
        log::warn!("Unauthorized - Please log in again.");
    }

    let body = response.text().await.unwrap_or_default();
    let message = backend_message(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    });
    log::debug!("Response error {}: {}", status, message);
    Err(AppError::network(Some(status.as_u16()), message))
}

/// Extract the human-readable detail from an error body.
///
/// Prefers a JSON `message` field, then a bare JSON string, then raw text.
pub fn backend_message(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    match serde_json::from_str::<serde_json::Value>(trimmed) {
        Ok(serde_json::Value::Object(map)) => map
            .get("message")
            .and_then(|m| m.as_str())
            .or_else(|| map.get("error").and_then(|m| m.as_str()))
            .map(str::to_string)
            .or_else(|| Some(trimmed.to_string())),
        Ok(serde_json::Value::String(s)) => Some(s),
        _ => Some(trimmed.to_string()),
    }
}
