//! HTTP plumbing shared by the hosted-service clients.
//!
//! Both the text-generation client and the knowledge base client speak JSON
//! over HTTPS with a bearer API key, and both report failures the same way:
//! a status code, an `x-amzn-ErrorType` header and a `{"message": ...}` body.

use ragchat_core::{AppError, AppResult};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// Error codes that mean "slow down and try again".
const THROTTLING_CODES: &[&str] = &[
    "ThrottlingException",
    "TooManyRequestsException",
    "ServiceUnavailableException",
    "ModelNotReadyException",
];

/// A non-success response from a hosted service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{code} ({status}): {message}")]
pub struct ServiceError {
    pub status: u16,
    pub code: String,
    pub message: String,
}

impl ServiceError {
    /// Build from the parts of a failed response.
    pub fn from_parts(status: StatusCode, headers: &HeaderMap, body: &str) -> Self {
        let code = headers
            .get("x-amzn-errortype")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(':').next())
            .map(str::to_string)
            .or_else(|| error_field(body, &["__type", "code"]))
            .map(|code| code.rsplit('#').next().unwrap_or(&code).to_string())
            .unwrap_or_else(|| {
                status
                    .canonical_reason()
                    .unwrap_or("UnknownError")
                    .replace(' ', "")
            });

        let message = error_field(body, &["message", "Message"])
            .unwrap_or_else(|| body.trim().to_string());

        Self {
            status: status.as_u16(),
            code,
            message,
        }
    }

    /// Throttling-class failures are worth a bounded retry.
    pub fn is_throttling(&self) -> bool {
        self.status == StatusCode::TOO_MANY_REQUESTS.as_u16()
            || self.status == StatusCode::SERVICE_UNAVAILABLE.as_u16()
            || THROTTLING_CODES.contains(&self.code.as_str())
    }

    /// Convert into the application error taxonomy.
    ///
    /// `category` wraps permanent failures (e.g. `AppError::Llm`).
    pub fn into_app_error(self, category: fn(String) -> AppError) -> AppError {
        if self.is_throttling() {
            AppError::Throttled(self.to_string())
        } else {
            category(self.to_string())
        }
    }
}

fn error_field(body: &str, keys: &[&str]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    keys.iter()
        .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .map(str::to_string)
}

/// Build a reqwest client with the configured timeout.
pub fn build_http_client(timeout: Duration) -> AppResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))
}

/// POST a JSON body and decode a JSON response.
///
/// Transport failures (connect, timeout) and undecodable bodies map to
/// `category`; error statuses go through [`ServiceError`].
pub async fn post_json<B, R>(
    client: &reqwest::Client,
    url: reqwest::Url,
    api_key: Option<&str>,
    body: &B,
    category: fn(String) -> AppError,
) -> AppResult<R>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let mut request = client
        .post(url.clone())
        .header("Accept", "application/json")
        .json(body);

    if let Some(key) = api_key {
        request = request.bearer_auth(key);
    }

    let response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            category(format!("Request to {} timed out: {}", url, e))
        } else {
            category(format!("Failed to send request to {}: {}", url, e))
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let error = ServiceError::from_parts(status, &headers, &body);
        tracing::debug!("Service error from {}: {}", url, error);
        return Err(error.into_app_error(category));
    }

    response
        .json::<R>()
        .await
        .map_err(|e| category(format!("Failed to parse response from {}: {}", url, e)))
}
