//! The two backend endpoints the uploader talks to.
//!
//! Both the credential API and the files API accept the same envelope,
//! `{"action": ..., "body": ...}`, so one trait covers them.

use std::time::Duration;

use async_trait::async_trait;
use cloud_upload_http_errors::ErrorResponseData;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{event, instrument, Level};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Backend returned {status}: {message}")]
    Status { status: u16, message: String },
}

#[async_trait]
pub trait BackendApi: Send + Sync {
    async fn post(&self, action: &str, body: Value) -> Result<Value, ApiError>;
}

/// [`BackendApi`] over HTTP: every action is a JSON `POST` to a single endpoint.
#[derive(Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    url: String,
    token: Option<String>,
}

impl HttpApi {
    pub fn new(url: impl Into<String>, token: Option<String>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(HttpApi {
            client,
            url: url.into(),
            token,
        })
    }
}

impl std::fmt::Debug for HttpApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpApi")
            .field("url", &self.url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[async_trait]
impl BackendApi for HttpApi {
    #[instrument(skip(self, body), fields(url = %self.url))]
    async fn post(&self, action: &str, body: Value) -> Result<Value, ApiError> {
        let mut request = self
            .client
            .post(&self.url)
            .json(&json!({ "action": action, "body": body }));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = match ErrorResponseData::from_body(&text) {
                Some(data) => format!("{}: {}", data.kind(), data.message()),
                None => text,
            };
            event!(Level::ERROR, %action, status = status.as_u16(), %message, "Backend request failed");

            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        // Some actions answer with an empty body.
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Ok(Value::Null);
        }

        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(value),
            Err(e) => {
                event!(Level::WARN, %action, error = %e, "Response body is not JSON");
                Ok(Value::String(String::from_utf8_lossy(&bytes).into_owned()))
            }
        }
    }
}
