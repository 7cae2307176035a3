use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tracing::{event, Level};

/// The JSON error envelope the backend API returns: `{"error": {"kind": ..., "message": ...}}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseData {
    error: ErrorDetails,
}

#[derive(Debug, Serialize, Deserialize)]
struct ErrorDetails {
    kind: Cow<'static, str>,
    message: Cow<'static, str>,
}

impl ErrorResponseData {
    pub fn new(
        kind: impl Into<Cow<'static, str>>,
        message: impl Into<Cow<'static, str>>,
    ) -> ErrorResponseData {
        ErrorResponseData {
            error: ErrorDetails {
                kind: kind.into(),
                message: message.into(),
            },
        }
    }

    /// Try to read an error envelope out of a response body.
    pub fn from_body(body: &str) -> Option<ErrorResponseData> {
        let ret = serde_json::from_str::<ErrorResponseData>(body).ok()?;
        event!(Level::DEBUG, kind=%ret.error.kind, message=%ret.error.message, "Backend error response");
        Some(ret)
    }

    pub fn kind(&self) -> &str {
        &self.error.kind
    }

    pub fn message(&self) -> &str {
        &self.error.message
    }
}
