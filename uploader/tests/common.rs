use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use cloud_upload::{ApiError, BackendApi};
use once_cell::sync::Lazy;
use serde_json::{json, Value};

/// A recorded backend call.
#[derive(Debug, Clone)]
pub struct Call {
    pub action: String,
    pub body: Value,
}

/// In-memory [`BackendApi`] answering each action with a canned response.
#[derive(Clone, Default)]
pub struct FakeBackend {
    responses: Arc<Mutex<HashMap<String, Result<Value, u16>>>>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Lazy::force(&cloud_upload_test::TRACING);
        FakeBackend::default()
    }

    /// Share the call log with another backend so ordering across both can be checked.
    pub fn sharing_calls_with(other: &FakeBackend) -> Self {
        FakeBackend {
            responses: Arc::new(Mutex::new(HashMap::new())),
            calls: other.calls.clone(),
        }
    }

    pub fn respond(self, action: &str, response: Value) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(action.to_string(), Ok(response));
        self
    }

    pub fn fail(self, action: &str, status: u16) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(action.to_string(), Err(status));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn actions(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.action).collect()
    }
}

#[async_trait]
impl BackendApi for FakeBackend {
    async fn post(&self, action: &str, body: Value) -> Result<Value, ApiError> {
        self.calls.lock().unwrap().push(Call {
            action: action.to_string(),
            body,
        });

        match self.responses.lock().unwrap().get(action) {
            Some(Ok(value)) => Ok(value.clone()),
            Some(Err(status)) => Err(ApiError::Status {
                status: *status,
                message: format!("{action} failed"),
            }),
            None => Ok(Value::Null),
        }
    }
}

pub fn created_record() -> Value {
    json!({ "id": 17, "date": "2024-01-01", "uuid": "abc123" })
}

pub fn oss_credentials() -> Value {
    json!({
        "Credentials": {
            "AccessKeyId": "AK",
            "AccessKeySecret": "SK",
            "SecurityToken": "TOK"
        }
    })
}

pub fn cos_credentials() -> Value {
    let now = unix_now();
    json!({
        "credentials": {
            "tmpSecretId": "ID",
            "tmpSecretKey": "KEY",
            "sessionToken": "SESSION"
        },
        "startTime": now - 60,
        "expiredTime": now + 1800
    })
}

fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}
