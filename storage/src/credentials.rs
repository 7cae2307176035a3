//! Temporary credentials as issued by the backend's `getStsCredential` action.
//!
//! Each vendor gets its own shape. The payload is parsed strictly so a response
//! missing a nested field fails before any client is constructed.

use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

use crate::{
    error::{Error, Result},
    provider::ProviderKind,
};

/// Alibaba Cloud STS response: `{"Credentials": {...}}`.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OssCredentials {
    pub access_key_id: String,
    pub access_key_secret: String,
    pub security_token: String,
    #[serde(default)]
    pub expiration: Option<String>,
}

#[derive(Deserialize)]
struct OssEnvelope {
    #[serde(rename = "Credentials")]
    credentials: OssCredentials,
}

/// Tencent Cloud STS response: nested secret triple plus a validity window in unix seconds.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CosCredentials {
    pub credentials: CosSecret,
    pub start_time: i64,
    pub expired_time: i64,
}

#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CosSecret {
    pub tmp_secret_id: String,
    pub tmp_secret_key: String,
    pub session_token: String,
}

impl CosCredentials {
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.expired_time, 0).single()
    }

    /// True when `now` falls inside `[start_time, expired_time)`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        let now = now.timestamp();
        now >= self.start_time && now < self.expired_time
    }
}

#[derive(Clone)]
pub enum Credentials {
    AliCloudOss(OssCredentials),
    TencentCloudOss(CosCredentials),
}

impl Credentials {
    /// Parse a raw `getStsCredential` payload into the shape `kind` expects.
    pub fn parse(kind: ProviderKind, payload: serde_json::Value) -> Result<Self> {
        match kind {
            ProviderKind::AliCloudOss => {
                let envelope: OssEnvelope = serde_json::from_value(payload)?;
                Ok(Self::AliCloudOss(envelope.credentials))
            }
            ProviderKind::TencentCloudOss => {
                Ok(Self::TencentCloudOss(serde_json::from_value(payload)?))
            }
            ProviderKind::Server => Err(Error::UnsupportedProvider(kind)),
        }
    }

    pub fn kind(&self) -> ProviderKind {
        match self {
            Self::AliCloudOss(_) => ProviderKind::AliCloudOss,
            Self::TencentCloudOss(_) => ProviderKind::TencentCloudOss,
        }
    }
}

// Secrets never go to the logs.

impl fmt::Debug for OssCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OssCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("expiration", &self.expiration)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for CosCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CosCredentials")
            .field("tmp_secret_id", &self.credentials.tmp_secret_id)
            .field("start_time", &self.start_time)
            .field("expired_time", &self.expired_time)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AliCloudOss(c) => c.fmt(f),
            Self::TencentCloudOss(c) => c.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parse_oss_credentials() {
        let creds = Credentials::parse(
            ProviderKind::AliCloudOss,
            json!({
                "Credentials": {
                    "AccessKeyId": "AK",
                    "AccessKeySecret": "SK",
                    "SecurityToken": "TOK",
                    "Expiration": "2024-01-01T01:00:00Z"
                },
                "RequestId": "ignored"
            }),
        )
        .unwrap();

        let Credentials::AliCloudOss(oss) = creds else {
            panic!("expected OSS credentials");
        };
        assert_eq!(oss.access_key_id, "AK");
        assert_eq!(oss.access_key_secret, "SK");
        assert_eq!(oss.security_token, "TOK");
        assert_eq!(oss.expiration.as_deref(), Some("2024-01-01T01:00:00Z"));
    }

    #[test]
    fn parse_cos_credentials() {
        let creds = Credentials::parse(
            ProviderKind::TencentCloudOss,
            json!({
                "credentials": {
                    "tmpSecretId": "ID",
                    "tmpSecretKey": "KEY",
                    "sessionToken": "TOKEN"
                },
                "startTime": 1_700_000_000,
                "expiredTime": 1_700_001_800
            }),
        )
        .unwrap();

        let Credentials::TencentCloudOss(cos) = creds else {
            panic!("expected COS credentials");
        };
        assert_eq!(cos.credentials.tmp_secret_id, "ID");
        assert_eq!(cos.credentials.session_token, "TOKEN");
        assert_eq!(cos.expires_at().unwrap().timestamp(), 1_700_001_800);
        assert!(cos.is_valid_at(Utc.timestamp_opt(1_700_000_100, 0).unwrap()));
        assert!(!cos.is_valid_at(Utc.timestamp_opt(1_700_001_800, 0).unwrap()));
    }

    #[test]
    fn missing_nested_field_is_malformed() {
        let err = Credentials::parse(
            ProviderKind::AliCloudOss,
            json!({ "Credentials": { "AccessKeyId": "AK", "AccessKeySecret": "SK" } }),
        )
        .unwrap_err();
        assert!(matches!(err, Error::MalformedCredentials(_)));

        let err = Credentials::parse(ProviderKind::TencentCloudOss, json!({ "startTime": 1 }))
            .unwrap_err();
        assert!(matches!(err, Error::MalformedCredentials(_)));
    }

    #[test]
    fn debug_redacts_secrets() {
        let creds = Credentials::parse(
            ProviderKind::AliCloudOss,
            json!({
                "Credentials": {
                    "AccessKeyId": "AK",
                    "AccessKeySecret": "very-secret",
                    "SecurityToken": "also-secret"
                }
            }),
        )
        .unwrap();

        let output = format!("{creds:?}");
        assert!(output.contains("AK"));
        assert!(!output.contains("very-secret"));
        assert!(!output.contains("also-secret"));
    }
}
