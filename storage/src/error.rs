use http::uri::InvalidUri;
use thiserror::Error;

use crate::provider::ProviderKind;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unknown storage provider {0}")]
    UnknownProvider(String),

    #[error("Storage provider {0} does not use a vendor client")]
    UnsupportedProvider(ProviderKind),

    #[error(transparent)]
    InvalidUri(#[from] InvalidUri),

    #[error("Missing field {0}")]
    MissingField(&'static str),

    #[error("Malformed credential payload: {0}")]
    MalformedCredentials(#[from] serde_json::Error),

    #[error("Credentials for {actual} cannot be used with {expected}")]
    CredentialMismatch {
        expected: ProviderKind,
        actual: ProviderKind,
    },

    #[error(transparent)]
    Store(#[from] object_store::Error),

    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),
}
