use cloud_upload_storage::ProviderKind;
use thiserror::Error;

use crate::api::ApiError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Fetching STS credential: {0}")]
    CredentialFetch(#[source] ApiError),

    #[error("Malformed STS credential: {0}")]
    MalformedCredential(#[source] cloud_upload_storage::Error),

    #[error("Backend {action} request failed: {source}")]
    BackendRequest {
        action: &'static str,
        #[source]
        source: ApiError,
    },

    #[error("Malformed {action} response: {source}")]
    MalformedResponse {
        action: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Provider upload failed: {0}")]
    ProviderUpload(#[source] cloud_upload_storage::Error),

    #[error("{0} client is not initialized")]
    NotInitialized(ProviderKind),

    /// The issued credentials could not be turned into a vendor client,
    /// e.g. a region that does not form a valid endpoint.
    #[error("Building {kind} client: {source}")]
    ClientSetup {
        kind: ProviderKind,
        #[source]
        source: cloud_upload_storage::Error,
    },
}

impl Error {
    /// A short, stable name for the class of failure.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::CredentialFetch(_) => "credential_fetch",
            Error::MalformedCredential(_) => "credential_fetch",
            Error::BackendRequest { .. } => "backend_request",
            Error::MalformedResponse { .. } => "backend_request",
            Error::ProviderUpload(_) => "provider_upload",
            Error::NotInitialized(_) => "not_initialized",
            Error::ClientSetup { .. } => "credential_fetch",
        }
    }
}
