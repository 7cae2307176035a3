use std::{fmt, str::FromStr};

use http::Uri;

use crate::{
    cos::CosClient,
    credentials::Credentials,
    error::{Error, Result},
    file::UploadFile,
    oss::OssClient,
    progress::Progress,
};

/// Where the bytes of an upload end up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Server,
    AliCloudOss,
    TencentCloudOss,
}

impl ProviderKind {
    /// Whether `initialize` has to fetch credentials and build a vendor client.
    pub fn needs_client(&self) -> bool {
        !matches!(self, Self::Server)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Server => "Server",
            Self::AliCloudOss => "AliCloudOss",
            Self::TencentCloudOss => "TencentCloudOss",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.replace(['-', '_'], "").to_ascii_lowercase();
        match normalized.as_str() {
            "server" => Ok(Self::Server),
            "alicloudoss" => Ok(Self::AliCloudOss),
            "tencentcloudoss" | "tencentcloudcos" => Ok(Self::TencentCloudOss),
            _ => Err(Error::UnknownProvider(s.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub region: String,
    pub bucket: String,
    /// Overrides the vendor's public endpoint.
    pub endpoint: Option<Uri>,
    /// Defaults to true for vendor endpoints and false for custom endpoints.
    pub virtual_host_style: Option<bool>,
    pub allow_http: bool,
}

impl ProviderConfig {
    pub fn new(kind: ProviderKind, region: impl Into<String>, bucket: impl Into<String>) -> Self {
        ProviderConfig {
            kind,
            region: region.into(),
            bucket: bucket.into(),
            endpoint: None,
            virtual_host_style: None,
            allow_http: false,
        }
    }

    pub fn with_endpoint(mut self, endpoint: Uri) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    pub fn with_allow_http(mut self, allow_http: bool) -> Self {
        self.allow_http = allow_http;
        self
    }
}

/// Result of handing a file to a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transfer {
    Transferred,
    /// The first-party server has no client-side transfer path yet.
    NotImplemented,
}

#[derive(Debug)]
pub enum ProviderClient {
    Server,
    AliCloudOss(OssClient),
    TencentCloudOss(CosClient),
}

impl ProviderClient {
    /// Build the vendor client matching `config.kind` from freshly issued credentials.
    pub fn connect(config: &ProviderConfig, credentials: Credentials) -> Result<Self> {
        match (config.kind, credentials) {
            (ProviderKind::AliCloudOss, Credentials::AliCloudOss(credentials)) => {
                OssClient::new(config, credentials).map(Self::AliCloudOss)
            }
            (ProviderKind::TencentCloudOss, Credentials::TencentCloudOss(credentials)) => {
                CosClient::new(config, credentials).map(Self::TencentCloudOss)
            }
            (ProviderKind::Server, _) => Err(Error::UnsupportedProvider(ProviderKind::Server)),
            (expected, credentials) => Err(Error::CredentialMismatch {
                expected,
                actual: credentials.kind(),
            }),
        }
    }

    pub async fn upload_object(
        &self,
        location: &str,
        file: &UploadFile,
        progress: &Progress,
    ) -> Result<Transfer> {
        match self {
            Self::Server => {
                tracing::warn!(%location, "Server uploads have no client-side transfer");
                Ok(Transfer::NotImplemented)
            }
            Self::AliCloudOss(client) => client.upload(location, file, progress).await,
            Self::TencentCloudOss(client) => client.upload(location, file, progress).await,
        }
    }
}
