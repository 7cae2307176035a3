use std::path::PathBuf;

use clap::Parser;
use cloud_upload_storage::{ProviderConfig, ProviderKind};
use http::Uri;

#[derive(Debug, Parser)]
#[clap(about = "Upload a file to object storage using backend-issued STS credentials")]
pub struct Config {
    #[clap(long, env, help = "Endpoint serving the getStsCredential action")]
    pub cos_api_url: String,

    #[clap(long, env, help = "Endpoint serving the create and update file actions")]
    pub files_api_url: String,

    #[clap(long, env, help = "Bearer token sent to both backend endpoints")]
    pub api_token: Option<String>,

    #[clap(
        long,
        env,
        default_value_t = ProviderKind::Server,
        help = "Server, AliCloudOss or TencentCloudOss"
    )]
    pub upload_to: ProviderKind,

    #[clap(long, env, default_value_t = String::new())]
    pub region: String,

    #[clap(long, env, default_value_t = String::new())]
    pub bucket: String,

    #[clap(long = "endpoint", env = "STORAGE_ENDPOINT", help = "Override the vendor endpoint")]
    pub storage_endpoint: Option<Uri>,

    #[clap(long, env = "STORAGE_ALLOW_HTTP")]
    pub allow_http: bool,

    #[clap(long, env = "UPLOAD_DIR", default_value_t = String::new())]
    pub dir: String,

    #[clap(long, help = "Content type recorded for the file")]
    pub content_type: Option<String>,

    pub file: PathBuf,
}

impl Config {
    pub fn provider_config(&self) -> ProviderConfig {
        let mut config = ProviderConfig::new(self.upload_to, &self.region, &self.bucket)
            .with_allow_http(self.allow_http);
        if let Some(endpoint) = self.storage_endpoint.clone() {
            config = config.with_endpoint(endpoint);
        }
        config
    }
}
