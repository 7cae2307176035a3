use std::sync::Arc;

use http::Uri;
use object_store::{aws::AwsCredential, StaticCredentialProvider};
use tracing::{event, instrument, Level};

use crate::{
    credentials::OssCredentials,
    error::Result,
    file::UploadFile,
    operator::{MultipartSettings, Operator},
    progress::Progress,
    provider::{ProviderConfig, Transfer},
};

pub const OSS_PART_SIZE: usize = 1024 * 1024;
pub const OSS_PARALLEL: usize = 4;

/// Alibaba Cloud OSS client authorized by a flat STS key triple.
pub struct OssClient {
    pub region: String,
    pub bucket: String,
    pub multipart: MultipartSettings,
    credentials: OssCredentials,
    operator: Operator,
}

impl OssClient {
    pub fn new(config: &ProviderConfig, credentials: OssCredentials) -> Result<Self> {
        let service_endpoint = format!("https://{}.aliyuncs.com", endpoint_region(&config.region))
            .parse::<Uri>()?;

        let provider = StaticCredentialProvider::new(AwsCredential {
            key_id: credentials.access_key_id.clone(),
            secret_key: credentials.access_key_secret.clone(),
            token: Some(credentials.security_token.clone()),
        });

        let store = crate::s3::create_store(
            config,
            service_endpoint,
            signing_region(&config.region),
            Arc::new(provider),
        )?;

        Ok(OssClient {
            region: config.region.clone(),
            bucket: config.bucket.clone(),
            multipart: MultipartSettings {
                part_size: OSS_PART_SIZE,
                parallel: OSS_PARALLEL,
            },
            credentials,
            operator: Operator::new(Arc::new(store)),
        })
    }

    pub fn credentials(&self) -> &OssCredentials {
        &self.credentials
    }

    /// Multipart upload; anything that fits in one part goes up as a single put.
    #[instrument(skip(self, file, progress), fields(bucket = %self.bucket, size = file.size))]
    pub async fn upload(
        &self,
        location: &str,
        file: &UploadFile,
        progress: &Progress,
    ) -> Result<Transfer> {
        if file.content.len() <= self.multipart.part_size {
            progress.report_fraction(0.0);
            self.operator
                .put(location, file.content.clone(), &file.content_type)
                .await?;
            progress.report_fraction(1.0);
        } else {
            self.operator
                .put_multipart(
                    location,
                    file.content.clone(),
                    &file.content_type,
                    self.multipart,
                    progress,
                )
                .await?;
        }

        event!(Level::INFO, %location, "Uploaded to OSS");
        Ok(Transfer::Transferred)
    }
}

impl std::fmt::Debug for OssClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OssClient")
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

/// OSS regions are written `oss-cn-hangzhou`; accept the bare `cn-hangzhou` too.
fn endpoint_region(region: &str) -> String {
    if region.starts_with("oss-") {
        region.to_string()
    } else {
        format!("oss-{region}")
    }
}

fn signing_region(region: &str) -> &str {
    region.strip_prefix("oss-").unwrap_or(region)
}
