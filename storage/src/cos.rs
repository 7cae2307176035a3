use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use http::Uri;
use object_store::{aws::AwsCredential, CredentialProvider};
use tracing::{event, instrument, Level};

use crate::{
    credentials::CosCredentials,
    error::Result,
    file::UploadFile,
    operator::Operator,
    progress::Progress,
    provider::{ProviderConfig, Transfer},
};

/// Hands the issued temporary secret to the SDK each time it signs a request.
///
/// The validity window is carried along but not enforced; a request signed outside
/// of it only logs a warning and is left for the service to reject.
pub struct CosAuthorization {
    credentials: CosCredentials,
    signing: Arc<AwsCredential>,
}

impl CosAuthorization {
    pub fn new(credentials: CosCredentials) -> Self {
        let signing = Arc::new(AwsCredential {
            key_id: credentials.credentials.tmp_secret_id.clone(),
            secret_key: credentials.credentials.tmp_secret_key.clone(),
            token: Some(credentials.credentials.session_token.clone()),
        });

        CosAuthorization {
            credentials,
            signing,
        }
    }

    pub fn credentials(&self) -> &CosCredentials {
        &self.credentials
    }
}

impl std::fmt::Debug for CosAuthorization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CosAuthorization")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CredentialProvider for CosAuthorization {
    type Credential = AwsCredential;

    async fn get_credential(&self) -> object_store::Result<Arc<AwsCredential>> {
        if !self.credentials.is_valid_at(Utc::now()) {
            event!(
                Level::WARN,
                start_time = self.credentials.start_time,
                expired_time = self.credentials.expired_time,
                "COS temporary credential used outside its validity window"
            );
        }

        Ok(self.signing.clone())
    }
}

/// Tencent Cloud COS client authorized through [`CosAuthorization`].
pub struct CosClient {
    pub region: String,
    pub bucket: String,
    authorization: Arc<CosAuthorization>,
    operator: Operator,
}

impl CosClient {
    pub fn new(config: &ProviderConfig, credentials: CosCredentials) -> Result<Self> {
        let service_endpoint =
            format!("https://cos.{}.myqcloud.com", config.region).parse::<Uri>()?;
        let authorization = Arc::new(CosAuthorization::new(credentials));

        let store = crate::s3::create_store(
            config,
            service_endpoint,
            &config.region,
            authorization.clone(),
        )?;

        Ok(CosClient {
            region: config.region.clone(),
            bucket: config.bucket.clone(),
            authorization,
            operator: Operator::new(Arc::new(store)),
        })
    }

    pub fn authorization(&self) -> &CosAuthorization {
        &self.authorization
    }

    /// Single put-object. Vendor errors are returned untouched.
    #[instrument(skip(self, file, progress), fields(bucket = %self.bucket, region = %self.region, size = file.size))]
    pub async fn upload(
        &self,
        location: &str,
        file: &UploadFile,
        progress: &Progress,
    ) -> Result<Transfer> {
        progress.report_fraction(0.0);
        self.operator
            .put(location, file.content.clone(), &file.content_type)
            .await?;
        progress.report_fraction(1.0);

        event!(Level::INFO, %location, "Uploaded to COS");
        Ok(Transfer::Transferred)
    }
}

impl std::fmt::Debug for CosClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CosClient")
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .field("authorization", &self.authorization)
            .finish_non_exhaustive()
    }
}
