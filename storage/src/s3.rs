use http::{
    uri::{Authority, Scheme},
    Uri,
};
use object_store::aws::{AmazonS3, AmazonS3Builder, AwsCredentialProvider};
use tracing::{event, Level};

use crate::{error::Result, provider::ProviderConfig};

/// Both vendors expose an S3-compatible API, so each client is an `AmazonS3` store
/// pointed at the vendor's endpoint.
pub(crate) fn create_store(
    config: &ProviderConfig,
    service_endpoint: Uri,
    signing_region: &str,
    credentials: AwsCredentialProvider,
) -> Result<AmazonS3> {
    // Vendor endpoints are always addressed by bucket subdomain. Custom ones default to path style.
    let (endpoint, virtual_host_style) = match config.endpoint.as_ref() {
        Some(endpoint) => (endpoint, config.virtual_host_style.unwrap_or(false)),
        None => (&service_endpoint, true),
    };
    event!(Level::DEBUG, ?endpoint, virtual_host_style);

    let needs_scheme = endpoint.scheme().is_none();
    let e = if virtual_host_style {
        // When using virtual host style, object_store requires us to prepend the bucket name
        // to the endpoint.
        let parts = endpoint.to_owned().into_parts();
        let authority = parts
            .authority
            .unwrap_or_else(|| Authority::from_static("missing-host"));
        let new_domain = format!("{}.{}", config.bucket, authority.as_str());
        let scheme = parts.scheme.unwrap_or(Scheme::HTTPS);

        format!("{}://{}", scheme.as_str(), new_domain)
    } else if needs_scheme {
        // We tolerate a missing https:// in the endpoint, but object_store rejects it.
        let parts = endpoint.to_owned().into_parts();
        let authority = parts
            .authority
            .unwrap_or_else(|| Authority::from_static("missing-host"));
        format!("https://{}", authority.as_str())
    } else {
        endpoint.to_string().trim_end_matches('/').to_string()
    };
    event!(Level::DEBUG, endpoint=%e, bucket=%config.bucket, "Creating S3-compatible store");

    let store = AmazonS3Builder::new()
        .with_bucket_name(config.bucket.as_str())
        .with_region(signing_region)
        .with_endpoint(e)
        .with_virtual_hosted_style_request(virtual_host_style)
        .with_allow_http(config.allow_http)
        .with_credentials(credentials)
        .build()?;

    Ok(store)
}
