use std::sync::Arc;

use cloud_upload_storage::{
    Credentials, Progress, ProviderClient, ProviderConfig, ProviderKind, Transfer, UploadFile,
};
use serde_json::json;
use tracing::{event, instrument, Level};

use crate::{
    api::BackendApi,
    error::{Error, Result},
    files::{destination_path, CreateFile, FileId, FileRecord, UpdateFile},
};

/// What a finished upload hands back to the caller.
#[derive(Debug, Clone)]
pub struct Uploaded {
    pub id: FileId,
    pub path: String,
    pub transfer: Transfer,
}

/// Fetches temporary credentials, builds the vendor client and drives uploads through it.
///
/// `initialize` needs `&mut self` and `upload` only `&self`, so the client cannot be swapped
/// out from under an upload that is still running.
pub struct UploadOrchestrator {
    cos_api: Arc<dyn BackendApi>,
    files_api: Arc<dyn BackendApi>,
    provider: ProviderConfig,
    progress: Progress,
    client: Option<ProviderClient>,
}

impl UploadOrchestrator {
    pub fn new(
        cos_api: Arc<dyn BackendApi>,
        files_api: Arc<dyn BackendApi>,
        provider: ProviderConfig,
    ) -> Self {
        UploadOrchestrator {
            cos_api,
            files_api,
            provider,
            progress: Progress::none(),
            client: None,
        }
    }

    /// Receive upload progress as an integer percentage.
    pub fn on_progress(mut self, callback: impl Fn(u8) + Send + Sync + 'static) -> Self {
        self.progress = Progress::new(callback);
        self
    }

    pub fn provider(&self) -> &ProviderConfig {
        &self.provider
    }

    /// The vendor client, once `initialize` has built one.
    pub fn client(&self) -> Option<&ProviderClient> {
        self.client.as_ref()
    }

    /// Request STS credentials and build a fresh client. Calling it again replaces the client.
    #[instrument(skip(self), fields(provider = %self.provider.kind, region = %self.provider.region, bucket = %self.provider.bucket))]
    pub async fn initialize(&mut self) -> Result<()> {
        if !self.provider.kind.needs_client() {
            return Ok(());
        }

        let payload = self
            .cos_api
            .post(
                "getStsCredential",
                json!({ "region": self.provider.region, "bucket": self.provider.bucket }),
            )
            .await
            .map_err(Error::CredentialFetch)?;

        let credentials =
            Credentials::parse(self.provider.kind, payload).map_err(Error::MalformedCredential)?;
        event!(Level::DEBUG, ?credentials, "Received STS credential");

        let client = ProviderClient::connect(&self.provider, credentials).map_err(|source| {
            Error::ClientSetup {
                kind: self.provider.kind,
                source,
            }
        })?;
        self.client = Some(client);

        Ok(())
    }

    /// Register a file record, move the bytes to `{dir}/{date}/{uuid}.{ext}`, then finalize
    /// the record. A failed transfer leaves the record unfinalized.
    #[instrument(skip(self, file), fields(provider = %self.provider.kind, name = %file.name, size = file.size))]
    pub async fn upload(&self, file: &UploadFile, dir: &str) -> Result<Uploaded> {
        let server = ProviderClient::Server;
        let client = match (&self.client, self.provider.kind) {
            (_, ProviderKind::Server) => &server,
            (Some(client), _) => client,
            (None, kind) => return Err(Error::NotInitialized(kind)),
        };

        let ext = file.extension();

        let created = self
            .files_api
            .post("create", json!(CreateFile { dir }))
            .await
            .map_err(|source| Error::BackendRequest {
                action: "create",
                source,
            })?;
        let FileRecord { id, date, uuid } =
            serde_json::from_value(created).map_err(|source| Error::MalformedResponse {
                action: "create",
                source,
            })?;

        let path = destination_path(dir, &date, &uuid, ext);
        event!(Level::INFO, %id, %path, "Created file record");

        let transfer = client
            .upload_object(&path, file, &self.progress)
            .await
            .map_err(Error::ProviderUpload)?;

        self.progress.reset();

        let update = UpdateFile {
            date: &date,
            uuid: &uuid,
            name: &file.name,
            content_type: &file.content_type,
            ext,
            size: file.size,
        };
        self.files_api
            .post("update", json!(update))
            .await
            .map_err(|source| Error::BackendRequest {
                action: "update",
                source,
            })?;

        event!(Level::INFO, %id, %path, ?transfer, "Upload finished");
        Ok(Uploaded { id, path, transfer })
    }
}

impl std::fmt::Debug for UploadOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadOrchestrator")
            .field("provider", &self.provider)
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}
