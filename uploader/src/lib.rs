pub mod api;
pub mod config;
pub mod error;
pub mod files;
pub mod orchestrator;
pub mod tracing_config;

pub use api::{ApiError, BackendApi, HttpApi};
pub use error::Error;
pub use files::{destination_path, FileId, FileRecord};
pub use orchestrator::{UploadOrchestrator, Uploaded};

pub use cloud_upload_storage::{
    file_extension, Progress, ProviderClient, ProviderConfig, ProviderKind, Transfer, UploadFile,
};
