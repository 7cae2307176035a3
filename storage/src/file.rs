use std::path::Path;

use bytes::Bytes;

use crate::error::{Error, Result};

pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// A file ready to be handed to a storage provider.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub content_type: String,
    pub size: u64,
    pub content: Bytes,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, content: Bytes) -> Self {
        UploadFile {
            name: name.into(),
            content_type: content_type.into(),
            size: content.len() as u64,
            content,
        }
    }

    /// Read a file from disk. The name is the final path component.
    pub async fn from_path(path: &Path, content_type: Option<&str>) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or(Error::MissingField("file name"))?
            .to_string();
        let content = tokio::fs::read(path).await?;

        Ok(Self::new(
            name,
            content_type.unwrap_or(DEFAULT_CONTENT_TYPE),
            Bytes::from(content),
        ))
    }

    /// The part of the name after the last `.`, or the whole name when there is no dot.
    pub fn extension(&self) -> &str {
        file_extension(&self.name)
    }
}

pub fn file_extension(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}
