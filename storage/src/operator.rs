use std::sync::Arc;

use bytes::Bytes;
use object_store::{
    path::Path, Attribute, Attributes, ObjectStore, PutMultipartOptions, PutOptions, PutResult,
    WriteMultipart,
};
use tracing::instrument;

use crate::{error::Result, progress::Progress};

/// How a multipart transfer is split up.
#[derive(Debug, Clone, Copy)]
pub struct MultipartSettings {
    pub part_size: usize,
    pub parallel: usize,
}

pub struct Operator {
    pub operator: Arc<dyn ObjectStore>,
    pub path_prefix: Option<Path>,
}

impl Operator {
    pub fn new(operator: Arc<dyn ObjectStore>) -> Self {
        Operator {
            operator,
            path_prefix: None,
        }
    }

    pub fn make_full_path(&self, location: &str) -> Path {
        match &self.path_prefix {
            Some(prefix) => Path::from_iter(prefix.parts().chain(Path::from(location).parts())),
            None => Path::from(location),
        }
    }

    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn put(&self, location: &str, bytes: Bytes, content_type: &str) -> Result<PutResult> {
        let p = self.make_full_path(location);
        let opts = PutOptions {
            attributes: content_type_attributes(content_type),
            ..Default::default()
        };

        let result = self.operator.put_opts(&p, bytes.into(), opts).await?;
        Ok(result)
    }

    /// Upload `bytes` as a multipart object, keeping at most `settings.parallel` parts in flight.
    #[instrument(skip(self, bytes, progress), fields(size = bytes.len()))]
    pub async fn put_multipart(
        &self,
        location: &str,
        bytes: Bytes,
        content_type: &str,
        settings: MultipartSettings,
        progress: &Progress,
    ) -> Result<PutResult> {
        let p = self.make_full_path(location);
        let opts = PutMultipartOptions {
            attributes: content_type_attributes(content_type),
            ..Default::default()
        };

        let upload = self.operator.put_multipart_opts(&p, opts).await?;
        let mut writer = WriteMultipart::new_with_chunk_size(upload, settings.part_size);

        let total = bytes.len().max(1) as f64;
        let in_flight_limit = settings.part_size * settings.parallel;
        let mut sent = 0usize;

        for part in bytes.chunks(settings.part_size) {
            if let Err(e) = writer.wait_for_capacity(settings.parallel).await {
                writer.abort().await.ok();
                return Err(e.into());
            }

            // Once capacity frees up, everything but the parts still in flight has landed.
            progress.report_fraction(sent.saturating_sub(in_flight_limit) as f64 / total);

            writer.write(part);
            sent += part.len();
        }

        let result = writer.finish().await?;
        progress.report_fraction(1.0);
        Ok(result)
    }
}

fn content_type_attributes(content_type: &str) -> Attributes {
    let mut attributes = Attributes::new();
    if !content_type.is_empty() {
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
    }
    attributes
}

#[cfg(test)]
mod tests {
    use cloud_upload_test::Recorder;

    use object_store::memory::InMemory;

    use super::*;

    fn settings() -> MultipartSettings {
        MultipartSettings {
            part_size: 4,
            parallel: 2,
        }
    }

    #[tokio::test]
    async fn put_applies_prefix() {
        let store = Arc::new(InMemory::new());
        let operator = Operator {
            operator: store.clone(),
            path_prefix: Some(Path::from("uploads")),
        };

        operator
            .put("docs/a.txt", Bytes::from_static(b"abc"), "text/plain")
            .await
            .unwrap();

        let data = store
            .get(&Path::from("uploads/docs/a.txt"))
            .await
            .unwrap()
            .bytes()
            .await
            .unwrap();
        assert_eq!(data.as_ref(), b"abc");
    }

    #[tokio::test]
    async fn multipart_reports_monotonic_progress() {
        let store = Arc::new(InMemory::new());
        let operator = Operator::new(store.clone());

        let seen = Recorder::new();
        let progress = Progress::new(seen.callback());

        let body = Bytes::from_static(b"0123456789abcdefghijklmnopqrstuv");
        operator
            .put_multipart("big.bin", body.clone(), "", settings(), &progress)
            .await
            .unwrap();

        let data = store
            .get(&Path::from("big.bin"))
            .await
            .unwrap()
            .bytes()
            .await
            .unwrap();
        assert_eq!(data, body);

        let seen = seen.values();
        assert_eq!(seen.last(), Some(&100));
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert!(seen.iter().all(|p| *p <= 100));
    }
}
