use async_trait::async_trait;
use object_store::{
    path::Path as ObjectPath, Attribute, Attributes, ObjectStore as ApacheObjectStore, PutOptions,
    PutPayload,
};
use std::sync::Arc;
use tracing::debug;

use crate::{
    domain::{
        errors::{ImageStoreError, ImageStoreResult},
        models::{LocalImage, PostingKind, StoredImage},
        value_objects::DeletionHandle,
    },
    ports::storage::ImageStore,
};

/// Image store backed by any `object_store` implementation (memory, local disk, S3).
///
/// Images land under `<kind>_images/<uuid>.<ext>`; the object path doubles as
/// the deletion handle and the URL is the path under `public_base_url`.
#[derive(Clone)]
pub struct ObjectStoreImageStore {
    inner: Arc<dyn ApacheObjectStore>,
    public_base_url: String,
}

impl ObjectStoreImageStore {
    pub fn new(store: Arc<dyn ApacheObjectStore>, public_base_url: impl Into<String>) -> Self {
        let public_base_url = public_base_url.into().trim_end_matches('/').to_string();
        Self {
            inner: store,
            public_base_url,
        }
    }

    fn object_path(kind: PostingKind, image: &LocalImage) -> String {
        format!(
            "{}_images/{}.{}",
            kind.as_str(),
            uuid::Uuid::new_v4().simple(),
            image.extension().to_ascii_lowercase()
        )
    }

    fn public_url(&self, path: &str) -> String {
        format!("{}/{}", self.public_base_url, path)
    }
}

/// Content type implied by an image path's extension
fn content_type_for(path: &str) -> Option<&'static str> {
    let (_, extension) = path.rsplit_once('.')?;
    match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "heic" => Some("image/heic"),
        _ => None,
    }
}

#[async_trait]
impl ImageStore for ObjectStoreImageStore {
    async fn upload(&self, kind: PostingKind, image: &LocalImage) -> ImageStoreResult<StoredImage> {
        if image.is_empty() {
            return Err(ImageStoreError::Rejected {
                message: "image is empty".to_string(),
            });
        }

        let path = Self::object_path(kind, image);
        let location = ObjectPath::from(path.as_str());

        let mut attributes = Attributes::new();
        if let Some(content_type) = &image.content_type {
            attributes.insert(Attribute::ContentType, content_type.clone().into());
        }
        let options = PutOptions {
            attributes,
            ..Default::default()
        };

        let payload = PutPayload::from(image.data.clone());
        match self.inner.put_opts(&location, payload.clone(), options).await {
            Ok(_) => {}
            // Local disk keeps no object attributes
            Err(object_store::Error::NotImplemented) => {
                self.inner.put(&location, payload).await?;
            }
            Err(e) => return Err(e.into()),
        }

        debug!(path = %path, size = image.data.len(), "uploaded posting image");

        let deletion_handle = DeletionHandle::new(path.clone()).map_err(|e| {
            ImageStoreError::InfrastructureError {
                message: format!("Generated an unusable deletion handle: {}", e),
                source: None,
            }
        })?;

        Ok(StoredImage {
            url: self.public_url(&path),
            deletion_handle,
        })
    }

    async fn fetch(&self, path: &str) -> ImageStoreResult<Option<LocalImage>> {
        let location = ObjectPath::parse(path).map_err(|e| ImageStoreError::Rejected {
            message: format!("Invalid image path '{}': {}", path, e),
        })?;

        let result = match self.inner.get(&location).await {
            Ok(result) => result,
            Err(object_store::Error::NotFound { .. }) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let content_type = result
            .attributes
            .get(&Attribute::ContentType)
            .map(|value| value.to_string())
            .or_else(|| content_type_for(path).map(str::to_string));
        let file_name = location.filename().unwrap_or_default().to_string();
        let data = result.bytes().await?;

        Ok(Some(LocalImage::new(file_name, content_type, data)))
    }

    async fn delete(&self, handle: &DeletionHandle) -> ImageStoreResult<()> {
        let location = ObjectPath::from(handle.as_str());

        match self.inner.delete(&location).await {
            Ok(()) | Err(object_store::Error::NotFound { .. }) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
