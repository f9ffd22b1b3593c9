use async_trait::async_trait;

use crate::domain::{
    errors::ImageStoreResult,
    models::{LocalImage, PostingKind, StoredImage},
    value_objects::DeletionHandle,
};

/// Port for posting images.
/// This abstracts the actual storage backend (S3, local disk, memory)
#[async_trait]
pub trait ImageStore: Send + Sync + 'static {
    /// Upload an image and return its durable URL and deletion handle
    async fn upload(&self, kind: PostingKind, image: &LocalImage) -> ImageStoreResult<StoredImage>;

    /// Read an uploaded image back by its object path. A missing image yields `None`.
    async fn fetch(&self, path: &str) -> ImageStoreResult<Option<LocalImage>>;

    /// Delete a previously uploaded image. Deleting a missing image succeeds.
    async fn delete(&self, handle: &DeletionHandle) -> ImageStoreResult<()>;
}
