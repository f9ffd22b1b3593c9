#![allow(dead_code)]

use bytes::Bytes;
use chrono::NaiveDate;
use object_store::{memory::InMemory, path::Path as ObjectPath, ObjectStore};
use std::sync::Arc;

use campus_lost_found::{
    domain::{
        models::{LocalImage, PostingDraft, UserIdentity},
        value_objects::{DeletionHandle, UserId},
    },
    DirectoryNotificationGateway, InMemoryItemRepository, InMemoryUserDirectory,
    LifecycleServiceImpl, ObjectStoreImageStore, RecordingPushTransport, UserDirectory,
};

pub const PUBLIC_BASE_URL: &str = "https://cdn.campus.test/images";

pub fn user(id: &str) -> UserIdentity {
    UserIdentity::new(
        UserId::new(id).unwrap(),
        format!("{}@campus.edu", id),
        Some(format!("555-01{:0>2}", id.len())),
    )
    .unwrap()
}

pub fn jpeg() -> LocalImage {
    LocalImage::new(
        "photo.jpg",
        Some("image/jpeg".to_string()),
        Bytes::from_static(b"\xff\xd8\xff\xe0 fake jpeg"),
    )
}

pub fn draft(item_name: &str, location: &str) -> PostingDraft {
    PostingDraft::builder()
        .item_name(item_name)
        .description("Navy blue, wooden handle")
        .location(location)
        .image(jpeg())
        .occurred_date(NaiveDate::from_ymd_opt(2026, 10, 14).unwrap())
        .occurred_time_label("Around 2pm")
        .build()
}

/// Lifecycle engine wired to in-memory collaborators that tests can inspect
pub struct Harness {
    pub service: LifecycleServiceImpl,
    pub repository: Arc<InMemoryItemRepository>,
    pub directory: Arc<InMemoryUserDirectory>,
    pub transport: RecordingPushTransport,
    pub objects: Arc<InMemory>,
}

impl Harness {
    pub fn new() -> Self {
        let repository = Arc::new(InMemoryItemRepository::new());
        let directory = Arc::new(InMemoryUserDirectory::new());
        let transport = RecordingPushTransport::new();
        let objects = Arc::new(InMemory::new());

        let images = Arc::new(ObjectStoreImageStore::new(objects.clone(), PUBLIC_BASE_URL));
        let gateway = Arc::new(DirectoryNotificationGateway::new(
            directory.clone(),
            Arc::new(transport.clone()),
        ));

        let service = LifecycleServiceImpl::new(repository.clone(), images, gateway);

        Self {
            service,
            repository,
            directory,
            transport,
            objects,
        }
    }

    /// Register a user with a push token derived from their id
    pub async fn register(&self, id: &str) -> String {
        let token = push_token(id);
        self.directory
            .register_push_token(&UserId::new(id).unwrap(), &token)
            .await
            .unwrap();
        token
    }

    pub async fn object_exists(&self, handle: &DeletionHandle) -> bool {
        self.objects
            .head(&ObjectPath::from(handle.as_str()))
            .await
            .is_ok()
    }
}

pub fn push_token(id: &str) -> String {
    format!("ExponentPushToken[{}]", id)
}
