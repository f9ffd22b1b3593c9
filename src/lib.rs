pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;
pub mod services;

// Re-export key types for convenience

// Domain types - postings, identities and the audit trail
pub use domain::{
    // Value objects
    DeletionHandle,
    // Models
    DispatchReport,
    FoundItem,
    ImageStoreError,
    ItemId,
    ItemStatus,
    // Errors
    LifecycleError,
    LifecycleResult,
    LocalImage,
    LogId,
    LostAndFoundLog,
    LostItem,
    Notification,
    NotificationError,
    Posting,
    PostingDraft,
    PostingKind,
    RepositoryError,
    StoredImage,
    UserId,
    UserIdentity,
    ValidationError,
};

// Port types - interfaces for external systems
pub use ports::{
    FeedStream, ImageStore, ItemRepository, LifecycleService, NotificationGateway, PushTransport,
    UserDirectory,
};

// Service implementations - business logic
pub use services::{LifecycleServiceImpl, NotificationPolicy};

// Application factory and configuration
pub use app::{
    create_app_from_env, create_in_memory_app, AppBuilder, AppConfig, AppDependencies, AppError,
    AppServices, NotificationBackend, RepositoryBackend, StorageBackend, DEFAULT_PUBLIC_BASE_URL,
};

// Adapter types - infrastructure implementations
pub use adapters::outbound::{
    notifications::{DirectoryNotificationGateway, HttpPushTransport, RecordingPushTransport},
    persistence::{InMemoryItemRepository, InMemoryUserDirectory},
    storage::ObjectStoreImageStore,
};

// Public facade for easy construction
pub mod prelude {
    pub use crate::{
        create_in_memory_app, AppBuilder, AppServices, DirectoryNotificationGateway,
        InMemoryItemRepository, InMemoryUserDirectory, ItemId, ItemRepository, LifecycleService,
        LifecycleServiceImpl, LocalImage, ObjectStoreImageStore, Posting, PostingDraft,
        PostingKind, RecordingPushTransport, UserDirectory, UserIdentity,
    };
}
