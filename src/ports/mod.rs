pub mod notifications;
pub mod repositories;
pub mod services;
pub mod storage;

// Re-export all port traits for convenience
pub use notifications::{NotificationGateway, PushTransport};
pub use repositories::{FeedStream, ItemRepository, UserDirectory};
pub use services::LifecycleService;
pub use storage::ImageStore;
