mod feed;
mod in_memory_item_repository;
mod in_memory_user_directory;
mod sql_item_repository;
mod sql_user_directory;

pub use feed::FeedPublisher;
pub use in_memory_item_repository::InMemoryItemRepository;
pub use in_memory_user_directory::InMemoryUserDirectory;
pub use sql_item_repository::SqlItemRepository;
pub use sql_user_directory::SqlUserDirectory;
