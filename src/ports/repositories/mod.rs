mod item_repository;
mod user_directory;

pub use item_repository::{FeedStream, ItemRepository};
pub use user_directory::UserDirectory;
