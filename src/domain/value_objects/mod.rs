mod deletion_handle;
mod item_id;
mod user_id;

pub use deletion_handle::DeletionHandle;
pub use item_id::{ItemId, LogId};
pub use user_id::UserId;
