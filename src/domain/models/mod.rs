pub mod collection;
pub mod draft;
pub mod log;
pub mod notification;
pub mod posting;

pub use collection::Collection;
pub use draft::{LocalImage, PostingDraft, StoredImage, UserIdentity};
pub use log::{LostAndFoundLog, NewLogEntry};
pub use notification::{DirectoryEntry, DispatchReport, Notification, PushMessage};
pub use posting::{FoundItem, ItemStatus, LostItem, NewPosting, Posting, PostingKind};
