// Infrastructure error types
pub mod error;

// Storage implementations
pub mod object_store_image_store;

// Re-export key types
pub use error::StoreError;
pub use object_store_image_store::ObjectStoreImageStore;
