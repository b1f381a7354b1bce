//! Port for the object store holding uploaded media.
use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by media store adapters.
    pub enum MediaStoreError {
        /// The key is not a safe relative path.
        InvalidKey { key: String } => "invalid media key: {key}",
        /// Reading or writing the store failed.
        Io { message: String } => "media store failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store `bytes` under `key` and return the public URL.
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, MediaStoreError>;

    /// Remove the object under `key`. Missing objects are not an error.
    async fn delete(&self, key: &str) -> Result<(), MediaStoreError>;
}
