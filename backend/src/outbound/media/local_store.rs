//! `MediaStore` backed by a local directory opened through `cap-std`.
//!
//! All paths resolve inside the root directory handle, so a key can never
//! escape it. Writes go to a temporary sibling first and are renamed into
//! place.

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{MediaStore, MediaStoreError};

/// Stores objects under a root directory and serves them from `base_url`.
#[derive(Clone)]
pub struct LocalMediaStore {
    root: Arc<Dir>,
    base_url: String,
}

impl LocalMediaStore {
    /// Open (creating if needed) `root` and publish objects under `base_url`.
    ///
    /// # Errors
    ///
    /// Returns the I/O error when the directory cannot be created or opened.
    pub fn open(root: impl AsRef<Path>, base_url: impl Into<String>) -> io::Result<Self> {
        let root = root.as_ref();
        Dir::create_ambient_dir_all(root, ambient_authority())?;
        let dir = Dir::open_ambient_dir(root, ambient_authority())?;
        Ok(Self {
            root: Arc::new(dir),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
        })
    }

    fn url_for(&self, key: &str) -> String {
        format!("{}/{key}", self.base_url)
    }
}

/// Keys are relative paths of `[A-Za-z0-9._-]` segments with no `.` or `..`.
fn validate_key(key: &str) -> Result<(), MediaStoreError> {
    let valid = !key.is_empty()
        && key.split('/').all(|segment| {
            !segment.is_empty()
                && segment != "."
                && segment != ".."
                && segment
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        });
    if valid {
        Ok(())
    } else {
        Err(MediaStoreError::invalid_key(key))
    }
}

fn io_error(error: io::Error) -> MediaStoreError {
    MediaStoreError::io(error.to_string())
}

fn write_object(root: &Dir, key: &str, bytes: &[u8]) -> io::Result<()> {
    let path = Path::new(key);
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        root.create_dir_all(parent)?;
    }
    let staging = format!("{key}.{}.part", Uuid::new_v4().simple());
    let result = root.create(&staging).and_then(|mut file| {
        file.write_all(bytes)?;
        file.sync_all()
    });
    match result.and_then(|()| root.rename(&staging, root, path)) {
        Ok(()) => Ok(()),
        Err(err) => {
            if let Err(cleanup) = root.remove_file(&staging) {
                debug!(error = %cleanup, %staging, "staging file not removed");
            }
            Err(err)
        }
    }
}

fn remove_object(root: &Dir, key: &str) -> io::Result<()> {
    match root.remove_file(key) {
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

async fn blocking<T: Send + 'static>(
    task: impl FnOnce() -> io::Result<T> + Send + 'static,
) -> Result<T, MediaStoreError> {
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| MediaStoreError::io(format!("media task failed: {err}")))?
        .map_err(io_error)
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn put(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<String, MediaStoreError> {
        validate_key(key)?;
        let root = Arc::clone(&self.root);
        let owned_key = key.to_owned();
        let size = bytes.len();
        blocking(move || write_object(&root, &owned_key, &bytes)).await?;
        debug!(key, content_type, size, "media object stored");
        Ok(self.url_for(key))
    }

    async fn delete(&self, key: &str) -> Result<(), MediaStoreError> {
        validate_key(key)?;
        let root = Arc::clone(&self.root);
        let owned_key = key.to_owned();
        blocking(move || remove_object(&root, &owned_key)).await?;
        debug!(key, "media object removed");
        Ok(())
    }
}
