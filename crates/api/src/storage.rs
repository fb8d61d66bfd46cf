//! Listing image storage on the local filesystem.
//!
//! Images live flat in one directory and are referenced from the database by
//! bare filename. The same directory is served read-only at `/uploads`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use realty_core::upload::{is_safe_filename, stored_filename};
use tokio::io::AsyncWriteExt;

/// Attempts at finding a free filename before giving up.
const MAX_NAME_ATTEMPTS: i64 = 16;

/// Writes and removes listing images under a single directory.
#[derive(Debug, Clone)]
pub struct ImageStore {
    dir: PathBuf,
}

impl ImageStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the storage directory if it does not exist yet.
    pub async fn ensure_dir(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    /// Write `data` under a fresh `image_<millis>.<ext>` name and return it.
    ///
    /// Never overwrites: if the name is taken the timestamp is bumped by one
    /// millisecond and the write retried.
    pub async fn save(&self, extension: &str, data: &[u8]) -> std::io::Result<String> {
        let mut millis = chrono::Utc::now().timestamp_millis();

        for _ in 0..MAX_NAME_ATTEMPTS {
            let name = stored_filename(millis, extension);
            let open = tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(self.dir.join(&name))
                .await;

            match open {
                Ok(mut file) => {
                    if let Err(e) = write_all(&mut file, data).await {
                        drop(file);
                        self.remove(&name).await;
                        return Err(e);
                    }
                    tracing::debug!(file = %name, bytes = data.len(), "Stored image");
                    return Ok(name);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => millis += 1,
                Err(e) => return Err(e),
            }
        }

        Err(std::io::Error::new(
            ErrorKind::AlreadyExists,
            "could not find a free image filename",
        ))
    }

    /// Delete a stored image. Failures are logged and swallowed.
    pub async fn remove(&self, name: &str) {
        if !is_safe_filename(name) {
            tracing::warn!(file = %name, "Refusing to delete image with unsafe name");
            return;
        }
        match tokio::fs::remove_file(self.dir.join(name)).await {
            Ok(()) => tracing::debug!(file = %name, "Deleted image"),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!(file = %name, "Image to delete was already gone");
            }
            Err(e) => tracing::warn!(file = %name, error = %e, "Failed to delete image"),
        }
    }
}

async fn write_all(file: &mut tokio::fs::File, data: &[u8]) -> std::io::Result<()> {
    file.write_all(data).await?;
    file.flush().await
}
