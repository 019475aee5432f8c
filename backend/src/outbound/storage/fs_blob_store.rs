//! Filesystem blob store sandboxed to the upload root.
//!
//! The store holds a `cap_std` directory handle, so every path it touches is
//! resolved inside the upload root regardless of what a stored name looks
//! like. Blobs live at `<owner-id>/<stored-name>`.

use std::io;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};

use crate::domain::account::AccountId;
use crate::domain::ports::{AttachmentBlobStore, BlobStoreError};

/// [`AttachmentBlobStore`] over a sandboxed directory tree.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: Arc<Dir>,
}

impl FsBlobStore {
    /// Open (creating if necessary) the upload root and sandbox to it.
    pub fn open(root: impl AsRef<Path>) -> io::Result<Self> {
        Dir::create_ambient_dir_all(&root, ambient_authority())?;
        let dir = Dir::open_ambient_dir(&root, ambient_authority())?;
        Ok(Self {
            root: Arc::new(dir),
        })
    }

    async fn run_blocking<T, F>(&self, operation: F) -> Result<T, BlobStoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Dir) -> io::Result<T> + Send + 'static,
    {
        let root = Arc::clone(&self.root);
        tokio::task::spawn_blocking(move || operation(&root))
            .await
            .map_err(|err| BlobStoreError::io(format!("blocking task failed: {err}")))?
            .map_err(|err| BlobStoreError::io(err.to_string()))
    }
}

#[async_trait]
impl AttachmentBlobStore for FsBlobStore {
    async fn save(
        &self,
        owner: &AccountId,
        stored_name: &str,
        bytes: &[u8],
    ) -> Result<(), BlobStoreError> {
        let partition = owner.to_string();
        let name = stored_name.to_owned();
        let payload = bytes.to_vec();
        self.run_blocking(move |root| {
            root.create_dir_all(&partition)?;
            let dir = root.open_dir(&partition)?;
            dir.write(&name, &payload)
        })
        .await
    }

    async fn load(
        &self,
        owner: &AccountId,
        stored_name: &str,
    ) -> Result<Option<Vec<u8>>, BlobStoreError> {
        let partition = owner.to_string();
        let name = stored_name.to_owned();
        self.run_blocking(move |root| {
            let dir = match root.open_dir(&partition) {
                Ok(dir) => dir,
                Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
                Err(err) => return Err(err),
            };
            match dir.read(&name) {
                Ok(bytes) => Ok(Some(bytes)),
                Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
                Err(err) => Err(err),
            }
        })
        .await
    }

    async fn remove(&self, owner: &AccountId, stored_name: &str) -> Result<bool, BlobStoreError> {
        let partition = owner.to_string();
        let name = stored_name.to_owned();
        self.run_blocking(move |root| {
            let dir = match root.open_dir(&partition) {
                Ok(dir) => dir,
                Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
                Err(err) => return Err(err),
            };
            match dir.remove_file(&name) {
                Ok(()) => Ok(true),
                Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
                Err(err) => Err(err),
            }
        })
        .await
    }
}
