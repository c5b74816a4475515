use std::path::{Component, Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, warn};

/// Where uploaded images live. Records only keep the public path returned by
/// `put`, e.g. `/public/coupon_image/1718-ab12.jpg`.
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn put(&self, dir: &str, file_name: &str, body: Bytes) -> anyhow::Result<String>;

    /// Returns `false` if nothing was stored at `public_path`.
    async fn remove(&self, public_path: &str) -> anyhow::Result<bool>;

    /// Synchronous best-effort removal, usable from `Drop`.
    fn discard(&self, public_path: &str);
}

/// Removes a file and only logs failures; cleanup never fails a request.
pub async fn remove_quietly(media: &dyn MediaStore, public_path: &str) {
    match media.remove(public_path).await {
        Ok(true) => debug!(path = %public_path, "media removed"),
        Ok(false) => debug!(path = %public_path, "media already absent"),
        Err(e) => warn!(error = %e, path = %public_path, "media removal failed"),
    }
}

#[derive(Clone)]
pub struct LocalMediaStore {
    root: PathBuf,
    url_prefix: String,
}

impl LocalMediaStore {
    pub fn new(root: impl Into<PathBuf>, url_prefix: &str) -> Self {
        Self {
            root: root.into(),
            url_prefix: url_prefix.trim_end_matches('/').to_string(),
        }
    }

    /// Maps a public path back onto disk, refusing anything outside the root.
    fn resolve(&self, public_path: &str) -> Option<PathBuf> {
        let rel = public_path.strip_prefix(&self.url_prefix)?.strip_prefix('/')?;
        let rel = Path::new(rel);
        if rel.as_os_str().is_empty() || !rel.components().all(|c| matches!(c, Component::Normal(_))) {
            return None;
        }
        Some(self.root.join(rel))
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn put(&self, dir: &str, file_name: &str, body: Bytes) -> anyhow::Result<String> {
        let public_path = format!("{}/{}/{}", self.url_prefix, dir, file_name);
        let target = self
            .resolve(&public_path)
            .with_context(|| format!("refusing media path {public_path}"))?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("create media dir {}", parent.display()))?;
        }
        tokio::fs::write(&target, &body)
            .await
            .with_context(|| format!("write media {}", target.display()))?;
        Ok(public_path)
    }

    async fn remove(&self, public_path: &str) -> anyhow::Result<bool> {
        let Some(target) = self.resolve(public_path) else {
            warn!(path = %public_path, "ignoring media path outside the media root");
            return Ok(false);
        };
        match tokio::fs::remove_file(&target).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("remove media {}", target.display())),
        }
    }

    fn discard(&self, public_path: &str) {
        if let Some(target) = self.resolve(public_path) {
            if let Err(e) = std::fs::remove_file(&target) {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(error = %e, path = %target.display(), "staged media cleanup failed");
                }
            }
        }
    }
}

#[cfg(test)]
pub use memory::MemoryMediaStore;

/// Keeps files in a map instead of on disk.
#[cfg(test)]
mod memory {
    use std::{collections::HashMap, sync::Mutex};

    use async_trait::async_trait;
    use bytes::Bytes;

    use super::MediaStore;

    #[derive(Default)]
    pub struct MemoryMediaStore {
        files: Mutex<HashMap<String, Bytes>>,
    }

    impl MemoryMediaStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn contains(&self, public_path: &str) -> bool {
            self.files
                .lock()
                .map(|f| f.contains_key(public_path))
                .unwrap_or(false)
        }

        pub fn len(&self) -> usize {
            self.files.lock().map(|f| f.len()).unwrap_or(0)
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }

    #[async_trait]
    impl MediaStore for MemoryMediaStore {
        async fn put(&self, dir: &str, file_name: &str, body: Bytes) -> anyhow::Result<String> {
            let public_path = format!("/public/{dir}/{file_name}");
            self.files
                .lock()
                .map_err(|_| anyhow::anyhow!("media lock poisoned"))?
                .insert(public_path.clone(), body);
            Ok(public_path)
        }

        async fn remove(&self, public_path: &str) -> anyhow::Result<bool> {
            Ok(self
                .files
                .lock()
                .map_err(|_| anyhow::anyhow!("media lock poisoned"))?
                .remove(public_path)
                .is_some())
        }

        fn discard(&self, public_path: &str) {
            if let Ok(mut files) = self.files.lock() {
                files.remove(public_path);
            }
        }
    }
}
