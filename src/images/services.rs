use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use bytes::Bytes;
use time::OffsetDateTime;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::StorageConfig;
use crate::storage::{StorageClient, StoredObject};

/// A temporary upload: its object key and the URL handed to the model.
#[derive(Debug, Clone)]
pub struct StoredImage {
    pub key: String,
    pub url: String,
}

#[derive(Clone)]
pub struct ImageStore {
    storage: Arc<dyn StorageClient>,
    bucket: String,
    folder: String,
    url_ttl_secs: u64,
    max_age: Duration,
}

impl ImageStore {
    pub fn new(storage: Arc<dyn StorageClient>, cfg: &StorageConfig) -> Self {
        Self {
            storage,
            bucket: cfg.bucket.clone(),
            folder: cfg.folder.trim_matches('/').to_string(),
            url_ttl_secs: cfg.url_ttl_secs,
            max_age: cfg.max_age(),
        }
    }

    pub async fn upload(
        &self,
        body: Bytes,
        extension: &str,
        content_type: &str,
    ) -> anyhow::Result<StoredImage> {
        // Upload still gets a chance when this fails; the put error is clearer.
        if let Err(e) = self.storage.ensure_bucket().await {
            warn!(bucket = %self.bucket, error = %format!("{e:#}"), "could not verify bucket");
        }

        let key = format!("{}/{}.{}", self.folder, Uuid::new_v4(), extension);
        self.storage
            .put_object(&key, body, content_type)
            .await
            .with_context(|| format!("put_object {}", key))?;

        let url = match self.storage.presign_get(&key, self.url_ttl_secs).await {
            Ok(url) => url,
            Err(e) => {
                if let Err(del) = self.storage.delete_object(&key).await {
                    error!(%key, error = %format!("{del:#}"), "failed to remove unreachable upload");
                }
                return Err(e).with_context(|| format!("presign url for {}", key));
            }
        };

        info!(%key, "image stored");
        Ok(StoredImage { key, url })
    }

    /// Deletes the object behind a URL returned by `upload`.
    pub async fn delete(&self, url: &str) -> bool {
        let Some(key) = self.key_from_url(url) else {
            warn!(%url, "invalid image URL format");
            return false;
        };
        match self.storage.delete_object(&key).await {
            Ok(()) => {
                info!(%key, "image deleted");
                true
            }
            Err(e) => {
                error!(%key, error = %format!("{e:#}"), "failed to delete image");
                false
            }
        }
    }

    /// Key is everything after the `/<bucket>/` path segment, minus the query.
    pub fn key_from_url(&self, url: &str) -> Option<String> {
        let marker = format!("/{}/", self.bucket);
        let start = url.find(&marker)? + marker.len();
        let rest = &url[start..];
        let key = rest.split(['?', '#']).next().unwrap_or_default();
        (!key.is_empty()).then(|| key.to_string())
    }

    pub async fn fetch(&self, file_name: &str) -> anyhow::Result<Option<StoredObject>> {
        let key = format!("{}/{}", self.folder, file_name);
        self.storage
            .get_object(&key)
            .await
            .with_context(|| format!("get_object {}", key))
    }

    /// Deletes temporary images older than `max_age`. Returns how many deletes
    /// succeeded; individual failures are logged and skipped.
    pub async fn sweep(&self, max_age: Duration) -> usize {
        let prefix = format!("{}/", self.folder);
        let objects = match self.storage.list_objects(&prefix).await {
            Ok(objs) => objs,
            Err(e) => {
                error!(error = %format!("{e:#}"), "cleanup: listing images failed");
                return 0;
            }
        };

        let cutoff = OffsetDateTime::now_utc() - max_age;
        let mut deleted = 0;
        for obj in objects {
            match obj.last_modified {
                Some(at) if at < cutoff => {}
                _ => continue,
            }
            match self.storage.delete_object(&obj.key).await {
                Ok(()) => deleted += 1,
                Err(e) => {
                    warn!(key = %obj.key, error = %format!("{e:#}"), "cleanup: delete failed")
                }
            }
        }

        if deleted > 0 {
            info!(deleted, "cleanup: removed old temporary images");
        } else {
            debug!("cleanup: no old images");
        }
        deleted
    }

    pub async fn sweep_expired(&self) -> usize {
        self.sweep(self.max_age).await
    }
}

/// Owns a stored image for the lifetime of one request.
///
/// `release` deletes it on the normal path. If the guard is dropped first
/// (panic, cancelled request) the delete is spawned onto the runtime instead,
/// so each image is deleted exactly once either way.
pub struct ImageGuard {
    store: ImageStore,
    image: Option<StoredImage>,
    url: String,
}

impl ImageGuard {
    pub fn new(store: ImageStore, image: StoredImage) -> Self {
        Self {
            store,
            url: image.url.clone(),
            image: Some(image),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn release(mut self) -> bool {
        match self.image.take() {
            Some(image) => self.store.delete(&image.url).await,
            None => false,
        }
    }
}

impl Drop for ImageGuard {
    fn drop(&mut self) {
        let Some(image) = self.image.take() else {
            return;
        };
        warn!(key = %image.key, "request ended before image cleanup; scheduling delete");
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let store = self.store.clone();
                handle.spawn(async move {
                    store.delete(&image.url).await;
                });
            }
            Err(_) => error!(key = %image.key, "no runtime to delete image; left for cleanup"),
        }
    }
}

pub fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        "image/gif" => Some("gif"),
        _ => None,
    }
}
