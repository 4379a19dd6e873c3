use anyhow::Context;
use async_trait::async_trait;
use aws_config::{defaults, BehaviorVersion};
use aws_credential_types::Credentials;
use aws_sdk_s3::{
    config::{Builder as S3ConfigBuilder, Region},
    presigning::PresigningConfig,
    Client,
};
use aws_smithy_types::byte_stream::ByteStream;
use bytes::Bytes;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::config::StorageConfig;

#[derive(Debug, Clone)]
pub struct ObjectInfo {
    pub key: String,
    pub last_modified: Option<OffsetDateTime>,
}

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub body: Bytes,
    pub content_type: Option<String>,
}

#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Creates the bucket when it does not exist yet.
    async fn ensure_bucket(&self) -> anyhow::Result<()>;
    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> anyhow::Result<()>;
    async fn get_object(&self, key: &str) -> anyhow::Result<Option<StoredObject>>;
    async fn delete_object(&self, key: &str) -> anyhow::Result<()>;
    async fn list_objects(&self, prefix: &str) -> anyhow::Result<Vec<ObjectInfo>>;
    async fn presign_get(&self, key: &str, seconds: u64) -> anyhow::Result<String>;
}

#[derive(Clone)]
pub struct Storage {
    client: Client,
    bucket: String,
}

impl Storage {
    pub async fn new(cfg: &StorageConfig) -> anyhow::Result<Self> {
        let shared = defaults(BehaviorVersion::latest())
            .region(Region::new(cfg.region.clone()))
            .credentials_provider(Credentials::new(
                &cfg.access_key,
                &cfg.secret_key,
                None,
                None,
                "static",
            ))
            .endpoint_url(&cfg.endpoint)
            .load()
            .await;

        // Path-style keeps the bucket name in the URL path, which is what
        // `ImageStore::delete` parses the key back out of.
        let conf = S3ConfigBuilder::from(&shared)
            .endpoint_url(&cfg.endpoint)
            .force_path_style(true)
            .build();

        Ok(Self {
            client: Client::from_conf(conf),
            bucket: cfg.bucket.clone(),
        })
    }
}

#[async_trait]
impl StorageClient for Storage {
    async fn ensure_bucket(&self) -> anyhow::Result<()> {
        if self
            .client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .is_ok()
        {
            debug!(bucket = %self.bucket, "bucket already exists");
            return Ok(());
        }

        info!(bucket = %self.bucket, "creating bucket");
        self.client
            .create_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .context("s3 create_bucket")?;
        Ok(())
    }

    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> anyhow::Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .context("s3 put_object")?;
        Ok(())
    }

    async fn get_object(&self, key: &str) -> anyhow::Result<Option<StoredObject>> {
        let out = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(out) => out,
            Err(e)
                if e.as_service_error()
                    .map(|se| se.is_no_such_key())
                    .unwrap_or(false) =>
            {
                return Ok(None)
            }
            Err(e) => return Err(e).context("s3 get_object"),
        };

        let content_type = out.content_type().map(str::to_string);
        let body = out
            .body
            .collect()
            .await
            .context("s3 get_object body")?
            .into_bytes();
        Ok(Some(StoredObject { body, content_type }))
    }

    async fn delete_object(&self, key: &str) -> anyhow::Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .context("s3 delete_object")?;
        Ok(())
    }

    async fn list_objects(&self, prefix: &str) -> anyhow::Result<Vec<ObjectInfo>> {
        let mut out = Vec::new();
        let mut token: Option<String> = None;
        loop {
            let page = self
                .client
                .list_objects_v2()
                .bucket(&self.bucket)
                .prefix(prefix)
                .set_continuation_token(token.take())
                .send()
                .await
                .context("s3 list_objects_v2")?;

            for obj in page.contents() {
                let Some(key) = obj.key() else { continue };
                let last_modified = obj
                    .last_modified()
                    .and_then(|dt| OffsetDateTime::from_unix_timestamp(dt.secs()).ok());
                out.push(ObjectInfo {
                    key: key.to_string(),
                    last_modified,
                });
            }

            match page.next_continuation_token() {
                Some(next) => token = Some(next.to_string()),
                None => break,
            }
        }
        Ok(out)
    }

    async fn presign_get(&self, key: &str, seconds: u64) -> anyhow::Result<String> {
        let req = self.client.get_object().bucket(&self.bucket).key(key);
        let presigned = req
            .presigned(PresigningConfig::expires_in(
                std::time::Duration::from_secs(seconds),
            )?)
            .await
            .context("s3 presign_get")?;
        Ok(presigned.uri().to_string())
    }
}
