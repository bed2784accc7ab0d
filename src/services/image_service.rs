use async_trait::async_trait;
use aws_sdk_s3 as s3;
use aws_sdk_s3::primitives::ByteStream;
use uuid::Uuid;

use crate::{
    config::{Environment, S3Config},
    error::{AppError, Result},
    models::ImageUpload,
};

/// Somewhere product images can be published to and removed from.
#[async_trait]
pub trait MediaHost: Send + Sync {
    /// Stores the bytes and returns the public URL.
    async fn upload(&self, image: &ImageUpload) -> Result<String>;

    /// Removes a previously uploaded image. Returns `false` when the URL
    /// does not belong to this host.
    async fn delete(&self, url: &str) -> Result<bool>;
}

#[derive(Debug, Clone)]
pub struct S3MediaHost {
    client: s3::Client,
    bucket: String,
    assets_url: String,
    environment: Environment,
}

impl S3MediaHost {
    pub fn new(client: s3::Client, config: &S3Config, environment: Environment) -> Self {
        Self {
            client,
            bucket: config.bucket.clone(),
            assets_url: config.assets_url.clone(),
            environment,
        }
    }

    fn object_key(&self, content_type: &str) -> String {
        format!(
            "{}/{}.{}",
            self.environment.key_prefix(),
            Uuid::new_v4(),
            extension_for(content_type)
        )
    }

    fn key_for_url<'a>(&self, url: &'a str) -> Option<&'a str> {
        key_under(&self.assets_url, url)
    }
}

#[async_trait]
impl MediaHost for S3MediaHost {
    async fn upload(&self, image: &ImageUpload) -> Result<String> {
        let key = self.object_key(&image.content_type);

        put_object(
            &self.client,
            &self.bucket,
            &key,
            &image.content_type,
            image.bytes.clone(),
        )
        .await
        .map_err(|e| AppError::UploadError(format!("Failed to upload image to S3: {}", e)))?;

        tracing::info!("Uploaded {} bytes to s3://{}/{}", image.bytes.len(), self.bucket, key);

        Ok(format!("{}/{}", self.assets_url, key))
    }

    async fn delete(&self, url: &str) -> Result<bool> {
        let Some(key) = self.key_for_url(url) else {
            return Ok(false);
        };

        delete_single_object(&self.client, &self.bucket, key)
            .await
            .map_err(|e| AppError::UploadError(format!("Failed to delete image from S3: {}", e)))?;

        Ok(true)
    }
}

pub async fn put_object(
    client: &s3::Client,
    bucket: &str,
    key: &str,
    content_type: &str,
    bytes: Vec<u8>,
) -> std::result::Result<(), s3::Error> {
    client
        .put_object()
        .bucket(bucket)
        .key(key)
        .content_type(content_type)
        .body(ByteStream::from(bytes))
        .send()
        .await?;

    Ok(())
}

pub async fn delete_single_object(
    client: &s3::Client,
    bucket: &str,
    key: &str,
) -> std::result::Result<(), s3::Error> {
    client.delete_object().bucket(bucket).key(key).send().await?;

    Ok(())
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "jpg",
    }
}

fn key_under<'a>(base_url: &str, url: &'a str) -> Option<&'a str> {
    url.strip_prefix(base_url)?
        .strip_prefix('/')
        .filter(|key| !key.is_empty())
}
