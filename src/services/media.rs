// ABOUTME: Decodes base64 image data URIs and stores them under the media root
// ABOUTME: Storage sits behind the MediaStore trait; LocalMediaStore writes to disk
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

//! # Media storage
//!
//! Images arrive as `data:image/<ext>;base64,<payload>` strings. They are
//! decoded up front during validation, written under a folder of the media
//! root with a random file name, and referenced by their media-relative path.
//! Responses expose `{public_base_url}/media/<path>`.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::MediaConfig;
use crate::constants::routes::MEDIA_PREFIX;
use crate::errors::{AppError, AppResult};

/// Media folder for recipe images
pub const RECIPE_IMAGES: &str = "recipes/images";
/// Media folder for user avatars
pub const AVATARS: &str = "users";

const MAX_EXTENSION_LENGTH: usize = 8;

/// Image decoded from a data URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// File extension taken from the MIME subtype
    pub extension: String,
    /// Raw image bytes
    pub bytes: Vec<u8>,
}

impl DecodedImage {
    /// Parse a `data:image/<ext>;base64,<payload>` string
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when the string is not an image data
    /// URI or the payload is not valid base64
    pub fn from_data_uri(value: &str) -> Result<Self, String> {
        let rest = value
            .strip_prefix("data:")
            .ok_or_else(|| "Image must be a data URI".to_owned())?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| "Image data URI has no payload".to_owned())?;
        let mime = header
            .strip_suffix(";base64")
            .ok_or_else(|| "Image data URI must be base64 encoded".to_owned())?;
        let subtype = mime
            .strip_prefix("image/")
            .ok_or_else(|| "Data URI is not an image".to_owned())?;

        let extension = subtype.to_ascii_lowercase();
        if extension.is_empty()
            || extension.len() > MAX_EXTENSION_LENGTH
            || !extension.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return Err(format!("Unsupported image type '{subtype}'"));
        }

        let bytes = STANDARD
            .decode(payload.trim())
            .map_err(|e| format!("Invalid base64 image payload: {e}"))?;
        if bytes.is_empty() {
            return Err("Image payload is empty".to_owned());
        }

        Ok(Self { extension, bytes })
    }
}

/// Persistent storage for uploaded images
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store an image in `folder`, returning its media-relative path
    async fn save(&self, folder: &str, image: &DecodedImage) -> AppResult<String>;

    /// Remove a previously stored file; missing files are not an error
    async fn delete(&self, path: &str) -> AppResult<()>;

    /// Absolute public URL of a media-relative path
    fn url(&self, path: &str) -> String;
}

/// Media store writing into a local directory
#[derive(Debug, Clone)]
pub struct LocalMediaStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalMediaStore {
    /// Create a store rooted at `root`
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Create a store from the media configuration
    #[must_use]
    pub fn from_config(config: &MediaConfig) -> Self {
        Self::new(&config.root, &config.public_base_url)
    }

    /// Directory files are written to
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a media-relative path, refusing anything that escapes the root
    fn resolve(&self, path: &str) -> AppResult<PathBuf> {
        let relative = Path::new(path);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(AppError::invalid_input(format!(
                "Invalid media path '{path}'"
            )));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn save(&self, folder: &str, image: &DecodedImage) -> AppResult<String> {
        let file_name = format!("{}.{}", Uuid::new_v4().simple(), image.extension);
        let relative = format!("{folder}/{file_name}");
        let target = self.resolve(&relative)?;

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::storage(format!(
                    "Failed to create media directory {}: {e}",
                    parent.display()
                ))
            })?;
        }
        tokio::fs::write(&target, &image.bytes).await.map_err(|e| {
            AppError::storage(format!("Failed to write {}: {e}", target.display()))
        })?;

        debug!(path = %relative, bytes = image.bytes.len(), "Stored media file");
        Ok(relative)
    }

    async fn delete(&self, path: &str) -> AppResult<()> {
        let target = self.resolve(path)?;
        match tokio::fs::remove_file(&target).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!(path, "Media file already gone");
                Ok(())
            }
            Err(e) => Err(AppError::storage(format!(
                "Failed to delete {}: {e}",
                target.display()
            ))),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{MEDIA_PREFIX}/{path}", self.public_base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PIXEL: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    #[test]
    fn test_parse_data_uri() {
        let image = DecodedImage::from_data_uri(PIXEL).unwrap();
        assert_eq!(image.extension, "png");
        assert!(image.bytes.starts_with(b"\x89PNG"));
    }

    #[test]
    fn test_rejects_non_image_uris() {
        assert!(DecodedImage::from_data_uri("https://example.com/a.png").is_err());
        assert!(DecodedImage::from_data_uri("data:text/plain;base64,aGk=").is_err());
        assert!(DecodedImage::from_data_uri("data:image/png,raw").is_err());
        assert!(DecodedImage::from_data_uri("data:image/png;base64,@@@").is_err());
        assert!(DecodedImage::from_data_uri("data:image/png;base64,").is_err());
    }

    #[tokio::test]
    async fn test_save_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path(), "http://localhost:8000/");
        let image = DecodedImage::from_data_uri(PIXEL).unwrap();

        let path = store.save(RECIPE_IMAGES, &image).await.unwrap();
        assert!(path.starts_with("recipes/images/"));
        assert!(path.ends_with(".png"));
        assert_eq!(
            tokio::fs::read(dir.path().join(&path)).await.unwrap(),
            image.bytes
        );
        assert_eq!(
            store.url(&path),
            format!("http://localhost:8000/media/{path}")
        );

        store.delete(&path).await.unwrap();
        assert!(!dir.path().join(&path).exists());
        store.delete(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_refuses_escaping_paths() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path(), "http://localhost");
        assert!(store.delete("../outside.png").await.is_err());
        assert!(store.delete("/etc/passwd").await.is_err());
    }
}
