//! File cells and uploads

use super::PendingChanges;
use crate::error::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// Thumbnail of an uploaded image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileThumbnail {
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// A file stored in Baserow with its metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    /// Storage name; the identifier used when writing file cells
    pub name: String,
    /// Name shown in the UI and used for downloads
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible_name: Option<String>,
    /// Name of the file when it was uploaded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,
    /// Download URL; expires after a while
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnails: Option<HashMap<String, FileThumbnail>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_image: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<DateTime<Utc>>,
}

/// Something that can store files in Baserow
///
/// Implemented by [`Client`](crate::client::Client).
#[async_trait]
pub trait FileUploader: Send + Sync {
    /// Upload raw file content
    async fn upload_bytes(&self, content: Bytes, file_name: &str) -> Result<File>;

    /// Let Baserow download a file from a URL
    async fn upload_from_url(&self, url: &str) -> Result<File>;
}

/// A file cell: ordered files plus a pending-change flag
///
/// Appending uploads the file right away but only links it to the row
/// with the record's next `update`. Dropping a field whose changes were
/// never committed logs a warning; use
/// [`ensure_committed`](FileField::ensure_committed) to turn that into an
/// error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileField {
    files: Vec<File>,
    pending: bool,
}

impl FileField {
    /// Create a field from already stored files
    pub fn new(files: Vec<File>) -> Self {
        Self {
            files,
            pending: false,
        }
    }

    /// Upload a file from a URL into a new field
    pub async fn from_url(uploader: &dyn FileUploader, url: &str) -> Result<Self> {
        let mut field = Self::default();
        field.append_file_from_url(uploader, url, None).await?;
        Ok(field)
    }

    /// The files
    pub fn files(&self) -> &[File] {
        &self.files
    }

    /// Number of files
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check whether the field holds no file
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Upload raw content and append it
    ///
    /// `visible_name` overrides the name shown in Baserow.
    pub async fn append_file(
        &mut self,
        uploader: &dyn FileUploader,
        content: impl Into<Bytes> + Send,
        file_name: &str,
        visible_name: Option<&str>,
    ) -> Result<&File> {
        let file = uploader.upload_bytes(content.into(), file_name).await?;
        Ok(self.push_uploaded(file, visible_name))
    }

    /// Upload a file from a URL and append it
    pub async fn append_file_from_url(
        &mut self,
        uploader: &dyn FileUploader,
        url: &str,
        visible_name: Option<&str>,
    ) -> Result<&File> {
        let file = uploader.upload_from_url(url).await?;
        Ok(self.push_uploaded(file, visible_name))
    }

    fn push_uploaded(&mut self, mut file: File, visible_name: Option<&str>) -> &File {
        if let Some(name) = visible_name {
            file.visible_name = Some(name.to_string());
        } else if file.visible_name.is_none() {
            file.visible_name.clone_from(&file.original_name);
        }
        self.files.push(file);
        self.pending = true;
        &self.files[self.files.len() - 1]
    }

    /// Remove a file by its storage name
    pub fn remove(&mut self, name: &str) -> Option<File> {
        let pos = self.files.iter().position(|file| file.name == name)?;
        self.pending = true;
        Some(self.files.remove(pos))
    }

    /// Fail when there are changes `update` never sent
    pub fn ensure_committed(&self, field: &str) -> Result<()> {
        if self.pending {
            return Err(Error::UncommittedChanges {
                field: field.to_string(),
            });
        }
        Ok(())
    }
}

impl PendingChanges for FileField {
    fn has_pending_changes(&self) -> bool {
        self.pending
    }

    fn mark_committed(&mut self) {
        self.pending = false;
    }
}

impl Drop for FileField {
    fn drop(&mut self) {
        if self.pending {
            let names: Vec<&str> = self.files.iter().map(|file| file.name.as_str()).collect();
            warn!(
                "file field dropped with uploads that were never committed with update(): {}",
                names.join(", ")
            );
        }
    }
}

impl Serialize for FileField {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.files.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for FileField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Vec::<File>::deserialize(deserializer).map(Self::new)
    }
}
