//! File uploads

use super::Client;
use crate::error::Result;
use crate::field::{File, FileUploader};
use crate::http::RequestConfig;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde_json::json;
use tracing::debug;

impl Client {
    /// Upload file content to the user files storage
    pub async fn upload_file(&self, content: impl Into<Bytes>, file_name: &str) -> Result<File> {
        let content = content.into();
        debug!("Uploading '{}' ({} bytes)", file_name, content.len());
        let part = Part::bytes(content.to_vec()).file_name(file_name.to_string());
        let form = Form::new().part("file", part);
        self.http()
            .request_json(
                Method::POST,
                "user-files/upload-file/",
                RequestConfig::new().multipart(form),
            )
            .await
    }

    /// Let the server download a file from a URL into the user files storage
    pub async fn upload_file_via_url(&self, url: &str) -> Result<File> {
        debug!("Uploading file from {}", url);
        self.http()
            .post_json("user-files/upload-via-url/", json!({ "url": url }))
            .await
    }
}

#[async_trait]
impl FileUploader for Client {
    async fn upload_bytes(&self, content: Bytes, file_name: &str) -> Result<File> {
        self.upload_file(content, file_name).await
    }

    async fn upload_from_url(&self, url: &str) -> Result<File> {
        self.upload_file_via_url(url).await
    }
}
