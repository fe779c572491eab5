//! Cloudinary adapter for the MediaStorage port.
//!
//! Uploads thumbnail images via the unsigned-upload endpoint and
//! returns the durable `secure_url` the asset host assigns.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::ports::{MediaError, MediaStorage};

/// Cloudinary configuration.
#[derive(Clone)]
pub struct CloudinaryConfig {
    /// Cloud name identifying the account.
    pub cloud_name: String,

    /// Upload preset authorizing unsigned uploads.
    pub upload_preset: SecretString,

    /// API base URL.
    pub api_base_url: String,
}

impl CloudinaryConfig {
    /// Create a new configuration with required fields.
    pub fn new(cloud_name: impl Into<String>, upload_preset: impl Into<String>) -> Self {
        Self {
            cloud_name: cloud_name.into(),
            upload_preset: SecretString::new(upload_preset.into()),
            api_base_url: "https://api.cloudinary.com".to_string(),
        }
    }

    fn upload_url(&self) -> String {
        format!(
            "{}/v1_1/{}/image/upload",
            self.api_base_url, self.cloud_name
        )
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

/// Cloudinary implementation of the MediaStorage port.
pub struct CloudinaryMediaStorage {
    config: CloudinaryConfig,
    http_client: reqwest::Client,
}

impl CloudinaryMediaStorage {
    /// Create a new adapter with the given configuration.
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl MediaStorage for CloudinaryMediaStorage {
    async fn upload_image(&self, filename: &str, bytes: Vec<u8>) -> Result<String, MediaError> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new()
            .text(
                "upload_preset",
                self.config.upload_preset.expose_secret().to_string(),
            )
            .part("file", part);

        let response = self
            .http_client
            .post(self.config.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| MediaError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MediaError::Rejected(format!("HTTP {}: {}", status, body)));
        }

        let upload: UploadResponse = response
            .json()
            .await
            .map_err(|e| MediaError::Rejected(format!("invalid upload response: {}", e)))?;

        Ok(upload.secure_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_url_includes_cloud_name() {
        let config = CloudinaryConfig::new("edvora-media", "preset_x");
        assert_eq!(
            config.upload_url(),
            "https://api.cloudinary.com/v1_1/edvora-media/image/upload"
        );
    }
}
