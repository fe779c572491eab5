//! MediaStorage port - asset host for course thumbnails.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from asset host operations.
#[derive(Debug, Clone, Error)]
pub enum MediaError {
    /// Upload was rejected by the asset host.
    #[error("Upload rejected: {0}")]
    Rejected(String),

    /// Asset host could not be reached.
    #[error("Asset host unavailable: {0}")]
    Unavailable(String),
}

/// Port for the external asset host.
///
/// Used only for course thumbnail images; lecture video is embedded
/// directly from the video host and never passes through this service.
#[async_trait]
pub trait MediaStorage: Send + Sync {
    /// Uploads an image and returns its durable public URL.
    async fn upload_image(&self, filename: &str, bytes: Vec<u8>) -> Result<String, MediaError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_storage_is_object_safe() {
        fn _accepts_dyn(_storage: &dyn MediaStorage) {}
    }

    #[test]
    fn media_errors_display_reason() {
        let err = MediaError::Rejected("file too large".to_string());
        assert_eq!(err.to_string(), "Upload rejected: file too large");
    }
}
