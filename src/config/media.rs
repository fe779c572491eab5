//! Media configuration (asset host)

use serde::Deserialize;

use super::error::ValidationError;

/// Asset host configuration (Cloudinary)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaConfig {
    /// Cloud name identifying the account
    pub cloud_name: String,

    /// Upload preset authorizing thumbnail uploads
    pub upload_preset: String,
}

impl MediaConfig {
    /// Validate media configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.cloud_name.is_empty() {
            return Err(ValidationError::MissingRequired("MEDIA_CLOUD_NAME"));
        }
        if self.upload_preset.is_empty() {
            return Err(ValidationError::MissingRequired("MEDIA_UPLOAD_PRESET"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn complete_config_passes() {
        let config = MediaConfig {
            cloud_name: "edvora".to_string(),
            upload_preset: "thumbnails".to_string(),
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_fields_fail() {
        assert!(MediaConfig::default().validate().is_err());
    }
}
