use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::color::DEFAULT_PALETTE;
use crate::error::{Error, Result};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// PDF rendering scale factor (1.0 renders at the page's native size)
    #[serde(default = "default_render_scale")]
    pub render_scale: f32,

    /// Background tints used to group pages by source file
    #[serde(default = "default_palette")]
    pub palette: Vec<String>,

    /// Maximum request body size for uploads, in megabytes
    #[serde(default = "default_max_upload_mb")]
    pub max_upload_mb: usize,

    /// How long a conversion run stays available, in seconds
    #[serde(default = "default_run_ttl_secs")]
    pub run_ttl_secs: u64,
}

const fn default_render_scale() -> f32 {
    1.0
}

fn default_palette() -> Vec<String> {
    DEFAULT_PALETTE.iter().map(|c| (*c).to_string()).collect()
}

const fn default_max_upload_mb() -> usize {
    200
}

const fn default_run_ttl_secs() -> u64 {
    3600
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            render_scale: default_render_scale(),
            palette: default_palette(),
            max_upload_mb: default_max_upload_mb(),
            run_ttl_secs: default_run_ttl_secs(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::ConfigLoad(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| Error::ConfigLoad(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from default locations (~/.config/pdf-pages/config.toml, ./config.toml)
    pub fn load() -> Self {
        let user_config = crate::util::config_dir()
            .map(|dir| dir.join("pdf-pages").join("config.toml"));
        let local_config = std::path::PathBuf::from("config.toml");

        for path in user_config.iter().chain(std::iter::once(&local_config)) {
            if !path.exists() {
                continue;
            }
            match Self::from_file(path) {
                Ok(config) => {
                    tracing::debug!("Loaded config from {}", path.display());
                    return config;
                }
                Err(e) => {
                    tracing::warn!("Failed to load {}: {}", path.display(), e);
                }
            }
        }

        tracing::debug!("No config file found, using defaults");
        Self::default()
    }

    /// Reject values the renderer or color assigner cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !self.render_scale.is_finite() || self.render_scale <= 0.0 {
            return Err(Error::ConfigInvalid {
                field: "render_scale".to_string(),
                reason: format!("must be a positive number, got {}", self.render_scale),
            });
        }

        if self.palette.iter().all(|c| c.trim().is_empty()) {
            return Err(Error::ConfigInvalid {
                field: "palette".to_string(),
                reason: "must contain at least one color".to_string(),
            });
        }

        if self.max_upload_mb == 0 {
            return Err(Error::ConfigInvalid {
                field: "max_upload_mb".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    /// Upload body limit in bytes.
    pub const fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.render_scale - 1.0).abs() < f32::EPSILON);
        assert_eq!(config.palette.len(), DEFAULT_PALETTE.len());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = AppConfig::from_toml("render_scale = 2.0\n").unwrap();
        assert!((config.render_scale - 2.0).abs() < f32::EPSILON);
        assert_eq!(config.max_upload_mb, 200);
        assert_eq!(config.palette, default_palette());
    }

    #[test]
    fn test_rejects_empty_palette() {
        let err = AppConfig::from_toml("palette = []\n").unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid { ref field, .. } if field == "palette"));
    }

    #[test]
    fn test_rejects_non_positive_scale() {
        let err = AppConfig::from_toml("render_scale = 0.0\n").unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid { ref field, .. } if field == "render_scale"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "palette = [\"#eee\", \"#ddd\"]").unwrap();
        writeln!(file, "run_ttl_secs = 60").unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.palette, vec!["#eee".to_string(), "#ddd".to_string()]);
        assert_eq!(config.run_ttl_secs, 60);
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let err = AppConfig::from_file("/nonexistent/pdf-pages.toml").unwrap_err();
        assert!(matches!(err, Error::ConfigLoad(_)));
    }
}
