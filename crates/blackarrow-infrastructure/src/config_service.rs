//! Loading of `site.toml`.

use std::fs;
use std::path::Path;

use blackarrow_core::config::SiteConfig;
use blackarrow_core::error::{Result, SiteError};

use crate::paths::SitePaths;

pub struct ConfigService;

impl ConfigService {
    /// Loads the configuration at `path`.
    ///
    /// A missing or blank file yields the defaults; a file that does not
    /// parse is a configuration error.
    pub fn load(path: &Path) -> Result<SiteConfig> {
        if !path.exists() {
            tracing::debug!("[ConfigService] {:?} not found, using defaults", path);
            return Ok(SiteConfig::default());
        }

        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(SiteConfig::default());
        }

        toml::from_str(&content)
            .map_err(|e| SiteError::config(format!("Invalid config {:?}: {}", path, e)))
    }

    /// Loads the configuration from the platform config directory.
    pub fn load_default() -> Result<SiteConfig> {
        Self::load(&SitePaths::config_file()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blackarrow_core::region::Region;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_default() {
        let temp_dir = TempDir::new().unwrap();
        let config = ConfigService::load(&temp_dir.path().join("site.toml")).unwrap();
        assert_eq!(config, SiteConfig::default());
    }

    #[test]
    fn test_load_overrides() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("site.toml");
        fs::write(
            &path,
            r#"
[region]
default_region = "IND"

[region.subdomains]
dubai = "UAE"

[geolocation]
enabled = false
"#,
        )
        .unwrap();

        let config = ConfigService::load(&path).unwrap();
        assert_eq!(config.region.default_region, Region::Ind);
        assert_eq!(config.region.subdomains.get("dubai"), Some(&Region::Uae));
        // A provided table replaces the defaults wholesale
        assert!(config.region.subdomains.get("uk").is_none());
        assert!(!config.geolocation.enabled);
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("site.toml");
        fs::write(&path, "[region\ndefault_region = 3").unwrap();

        let err = ConfigService::load(&path).unwrap_err();
        assert!(err.is_config());
    }
}
