//! Platform paths for site configuration and durable storage.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/blackarrow/        # Config directory (platform dependent)
//! ├── site.toml                # Site configuration
//! └── storage.toml             # Durable client storage (region, theme, consent)
//! ```

use std::path::PathBuf;

use blackarrow_core::error::{Result, SiteError};

const APP_DIR: &str = "blackarrow";

pub struct SitePaths;

impl SitePaths {
    /// Returns the configuration directory, e.g. `~/.config/blackarrow/`.
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| SiteError::config("Cannot determine the platform config directory"))
    }

    /// Path to `site.toml`.
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("site.toml"))
    }

    /// Path to the durable storage file.
    pub fn storage_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("storage.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_files_live_in_config_dir() {
        // Headless CI may lack a home directory; only check structure when resolvable
        if let Ok(dir) = SitePaths::config_dir() {
            assert!(dir.ends_with(APP_DIR));
            assert_eq!(SitePaths::config_file().unwrap(), dir.join("site.toml"));
            assert_eq!(SitePaths::storage_file().unwrap(), dir.join("storage.toml"));
        }
    }
}
