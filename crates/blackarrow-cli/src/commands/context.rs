use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use blackarrow_application::SiteSession;
use blackarrow_core::config::SiteConfig;
use blackarrow_infrastructure::paths::SitePaths;
use blackarrow_infrastructure::{ConfigService, FileStore};

/// Config and storage shared by every command.
pub struct Context {
    pub config: SiteConfig,
    pub config_path: PathBuf,
    pub durable: Arc<FileStore>,
}

impl Context {
    pub fn load(config: Option<PathBuf>, storage: Option<PathBuf>) -> Result<Self> {
        let config_path = match config {
            Some(path) => path,
            None => SitePaths::config_file()?,
        };
        let storage_path = match storage {
            Some(path) => path,
            None => SitePaths::storage_file()?,
        };

        let site_config = ConfigService::load(&config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

        Ok(Self {
            config: site_config,
            config_path,
            durable: Arc::new(FileStore::new(storage_path)),
        })
    }

    /// A fresh visit backed by the durable storage file.
    pub fn session(&self) -> Result<SiteSession> {
        let session = SiteSession::builder()
            .with_durable_store(self.durable.clone())
            .with_config(self.config.clone())
            .build()?;
        Ok(session)
    }
}

pub fn print_config(ctx: &Context) -> Result<()> {
    println!("# {}", ctx.config_path.display());
    println!("# storage: {}", ctx.durable.path().display());
    print!("{}", toml::to_string_pretty(&ctx.config)?);
    Ok(())
}
