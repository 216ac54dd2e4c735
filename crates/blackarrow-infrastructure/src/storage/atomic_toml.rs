//! Atomic TOML document persistence.
//!
//! Writes go through a temp file, an fsync and a rename, under an exclusive
//! lock file, so a crash mid-write leaves the previous document intact.

use blackarrow_core::error::{Result, SiteError};
use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// A handle to one TOML document on disk.
pub struct AtomicTomlFile<T> {
    path: PathBuf,
    _phantom: PhantomData<T>,
}

impl<T> AtomicTomlFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and parses the document.
    ///
    /// - `Ok(None)`: the file does not exist or is blank
    /// - `Err`: the file could not be read or is not valid for `T`
    pub fn load(&self) -> Result<Option<T>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(None);
        }

        Ok(Some(toml::from_str(&content)?))
    }

    /// Replaces the document atomically.
    pub fn save(&self, data: &T) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let rendered = toml::to_string_pretty(data)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(rendered.as_bytes())?;
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Read-modify-write under the exclusive lock.
    ///
    /// `on_unreadable` decides what to start from when the current document
    /// cannot be parsed; `None` aborts with the parse error.
    pub fn update<F>(&self, default_value: T, on_unreadable: Option<T>, f: F) -> Result<()>
    where
        F: FnOnce(&mut T),
    {
        let _lock = FileLock::acquire(&self.path)?;

        let mut data = match self.load() {
            Ok(loaded) => loaded.unwrap_or(default_value),
            Err(e) => match on_unreadable {
                Some(fresh) => {
                    tracing::warn!(
                        "[AtomicTomlFile] Discarding unreadable {:?}: {}",
                        self.path,
                        e
                    );
                    fresh
                }
                None => return Err(e),
            },
        };

        f(&mut data);
        self.save(&data)
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| SiteError::io(format!("{:?} has no parent directory", self.path)))?;
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| SiteError::io(format!("{:?} has no file name", self.path)))?;

        Ok(parent.join(format!(".{}.tmp", file_name.to_string_lossy())))
    }
}

/// Exclusive lock on a file next to the document.
///
/// The lock file stays on disk: every writer must lock the same inode, so
/// it is never unlinked. The OS releases the lock when the handle drops.
struct FileLock {
    _file: File,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self> {
        let lock_path = path.with_extension("lock");
        if let Some(parent) = lock_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive()
                .map_err(|e| SiteError::storage(format!("Failed to acquire lock: {}", e)))?;
        }

        Ok(FileLock { _file: file })
    }
}
