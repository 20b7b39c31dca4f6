// components/media_downloader/src/organization.rs
use crate::types::DownloadError;
use std::path::{Path, PathBuf};

const DOWNLOADS_DIR: &str = "Downloads";
const LIBRARY_DIR: &str = "Wavegrab Downloads";

/// Owns the library root and hands out one folder per category
#[derive(Debug, Clone)]
pub struct FolderManager {
    base: PathBuf,
}

impl FolderManager {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Library rooted at `~/Downloads/Wavegrab Downloads`
    pub fn in_home() -> Result<Self, DownloadError> {
        let home = dirs::home_dir().ok_or(DownloadError::HomeNotFound)?;
        Ok(Self::new(home.join(DOWNLOADS_DIR).join(LIBRARY_DIR)))
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Path of a category folder, without touching the filesystem
    pub fn category_path(&self, category: &str) -> PathBuf {
        self.base.join(category.replace(' ', "_"))
    }

    /// Resolve a category folder, creating any missing segments
    pub async fn category_folder(&self, category: &str) -> Result<PathBuf, DownloadError> {
        let folder = self.category_path(category);
        tokio::fs::create_dir_all(&folder).await?;
        Ok(folder)
    }
}
