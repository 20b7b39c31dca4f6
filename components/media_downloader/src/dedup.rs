// components/media_downloader/src/dedup.rs
//! Existing files are the only record of what has been downloaded.
//!
//! Titles are matched exactly after trimming. They are not sanitized, so a
//! title containing a path separator resolves to whatever the host
//! filesystem makes of the joined path.
use std::path::{Path, PathBuf};

/// Extension the transcoder produces
pub const EXPECTED_EXTENSION: &str = "mp3";

/// Where a track with this title ends up after transcoding
pub fn expected_path(title: &str, folder: &Path) -> PathBuf {
    folder.join(format!("{}.{}", title.trim(), EXPECTED_EXTENSION))
}

/// Check the disk for an already transcoded file. Never cached.
pub fn already_downloaded(title: &str, folder: &Path) -> bool {
    expected_path(title, folder).exists()
}
