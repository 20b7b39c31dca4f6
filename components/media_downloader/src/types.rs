// components/media_downloader/src/types.rs
use std::fmt;
use std::num::NonZeroU32;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("Required dependency not found: {0}")]
    DependencyNotFound(&'static str),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Could not determine the home directory")]
    HomeNotFound,

    #[error("Search failed: {0}")]
    SearchFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadMode {
    Single,
    Playlist,
    Artist,
    Genre,
}

impl DownloadMode {
    pub fn is_search(self) -> bool {
        matches!(self, DownloadMode::Artist | DownloadMode::Genre)
    }
}

/// What the user asked for, validated at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    mode: DownloadMode,
    search_term: Option<String>,
    max_results: Option<NonZeroU32>,
    source_url: Option<String>,
}

impl DownloadRequest {
    pub fn single(url: &str) -> Result<Self, DownloadError> {
        Self::link(DownloadMode::Single, url)
    }

    pub fn playlist(url: &str) -> Result<Self, DownloadError> {
        Self::link(DownloadMode::Playlist, url)
    }

    pub fn artist(term: &str, max_results: NonZeroU32) -> Result<Self, DownloadError> {
        Self::search(DownloadMode::Artist, term, max_results)
    }

    pub fn genre(term: &str, max_results: NonZeroU32) -> Result<Self, DownloadError> {
        Self::search(DownloadMode::Genre, term, max_results)
    }

    /// The link is kept as typed; yt-dlp also resolves scheme-less links
    /// and bare video IDs, so only an empty link is refused.
    fn link(mode: DownloadMode, url: &str) -> Result<Self, DownloadError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(DownloadError::InvalidUrl("link must not be empty".to_string()));
        }
        if let Err(e) = Url::parse(url) {
            debug!(%url, error = %e, "link is not an absolute URL, passing it on as typed");
        }
        Ok(Self {
            mode,
            search_term: None,
            max_results: None,
            source_url: Some(url.to_string()),
        })
    }

    fn search(mode: DownloadMode, term: &str, max_results: NonZeroU32) -> Result<Self, DownloadError> {
        let term = term.trim();
        if term.is_empty() {
            return Err(DownloadError::InvalidRequest(
                "search term must not be empty".to_string(),
            ));
        }
        Ok(Self {
            mode,
            search_term: Some(term.to_string()),
            max_results: Some(max_results),
            source_url: None,
        })
    }

    pub fn mode(&self) -> DownloadMode {
        self.mode
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search_term.as_deref()
    }

    pub fn max_results(&self) -> Option<NonZeroU32> {
        self.max_results
    }

    pub fn source_url(&self) -> Option<&str> {
        self.source_url.as_deref()
    }

    /// Name of the folder this request downloads into, before space replacement
    pub fn category(&self) -> &str {
        match self.mode {
            DownloadMode::Single => "Single_Songs",
            DownloadMode::Playlist => "Playlists",
            DownloadMode::Artist | DownloadMode::Genre => {
                self.search_term.as_deref().unwrap_or_default()
            }
        }
    }

    pub fn playlist_mode(&self) -> bool {
        self.mode == DownloadMode::Playlist
    }
}

/// A search hit, known only by its metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateTrack {
    pub title: String,
    pub source_url: String,
}

/// Outcome of one orchestrator run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadReport {
    /// Folder the tracks were written to
    pub folder: PathBuf,

    /// URLs handed to the download step, in metadata order
    pub submitted: Vec<String>,

    /// Titles skipped because a matching file already existed
    pub skipped: Vec<String>,
}

impl DownloadReport {
    pub fn downloaded_count(&self) -> usize {
        self.submitted.len()
    }

    pub fn nothing_new(&self) -> bool {
        self.submitted.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProgressStatus {
    Downloading,
    Finished,
    PostProcessing,
    PostProcessed,
    Error,
}

impl fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProgressStatus::Downloading => "downloading",
            ProgressStatus::Finished => "finished",
            ProgressStatus::PostProcessing => "post-processing",
            ProgressStatus::PostProcessed => "converted",
            ProgressStatus::Error => "error",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    pub status: ProgressStatus,
    pub filename: String,
}

/// Receives notices while a request runs. Called on the same task as the
/// download, one event at a time.
pub trait DownloadListener: Send {
    fn on_progress(&mut self, event: &ProgressEvent);

    fn on_skip(&mut self, _title: &str) {}
}
