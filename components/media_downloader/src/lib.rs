// components/media_downloader/src/lib.rs
mod dedup;
mod options;
mod organization;
mod query;
mod types;
mod ytdlp;

use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub use dedup::{already_downloaded, expected_path, EXPECTED_EXTENSION};
pub use options::{OptionsBuilder, OutputOptions, PostProcessor};
pub use organization::FolderManager;
pub use query::build_search_query;
pub use types::{
    CandidateTrack, DownloadError, DownloadListener, DownloadMode, DownloadReport,
    DownloadRequest, ProgressEvent, ProgressStatus,
};
pub use ytdlp::{Downloader, YtDlp};

#[cfg(any(test, feature = "test-support"))]
pub use ytdlp::stub;

pub struct MediaDownloader {
    folders: FolderManager,
    options: OptionsBuilder,
    downloader: Arc<dyn Downloader + Send + Sync>,
}

impl MediaDownloader {
    /// Create a MediaDownloader backed by yt-dlp
    pub fn new(folders: FolderManager, options: OptionsBuilder) -> Self {
        Self::new_with_downloader(folders, options, Arc::new(YtDlp))
    }

    /// Create a MediaDownloader with a specific downloader implementation
    pub fn new_with_downloader(
        folders: FolderManager,
        options: OptionsBuilder,
        downloader: Arc<dyn Downloader + Send + Sync>,
    ) -> Self {
        Self {
            folders,
            options,
            downloader,
        }
    }

    pub fn folders(&self) -> &FolderManager {
        &self.folders
    }

    /// Carry out one request. Link requests go straight to the download
    /// step; search requests are filtered against the target folder first.
    pub async fn run(
        &self,
        request: &DownloadRequest,
        listener: &mut dyn DownloadListener,
    ) -> Result<DownloadReport, DownloadError> {
        let folder = self.folders.category_folder(request.category()).await?;
        let options = self.options.build(&folder, request.playlist_mode());

        let (urls, skipped) = match request.mode() {
            DownloadMode::Single | DownloadMode::Playlist => {
                let url = request.source_url().ok_or_else(|| {
                    DownloadError::InvalidRequest("link request without a URL".to_string())
                })?;
                (vec![url.to_string()], Vec::new())
            }
            DownloadMode::Artist | DownloadMode::Genre => {
                self.select_new_tracks(request, &folder, listener).await?
            }
        };

        if !urls.is_empty() {
            info!(count = urls.len(), folder = %folder.display(), "downloading");
            self.downloader.download(&urls, &options, listener).await?;
        }

        Ok(DownloadReport {
            folder,
            submitted: urls,
            skipped,
        })
    }

    async fn select_new_tracks(
        &self,
        request: &DownloadRequest,
        folder: &Path,
        listener: &mut dyn DownloadListener,
    ) -> Result<(Vec<String>, Vec<String>), DownloadError> {
        let (Some(term), Some(max_results)) = (request.search_term(), request.max_results())
        else {
            return Err(DownloadError::InvalidRequest(
                "search request without a term".to_string(),
            ));
        };

        let query = build_search_query(term, max_results);
        let candidates = self.downloader.search(&query).await?;

        let mut urls = Vec::new();
        let mut skipped = Vec::new();
        for candidate in candidates {
            let title = candidate.title.trim();
            if already_downloaded(title, folder) {
                info!(%title, "already downloaded");
                listener.on_skip(title);
                skipped.push(title.to_string());
            } else {
                urls.push(candidate.source_url);
            }
        }

        Ok((urls, skipped))
    }
}
