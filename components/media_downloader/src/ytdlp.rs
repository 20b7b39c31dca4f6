// components/media_downloader/src/ytdlp.rs
use crate::options::{OutputOptions, PROGRESS_MARKER};
use crate::types::{
    CandidateTrack, DownloadError, DownloadListener, ProgressEvent, ProgressStatus,
};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, warn};

const PROGRAM: &str = "yt-dlp";
const UNKNOWN_TITLE: &str = "unknown";

#[async_trait]
pub trait Downloader {
    /// Resolve a search directive to candidate tracks without fetching media
    async fn search(&self, query: &str) -> Result<Vec<CandidateTrack>, DownloadError>;

    /// Fetch and transcode every URL, reporting progress as it happens
    async fn download(
        &self,
        urls: &[String],
        options: &OutputOptions,
        listener: &mut dyn DownloadListener,
    ) -> Result<(), DownloadError>;
}

/// Drives the `yt-dlp` executable found on `PATH`
pub struct YtDlp;

impl YtDlp {
    fn program(&self) -> Result<PathBuf, DownloadError> {
        which::which(PROGRAM).map_err(|_| DownloadError::DependencyNotFound(PROGRAM))
    }
}

#[async_trait]
impl Downloader for YtDlp {
    async fn search(&self, query: &str) -> Result<Vec<CandidateTrack>, DownloadError> {
        let program = self.program()?;
        debug!(%query, "running metadata query");

        let output = Command::new(&program)
            .arg("--flat-playlist")
            .arg("--dump-json")
            .arg("--no-warnings")
            .arg(query)
            .output()
            .await?;

        if !output.status.success() {
            return Err(DownloadError::SearchFailed(
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        parse_search_output(&String::from_utf8_lossy(&output.stdout))
    }

    async fn download(
        &self,
        urls: &[String],
        options: &OutputOptions,
        listener: &mut dyn DownloadListener,
    ) -> Result<(), DownloadError> {
        let program = self.program()?;
        let args = options.to_args();
        debug!(?args, ?urls, "running download");

        let mut child = Command::new(&program)
            .args(&args)
            .args(urls)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let stdout = child.stdout.take().ok_or_else(|| {
            DownloadError::DownloadFailed("yt-dlp stdout was not captured".to_string())
        })?;
        let stderr = child.stderr.take().ok_or_else(|| {
            DownloadError::DownloadFailed("yt-dlp stderr was not captured".to_string())
        })?;

        let mut stdout = BufReader::new(stdout).lines();
        let mut stderr = BufReader::new(stderr).lines();
        let mut stdout_open = true;
        let mut stderr_open = true;
        let mut diagnostics = Vec::new();

        // Progress may arrive on either stream depending on --quiet
        while stdout_open || stderr_open {
            tokio::select! {
                line = stdout.next_line(), if stdout_open => match line? {
                    Some(line) => {
                        if !report_progress(&line, listener) {
                            debug!(%line, "yt-dlp");
                        }
                    }
                    None => stdout_open = false,
                },
                line = stderr.next_line(), if stderr_open => match line? {
                    Some(line) => {
                        if !report_progress(&line, listener) {
                            diagnostics.push(line);
                        }
                    }
                    None => stderr_open = false,
                },
            }
        }

        let status = child.wait().await?;
        if !status.success() {
            let detail = if diagnostics.is_empty() {
                format!("yt-dlp exited with status: {}", status)
            } else {
                diagnostics.join("\n")
            };
            return Err(DownloadError::DownloadFailed(detail));
        }

        for line in diagnostics {
            warn!(%line, "yt-dlp");
        }
        Ok(())
    }
}

fn report_progress(line: &str, listener: &mut dyn DownloadListener) -> bool {
    match parse_progress_line(line) {
        Some(event) => {
            listener.on_progress(&event);
            true
        }
        None => false,
    }
}

#[derive(Debug, Deserialize)]
struct SearchEntry {
    title: Option<String>,
    webpage_url: Option<String>,
    url: Option<String>,
}

/// yt-dlp prints one JSON object per search hit
pub(crate) fn parse_search_output(stdout: &str) -> Result<Vec<CandidateTrack>, DownloadError> {
    let mut candidates = Vec::new();

    for line in stdout.lines().map(str::trim).filter(|line| !line.is_empty()) {
        let entry: SearchEntry = serde_json::from_str(line)
            .map_err(|e| DownloadError::SearchFailed(e.to_string()))?;

        let Some(source_url) = entry.webpage_url.or(entry.url) else {
            warn!(title = ?entry.title, "search result without a URL");
            continue;
        };

        candidates.push(CandidateTrack {
            title: entry.title.unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
            source_url,
        });
    }

    Ok(candidates)
}

/// Parse a line produced by our `--progress-template`s
pub(crate) fn parse_progress_line(line: &str) -> Option<ProgressEvent> {
    let rest = line.trim().strip_prefix(PROGRESS_MARKER)?.trim_start();
    let mut parts = rest.splitn(3, ' ');
    let kind = parts.next()?;
    let status = parts.next()?;
    let filename = parts.next().unwrap_or_default().trim().to_string();

    let status = match (kind, status) {
        ("download", "downloading") => ProgressStatus::Downloading,
        ("download", "finished") => ProgressStatus::Finished,
        ("download", "error") => ProgressStatus::Error,
        ("postprocess", "started" | "processing") => ProgressStatus::PostProcessing,
        ("postprocess", "finished") => ProgressStatus::PostProcessed,
        _ => return None,
    };

    Some(ProgressEvent { status, filename })
}

#[cfg(any(test, feature = "test-support"))]
pub mod stub {
    use super::*;
    use parking_lot::Mutex;

    /// Records every call and answers searches from a fixed result list
    #[derive(Default)]
    pub struct DownloaderStub {
        pub results: Vec<CandidateTrack>,
        pub fail_search: bool,
        pub fail_download: bool,
        pub searches: Mutex<Vec<String>>,
        pub downloads: Mutex<Vec<(Vec<String>, OutputOptions)>>,
    }

    impl DownloaderStub {
        pub fn with_titles(titles: &[&str]) -> Self {
            let results = titles
                .iter()
                .enumerate()
                .map(|(i, title)| CandidateTrack {
                    title: title.to_string(),
                    source_url: format!("https://example.com/watch?v={}", i),
                })
                .collect();
            Self {
                results,
                ..Self::default()
            }
        }

        pub fn download_calls(&self) -> Vec<(Vec<String>, OutputOptions)> {
            self.downloads.lock().clone()
        }

        pub fn search_calls(&self) -> Vec<String> {
            self.searches.lock().clone()
        }
    }

    #[async_trait]
    impl Downloader for DownloaderStub {
        async fn search(&self, query: &str) -> Result<Vec<CandidateTrack>, DownloadError> {
            self.searches.lock().push(query.to_string());
            if self.fail_search {
                return Err(DownloadError::SearchFailed("network unreachable".to_string()));
            }
            Ok(self.results.clone())
        }

        async fn download(
            &self,
            urls: &[String],
            options: &OutputOptions,
            listener: &mut dyn DownloadListener,
        ) -> Result<(), DownloadError> {
            self.downloads.lock().push((urls.to_vec(), options.clone()));
            if self.fail_download {
                return Err(DownloadError::DownloadFailed("ffmpeg not found".to_string()));
            }
            for url in urls {
                for status in [
                    ProgressStatus::Downloading,
                    ProgressStatus::Finished,
                    ProgressStatus::PostProcessing,
                ] {
                    listener.on_progress(&ProgressEvent {
                        status,
                        filename: url.clone(),
                    });
                }
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_search_output() {
        let stdout = concat!(
            r#"{"title": "Creep", "webpage_url": "https://www.youtube.com/watch?v=XFkzRNyygfk", "url": "https://youtu.be/XFkzRNyygfk"}"#,
            "\n",
            r#"{"title": "Karma Police", "url": "https://www.youtube.com/watch?v=IzZ8ejunLzA"}"#,
            "\n\n",
            r#"{"url": "https://www.youtube.com/watch?v=u5CVsCnxyXg"}"#,
            "\n",
            r#"{"title": "No Link"}"#,
            "\n",
        );

        let candidates = parse_search_output(stdout).unwrap();

        assert_eq!(
            candidates,
            vec![
                CandidateTrack {
                    title: "Creep".to_string(),
                    source_url: "https://www.youtube.com/watch?v=XFkzRNyygfk".to_string(),
                },
                CandidateTrack {
                    title: "Karma Police".to_string(),
                    source_url: "https://www.youtube.com/watch?v=IzZ8ejunLzA".to_string(),
                },
                CandidateTrack {
                    title: "unknown".to_string(),
                    source_url: "https://www.youtube.com/watch?v=u5CVsCnxyXg".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_parse_search_output_rejects_garbage() {
        let result = parse_search_output("ERROR: not json");
        assert!(matches!(result, Err(DownloadError::SearchFailed(_))));
    }

    #[test]
    fn test_parse_progress_lines() {
        let event = parse_progress_line(
            "[wavegrab] download downloading /music/Radiohead/Creep.webm",
        )
        .unwrap();
        assert_eq!(event.status, ProgressStatus::Downloading);
        assert_eq!(event.filename, "/music/Radiohead/Creep.webm");

        let event =
            parse_progress_line("[wavegrab] download finished /music/My Iron Lung.webm").unwrap();
        assert_eq!(event.status, ProgressStatus::Finished);
        assert_eq!(event.filename, "/music/My Iron Lung.webm");

        let event =
            parse_progress_line("[wavegrab] postprocess started /music/Creep.webm").unwrap();
        assert_eq!(event.status, ProgressStatus::PostProcessing);

        let event =
            parse_progress_line("[wavegrab] postprocess finished /music/Creep.mp3").unwrap();
        assert_eq!(event.status, ProgressStatus::PostProcessed);
    }

    #[test]
    fn test_other_lines_are_not_progress() {
        assert_eq!(parse_progress_line("[youtube] XFkzRNyygfk: Downloading webpage"), None);
        assert_eq!(parse_progress_line("[wavegrab] download"), None);
        assert_eq!(parse_progress_line("[wavegrab] upload finished x"), None);
    }
}
