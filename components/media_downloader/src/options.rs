// components/media_downloader/src/options.rs
use crate::types::DownloadError;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Best audio-only stream, or the best overall stream when there is none
pub const AUDIO_FORMAT: &str = "bestaudio/best";
pub const TARGET_CODEC: &str = "mp3";
pub const TARGET_QUALITY: &str = "192";
pub const FILENAME_TEMPLATE: &str = "%(title)s.%(ext)s";

/// Marker yt-dlp prints in front of our progress lines
pub(crate) const PROGRESS_MARKER: &str = "[wavegrab]";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostProcessor {
    pub key: String,
    #[serde(rename = "preferredcodec")]
    pub preferred_codec: String,
    #[serde(rename = "preferredquality")]
    pub preferred_quality: String,
}

impl PostProcessor {
    pub fn extract_audio(codec: &str, quality: &str) -> Self {
        Self {
            key: "FFmpegExtractAudio".to_string(),
            preferred_codec: codec.to_string(),
            preferred_quality: quality.to_string(),
        }
    }
}

/// Everything the download collaborator needs for one request.
///
/// Field names serialize to the collaborator's own option keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputOptions {
    #[serde(skip)]
    pub target_folder: PathBuf,
    pub format: String,
    #[serde(rename = "outtmpl")]
    pub filename_template: PathBuf,
    pub ffmpeg_location: PathBuf,
    pub postprocessors: Vec<PostProcessor>,
    #[serde(rename = "noplaylist")]
    pub no_playlist: bool,
    pub quiet: bool,
}

impl OutputOptions {
    pub fn playlist_mode(&self) -> bool {
        !self.no_playlist
    }

    /// Render as yt-dlp command-line arguments, without the URLs
    pub fn to_args(&self) -> Vec<String> {
        let mut args = vec![
            "-f".to_string(),
            self.format.clone(),
            "-o".to_string(),
            self.filename_template.to_string_lossy().into_owned(),
            "--ffmpeg-location".to_string(),
            self.ffmpeg_location.to_string_lossy().into_owned(),
        ];

        for processor in &self.postprocessors {
            if processor.key == "FFmpegExtractAudio" {
                args.push("-x".to_string());
                args.push("--audio-format".to_string());
                args.push(processor.preferred_codec.clone());
                args.push("--audio-quality".to_string());
                args.push(format!("{}K", processor.preferred_quality));
            }
        }

        let playlist_flag = if self.no_playlist { "--no-playlist" } else { "--yes-playlist" };
        args.push(playlist_flag.to_string());

        if self.quiet {
            // --progress keeps our templates alive under --quiet
            args.push("--quiet".to_string());
            args.push("--progress".to_string());
        }

        args.push("--newline".to_string());
        args.push("--progress-template".to_string());
        args.push(format!(
            "download:{PROGRESS_MARKER} download %(progress.status)s %(progress.filename)s"
        ));
        args.push("--progress-template".to_string());
        args.push(format!(
            "postprocess:{PROGRESS_MARKER} postprocess %(progress.status)s %(info.filepath)s"
        ));
        args
    }
}

/// Applies the fixed download policy to a target folder
#[derive(Debug, Clone)]
pub struct OptionsBuilder {
    ffmpeg_location: PathBuf,
}

impl OptionsBuilder {
    /// Look for the transcoder in `ffmpeg/bin` next to the running executable
    pub fn beside_executable() -> Result<Self, DownloadError> {
        let exe = dunce::canonicalize(std::env::current_exe()?)?;
        let install_dir = exe.parent().unwrap_or_else(|| Path::new("."));
        Ok(Self::with_install_dir(install_dir))
    }

    pub fn with_install_dir(install_dir: impl AsRef<Path>) -> Self {
        Self {
            ffmpeg_location: install_dir.as_ref().join("ffmpeg").join("bin"),
        }
    }

    pub fn ffmpeg_location(&self) -> &Path {
        &self.ffmpeg_location
    }

    /// No check is made that the transcoder exists; yt-dlp reports that
    /// when it tries to convert.
    pub fn build(&self, folder: &Path, playlist_mode: bool) -> OutputOptions {
        OutputOptions {
            target_folder: folder.to_path_buf(),
            format: AUDIO_FORMAT.to_string(),
            filename_template: folder.join(FILENAME_TEMPLATE),
            ffmpeg_location: self.ffmpeg_location.clone(),
            postprocessors: vec![PostProcessor::extract_audio(TARGET_CODEC, TARGET_QUALITY)],
            no_playlist: !playlist_mode,
            quiet: true,
        }
    }
}
