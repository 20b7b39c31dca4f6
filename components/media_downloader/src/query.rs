// components/media_downloader/src/query.rs
use std::num::NonZeroU32;

/// Search directive prefix understood by yt-dlp
const SEARCH_PREFIX: &str = "ytsearch";

/// Build a bounded search directive, e.g. `ytsearch5:Radiohead songs`
pub fn build_search_query(term: &str, max_results: NonZeroU32) -> String {
    format!("{SEARCH_PREFIX}{max_results}:{term} songs")
}
