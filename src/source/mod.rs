pub mod ytdlp;

use crate::error::{Result, TunefetchError};
use async_trait::async_trait;
use std::path::Path;
use url::{ParseError, Url};

pub use ytdlp::YtDlpDownloader;

/// Materializes the media behind a URL as one or more files in a directory.
#[async_trait]
pub trait Downloader: Send + Sync {
    async fn download(&self, url: &str, work_dir: &Path) -> Result<()>;
    fn name(&self) -> &'static str;
}

/// Extract the video identifier from the `v` query parameter.
pub fn video_id(url: &str) -> Result<String> {
    // yt-dlp accepts links without a scheme, so treat those as https.
    let parsed = match Url::parse(url) {
        Err(ParseError::RelativeUrlWithoutBase) => Url::parse(&format!("https://{}", url)),
        other => other,
    }
    .map_err(|e| TunefetchError::InvalidUrl(format!("{}: {}", url, e)))?;

    parsed
        .query_pairs()
        .find(|(k, _)| k == "v")
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| TunefetchError::InvalidUrl(format!("{}: no video identifier", url)))
}
