pub mod transcode;

pub use transcode::{FfmpegTranscoder, AUDIO_BITRATE, SILENCE_FILTER};

use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Converts a downloaded media file into an audio file.
#[async_trait]
pub trait Transcoder: Send + Sync {
    /// Write `output` from `input`. Fails on a non-zero exit or a missing output.
    async fn transcode(&self, input: &Path, output: &Path) -> Result<()>;
}
