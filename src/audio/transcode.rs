use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{Result, TunefetchError};

use super::Transcoder;

/// Bitrate of the produced mp3, in bits per second.
pub const AUDIO_BITRATE: &str = "192000";

/// Strips trailing silence longer than one second below -90dB.
pub const SILENCE_FILTER: &str =
    "silenceremove=stop_periods=-1:stop_duration=1:stop_threshold=-90dB";

/// Transcoder backed by the ffmpeg command line tool.
pub struct FfmpegTranscoder {
    program: String,
}

impl FfmpegTranscoder {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Fixed argument list: never overwrite, mp3 at 192kbps, trailing silence
    /// removed, video stream dropped.
    pub fn build_args(input: &Path, output: &Path) -> Vec<String> {
        vec![
            "-n".to_string(),
            "-i".to_string(),
            input.to_string_lossy().into_owned(),
            "-f".to_string(),
            "mp3".to_string(),
            "-ab".to_string(),
            AUDIO_BITRATE.to_string(),
            "-af".to_string(),
            SILENCE_FILTER.to_string(),
            "-vn".to_string(),
            output.to_string_lossy().into_owned(),
        ]
    }

    /// Check if FFmpeg is installed and accessible.
    pub async fn check_available(&self) -> Result<()> {
        let output = Command::new(&self.program)
            .arg("-version")
            .output()
            .await
            .map_err(|e| {
                TunefetchError::ToolNotFound(format!(
                    "FFmpeg not found. Please install FFmpeg and ensure it's in your PATH. Error: {e}"
                ))
            })?;

        if !output.status.success() {
            return Err(TunefetchError::ToolNotFound(
                "FFmpeg check failed".to_string(),
            ));
        }

        debug!("FFmpeg is available");
        Ok(())
    }
}

impl Default for FfmpegTranscoder {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

#[async_trait]
impl Transcoder for FfmpegTranscoder {
    async fn transcode(&self, input: &Path, output: &Path) -> Result<()> {
        if !input.exists() {
            return Err(TunefetchError::Transcode(format!(
                "Input not found: {}",
                input.display()
            )));
        }

        let args = Self::build_args(input, output);
        debug!("Running {} {:?}", self.program, args);

        let status = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .map_err(|e| TunefetchError::Transcode(format!("Failed to run FFmpeg: {e}")))?;

        if !status.success() {
            return Err(TunefetchError::Transcode(format!(
                "FFmpeg exited with {}",
                status
            )));
        }

        if !output.exists() {
            return Err(TunefetchError::Transcode(
                "Output file was not created".to_string(),
            ));
        }

        info!("Transcoded to {}", output.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command as StdCommand;

    fn ffmpeg_available() -> bool {
        StdCommand::new("ffmpeg")
            .arg("-version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    #[test]
    fn test_build_args() {
        let args = FfmpegTranscoder::build_args(
            Path::new("temp/Song-abc.webm"),
            Path::new("temp/Song-abc.mp3"),
        );
        assert_eq!(
            args,
            vec![
                "-n",
                "-i",
                "temp/Song-abc.webm",
                "-f",
                "mp3",
                "-ab",
                "192000",
                "-af",
                "silenceremove=stop_periods=-1:stop_duration=1:stop_threshold=-90dB",
                "-vn",
                "temp/Song-abc.mp3",
            ]
        );
    }

    #[tokio::test]
    async fn test_check_ffmpeg() {
        if !ffmpeg_available() {
            eprintln!("Skipping test: FFmpeg not available");
            return;
        }
        let result = FfmpegTranscoder::default().check_available().await;
        assert!(result.is_ok(), "FFmpeg check failed: {:?}", result.err());
    }

    #[tokio::test]
    async fn test_transcode_input_not_found() {
        let result = FfmpegTranscoder::default()
            .transcode(
                Path::new("/nonexistent/file.webm"),
                Path::new("/nonexistent/file.mp3"),
            )
            .await;
        match result {
            Err(TunefetchError::Transcode(msg)) => assert!(msg.contains("nonexistent")),
            other => panic!("Expected Transcode error, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_transcode_missing_program() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.webm");
        std::fs::write(&input, b"not really a video").unwrap();

        let result = FfmpegTranscoder::new("/nonexistent/ffmpeg")
            .transcode(&input, &dir.path().join("in.mp3"))
            .await;
        assert!(matches!(result, Err(TunefetchError::Transcode(_))));
    }
}
