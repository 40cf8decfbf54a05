use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::{Result, TunefetchError};
use crate::source::Downloader;

/// Output template: `<title>-<id>.<ext>`.
const OUTPUT_TEMPLATE: &str = "%(title)s-%(id)s.%(ext)s";

/// Downloader backed by the yt-dlp command line tool.
pub struct YtDlpDownloader {
    program: String,
}

impl YtDlpDownloader {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Arguments passed to yt-dlp for one URL.
    pub fn build_args(url: &str, work_dir: &Path) -> Vec<String> {
        vec![
            "-f".to_string(),
            "bestaudio".to_string(),
            "--no-playlist".to_string(),
            "-o".to_string(),
            work_dir.join(OUTPUT_TEMPLATE).to_string_lossy().into_owned(),
            url.to_string(),
        ]
    }

    /// Check if yt-dlp is installed and accessible.
    pub async fn check_available(&self) -> Result<()> {
        let output = Command::new(&self.program)
            .arg("--version")
            .output()
            .await
            .map_err(|e| {
                TunefetchError::ToolNotFound(format!(
                    "{} not found. Install it from https://github.com/yt-dlp/yt-dlp. Error: {e}",
                    self.program
                ))
            })?;

        if !output.status.success() {
            return Err(TunefetchError::ToolNotFound(format!(
                "{} --version failed",
                self.program
            )));
        }

        debug!(
            "yt-dlp {} is available",
            String::from_utf8_lossy(&output.stdout).trim()
        );
        Ok(())
    }
}

impl Default for YtDlpDownloader {
    fn default() -> Self {
        Self::new("yt-dlp")
    }
}

#[async_trait]
impl Downloader for YtDlpDownloader {
    async fn download(&self, url: &str, work_dir: &Path) -> Result<()> {
        let args = Self::build_args(url, work_dir);
        debug!("Running {} {:?}", self.program, args);

        let output = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| TunefetchError::Download(format!("Failed to run {}: {e}", self.program)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TunefetchError::Download(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "yt-dlp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_args() {
        let args = YtDlpDownloader::build_args(
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            Path::new("temp"),
        );
        assert_eq!(args[0..3], ["-f", "bestaudio", "--no-playlist"]);
        assert_eq!(args[3], "-o");
        assert!(args[4].starts_with("temp"));
        assert!(args[4].ends_with("%(title)s-%(id)s.%(ext)s"));
        assert_eq!(args[5], "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    }

    #[tokio::test]
    async fn test_missing_program() {
        let downloader = YtDlpDownloader::new("/nonexistent/yt-dlp");
        assert!(matches!(
            downloader.check_available().await,
            Err(TunefetchError::ToolNotFound(_))
        ));

        let dir = tempfile::tempdir().unwrap();
        let result = downloader
            .download("https://www.youtube.com/watch?v=abc", dir.path())
            .await;
        assert!(matches!(result, Err(TunefetchError::Download(_))));
    }
}
