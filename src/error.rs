use thiserror::Error;

#[derive(Error, Debug)]
pub enum TunefetchError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Download failed: {0}")]
    Download(String),

    #[error("Transcoding failed: {0}")]
    Transcode(String),

    #[error("Translation failed: {0}")]
    Translation(String),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TunefetchError>;
