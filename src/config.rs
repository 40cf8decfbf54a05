use crate::error::{Result, TunefetchError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslatorProvider {
    #[default]
    Google,
    Gemini,
}

impl std::fmt::Display for TranslatorProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranslatorProvider::Google => write!(f, "google"),
            TranslatorProvider::Gemini => write!(f, "gemini"),
        }
    }
}

impl std::str::FromStr for TranslatorProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "google" => Ok(TranslatorProvider::Google),
            "gemini" => Ok(TranslatorProvider::Gemini),
            _ => Err(format!(
                "Unknown translator: {}. Use 'google' or 'gemini'",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Transient directory for downloads and transcodes.
    pub work_dir: PathBuf,
    /// Persistent directory for finished audio files.
    pub output_dir: PathBuf,
    pub translator: TranslatorProvider,
    pub target_language: String,
    pub gemini_api_key: Option<String>,
    pub ytdlp_path: String,
    pub ffmpeg_path: String,
    pub show_progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("temp"),
            output_dir: PathBuf::from("output"),
            translator: TranslatorProvider::default(),
            target_language: "en".to_string(),
            gemini_api_key: None,
            ytdlp_path: "yt-dlp".to_string(),
            ffmpeg_path: "ffmpeg".to_string(),
            show_progress: true,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let mut config = Self::default();

        // Load from config file if it exists
        if let Some(config_path) = Self::config_file_path() {
            if config_path.exists() {
                let contents = std::fs::read_to_string(&config_path)?;
                config = toml::from_str::<Config>(&contents).map_err(|e| {
                    TunefetchError::Config(format!("{}: {}", config_path.display(), e))
                })?;
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());

        Ok(config)
    }

    /// Apply environment-style overrides. Unparseable values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("TUNEFETCH_WORK_DIR") {
            self.work_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("TUNEFETCH_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(provider) = lookup("TUNEFETCH_TRANSLATOR") {
            if let Ok(p) = provider.parse() {
                self.translator = p;
            }
        }
        if let Some(lang) = lookup("TUNEFETCH_TARGET_LANGUAGE") {
            self.target_language = lang;
        }
        if let Some(key) = lookup("GEMINI_API_KEY") {
            self.gemini_api_key = Some(key);
        }
        if let Some(path) = lookup("TUNEFETCH_YTDLP") {
            self.ytdlp_path = path;
        }
        if let Some(path) = lookup("TUNEFETCH_FFMPEG") {
            self.ffmpeg_path = path;
        }
        if let Some(progress) = lookup("TUNEFETCH_PROGRESS") {
            if let Ok(p) = progress.parse() {
                self.show_progress = p;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.translator == TranslatorProvider::Gemini && self.gemini_api_key.is_none() {
            return Err(TunefetchError::Config(
                "GEMINI_API_KEY not set. Get one at https://aistudio.google.com/apikey"
                    .to_string(),
            ));
        }

        if self.target_language.trim().is_empty() {
            return Err(TunefetchError::Config(
                "Target language must not be empty".to_string(),
            ));
        }

        if self.work_dir == self.output_dir {
            return Err(TunefetchError::Config(
                "Working and output directories must differ".to_string(),
            ));
        }

        Ok(())
    }

    fn config_file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tunefetch").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_provider_parsing() {
        assert_eq!(
            "google".parse::<TranslatorProvider>().unwrap(),
            TranslatorProvider::Google
        );
        assert_eq!(
            "GEMINI".parse::<TranslatorProvider>().unwrap(),
            TranslatorProvider::Gemini
        );
        assert!("deepl".parse::<TranslatorProvider>().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.work_dir, PathBuf::from("temp"));
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.translator, TranslatorProvider::Google);
        assert_eq!(config.target_language, "en");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_gemini_requires_key() {
        let mut config = Config::default();
        config.translator = TranslatorProvider::Gemini;
        assert!(config.validate().is_err());

        config.gemini_api_key = Some("test-key".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_shared_directory() {
        let mut config = Config::default();
        config.output_dir = config.work_dir.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("TUNEFETCH_WORK_DIR", "/tmp/work"),
            ("TUNEFETCH_TRANSLATOR", "gemini"),
            ("TUNEFETCH_PROGRESS", "false"),
            ("GEMINI_API_KEY", "abc"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.work_dir, PathBuf::from("/tmp/work"));
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.translator, TranslatorProvider::Gemini);
        assert_eq!(config.gemini_api_key.as_deref(), Some("abc"));
        assert!(!config.show_progress);
    }

    #[test]
    fn test_partial_toml() {
        let config: Config = toml::from_str("output_dir = \"songs\"\n").unwrap();
        assert_eq!(config.output_dir, PathBuf::from("songs"));
        assert_eq!(config.work_dir, PathBuf::from("temp"));
    }
}
