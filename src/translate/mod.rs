pub mod gemini;
pub mod google;

use crate::config::{Config, TranslatorProvider};
use crate::error::{Result, TunefetchError};
use async_trait::async_trait;

pub use gemini::GeminiTranslator;
pub use google::GoogleTranslator;

#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(&self, text: &str, target_lang: &str) -> Result<String>;
    fn name(&self) -> &'static str;
}

/// Build the translator selected in the configuration.
pub fn create_translator(config: &Config) -> Result<Box<dyn Translator>> {
    match config.translator {
        TranslatorProvider::Google => Ok(Box::new(GoogleTranslator::new())),
        TranslatorProvider::Gemini => {
            let api_key = config.gemini_api_key.as_ref().ok_or_else(|| {
                TunefetchError::Config(
                    "Gemini API key not set. Set GEMINI_API_KEY environment variable."
                        .to_string(),
                )
            })?;
            Ok(Box::new(GeminiTranslator::new(api_key.clone())))
        }
    }
}
