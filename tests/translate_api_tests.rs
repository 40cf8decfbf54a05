//! Mock API tests for the translation providers.
//!
//! These tests run the HTTP clients against local wiremock servers.

use serde_json::json;
use tunefetch::config::{Config, TranslatorProvider};
use tunefetch::translate::{create_translator, GeminiTranslator, GoogleTranslator, Translator};
use tunefetch::TunefetchError;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Google Translate Mock Tests
// ============================================================================

mod google_tests {
    use super::*;

    #[tokio::test]
    async fn test_google_translates_filename() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/translate_a/single"))
            .and(query_param("client", "gtx"))
            .and(query_param("tl", "en"))
            .and(query_param("q", "夜に駆ける-x8VYWazR5mE.webm"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                [["Racing into the night-x8VYWazR5mE.webm", "夜に駆ける-x8VYWazR5mE.webm", null, null, 10]],
                null,
                "ja"
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let translator = GoogleTranslator::new().with_base_url(server.uri());
        let result = translator
            .translate("夜に駆ける-x8VYWazR5mE.webm", "en")
            .await
            .unwrap();

        assert_eq!(result, "Racing into the night-x8VYWazR5mE.webm");
    }

    #[tokio::test]
    async fn test_google_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/translate_a/single"))
            .respond_with(ResponseTemplate::new(429).set_body_string("Too Many Requests"))
            .mount(&server)
            .await;

        let translator = GoogleTranslator::new().with_base_url(server.uri());
        let result = translator.translate("曲.webm", "en").await;

        match result {
            Err(TunefetchError::Translation(msg)) => assert!(msg.contains("429")),
            other => panic!("Expected Translation error, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_google_empty_translation() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/translate_a/single"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([null, null, "ja"])))
            .mount(&server)
            .await;

        let translator = GoogleTranslator::new().with_base_url(server.uri());
        assert!(translator.translate("曲.webm", "en").await.is_err());
    }
}

// ============================================================================
// Gemini API Mock Tests
// ============================================================================

mod gemini_tests {
    use super::*;

    const GENERATE_PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

    #[tokio::test]
    async fn test_gemini_translates_filename() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {"parts": [{"text": "  Racing into the night.webm\n"}]}
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let translator =
            GeminiTranslator::new("test-key".to_string()).with_base_url(server.uri());
        let result = translator.translate("夜に駆ける.webm", "en").await.unwrap();

        assert_eq!(result, "Racing into the night.webm");
    }

    #[tokio::test]
    async fn test_gemini_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "error": {"message": "API key not valid"}
            })))
            .mount(&server)
            .await;

        let translator =
            GeminiTranslator::new("bad-key".to_string()).with_base_url(server.uri());
        match translator.translate("曲.webm", "en").await {
            Err(TunefetchError::Translation(msg)) => assert!(msg.contains("API key not valid")),
            other => panic!("Expected Translation error, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_gemini_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
            .mount(&server)
            .await;

        let translator =
            GeminiTranslator::new("test-key".to_string()).with_base_url(server.uri());
        assert!(translator.translate("曲.webm", "en").await.is_err());
    }
}

// ============================================================================
// Translator Factory Tests
// ============================================================================

mod factory_tests {
    use super::*;

    #[test]
    fn test_create_google_translator() {
        let config = Config::default();
        let translator = create_translator(&config).unwrap();
        assert_eq!(translator.name(), "google");
    }

    #[test]
    fn test_create_gemini_translator() {
        let mut config = Config::default();
        config.translator = TranslatorProvider::Gemini;
        config.gemini_api_key = Some("test-key".to_string());

        let translator = create_translator(&config).unwrap();
        assert_eq!(translator.name(), "gemini");
    }

    #[test]
    fn test_create_gemini_translator_missing_key() {
        let mut config = Config::default();
        config.translator = TranslatorProvider::Gemini;

        assert!(create_translator(&config).is_err());
    }
}
