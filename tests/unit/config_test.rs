//! Unit tests for configuration module

use media_api_gateway::config::Settings;
use std::collections::HashMap;
use std::io::Write;

fn no_credentials(_: &str) -> Option<String> {
    None
}

#[test]
fn test_default_settings() {
    let settings = Settings::default();

    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.server.port, 8000);
    assert_eq!(settings.recommendation.max_results, 5);
    assert_eq!(settings.recommendation.hits_per_keyword, 3);
    assert_eq!(settings.recommendation.actor_keywords, 2);
    assert_eq!(settings.chat.default_model, "meta-llama/llama-4-scout-17b-16e-instruct");
    assert_eq!(settings.chat.default_max_tokens, 1024);
    assert_eq!(settings.transcription.model, "whisper-large-v3-turbo");
    assert_eq!(settings.image_generation.model, "black-forest-labs/flux-schnell");
}

#[test]
fn test_settings_validation_valid() {
    assert!(Settings::default().validate().is_ok());
}

#[test]
fn test_settings_validation_invalid_port() {
    let mut settings = Settings::default();
    settings.server.port = 0;

    assert!(settings.validate().is_err());
}

#[test]
fn test_settings_validation_invalid_base_url() {
    let mut settings = Settings::default();
    settings.providers.omdb.base_url = "not a url".to_string();

    assert!(settings.validate().is_err());
}

#[test]
fn test_settings_validation_zero_results() {
    let mut settings = Settings::default();
    settings.recommendation.max_results = 0;

    assert!(settings.validate().is_err());
}

#[test]
fn test_load_without_file_uses_defaults() {
    let settings =
        Settings::load_from_path("does/not/exist.yaml", no_credentials).unwrap();

    assert_eq!(settings.server.port, 8000);
    assert_eq!(settings.providers.serper.base_url, "https://google.serper.dev");
    assert_eq!(settings.providers.omdb.base_url, "http://www.omdbapi.com");
    assert!(settings.providers.groq.api_key().is_none());
    assert_eq!(settings.chat.default_temperature, 0.7);
    assert_eq!(settings.transcription.language, "en");
    assert_eq!(settings.image_generation.num_inference_steps, 4);
}

#[test]
fn test_load_credentials_from_lookup() {
    let env: HashMap<&str, &str> = [
        ("SERPER_API_KEY", "serper-key"),
        ("OMDB_API_KEY", "omdb-key"),
        ("GROQ_API_KEY", ""),
    ]
    .into_iter()
    .collect();

    let settings = Settings::load_from_path("does/not/exist.yaml", |name| {
        env.get(name).map(|v| v.to_string())
    })
    .unwrap();

    assert_eq!(settings.providers.serper.api_key(), Some("serper-key"));
    assert_eq!(settings.providers.omdb.api_key(), Some("omdb-key"));
    // An empty variable counts as unset
    assert!(settings.providers.groq.api_key().is_none());
    assert!(settings.providers.nebius.api_key().is_none());
}

#[test]
fn test_load_from_yaml_file() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(
        file,
        r#"
server:
  port: 9100
logging:
  format: pretty
providers:
  omdb:
    base_url: http://localhost:9999
    api_key: from-file
recommendation:
  max_results: 3
"#
    )
    .unwrap();

    let settings = Settings::load_from_path(file.path(), no_credentials).unwrap();

    assert_eq!(settings.server.port, 9100);
    assert_eq!(settings.server.host, "0.0.0.0");
    assert_eq!(settings.logging.format, "pretty");
    assert_eq!(settings.providers.omdb.base_url, "http://localhost:9999");
    assert_eq!(settings.providers.omdb.api_key(), Some("from-file"));
    assert_eq!(settings.recommendation.max_results, 3);
    assert_eq!(settings.recommendation.hits_per_keyword, 3);
}

#[test]
fn test_credential_variable_overrides_file() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(
        file,
        "providers:\n  omdb:\n    base_url: http://localhost:9999\n    api_key: from-file"
    )
    .unwrap();

    let settings = Settings::load_from_path(file.path(), |name| {
        (name == "OMDB_API_KEY").then(|| "from-env".to_string())
    })
    .unwrap();

    assert_eq!(settings.providers.omdb.api_key(), Some("from-env"));
}

#[test]
fn test_blank_credential_variable_keeps_file_key() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(
        file,
        "providers:\n  omdb:\n    base_url: http://localhost:9999\n    api_key: from-file"
    )
    .unwrap();

    let settings = Settings::load_from_path(file.path(), |name| {
        (name == "OMDB_API_KEY").then(|| "  ".to_string())
    })
    .unwrap();

    assert_eq!(settings.providers.omdb.api_key(), Some("from-file"));
}
