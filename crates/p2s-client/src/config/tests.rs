use super::*;
use crate::errors::ClientError;
use p2s_api_types::{ContentKind, OutputType, PosterDensity};
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

#[test]
fn test_empty_config_uses_defaults() {
    let config = ConfigLoader::from_str("").unwrap();

    assert_eq!(config.api.base_url, "http://localhost:8152");
    assert_eq!(config.api.submit_timeout_secs, 600);
    assert_eq!(config.api.status_timeout_secs, 10);
    assert_eq!(config.api.fetch_timeout_secs, 30);
    assert_eq!(config.polling.interval_secs, 5.0);
    assert_eq!(config.polling.max_wait_secs, 1800);
    assert_eq!(config.polling.backoff_factor, 1.0);
    assert!(config.output.save_content);
    assert!(config.files.is_empty());
}

#[test]
fn test_partial_yaml() {
    let yaml = r#"
api:
  base_url: "http://slides.internal:9000"
generation:
  content: paper
  output_type: poster
  density: sparse
  fast_mode: true
polling:
  interval_secs: 2
  max_wait_secs: 60
"#;

    let config = ConfigLoader::from_str(yaml).unwrap();

    assert_eq!(config.api.base_url, "http://slides.internal:9000");
    assert_eq!(config.api.status_timeout_secs, 10);
    assert_eq!(config.generation.content, ContentKind::Paper);
    assert_eq!(config.generation.output_type, OutputType::Poster);
    assert_eq!(config.generation.density, PosterDensity::Sparse);
    assert!(config.generation.fast_mode);
    assert_eq!(config.generation.style, "academic");
    assert_eq!(config.polling.interval_secs, 2.0);
    assert_eq!(config.polling.max_wait_secs, 60);
}

#[test]
fn test_invalid_option_value_is_config_error() {
    let err = ConfigLoader::from_str("generation:\n  length: enormous\n").unwrap_err();
    assert!(matches!(err, ClientError::Config(_)));
}

#[test]
fn test_validation_rejects_bad_values() {
    let cases = [
        "api:\n  base_url: \"not a url\"\n",
        "api:\n  base_url: \"ftp://example.com\"\n",
        "api:\n  status_timeout_secs: 0\n",
        "polling:\n  interval_secs: 0\n",
        "polling:\n  max_wait_secs: 0\n",
        "polling:\n  max_attempts: 0\n",
        "polling:\n  backoff_factor: 0.5\n",
        "polling:\n  interval_secs: 10\n  max_interval_secs: 5\n",
        "polling:\n  interval_secs: 1.0e+20\n  max_interval_secs: 1.0e+20\n",
        "polling:\n  max_interval_secs: 1.0e+20\n",
        "polling:\n  backoff_factor: 1.0e+300\n",
        "generation:\n  style: \"  \"\n",
    ];

    for yaml in cases {
        let result = ConfigLoader::from_str(yaml);
        assert!(
            matches!(result, Err(ClientError::Config(_))),
            "expected config error for {:?}, got {:?}",
            yaml,
            result
        );
    }
}

#[tokio::test]
async fn test_from_file_resolves_relative_paths() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("p2s.yaml");
    std::fs::write(
        &config_path,
        "files:\n  - paper.pdf\n  - /abs/notes.pdf\noutput:\n  directory: out\n",
    )
    .unwrap();

    let config = load_config(&config_path).await.unwrap();

    assert_eq!(config.files[0], dir.path().join("paper.pdf"));
    assert_eq!(config.files[1], PathBuf::from("/abs/notes.pdf"));
    assert_eq!(config.output.directory, dir.path().join("out"));
}

#[tokio::test]
async fn test_missing_config_file() {
    let err = ConfigLoader::from_file("/definitely/not/here/p2s.yaml")
        .await
        .unwrap_err();

    match err {
        ClientError::Config(message) => assert!(message.contains("Failed to read config file")),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_malformed_yaml_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "api: [this is: not, valid").unwrap();

    let err = ConfigLoader::from_file(file.path()).await.unwrap_err();
    assert!(matches!(err, ClientError::Config(_)));
}
