//! Integration tests for apiload-config

use apiload_config::*;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use temp_env::{with_vars, with_vars_unset};

const ENV_VARS: [&str; 4] = [
    "APILOAD_RESULTS_DIR",
    "APILOAD_RESULTS_EXTENSION",
    "APILOAD_LOG_LEVEL",
    "APILOAD_LOG_FORMAT",
];

fn load_yaml(yaml: &str) -> ConfigResult<ApiloadConfig> {
    with_vars_unset(ENV_VARS, || ConfigLoader::new().from_yaml_str(yaml))
}

#[test]
fn test_default_config_validation() {
    let config = with_vars_unset(ENV_VARS, || ConfigLoader::new().from_env().unwrap());
    assert!(config.validate_all().is_ok());
    assert_eq!(config.results.directory, PathBuf::from("results"));
    assert_eq!(config.logging.level, LogLevel::Warn);
}

#[test]
fn test_config_loader_from_env() {
    let vars = vec![
        ("APILOAD_RESULTS_DIR", Some("/tmp/k6-output")),
        ("APILOAD_RESULTS_EXTENSION", Some(".ndjson")),
        ("APILOAD_LOG_LEVEL", Some("debug")),
        ("APILOAD_LOG_FORMAT", Some("json")),
    ];

    with_vars(vars, || {
        let loader = ConfigLoader::new();
        let config = loader.from_env().unwrap();

        assert_eq!(config.results.directory, PathBuf::from("/tmp/k6-output"));
        assert_eq!(config.results.extension, "ndjson");
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Json);
    });
}

#[test]
fn test_invalid_env_value_is_reported() {
    with_vars(vec![("APILOAD_LOG_LEVEL", Some("loud"))], || {
        let err = ConfigLoader::new().from_env().unwrap_err();
        assert!(matches!(err, ConfigError::EnvError(_)));
        assert!(err.to_string().contains("LOG_LEVEL"));
    });
}

#[test]
fn test_custom_prefix() {
    with_vars(vec![("LOADTEST_RESULTS_DIR", Some("out"))], || {
        let config = ConfigLoader::with_prefix("LOADTEST").from_env().unwrap();
        assert_eq!(config.results.directory, PathBuf::from("out"));
    });
}

#[test]
fn test_comprehensive_config_file() {
    let yaml = r#"
results:
  directory: ./k6-results
  extension: json

logging:
  level: info
  format: compact

profiles:
  local:
    base_url: "http://localhost:8080"
    timeout_ms: 5000
    thresholds:
      http_req_duration: ["p(95)<300"]
      http_req_failed: ["rate<0.01"]
    stages:
      - { duration: 30s, target: 5 }
      - { duration: 1m, target: 5 }
      - { duration: 30s, target: 0 }
  smoke:
    base_url: "https://catfact.ninja"
    timeout_ms: 10000
    thresholds:
      http_req_duration: ["p(95)<1500"]
    stages:
      - { duration: 10s, target: 1 }
"#;

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();

    let config = with_vars_unset(ENV_VARS, || {
        ConfigLoader::new().from_file(file.path()).unwrap()
    });

    assert_eq!(config.results.directory, PathBuf::from("./k6-results"));
    assert_eq!(config.logging.format, LogFormat::Compact);

    let registry = config.profile_registry().unwrap();
    assert_eq!(registry.len(), 7);

    let local = registry.get("local").unwrap();
    assert_eq!(local.name, "local");
    assert_eq!(local.timeout, Duration::from_millis(5000));
    assert_eq!(local.total_duration(), Duration::from_secs(120));
    assert_eq!(
        local.thresholds["http_req_duration"][0],
        "p(95)<300".parse::<Threshold>().unwrap()
    );

    let smoke = registry.get("smoke").unwrap();
    assert_eq!(smoke.timeout, Duration::from_millis(10_000));
    assert_eq!(smoke.stages, vec![Stage::secs(10, 1)]);
}

#[test]
fn test_profile_without_stages_fails_at_load_time() {
    let yaml = r#"
profiles:
  empty:
    base_url: "http://localhost:8080"
    timeout_ms: 5000
    thresholds:
      http_req_duration: ["p(95)<300"]
    stages: []
"#;

    let err = load_yaml(yaml).unwrap_err();
    match err {
        ConfigError::DomainError { domain, message } => {
            assert_eq!(domain, "profile");
            assert!(message.contains("stages"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_huge_stages_fail_at_load_time() {
    let yaml = r#"
profiles:
  forever:
    base_url: "http://localhost:8080"
    timeout_ms: 5000
    thresholds:
      http_req_duration: ["p(95)<300"]
    stages:
      - { duration: 300000000000years, target: 5 }
      - { duration: 300000000000years, target: 0 }
"#;

    let err = load_yaml(yaml).unwrap_err();
    assert!(matches!(err, ConfigError::DomainError { .. }));
    assert!(err.to_string().contains("stages total duration overflows"));
}

#[test]
fn test_bad_threshold_in_file_is_a_parse_error() {
    let yaml = r#"
profiles:
  local:
    base_url: "http://localhost:8080"
    timeout_ms: 5000
    thresholds:
      http_req_duration: ["p95 under 300"]
    stages:
      - { duration: 30s, target: 5 }
"#;

    let err = load_yaml(yaml).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError(_)));
    assert!(err.to_string().contains("p95 under 300"));
}

#[test]
fn test_missing_config_file() {
    let err = ConfigLoader::new()
        .load(Some("/definitely/not/here.yaml"))
        .unwrap_err();
    assert!(matches!(err, ConfigError::FileReadError(_)));
}

#[test]
fn test_empty_config_file_uses_defaults() {
    let config = load_yaml("  \n").unwrap();
    assert_eq!(config.results, ResultsConfig::default());
}

#[test]
fn test_sample_config_round_trip() {
    let sample = ApiloadConfig::generate_sample();
    let config = load_yaml(&sample).unwrap();

    let registry = config.profile_registry().unwrap();
    assert_eq!(
        registry.get("local").unwrap().base_url,
        "http://localhost:8080"
    );
}

#[test]
fn test_registry_is_shared_read_only() {
    let registry = ProfileRegistry::builtin().unwrap();
    let first = registry.get("stress").unwrap();
    let second = registry.get("stress").unwrap();
    assert!(std::ptr::eq(first, second));
}
