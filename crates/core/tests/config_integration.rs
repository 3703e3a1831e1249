//! tflens.toml 통합 설정 테스트
//!
//! - tflens.toml.example 파싱 테스트
//! - 부분 설정 (일부 섹션만) 로딩 테스트
//! - 환경변수 우선순위 테스트
//! - 빈 파일 / 잘못된 형식 에러 테스트

use std::fs;

use tempfile::TempDir;
use tflens_core::config::TflensConfig;
use tflens_core::error::{ConfigError, TflensError};

// =============================================================================
// tflens.toml.example 파싱 테스트
// =============================================================================

#[test]
fn example_config_parses_successfully() {
    let content = include_str!("../../../tflens.toml.example");
    let config = TflensConfig::parse(content).expect("example config should parse");

    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.general.log_format, "pretty");
}

#[test]
fn example_config_passes_validation() {
    let content = include_str!("../../../tflens.toml.example");
    let config = TflensConfig::parse(content).expect("should parse");
    config
        .validate()
        .expect("example config should pass validation");
}

#[test]
fn example_config_matches_code_defaults() {
    let content = include_str!("../../../tflens.toml.example");
    let example = TflensConfig::parse(content).expect("should parse");
    let defaults = TflensConfig::default();

    assert_eq!(example.general.log_level, defaults.general.log_level);
    assert_eq!(example.general.log_format, defaults.general.log_format);
    assert_eq!(example.parser.timestamp_field, defaults.parser.timestamp_field);
    assert_eq!(example.parser.level_field, defaults.parser.level_field);
    assert_eq!(example.parser.message_field, defaults.parser.message_field);
    assert_eq!(example.parser.body_fields, defaults.parser.body_fields);
    assert_eq!(example.parser.max_line_bytes, defaults.parser.max_line_bytes);
    assert_eq!(example.output.pretty, defaults.output.pretty);
}

// =============================================================================
// 부분 설정 테스트
// =============================================================================

#[test]
fn partial_config_parser_only() {
    let toml = r#"
[parser]
body_fields = ["tf_http_req_body"]
"#;
    let config = TflensConfig::parse(toml).expect("should parse");
    assert_eq!(config.parser.body_fields, vec!["tf_http_req_body"]);
    // 나머지는 기본값
    assert_eq!(config.parser.message_field, "@message");
    assert_eq!(config.general.log_level, "info");
    assert!(config.output.pretty);
}

#[test]
fn partial_config_output_only() {
    let toml = r#"
[output]
pretty = false
"#;
    let config = TflensConfig::parse(toml).expect("should parse");
    assert!(!config.output.pretty);
    assert_eq!(config.parser.timestamp_field, "@timestamp");
}

#[test]
fn empty_body_fields_is_valid() {
    let toml = r#"
[parser]
body_fields = []
"#;
    let config = TflensConfig::parse(toml).expect("should parse");
    config.validate().expect("no body decoding is a valid choice");
}

// =============================================================================
// 환경변수 우선순위 테스트
// =============================================================================

#[test]
#[serial_test::serial]
fn env_override_takes_precedence_over_toml() {
    let toml = r#"
[general]
log_level = "info"
"#;

    let original = std::env::var("TFLENS_GENERAL_LOG_LEVEL").ok();
    // SAFETY: serial_test로 직렬화되어 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var("TFLENS_GENERAL_LOG_LEVEL", "error");
    }

    let mut config = TflensConfig::parse(toml).expect("should parse");
    config.apply_env_overrides();
    let result = config.general.log_level.clone();

    // SAFETY: 테스트 정리
    unsafe {
        match original {
            Some(val) => std::env::set_var("TFLENS_GENERAL_LOG_LEVEL", val),
            None => std::env::remove_var("TFLENS_GENERAL_LOG_LEVEL"),
        }
    }

    assert_eq!(result, "error");
}

#[test]
#[serial_test::serial]
fn env_override_csv_for_body_fields() {
    let original = std::env::var("TFLENS_PARSER_BODY_FIELDS").ok();
    // SAFETY: serial_test로 직렬화되어 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var("TFLENS_PARSER_BODY_FIELDS", "req_body, res_body");
    }

    let mut config = TflensConfig::default();
    config.apply_env_overrides();
    let result = config.parser.body_fields.clone();

    // SAFETY: 테스트 정리
    unsafe {
        match original {
            Some(val) => std::env::set_var("TFLENS_PARSER_BODY_FIELDS", val),
            None => std::env::remove_var("TFLENS_PARSER_BODY_FIELDS"),
        }
    }

    assert_eq!(result, vec!["req_body", "res_body"]);
}

#[test]
#[serial_test::serial]
fn env_override_numeric_field() {
    let original = std::env::var("TFLENS_PARSER_MAX_LINE_BYTES").ok();
    // SAFETY: serial_test로 직렬화되어 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var("TFLENS_PARSER_MAX_LINE_BYTES", "4096");
    }

    let mut config = TflensConfig::default();
    config.apply_env_overrides();
    let result = config.parser.max_line_bytes;

    // SAFETY: 테스트 정리
    unsafe {
        match original {
            Some(val) => std::env::set_var("TFLENS_PARSER_MAX_LINE_BYTES", val),
            None => std::env::remove_var("TFLENS_PARSER_MAX_LINE_BYTES"),
        }
    }

    assert_eq!(result, 4096);
}

#[tokio::test]
#[serial_test::serial]
async fn load_applies_env_overrides_from_file() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("tflens.toml");
    fs::write(&config_path, "[output]\npretty = true\n").expect("should write config");

    let original = std::env::var("TFLENS_OUTPUT_PRETTY").ok();
    // SAFETY: serial_test로 직렬화되어 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var("TFLENS_OUTPUT_PRETTY", "false");
    }

    let result = TflensConfig::load(&config_path).await;

    // SAFETY: 테스트 정리
    unsafe {
        match original {
            Some(val) => std::env::set_var("TFLENS_OUTPUT_PRETTY", val),
            None => std::env::remove_var("TFLENS_OUTPUT_PRETTY"),
        }
    }

    let config = result.expect("should load");
    assert!(!config.output.pretty);
}

#[tokio::test]
#[serial_test::serial]
async fn load_rejects_invalid_env_override() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("tflens.toml");
    fs::write(&config_path, "").expect("should write config");

    let original = std::env::var("TFLENS_GENERAL_LOG_FORMAT").ok();
    // SAFETY: serial_test로 직렬화되어 환경변수 조작이 안전합니다.
    unsafe {
        std::env::set_var("TFLENS_GENERAL_LOG_FORMAT", "xml");
    }

    let result = TflensConfig::load(&config_path).await;

    // SAFETY: 테스트 정리
    unsafe {
        match original {
            Some(val) => std::env::set_var("TFLENS_GENERAL_LOG_FORMAT", val),
            None => std::env::remove_var("TFLENS_GENERAL_LOG_FORMAT"),
        }
    }

    assert!(matches!(
        result.unwrap_err(),
        TflensError::Config(ConfigError::InvalidValue { .. })
    ));
}

// =============================================================================
// 에러 케이스 테스트
// =============================================================================

#[test]
fn comments_only_parses_with_defaults() {
    let config = TflensConfig::parse("# nothing here\n# at all\n").expect("should parse");
    assert_eq!(config.parser.level_field, "@level");
}

#[test]
fn malformed_toml_returns_parse_error() {
    let result = TflensConfig::parse("[parser\nlevel_field = \"x\"");
    assert!(matches!(
        result.unwrap_err(),
        TflensError::Config(ConfigError::ParseFailed { .. })
    ));
}

#[test]
fn wrong_type_for_numeric_field() {
    let toml = r#"
[parser]
max_line_bytes = "a lot"
"#;
    assert!(TflensConfig::parse(toml).is_err());
}

#[test]
fn unknown_section_is_ignored() {
    let toml = r#"
[general]
log_level = "debug"

[search_index]
url = "http://localhost:9200"
"#;
    let config = TflensConfig::parse(toml).expect("unknown sections are ignored");
    assert_eq!(config.general.log_level, "debug");
}

#[tokio::test]
async fn from_file_nonexistent_returns_file_not_found() {
    let result = TflensConfig::from_file("/tmp/tflens_test_nonexistent_12345.toml").await;
    assert!(matches!(
        result.unwrap_err(),
        TflensError::Config(ConfigError::FileNotFound { .. })
    ));
}

#[tokio::test]
async fn from_file_rejects_invalid_values() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("bad.toml");
    fs::write(&config_path, "[parser]\nmax_line_bytes = 0\n").expect("should write config");

    let result = TflensConfig::from_file(&config_path).await;
    assert!(matches!(
        result.unwrap_err(),
        TflensError::Config(ConfigError::InvalidValue { .. })
    ));
}

// =============================================================================
// 직렬화 라운드트립 테스트
// =============================================================================

#[test]
fn serialize_and_reparse_roundtrip() {
    let mut original = TflensConfig::default();
    original.parser.message_field = "msg".to_owned();
    original.output.pretty = false;

    let toml_str = toml::to_string_pretty(&original).expect("should serialize");
    let reparsed = TflensConfig::parse(&toml_str).expect("should reparse");

    assert_eq!(reparsed.parser.message_field, "msg");
    assert!(!reparsed.output.pretty);
    assert_eq!(reparsed.parser.body_fields, original.parser.body_fields);
}
