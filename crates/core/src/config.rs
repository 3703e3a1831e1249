//! 설정 관리 -- tflens.toml 파싱 및 런타임 설정
//!
//! [`TflensConfig`]는 모든 크레이트의 설정을 담는 최상위 구조체입니다.
//!
//! # 설정 로딩 우선순위
//! 1. CLI 인자 (최고 우선)
//! 2. 환경변수 (`TFLENS_PARSER_MAX_LINE_BYTES=4096` 형식)
//! 3. 설정 파일 (`tflens.toml`)
//! 4. 기본값 (`Default` 구현)
//!
//! # 사용 예시
//! ```no_run
//! # async fn example() -> Result<(), tflens_core::error::TflensError> {
//! use tflens_core::config::TflensConfig;
//!
//! // 파일에서 로드 + 환경변수 오버라이드
//! let config = TflensConfig::load("tflens.toml").await?;
//!
//! // TOML 문자열에서 직접 파싱
//! let config = TflensConfig::parse("[general]\nlog_level = \"debug\"")?;
//! # Ok(())
//! # }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, TflensError};

/// 허용하는 최대 줄 길이 상한 (64 MiB)
pub const MAX_LINE_BYTES_LIMIT: usize = 64 * 1024 * 1024;

/// tflens 통합 설정
///
/// `tflens.toml` 파일의 최상위 구조를 나타냅니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TflensConfig {
    /// 일반 설정
    #[serde(default)]
    pub general: GeneralConfig,
    /// 줄 정규화 설정
    #[serde(default)]
    pub parser: ParserConfig,
    /// 결과 출력 설정
    #[serde(default)]
    pub output: OutputConfig,
}

impl TflensConfig {
    /// TOML 파일에서 설정을 로드하고 환경변수 오버라이드를 적용합니다.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, TflensError> {
        let mut config = Self::from_file(path).await?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// TOML 파일에서 설정을 로드합니다 (환경변수 오버라이드 없음).
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, TflensError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TflensError::Config(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                })
            } else {
                TflensError::Io(e)
            }
        })?;
        let config = Self::parse(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// TOML 문자열에서 설정을 파싱합니다.
    pub fn parse(toml_str: &str) -> Result<Self, TflensError> {
        toml::from_str(toml_str).map_err(|e| {
            TflensError::Config(ConfigError::ParseFailed {
                reason: e.to_string(),
            })
        })
    }

    /// 환경변수로 설정값을 오버라이드합니다.
    ///
    /// 환경변수 네이밍 규칙: `TFLENS_{SECTION}_{FIELD}`
    /// 예: `TFLENS_GENERAL_LOG_LEVEL=debug`
    pub fn apply_env_overrides(&mut self) {
        // General
        override_string(&mut self.general.log_level, "TFLENS_GENERAL_LOG_LEVEL");
        override_string(&mut self.general.log_format, "TFLENS_GENERAL_LOG_FORMAT");

        // Parser
        override_string(
            &mut self.parser.timestamp_field,
            "TFLENS_PARSER_TIMESTAMP_FIELD",
        );
        override_string(&mut self.parser.level_field, "TFLENS_PARSER_LEVEL_FIELD");
        override_string(
            &mut self.parser.message_field,
            "TFLENS_PARSER_MESSAGE_FIELD",
        );
        override_csv(&mut self.parser.body_fields, "TFLENS_PARSER_BODY_FIELDS");
        override_usize(
            &mut self.parser.max_line_bytes,
            "TFLENS_PARSER_MAX_LINE_BYTES",
        );

        // Output
        override_bool(&mut self.output.pretty, "TFLENS_OUTPUT_PRETTY");
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), TflensError> {
        // log_level 검증
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.general.log_level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_level".to_owned(),
                reason: format!("must be one of: {}", valid_levels.join(", ")),
            }
            .into());
        }

        // log_format 검증
        let valid_formats = ["json", "pretty"];
        if !valid_formats.contains(&self.general.log_format.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "general.log_format".to_owned(),
                reason: format!("must be one of: {}", valid_formats.join(", ")),
            }
            .into());
        }

        // 필드 이름 검증
        let field_names = [
            ("parser.timestamp_field", &self.parser.timestamp_field),
            ("parser.level_field", &self.parser.level_field),
            ("parser.message_field", &self.parser.message_field),
        ];
        for (field, value) in field_names {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_owned(),
                    reason: "field name must not be empty".to_owned(),
                }
                .into());
            }
        }

        if self.parser.body_fields.iter().any(|f| f.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "parser.body_fields".to_owned(),
                reason: "body field names must not be empty".to_owned(),
            }
            .into());
        }

        if self.parser.max_line_bytes == 0 || self.parser.max_line_bytes > MAX_LINE_BYTES_LIMIT {
            return Err(ConfigError::InvalidValue {
                field: "parser.max_line_bytes".to_owned(),
                reason: format!("must be 1-{}", MAX_LINE_BYTES_LIMIT),
            }
            .into());
        }

        Ok(())
    }
}

/// 일반 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// 로그 레벨 (trace, debug, info, warn, error)
    pub log_level: String,
    /// 로그 형식 (json, pretty)
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_owned(),
            log_format: "pretty".to_owned(),
        }
    }
}

/// 줄 정규화 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// 명시적 타임스탬프 필드명
    pub timestamp_field: String,
    /// 명시적 레벨 필드명
    pub level_field: String,
    /// 섹션 경계 감지에 쓰는 메시지 필드명
    pub message_field: String,
    /// JSON 문자열로 인코딩된 HTTP 본문 필드 목록
    pub body_fields: Vec<String>,
    /// 한 줄의 최대 바이트 수 (초과 시 해당 줄만 실패)
    pub max_line_bytes: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            timestamp_field: "@timestamp".to_owned(),
            level_field: "@level".to_owned(),
            message_field: "@message".to_owned(),
            body_fields: vec![
                "tf_http_req_body".to_owned(),
                "tf_http_res_body".to_owned(),
            ],
            max_line_bytes: 1024 * 1024, // 1MB
        }
    }
}

/// 결과 출력 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// 섹션 JSON 배열을 들여쓰기하여 저장할지 여부
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

// --- 환경변수 오버라이드 헬퍼 ---

fn override_string(target: &mut String, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val;
    }
}

fn override_bool(target: &mut bool, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<bool>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse bool from env var, ignoring"
            ),
        }
    }
}

fn override_usize(target: &mut usize, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        match val.parse::<usize>() {
            Ok(parsed) => *target = parsed,
            Err(_) => warn!(
                env_key,
                value = val.as_str(),
                "failed to parse usize from env var, ignoring"
            ),
        }
    }
}

fn override_csv(target: &mut Vec<String>, env_key: &str) {
    if let Ok(val) = std::env::var(env_key) {
        *target = val.split(',').map(|s| s.trim().to_owned()).collect();
    }
}
