//! 로그 파이프라인 설정
//!
//! [`PipelineConfig`]는 core의 [`ParserConfig`](tflens_core::config::ParserConfig)를
//! 기반으로 파이프라인 전용 설정을 제공합니다.
//!
//! # 사용 예시
//! ```ignore
//! use tflens_core::config::TflensConfig;
//! use tflens_log_pipeline::config::PipelineConfig;
//!
//! let core_config = TflensConfig::default();
//! let config = PipelineConfig::from_core(&core_config.parser);
//! ```

use serde::{Deserialize, Serialize};

use tflens_core::config::MAX_LINE_BYTES_LIMIT;

use crate::error::LogPipelineError;
use crate::parser::JsonFieldMapping;

/// 로그 파이프라인 설정
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// 명시적 타임스탬프 필드명
    pub timestamp_field: String,
    /// 명시적 레벨 필드명
    pub level_field: String,
    /// 마커 감지에 쓰는 메시지 필드명
    pub message_field: String,
    /// JSON 문자열이면 디코딩할 본문 필드 목록
    pub body_fields: Vec<String>,
    /// 한 줄의 최대 바이트 수
    pub max_line_bytes: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from_core(&tflens_core::config::ParserConfig::default())
    }
}

impl PipelineConfig {
    /// core의 `ParserConfig`에서 파이프라인 설정을 생성합니다.
    pub fn from_core(core: &tflens_core::config::ParserConfig) -> Self {
        Self {
            timestamp_field: core.timestamp_field.clone(),
            level_field: core.level_field.clone(),
            message_field: core.message_field.clone(),
            body_fields: core.body_fields.clone(),
            max_line_bytes: core.max_line_bytes,
        }
    }

    /// 정규화기에 넘길 필드 매핑을 만듭니다.
    pub fn field_mapping(&self) -> JsonFieldMapping {
        JsonFieldMapping {
            timestamp_field: self.timestamp_field.clone(),
            level_field: self.level_field.clone(),
            message_field: self.message_field.clone(),
            body_fields: self.body_fields.clone(),
        }
    }

    /// 설정값의 유효성을 검증합니다.
    pub fn validate(&self) -> Result<(), LogPipelineError> {
        for (field, value) in [
            ("timestamp_field", &self.timestamp_field),
            ("level_field", &self.level_field),
            ("message_field", &self.message_field),
        ] {
            if value.trim().is_empty() {
                return Err(LogPipelineError::Config {
                    field: field.to_owned(),
                    reason: "must not be empty".to_owned(),
                });
            }
        }

        if self.body_fields.iter().any(|f| f.trim().is_empty()) {
            return Err(LogPipelineError::Config {
                field: "body_fields".to_owned(),
                reason: "body field names must not be empty".to_owned(),
            });
        }

        if self.max_line_bytes == 0 || self.max_line_bytes > MAX_LINE_BYTES_LIMIT {
            return Err(LogPipelineError::Config {
                field: "max_line_bytes".to_owned(),
                reason: format!("must be 1-{}", MAX_LINE_BYTES_LIMIT),
            });
        }

        Ok(())
    }
}

/// [`PipelineConfig`] 빌더
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn timestamp_field(mut self, field: impl Into<String>) -> Self {
        self.config.timestamp_field = field.into();
        self
    }

    pub fn level_field(mut self, field: impl Into<String>) -> Self {
        self.config.level_field = field.into();
        self
    }

    pub fn message_field(mut self, field: impl Into<String>) -> Self {
        self.config.message_field = field.into();
        self
    }

    pub fn body_fields(mut self, fields: Vec<String>) -> Self {
        self.config.body_fields = fields;
        self
    }

    pub fn max_line_bytes(mut self, bytes: usize) -> Self {
        self.config.max_line_bytes = bytes;
        self
    }

    /// 검증 후 설정을 반환합니다.
    pub fn build(self) -> Result<PipelineConfig, LogPipelineError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
