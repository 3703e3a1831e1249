//! 로그 파이프라인 에러 타입
//!
//! [`LogPipelineError`]는 파이프라인을 구성하는 단계에서 발생하는 에러를 표현합니다.
//! 줄 단위 정규화 실패는 에러로 전파되지 않고 실행 결과의 에러 목록에 기록됩니다.
//! `From<LogPipelineError> for TflensError` 변환이 구현되어 있어
//! 상위 레이어에서 `?` 연산자로 자연스럽게 전파할 수 있습니다.

use tflens_core::error::{ConfigError, TflensError};

/// 로그 파이프라인 도메인 에러
#[derive(Debug, thiserror::Error)]
pub enum LogPipelineError {
    /// 설정 에러
    #[error("config error: {field}: {reason}")]
    Config {
        /// 설정 필드명
        field: String,
        /// 에러 사유
        reason: String,
    },

    /// 휴리스틱 정규식 컴파일 에러
    #[error("regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl From<LogPipelineError> for TflensError {
    fn from(err: LogPipelineError) -> Self {
        match err {
            LogPipelineError::Config { field, reason } => {
                TflensError::Config(ConfigError::InvalidValue { field, reason })
            }
            LogPipelineError::Regex(e) => TflensError::Pipeline(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = LogPipelineError::Config {
            field: "message_field".to_owned(),
            reason: "must not be empty".to_owned(),
        };
        let msg = err.to_string();
        assert!(msg.contains("message_field"));
        assert!(msg.contains("must not be empty"));
    }

    #[test]
    fn config_error_converts_to_config_variant() {
        let err = LogPipelineError::Config {
            field: "max_line_bytes".to_owned(),
            reason: "must be 1-67108864".to_owned(),
        };
        let top: TflensError = err.into();
        assert!(matches!(
            top,
            TflensError::Config(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn regex_error_converts_to_pipeline_variant() {
        let regex_err = regex::Regex::new("(unclosed").unwrap_err();
        let top: TflensError = LogPipelineError::from(regex_err).into();
        assert!(matches!(top, TflensError::Pipeline(_)));
    }
}
