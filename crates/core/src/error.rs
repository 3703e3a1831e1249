//! 에러 타입 -- 도메인별 에러 정의
//!
//! 줄 단위 실패([`ParseError`])는 실행을 중단시키지 않고
//! [`LineError`](crate::types::LineError)로 기록됩니다.
//! 실행 전체를 중단시키는 실패만 [`ParseOutcome::Failure`](crate::types::ParseOutcome)가 됩니다.

/// tflens 최상위 에러 타입
#[derive(Debug, thiserror::Error)]
pub enum TflensError {
    /// 설정 관련 에러
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// 파이프라인 처리 에러
    #[error("pipeline error: {0}")]
    Pipeline(String),

    /// I/O 에러
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// 설정 관련 에러
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// 설정 파일을 찾을 수 없음
    #[error("config file not found: {path}")]
    FileNotFound { path: String },

    /// 설정 파싱 실패
    #[error("failed to parse config: {reason}")]
    ParseFailed { reason: String },

    /// 유효하지 않은 설정 값
    #[error("invalid config value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// 파싱 에러
///
/// `LineTooLarge`와 `InvalidUtf8`은 한 줄에 국한된 실패이고,
/// `Read`는 입력 전체를 더 이상 읽을 수 없는 전역 실패입니다.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// 줄 길이 초과
    #[error("line too large: {size} bytes (max: {max})")]
    LineTooLarge { size: usize, max: usize },

    /// UTF-8이 아닌 바이트열
    #[error("invalid utf-8 at byte {valid_up_to}")]
    InvalidUtf8 { valid_up_to: usize },

    /// 입력 스트림 읽기 실패
    #[error("failed to read input after line {line}: {reason}")]
    Read { line: usize, reason: String },
}
