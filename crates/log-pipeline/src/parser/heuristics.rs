//! 원시 텍스트 휴리스틱 -- 구조화되지 않은 줄에서 타임스탬프와 레벨 찾기
//!
//! 입력이 항상 JSON이라는 보장이 없으므로, 명시적 필드가 없을 때는
//! 원본 텍스트에 고정 패턴을 적용합니다. 정규식은 생성 시 한 번만 컴파일합니다.

use regex::Regex;

use crate::error::LogPipelineError;

/// ISO-8601 형태 타임스탬프: `YYYY-MM-DDTHH:MM:SS[.fraction](Z|±HH:MM|±HHMM)`
pub const TIMESTAMP_PATTERN: &str =
    r"\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(?:\.\d+)?(?:Z|[+-]\d{2}:?\d{2})";

/// 단어 경계로 둘러싸인 레벨 토큰 (대소문자 무시)
pub const LEVEL_PATTERN: &str = r"(?i)\b(INFO|DEBUG|TRACE|WARN|ERROR|FATAL)\b";

/// 원시 텍스트에서 필드를 추출하는 컴파일된 패턴 묶음
#[derive(Debug, Clone)]
pub struct RawTextHeuristics {
    timestamp: Regex,
    level: Regex,
}

impl RawTextHeuristics {
    /// 패턴을 컴파일합니다.
    pub fn new() -> Result<Self, LogPipelineError> {
        Ok(Self {
            timestamp: Regex::new(TIMESTAMP_PATTERN)?,
            level: Regex::new(LEVEL_PATTERN)?,
        })
    }

    /// 첫 번째 타임스탬프 매치
    pub fn find_timestamp<'a>(&self, text: &'a str) -> Option<&'a str> {
        self.timestamp.find(text).map(|m| m.as_str())
    }

    /// 첫 번째 레벨 토큰 (소문자)
    pub fn find_level(&self, text: &str) -> Option<String> {
        self.level
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_lowercase())
    }
}
