//! 도메인 타입 -- 정규화된 레코드, 섹션, 파싱 결과
//!
//! 모든 크레이트가 공유하는 데이터 구조를 정의합니다.
//! 로그 파이프라인은 원시 줄을 [`Record`]로 정규화하고,
//! 연속된 레코드를 [`Section`]으로 묶습니다.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 타임스탬프를 알 수 없을 때 사용하는 값
pub const UNKNOWN: &str = "unknown";

/// 파생 필드: 타임스탬프
pub const FIELD_TIMESTAMP: &str = "timestamp";
/// 파생 필드: 로그 레벨
pub const FIELD_LEVEL: &str = "level";
/// 폴백 필드: 원본 텍스트
pub const FIELD_RAW: &str = "raw";

/// 정규화된 로그 레코드
///
/// 필드 이름에서 JSON 값으로의 매핑입니다. 정규화를 거친 레코드는 항상
/// `timestamp`와 `level` 문자열 필드를 가지며, 원본 JSON 필드 또는
/// 원본 텍스트를 담은 `raw` 필드를 가집니다.
///
/// 직렬화 시 내부 맵이 그대로 JSON 객체로 출력됩니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

impl Record {
    /// 필드 맵으로 레코드를 생성합니다.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// 필드 값을 조회합니다.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// 문자열 필드를 조회합니다. 문자열이 아니면 `None`입니다.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    /// 파생된 타임스탬프 (없으면 `"unknown"`)
    pub fn timestamp(&self) -> &str {
        self.get_str(FIELD_TIMESTAMP).unwrap_or(UNKNOWN)
    }

    /// 파생된 로그 레벨
    pub fn level(&self) -> Level {
        self.get_str(FIELD_LEVEL)
            .map(Level::from_str_loose)
            .unwrap_or_default()
    }

    /// 폴백 모드로 생성된 레코드의 원본 텍스트
    pub fn raw(&self) -> Option<&str> {
        self.get_str(FIELD_RAW)
    }

    /// 전체 필드 맵
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// 레코드를 필드 맵으로 분해합니다.
    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }
}

/// 로그 레벨
///
/// `Ord` 구현으로 레벨 비교가 가능합니다 (`Trace < ... < Fatal < Unknown`).
/// 요약 테이블에서 정렬 키로 사용됩니다.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
    /// 레벨을 찾지 못했거나 알려지지 않은 값
    #[default]
    Unknown,
}

impl Level {
    /// 문자열에서 레벨을 파싱합니다.
    ///
    /// 대소문자를 구분하지 않으며, 알 수 없는 값은 `Unknown`이 됩니다.
    pub fn from_str_loose(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "trace" => Self::Trace,
            "debug" => Self::Debug,
            "info" => Self::Info,
            "warn" | "warning" => Self::Warn,
            "error" => Self::Error,
            "fatal" => Self::Fatal,
            _ => Self::Unknown,
        }
    }

    /// 소문자 레벨 이름
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Fatal => "fatal",
            Self::Unknown => UNKNOWN,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 섹션 종류 -- 감지된 명령 경계
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    /// `terraform plan` 실행 구간
    Plan,
    /// `terraform apply` 실행 구간
    Apply,
    /// 종류를 알 수 없는 구간
    Unknown,
}

impl SectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Plan => "plan",
            Self::Apply => "apply",
            Self::Unknown => UNKNOWN,
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 같은 종류로 감지된 연속 레코드 묶음
///
/// 직렬화 형식: `{ "type": "plan", "logs": [...] }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// 섹션 종류
    #[serde(rename = "type")]
    pub kind: SectionKind,
    /// 입력 순서대로 추가된 레코드
    pub logs: Vec<Record>,
}

impl Section {
    /// 비어 있는 섹션을 엽니다.
    pub fn open(kind: SectionKind) -> Self {
        Self {
            kind,
            logs: Vec::new(),
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} records", self.kind, self.logs.len())
    }
}

/// 한 줄의 로컬 정규화 실패 기록
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineError {
    /// 1부터 시작하는 입력 줄 번호 (빈 줄 포함)
    pub line: usize,
    /// 에러 메시지
    pub message: String,
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// 정규화 성공 결과
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseReport {
    /// 입력 순서대로 정규화된 레코드
    pub logs: Vec<Record>,
    /// 로컬 실패로 건너뛴 줄 목록
    pub errors: Vec<LineError>,
}

/// 정규화 실행 결과
///
/// 줄 단위 실패는 `Success` 안의 `errors`에 기록되고,
/// 실행 전체가 중단된 경우에만 `Failure`가 됩니다.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseOutcome {
    /// 레코드와 줄 단위 에러 목록
    Success(ParseReport),
    /// 전역 실패 -- 레코드도 섹션도 생성되지 않음
    Failure { message: String },
}

impl ParseOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// 성공 결과를 `Result`로 변환합니다.
    pub fn into_result(self) -> Result<ParseReport, String> {
        match self {
            Self::Success(report) => Ok(report),
            Self::Failure { message } => Err(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => Record::new(map),
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn level_ordering() {
        assert!(Level::Trace < Level::Debug);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Error < Level::Fatal);
        assert!(Level::Fatal < Level::Unknown);
    }

    #[test]
    fn level_default_is_unknown() {
        assert_eq!(Level::default(), Level::Unknown);
    }

    #[test]
    fn level_from_str_loose() {
        assert_eq!(Level::from_str_loose("ERROR"), Level::Error);
        assert_eq!(Level::from_str_loose("Warn"), Level::Warn);
        assert_eq!(Level::from_str_loose("warning"), Level::Warn);
        assert_eq!(Level::from_str_loose("fatal"), Level::Fatal);
        assert_eq!(Level::from_str_loose("verbose"), Level::Unknown);
        assert_eq!(Level::from_str_loose(""), Level::Unknown);
    }

    #[test]
    fn level_display_is_lowercase() {
        assert_eq!(Level::Info.to_string(), "info");
        assert_eq!(Level::Unknown.to_string(), "unknown");
    }

    #[test]
    fn section_serializes_kind_as_type() {
        let mut section = Section::open(SectionKind::Plan);
        section.logs.push(record(json!({"@message": "terraform plan"})));
        let value = serde_json::to_value(&section).unwrap();
        assert_eq!(value["type"], "plan");
        assert_eq!(value["logs"][0]["@message"], "terraform plan");
    }

    #[test]
    fn record_serializes_transparently() {
        let rec = record(json!({"raw": "x", "timestamp": "unknown", "level": "unknown"}));
        let text = serde_json::to_string(&rec).unwrap();
        assert_eq!(text, r#"{"raw":"x","timestamp":"unknown","level":"unknown"}"#);
    }

    #[test]
    fn record_accessors() {
        let rec = record(json!({"timestamp": "2024-01-01T00:00:00Z", "level": "error"}));
        assert_eq!(rec.timestamp(), "2024-01-01T00:00:00Z");
        assert_eq!(rec.level(), Level::Error);
        assert_eq!(rec.raw(), None);
    }

    #[test]
    fn record_without_derived_fields_reports_unknown() {
        let rec = record(json!({"level": 3}));
        assert_eq!(rec.timestamp(), UNKNOWN);
        assert_eq!(rec.level(), Level::Unknown);
    }

    #[test]
    fn parse_outcome_into_result() {
        let ok = ParseOutcome::Success(ParseReport::default());
        assert!(ok.is_success());
        assert!(ok.into_result().is_ok());

        let failed = ParseOutcome::Failure {
            message: "boom".to_owned(),
        };
        assert_eq!(failed.into_result().unwrap_err(), "boom");
    }

    #[test]
    fn line_error_display() {
        let err = LineError {
            line: 12,
            message: "line too large".to_owned(),
        };
        assert_eq!(err.to_string(), "line 12: line too large");
    }
}
