//! 줄 정규화 모듈 -- 원시 줄 하나를 [`Record`] 하나로 변환
//!
//! [`LineNormalizer`]는 한 줄을 JSON 객체로 디코딩해 보고, 실패하면
//! `{ "raw": line }` 폴백 레코드를 만듭니다. 이어서 타임스탬프와 레벨을
//! 명시적 필드 → 원시 텍스트 휴리스틱 → `"unknown"` 순서로 채우고,
//! HTTP 본문 필드를 디코딩합니다.
//!
//! 정규화는 실패하지 않습니다. 디코딩 실패는 모두 폴백 경로로 처리됩니다.
//!
//! # 사용 예시
//! ```ignore
//! use tflens_log_pipeline::parser::{JsonFieldMapping, LineNormalizer};
//!
//! let normalizer = LineNormalizer::new(JsonFieldMapping::default())?;
//! let record = normalizer.normalize("2024-01-01T00:00:00Z ERROR something failed");
//! assert_eq!(record.timestamp(), "2024-01-01T00:00:00Z");
//! ```

pub mod heuristics;
pub mod json;

pub use heuristics::RawTextHeuristics;
pub use json::JsonFieldMapping;

use serde_json::{Map, Value};

use tflens_core::types::{FIELD_LEVEL, FIELD_RAW, FIELD_TIMESTAMP, Record, UNKNOWN};

use crate::error::LogPipelineError;

/// 줄이 어떤 경로로 정규화되었는지
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineFormat {
    /// JSON 객체로 디코딩됨
    Json,
    /// 폴백 모드 (`raw` 필드)
    Raw,
}

impl LineFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Raw => "raw",
        }
    }
}

/// 줄 정규화기
///
/// 실행 간 공유 상태가 없으므로 하나의 인스턴스를 여러 실행에 재사용할 수 있습니다.
#[derive(Debug, Clone)]
pub struct LineNormalizer {
    /// 명시적 필드 매핑
    mapping: JsonFieldMapping,
    /// 폴백 휴리스틱
    heuristics: RawTextHeuristics,
}

impl LineNormalizer {
    /// 필드 매핑으로 새 정규화기를 생성합니다.
    pub fn new(mapping: JsonFieldMapping) -> Result<Self, LogPipelineError> {
        Ok(Self {
            mapping,
            heuristics: RawTextHeuristics::new()?,
        })
    }

    /// 필드 매핑을 반환합니다.
    pub fn mapping(&self) -> &JsonFieldMapping {
        &self.mapping
    }

    /// 공백이 제거된 비어 있지 않은 줄을 레코드로 정규화합니다.
    pub fn normalize(&self, line: &str) -> Record {
        self.normalize_tagged(line).0
    }

    /// 정규화하면서 어떤 경로를 탔는지 함께 반환합니다.
    pub fn normalize_tagged(&self, line: &str) -> (Record, LineFormat) {
        let (mut fields, format) = match json::decode_object(line) {
            Some(map) => (map, LineFormat::Json),
            None => {
                let mut map = Map::new();
                map.insert(FIELD_RAW.to_owned(), Value::String(line.to_owned()));
                (map, LineFormat::Raw)
            }
        };

        let raw_text = fields
            .get(FIELD_RAW)
            .and_then(Value::as_str)
            .map(str::to_owned);

        let timestamp = self.mapping.explicit_timestamp(&fields).or_else(|| {
            raw_text
                .as_deref()
                .and_then(|raw| self.heuristics.find_timestamp(raw))
                .map(str::to_owned)
        });

        let level = self
            .mapping
            .explicit_level(&fields)
            .or_else(|| {
                raw_text
                    .as_deref()
                    .and_then(|raw| self.heuristics.find_level(raw))
            })
            .map(|lvl| lvl.to_lowercase());

        fields.insert(
            FIELD_TIMESTAMP.to_owned(),
            Value::String(timestamp.unwrap_or_else(|| UNKNOWN.to_owned())),
        );
        fields.insert(
            FIELD_LEVEL.to_owned(),
            Value::String(level.unwrap_or_else(|| UNKNOWN.to_owned())),
        );

        self.mapping.decode_bodies(&mut fields);

        (Record::new(fields), format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tflens_core::types::Level;

    fn normalizer() -> LineNormalizer {
        LineNormalizer::new(JsonFieldMapping::default()).unwrap()
    }

    fn to_json(record: &Record) -> Value {
        serde_json::to_value(record).unwrap()
    }

    #[test]
    fn raw_line_with_timestamp_and_level() {
        let line = "2024-01-01T00:00:00Z ERROR something failed";
        let (record, format) = normalizer().normalize_tagged(line);
        assert_eq!(format, LineFormat::Raw);
        assert_eq!(
            to_json(&record),
            json!({
                "raw": line,
                "timestamp": "2024-01-01T00:00:00Z",
                "level": "error"
            })
        );
    }

    #[test]
    fn raw_line_without_patterns_is_unknown() {
        let line = "{this is not json";
        let record = normalizer().normalize(line);
        assert_eq!(
            to_json(&record),
            json!({"raw": line, "timestamp": "unknown", "level": "unknown"})
        );
    }

    #[test]
    fn json_line_keeps_original_fields() {
        let line = r#"{"@timestamp":"2025-09-01T10:00:00.000Z","@level":"info","@message":"Terraform run started","tf_run_id":"12345"}"#;
        let (record, format) = normalizer().normalize_tagged(line);
        assert_eq!(format, LineFormat::Json);
        assert_eq!(record.get_str("@message"), Some("Terraform run started"));
        assert_eq!(record.get_str("tf_run_id"), Some("12345"));
        assert_eq!(record.timestamp(), "2025-09-01T10:00:00.000Z");
        assert_eq!(record.get_str("level"), Some("info"));
        assert_eq!(record.raw(), None);
    }

    #[test]
    fn json_level_is_lowercased() {
        let record = normalizer().normalize(r#"{"@level":"ERROR"}"#);
        assert_eq!(record.get_str("level"), Some("error"));
        assert_eq!(record.level(), Level::Error);
    }

    #[test]
    fn unrecognised_explicit_level_is_kept_lowercased() {
        let record = normalizer().normalize(r#"{"@level":"NOTICE"}"#);
        assert_eq!(record.get_str("level"), Some("notice"));
        assert_eq!(record.level(), Level::Unknown);
    }

    #[test]
    fn json_without_explicit_fields_is_unknown() {
        let record = normalizer().normalize(r#"{"@message":"ERROR in message is not scanned"}"#);
        assert_eq!(record.timestamp(), "unknown");
        assert_eq!(record.get_str("level"), Some("unknown"));
    }

    #[test]
    fn json_with_raw_field_uses_heuristics() {
        let record =
            normalizer().normalize(r#"{"raw":"2024-05-05T05:05:05+02:00 WARN low disk"}"#);
        assert_eq!(record.timestamp(), "2024-05-05T05:05:05+02:00");
        assert_eq!(record.get_str("level"), Some("warn"));
    }

    #[test]
    fn explicit_fields_take_priority_over_raw() {
        let record = normalizer().normalize(
            r#"{"@timestamp":"2000-01-01T00:00:00Z","@level":"debug","raw":"2024-01-01T00:00:00Z ERROR"}"#,
        );
        assert_eq!(record.timestamp(), "2000-01-01T00:00:00Z");
        assert_eq!(record.get_str("level"), Some("debug"));
    }

    #[test]
    fn empty_explicit_field_falls_back() {
        let record = normalizer().normalize(r#"{"@timestamp":"","raw":"2024-01-01T00:00:00Z"}"#);
        assert_eq!(record.timestamp(), "2024-01-01T00:00:00Z");
    }

    #[test]
    fn non_object_json_falls_back_to_raw() {
        let record = normalizer().normalize("[1,2,3]");
        assert_eq!(record.raw(), Some("[1,2,3]"));
        assert_eq!(record.timestamp(), "unknown");

        let record = normalizer().normalize("42");
        assert_eq!(record.raw(), Some("42"));
    }

    #[test]
    fn request_body_is_decoded_in_place() {
        let record = normalizer().normalize(r#"{"tf_http_req_body": "{\"a\":1}"}"#);
        assert_eq!(record.get("tf_http_req_body"), Some(&json!({"a": 1})));
    }

    #[test]
    fn undecodable_body_is_untouched() {
        let record = normalizer().normalize(r#"{"tf_http_res_body": "not json"}"#);
        assert_eq!(record.get_str("tf_http_res_body"), Some("not json"));
    }

    #[test]
    fn existing_timestamp_key_is_overwritten_in_place() {
        let record = normalizer().normalize(r#"{"timestamp":"yesterday","a":1}"#);
        let keys: Vec<&str> = record.fields().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["timestamp", "a", "level"]);
        assert_eq!(record.timestamp(), "unknown");
    }

    #[test]
    fn derived_fields_are_appended_after_original_fields() {
        let record = normalizer().normalize(r#"{"@message":"m","z":0}"#);
        let keys: Vec<&str> = record.fields().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["@message", "z", "timestamp", "level"]);
    }

    #[test]
    fn numeric_explicit_timestamp_is_stringified() {
        let record = normalizer().normalize(r#"{"@timestamp":1705320000}"#);
        assert_eq!(record.timestamp(), "1705320000");
    }

    #[test]
    fn custom_mapping() {
        let mapping = JsonFieldMapping {
            timestamp_field: "time".to_owned(),
            level_field: "severity".to_owned(),
            ..Default::default()
        };
        let normalizer = LineNormalizer::new(mapping).unwrap();
        let record = normalizer.normalize(r#"{"time":"2024-01-01T00:00:00Z","severity":"Warn"}"#);
        assert_eq!(record.timestamp(), "2024-01-01T00:00:00Z");
        assert_eq!(record.get_str("level"), Some("warn"));
    }

    #[test]
    fn normalize_is_deterministic() {
        let n = normalizer();
        let line = r#"{"@level":"info","tf_http_req_body":"{\"b\":2,\"a\":1}"}"#;
        let a = serde_json::to_string(&n.normalize(line)).unwrap();
        let b = serde_json::to_string(&n.normalize(line)).unwrap();
        assert_eq!(a, b);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn normalize_always_sets_timestamp_and_level(line in "\\PC{1,200}") {
                let trimmed = line.trim();
                prop_assume!(!trimmed.is_empty());
                let record = normalizer().normalize(trimmed);
                prop_assert!(record.get_str("timestamp").is_some());
                prop_assert!(record.get_str("level").is_some());
            }

            #[test]
            fn normalize_keeps_raw_text_for_non_json(words in "[a-z ]{1,80}") {
                let trimmed = words.trim();
                prop_assume!(!trimmed.is_empty());
                let record = normalizer().normalize(trimmed);
                prop_assert_eq!(record.raw(), Some(trimmed));
            }
        }
    }
}
