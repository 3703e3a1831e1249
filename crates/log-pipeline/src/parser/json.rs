//! JSON 줄 디코딩
//!
//! terraform의 `TF_LOG=json` 출력처럼 한 줄에 하나의 JSON 객체가 오는 로그를 다룹니다.
//! 필드 이름 매핑을 통해 명시적 타임스탬프/레벨/메시지 필드를 찾고,
//! JSON 문자열로 인코딩된 HTTP 본문 필드를 제자리에서 디코딩합니다.
//!
//! # 사용 예시
//! ```ignore
//! use tflens_log_pipeline::parser::json::{decode_object, JsonFieldMapping};
//!
//! let mapping = JsonFieldMapping::default();
//! let fields = decode_object(r#"{"@level":"info","@message":"terraform plan"}"#).unwrap();
//! assert_eq!(mapping.explicit_level(&fields).as_deref(), Some("info"));
//! ```

use serde_json::{Map, Value};

/// JSON 로그 필드 매핑 설정
///
/// terraform은 `@timestamp`, `@level`, `@message`를 사용하지만,
/// 다른 도구의 출력을 다룰 수 있도록 이름을 바꿀 수 있습니다.
#[derive(Debug, Clone)]
pub struct JsonFieldMapping {
    /// 타임스탬프 필드명 (기본: "@timestamp")
    pub timestamp_field: String,
    /// 레벨 필드명 (기본: "@level")
    pub level_field: String,
    /// 메시지 필드명 (기본: "@message")
    pub message_field: String,
    /// JSON 문자열로 인코딩된 본문 필드 (기본: tf_http_req_body, tf_http_res_body)
    pub body_fields: Vec<String>,
}

impl Default for JsonFieldMapping {
    fn default() -> Self {
        Self {
            timestamp_field: "@timestamp".to_owned(),
            level_field: "@level".to_owned(),
            message_field: "@message".to_owned(),
            body_fields: vec![
                "tf_http_req_body".to_owned(),
                "tf_http_res_body".to_owned(),
            ],
        }
    }
}

impl JsonFieldMapping {
    /// 명시적 타임스탬프 필드 값
    pub fn explicit_timestamp(&self, fields: &Map<String, Value>) -> Option<String> {
        extract_string(fields, &self.timestamp_field)
    }

    /// 명시적 레벨 필드 값 (소문자 변환 전)
    pub fn explicit_level(&self, fields: &Map<String, Value>) -> Option<String> {
        extract_string(fields, &self.level_field)
    }

    /// 본문 필드를 디코딩합니다.
    ///
    /// 값이 문자열이고 JSON으로 디코딩되면 디코딩된 값으로 교체합니다.
    /// 문자열이 아니거나 디코딩에 실패하면 원래 값을 그대로 둡니다.
    pub fn decode_bodies(&self, fields: &mut Map<String, Value>) {
        for name in &self.body_fields {
            let Some(value) = fields.get_mut(name) else {
                continue;
            };
            let decoded = match value {
                Value::String(s) => serde_json::from_str::<Value>(s).ok(),
                _ => None,
            };
            if let Some(decoded) = decoded {
                *value = decoded;
            }
        }
    }
}

/// 한 줄을 JSON 객체로 디코딩합니다.
///
/// 디코딩에 실패하거나 최상위 값이 객체가 아니면 `None`을 반환합니다.
pub fn decode_object(line: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(line) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// 필드에서 비어 있지 않은 문자열 값을 추출합니다.
///
/// 숫자와 불리언은 문자열로 변환하고, 빈 문자열/null/배열/객체는 값이 없는 것으로 봅니다.
pub fn extract_string(fields: &Map<String, Value>, field: &str) -> Option<String> {
    match fields.get(field)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
