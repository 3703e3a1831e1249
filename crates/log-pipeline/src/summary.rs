//! 섹션 요약 -- 레벨별 개수와 시간 범위
//!
//! 텍스트 리포트에서 섹션마다 한 줄씩 보여 주기 위한 집계입니다.
//! RFC 3339로 파싱되지 않는 타임스탬프(`"unknown"` 포함)는 시간 범위 계산에서 제외합니다.

use std::collections::BTreeMap;

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use tflens_core::types::{Level, Section, SectionKind};

/// 오프셋에 콜론이 없는 형태 (`+0500`)
const COMPACT_OFFSET_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%z";

/// 섹션 하나의 요약
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionSummary {
    /// 섹션 종류
    pub kind: SectionKind,
    /// 레코드 수
    pub records: usize,
    /// 레벨별 레코드 수
    pub levels: BTreeMap<Level, usize>,
    /// 파싱 가능한 첫 타임스탬프 (원문)
    pub first_timestamp: Option<String>,
    /// 파싱 가능한 마지막 타임스탬프 (원문)
    pub last_timestamp: Option<String>,
    /// 첫/마지막 타임스탬프 차이 (밀리초)
    pub duration_ms: Option<i64>,
}

impl SectionSummary {
    /// 섹션을 요약합니다.
    pub fn from_section(section: &Section) -> Self {
        let mut levels = BTreeMap::new();
        let mut first: Option<(&str, DateTime<FixedOffset>)> = None;
        let mut last: Option<(&str, DateTime<FixedOffset>)> = None;

        for record in &section.logs {
            *levels.entry(record.level()).or_insert(0) += 1;

            let raw = record.timestamp();
            if let Some(parsed) = parse_timestamp(raw) {
                if first.is_none() {
                    first = Some((raw, parsed));
                }
                last = Some((raw, parsed));
            }
        }

        let duration_ms = match (first, last) {
            (Some((_, start)), Some((_, end))) => Some((end - start).num_milliseconds()),
            _ => None,
        };

        Self {
            kind: section.kind,
            records: section.logs.len(),
            levels,
            first_timestamp: first.map(|(raw, _)| raw.to_owned()),
            last_timestamp: last.map(|(raw, _)| raw.to_owned()),
            duration_ms,
        }
    }

    /// 해당 레벨의 레코드 수
    pub fn count(&self, level: Level) -> usize {
        self.levels.get(&level).copied().unwrap_or(0)
    }
}

/// 여러 섹션을 순서대로 요약합니다.
pub fn summarize(sections: &[Section]) -> Vec<SectionSummary> {
    sections.iter().map(SectionSummary::from_section).collect()
}

/// 정규화된 타임스탬프 문자열을 파싱합니다.
pub fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value)
        .or_else(|_| DateTime::parse_from_str(value, COMPACT_OFFSET_FORMAT))
        .ok()
}
