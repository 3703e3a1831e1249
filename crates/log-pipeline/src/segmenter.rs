//! 섹션 분할 -- 정규화된 레코드 스트림을 plan/apply 섹션으로 나누기
//!
//! 마커 레코드(메시지에 `terraform`과 `plan` 또는 `apply`가 함께 등장)를 만날 때마다
//! 새 섹션을 열고, 마커가 아닌 레코드는 현재 섹션에 이어 붙입니다.
//! 첫 마커 이전 레코드는 받을 섹션이 없으므로 버려지며, 그 개수를 보고합니다.
//!
//! 마커 판정은 대소문자를 구분하지 않습니다. 메시지에 `plan`과 `apply`가
//! 모두 있으면 plan 마커로 봅니다.
//!
//! # 사용 예시
//! ```ignore
//! use tflens_log_pipeline::segmenter::{MarkerDetector, SectionSegmenter};
//!
//! let mut segmenter = SectionSegmenter::new(MarkerDetector::default());
//! for record in records {
//!     segmenter.push(record);
//! }
//! let segmentation = segmenter.finish();
//! ```

use tflens_core::types::{FIELD_RAW, Record, Section, SectionKind};

/// 마커 감지기
///
/// 메시지 필드(기본 `@message`)가 비어 있거나 문자열이 아니면 `raw` 필드를 봅니다.
#[derive(Debug, Clone)]
pub struct MarkerDetector {
    message_field: String,
}

impl Default for MarkerDetector {
    fn default() -> Self {
        Self::new("@message")
    }
}

impl MarkerDetector {
    pub fn new(message_field: impl Into<String>) -> Self {
        Self {
            message_field: message_field.into(),
        }
    }

    /// 마커 판정에 쓰는 메시지 텍스트
    pub fn message<'a>(&self, record: &'a Record) -> Option<&'a str> {
        record
            .get_str(&self.message_field)
            .filter(|msg| !msg.is_empty())
            .or_else(|| record.get_str(FIELD_RAW))
    }

    /// 레코드가 마커이면 섹션 종류를 반환합니다.
    pub fn classify(&self, record: &Record) -> Option<SectionKind> {
        let message = self.message(record)?.to_lowercase();
        if !message.contains("terraform") {
            return None;
        }
        if message.contains("plan") {
            Some(SectionKind::Plan)
        } else if message.contains("apply") {
            Some(SectionKind::Apply)
        } else {
            None
        }
    }
}

/// 분할 결과
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segmentation {
    /// 입력 순서대로 닫힌 섹션
    pub sections: Vec<Section>,
    /// 첫 마커 이전이라 버려진 레코드 수
    pub dropped_before_first_marker: usize,
}

impl Segmentation {
    /// 모든 섹션의 레코드 수 합계
    pub fn record_count(&self) -> usize {
        self.sections.iter().map(|s| s.logs.len()).sum()
    }
}

/// eager 경계 정책의 섹션 분할 상태 머신
///
/// - 마커 → 현재 섹션을 닫고 마커 종류로 새 섹션을 열어 추가
/// - 마커 아님, 열린 섹션 있음 → 현재 섹션에 추가
/// - 마커 아님, 열린 섹션 없음 → 버림
#[derive(Debug)]
pub struct SectionSegmenter {
    detector: MarkerDetector,
    current: Option<Section>,
    sections: Vec<Section>,
    dropped: usize,
}

impl SectionSegmenter {
    pub fn new(detector: MarkerDetector) -> Self {
        Self {
            detector,
            current: None,
            sections: Vec::new(),
            dropped: 0,
        }
    }

    /// 레코드 하나를 처리합니다.
    pub fn push(&mut self, record: Record) {
        if let Some(kind) = self.detector.classify(&record) {
            if let Some(closed) = self.current.take() {
                self.sections.push(closed);
            }
            let mut section = Section::open(kind);
            section.logs.push(record);
            self.current = Some(section);
            return;
        }

        match self.current.as_mut() {
            Some(section) => section.logs.push(record),
            None => self.dropped += 1,
        }
    }

    /// 지금까지 버려진 레코드 수
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// 입력 끝: 열린 섹션을 닫고 결과를 반환합니다.
    pub fn finish(mut self) -> Segmentation {
        if let Some(closed) = self.current.take() {
            self.sections.push(closed);
        }
        Segmentation {
            sections: self.sections,
            dropped_before_first_marker: self.dropped,
        }
    }

    /// 레코드 시퀀스 전체를 한 번에 분할합니다.
    pub fn segment<I>(detector: MarkerDetector, records: I) -> Segmentation
    where
        I: IntoIterator<Item = Record>,
    {
        let mut segmenter = Self::new(detector);
        for record in records {
            segmenter.push(record);
        }
        segmenter.finish()
    }
}
