//! 메트릭 상수 및 설명 등록
//!
//! 모든 메트릭의 이름과 설명을 중앙에서 정의합니다.
//! 파이프라인은 이 상수로 `metrics::counter!()` 매크로를 호출합니다.
//! 레코더가 설치되지 않으면 카운터 호출은 아무 일도 하지 않습니다.
//!
//! # 네이밍 컨벤션
//!
//! - 접두어: `tflens_`
//! - 모듈명: `log_pipeline_`
//! - 접미어: `_total` (counter)
//!
//! # 사용 예시
//!
//! ```ignore
//! use metrics::counter;
//!
//! counter!(tflens_core::metrics::LOG_PIPELINE_LINES_READ_TOTAL).increment(1);
//! ```

// ─── 레이블 키 상수 ────────────────────────────────────────────────

/// 섹션 종류 레이블 키 (plan, apply, unknown)
pub const LABEL_SECTION_KIND: &str = "kind";

/// 입력 형식 레이블 키 (json, raw)
pub const LABEL_LINE_FORMAT: &str = "format";

// ─── Log Pipeline 메트릭 ────────────────────────────────────────────

/// Log Pipeline: 읽은 전체 줄 수 (counter)
pub const LOG_PIPELINE_LINES_READ_TOTAL: &str = "tflens_log_pipeline_lines_read_total";

/// Log Pipeline: 생성된 레코드 수 (counter, label: format)
pub const LOG_PIPELINE_RECORDS_TOTAL: &str = "tflens_log_pipeline_records_total";

/// Log Pipeline: 로컬 실패로 건너뛴 줄 수 (counter)
pub const LOG_PIPELINE_LINE_ERRORS_TOTAL: &str = "tflens_log_pipeline_line_errors_total";

/// Log Pipeline: 생성된 섹션 수 (counter, label: kind)
pub const LOG_PIPELINE_SECTIONS_TOTAL: &str = "tflens_log_pipeline_sections_total";

/// Log Pipeline: 첫 마커 이전이라 버려진 레코드 수 (counter)
pub const LOG_PIPELINE_RECORDS_DROPPED_TOTAL: &str = "tflens_log_pipeline_records_dropped_total";

/// Log Pipeline: 전역 실패로 중단된 실행 수 (counter)
pub const LOG_PIPELINE_RUNS_FAILED_TOTAL: &str = "tflens_log_pipeline_runs_failed_total";

/// 모든 메트릭의 설명을 등록합니다.
///
/// 레코더를 설치한 뒤 한 번 호출합니다.
pub fn describe_all() {
    use metrics::describe_counter;

    describe_counter!(
        LOG_PIPELINE_LINES_READ_TOTAL,
        "Total number of input lines read, blank lines included"
    );
    describe_counter!(
        LOG_PIPELINE_RECORDS_TOTAL,
        "Records produced by the line normalizer, by input format"
    );
    describe_counter!(
        LOG_PIPELINE_LINE_ERRORS_TOTAL,
        "Lines skipped because of a local normalization failure"
    );
    describe_counter!(
        LOG_PIPELINE_SECTIONS_TOTAL,
        "Sections emitted by the segmenter, by kind"
    );
    describe_counter!(
        LOG_PIPELINE_RECORDS_DROPPED_TOTAL,
        "Records dropped because they precede the first plan/apply marker"
    );
    describe_counter!(
        LOG_PIPELINE_RUNS_FAILED_TOTAL,
        "Parse runs aborted by a global failure"
    );
}
