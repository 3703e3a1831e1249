//! 파이프라인 trait -- 실행 단위 로깅 확장 포인트 정의
//!
//! 파이프라인 진입점은 [`RunReporter`]를 인자로 받아 한 번의 실행 동안만 사용합니다.
//! 프로세스 전역 로거 싱글턴은 두지 않습니다.

use serde::Serialize;
use tracing::Span;

use crate::types::LineError;

/// 한 번의 실행이 끝났을 때의 집계
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// 읽은 전체 줄 수 (빈 줄 포함)
    pub lines: usize,
    /// 생성된 레코드 수
    pub records: usize,
    /// 로컬 실패로 건너뛴 줄 수
    pub line_errors: usize,
    /// 생성된 섹션 수
    pub sections: usize,
    /// 첫 마커 이전이라 버려진 레코드 수
    pub dropped: usize,
}

/// 실행 중 발생한 사건을 보고받는 trait
///
/// 테스트나 다른 출력 채널을 연결하려면 이 trait을 구현합니다.
pub trait RunReporter: Send + Sync {
    /// 한 줄이 로컬 실패로 건너뛰어졌을 때
    fn line_failed(&self, error: &LineError);

    /// 첫 마커 이전 레코드가 버려졌을 때
    fn records_dropped(&self, count: usize);

    /// 실행이 정상 종료되었을 때
    fn run_finished(&self, summary: &RunSummary);

    /// 전역 실패로 실행이 중단되었을 때
    fn run_aborted(&self, message: &str);
}

/// `tracing` 이벤트로 보고하는 기본 리포터
///
/// 생성할 때마다 새 실행 ID(uuid v4)를 가진 span을 열고,
/// 모든 이벤트를 그 span 안에서 기록합니다.
pub struct TracingReporter {
    run_id: String,
    span: Span,
}

impl TracingReporter {
    /// 새 실행 span을 가진 리포터를 생성합니다.
    pub fn new() -> Self {
        let run_id = uuid::Uuid::new_v4().to_string();
        let span = tracing::info_span!("parse_run", run_id = %run_id);
        Self { run_id, span }
    }

    /// 이 실행의 ID
    pub fn run_id(&self) -> &str {
        &self.run_id
    }
}

impl Default for TracingReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl RunReporter for TracingReporter {
    fn line_failed(&self, error: &LineError) {
        let _guard = self.span.enter();
        tracing::warn!(line = error.line, reason = %error.message, "skipping line");
    }

    fn records_dropped(&self, count: usize) {
        let _guard = self.span.enter();
        tracing::debug!(count, "records before the first plan/apply marker dropped");
    }

    fn run_finished(&self, summary: &RunSummary) {
        let _guard = self.span.enter();
        tracing::info!(
            lines = summary.lines,
            records = summary.records,
            line_errors = summary.line_errors,
            sections = summary.sections,
            dropped = summary.dropped,
            "parse run finished"
        );
    }

    fn run_aborted(&self, message: &str) {
        let _guard = self.span.enter();
        tracing::error!(reason = message, "parse run aborted");
    }
}
