//! 파이프라인 진입점 -- 줄 읽기, 정규화, 섹션 분할의 전체 흐름
//!
//! [`LogPipeline`]은 입력 줄을 하나씩 [`LineNormalizer`]에 넘기고,
//! 결과 레코드를 [`SectionSegmenter`]로 섹션에 나눕니다.
//! 실행 단위 로깅은 호출자가 넘기는 [`RunReporter`]로 보고합니다.
//!
//! # 내부 흐름
//! ```text
//! BufRead / &str lines -> 크기/UTF-8 검사 -> LineNormalizer -> SectionSegmenter -> RunReport
//!                              |
//!                          LineError (로컬 실패, 계속 진행)
//! ```
//!
//! I/O 에러처럼 입력을 더 이상 읽을 수 없는 경우에만 실행 전체가 `Failure`가 됩니다.

use std::io::BufRead;

use serde::Serialize;

use tflens_core::error::ParseError;
use tflens_core::metrics as m;
use tflens_core::pipeline::{RunReporter, RunSummary};
use tflens_core::types::{LineError, ParseOutcome, ParseReport, Section};

use crate::config::PipelineConfig;
use crate::error::LogPipelineError;
use crate::parser::LineNormalizer;
use crate::segmenter::{MarkerDetector, SectionSegmenter};
use crate::summary::{SectionSummary, summarize};

/// 정규화와 섹션 분할을 모두 거친 실행 결과
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunReport {
    /// 입력 순서대로 닫힌 섹션
    pub sections: Vec<Section>,
    /// 로컬 실패로 건너뛴 줄 목록
    pub errors: Vec<LineError>,
    /// 첫 마커 이전이라 버려진 레코드 수
    pub dropped_before_first_marker: usize,
    /// 실행 집계
    pub summary: RunSummary,
}

impl RunReport {
    /// 섹션별 요약
    pub fn section_summaries(&self) -> Vec<SectionSummary> {
        summarize(&self.sections)
    }
}

/// 전체 실행 결과
#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    /// 섹션과 줄 단위 에러 목록
    Success(RunReport),
    /// 전역 실패 -- 섹션 없음
    Failure { message: String },
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// 성공 결과를 `Result`로 변환합니다.
    pub fn into_result(self) -> Result<RunReport, String> {
        match self {
            Self::Success(report) => Ok(report),
            Self::Failure { message } => Err(message),
        }
    }
}

/// 정규화 중간 결과 (읽은 줄 수 포함)
struct Normalized {
    report: ParseReport,
    lines: usize,
}

/// 로그 파이프라인
///
/// 실행 간 공유 상태가 없으므로 하나의 인스턴스로 여러 입력을 처리할 수 있습니다.
///
/// # 사용 예시
/// ```ignore
/// use tflens_core::pipeline::TracingReporter;
/// use tflens_log_pipeline::LogPipelineBuilder;
///
/// let pipeline = LogPipelineBuilder::new().config(config).build()?;
/// let outcome = pipeline.run_reader(reader, &TracingReporter::new());
/// ```
#[derive(Debug, Clone)]
pub struct LogPipeline {
    config: PipelineConfig,
    normalizer: LineNormalizer,
    detector: MarkerDetector,
}

impl LogPipeline {
    /// 파이프라인 설정
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// 줄 정규화기
    pub fn normalizer(&self) -> &LineNormalizer {
        &self.normalizer
    }

    /// 메모리 상의 줄 시퀀스를 정규화합니다.
    pub fn parse_lines<'a, I>(&self, lines: I, reporter: &dyn RunReporter) -> ParseOutcome
    where
        I: IntoIterator<Item = &'a str>,
    {
        let normalized = self.normalize_lines(lines, reporter);
        reporter.run_finished(&self.parse_summary(&normalized));
        ParseOutcome::Success(normalized.report)
    }

    /// `BufRead`에서 줄을 읽어 정규화합니다.
    pub fn parse_reader<R: BufRead>(&self, reader: R, reporter: &dyn RunReporter) -> ParseOutcome {
        match self.normalize_reader(reader, reporter) {
            Ok(normalized) => {
                reporter.run_finished(&self.parse_summary(&normalized));
                ParseOutcome::Success(normalized.report)
            }
            Err(err) => ParseOutcome::Failure {
                message: self.abort(err, reporter),
            },
        }
    }

    /// 정규화된 결과를 섹션으로 나눕니다.
    pub fn sectionize(&self, report: ParseReport) -> RunReport {
        let records = report.logs.len();
        let segmentation = SectionSegmenter::segment(self.detector.clone(), report.logs);

        for section in &segmentation.sections {
            metrics::counter!(
                m::LOG_PIPELINE_SECTIONS_TOTAL,
                m::LABEL_SECTION_KIND => section.kind.as_str()
            )
            .increment(1);
        }
        if segmentation.dropped_before_first_marker > 0 {
            metrics::counter!(m::LOG_PIPELINE_RECORDS_DROPPED_TOTAL)
                .increment(segmentation.dropped_before_first_marker as u64);
        }

        RunReport {
            summary: RunSummary {
                lines: 0,
                records,
                line_errors: report.errors.len(),
                sections: segmentation.sections.len(),
                dropped: segmentation.dropped_before_first_marker,
            },
            sections: segmentation.sections,
            errors: report.errors,
            dropped_before_first_marker: segmentation.dropped_before_first_marker,
        }
    }

    /// 메모리 상의 줄 시퀀스를 정규화하고 섹션으로 나눕니다.
    pub fn run_lines<'a, I>(&self, lines: I, reporter: &dyn RunReporter) -> RunOutcome
    where
        I: IntoIterator<Item = &'a str>,
    {
        let normalized = self.normalize_lines(lines, reporter);
        RunOutcome::Success(self.finish_run(normalized, reporter))
    }

    /// `BufRead`에서 줄을 읽어 정규화하고 섹션으로 나눕니다.
    pub fn run_reader<R: BufRead>(&self, reader: R, reporter: &dyn RunReporter) -> RunOutcome {
        match self.normalize_reader(reader, reporter) {
            Ok(normalized) => RunOutcome::Success(self.finish_run(normalized, reporter)),
            Err(err) => RunOutcome::Failure {
                message: self.abort(err, reporter),
            },
        }
    }

    fn finish_run(&self, normalized: Normalized, reporter: &dyn RunReporter) -> RunReport {
        let mut report = self.sectionize(normalized.report);
        report.summary.lines = normalized.lines;

        if report.dropped_before_first_marker > 0 {
            reporter.records_dropped(report.dropped_before_first_marker);
        }
        reporter.run_finished(&report.summary);
        report
    }

    fn parse_summary(&self, normalized: &Normalized) -> RunSummary {
        RunSummary {
            lines: normalized.lines,
            records: normalized.report.logs.len(),
            line_errors: normalized.report.errors.len(),
            ..RunSummary::default()
        }
    }

    fn abort(&self, err: ParseError, reporter: &dyn RunReporter) -> String {
        let message = format!("failed to parse logs: {err}");
        metrics::counter!(m::LOG_PIPELINE_RUNS_FAILED_TOTAL).increment(1);
        reporter.run_aborted(&message);
        message
    }

    fn normalize_lines<'a, I>(&self, lines: I, reporter: &dyn RunReporter) -> Normalized
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut normalized = Normalized {
            report: ParseReport::default(),
            lines: 0,
        };

        for line in lines {
            normalized.lines += 1;
            let number = normalized.lines;
            let trimmed = line.trim();
            if trimmed.len() > self.config.max_line_bytes {
                self.reject_line(
                    &mut normalized.report,
                    number,
                    ParseError::LineTooLarge {
                        size: trimmed.len(),
                        max: self.config.max_line_bytes,
                    },
                    reporter,
                );
                continue;
            }
            self.accept_line(&mut normalized.report, trimmed);
        }

        normalized
    }

    fn normalize_reader<R: BufRead>(
        &self,
        mut reader: R,
        reporter: &dyn RunReporter,
    ) -> Result<Normalized, ParseError> {
        let mut normalized = Normalized {
            report: ParseReport::default(),
            lines: 0,
        };
        let mut buf = Vec::new();
        let max = self.config.max_line_bytes;

        loop {
            let Some(size) =
                read_bounded_line(&mut reader, &mut buf, max).map_err(|e| ParseError::Read {
                    line: normalized.lines,
                    reason: e.to_string(),
                })?
            else {
                break;
            };

            normalized.lines += 1;
            let number = normalized.lines;

            if size > max {
                self.reject_line(
                    &mut normalized.report,
                    number,
                    ParseError::LineTooLarge { size, max },
                    reporter,
                );
                continue;
            }

            match std::str::from_utf8(&buf[..size]) {
                Ok(line) => self.accept_line(&mut normalized.report, line),
                Err(e) => self.reject_line(
                    &mut normalized.report,
                    number,
                    ParseError::InvalidUtf8 {
                        valid_up_to: e.valid_up_to(),
                    },
                    reporter,
                ),
            }
        }

        Ok(normalized)
    }

    fn accept_line(&self, report: &mut ParseReport, line: &str) {
        metrics::counter!(m::LOG_PIPELINE_LINES_READ_TOTAL).increment(1);

        let trimmed = line.trim();
        if trimmed.is_empty() {
            return;
        }

        let (record, format) = self.normalizer.normalize_tagged(trimmed);
        metrics::counter!(m::LOG_PIPELINE_RECORDS_TOTAL, m::LABEL_LINE_FORMAT => format.as_str())
            .increment(1);
        report.logs.push(record);
    }

    fn reject_line(
        &self,
        report: &mut ParseReport,
        line: usize,
        err: ParseError,
        reporter: &dyn RunReporter,
    ) {
        metrics::counter!(m::LOG_PIPELINE_LINES_READ_TOTAL).increment(1);
        metrics::counter!(m::LOG_PIPELINE_LINE_ERRORS_TOTAL).increment(1);

        let error = LineError {
            line,
            message: err.to_string(),
        };
        reporter.line_failed(&error);
        report.errors.push(error);
    }
}

/// 한 줄을 읽어 앞뒤 ASCII 공백을 뺀 내용의 길이를 돌려줍니다.
///
/// 버퍼에는 내용의 앞부분 `max + 1`바이트까지만 담기고 나머지는 버려지므로
/// 긴 줄도 메모리를 `max`에 비례해서만 사용합니다. 반환값이 `max` 이하이면
/// `buf[..size]`가 줄 내용 전체입니다. 입력이 끝나면 `None`.
fn read_bounded_line<R: BufRead>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    max: usize,
) -> std::io::Result<Option<usize>> {
    buf.clear();
    let mut consumed = false;
    let mut offset = 0usize;
    let mut size = 0usize;

    loop {
        let chunk = match reader.fill_buf() {
            Ok(chunk) => chunk,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if chunk.is_empty() {
            break;
        }
        consumed = true;

        let newline = chunk.iter().position(|&b| b == b'\n');
        let line = &chunk[..newline.unwrap_or(chunk.len())];
        for &b in line {
            let blank = b.is_ascii_whitespace();
            if offset == 0 && blank {
                continue;
            }
            offset += 1;
            if !blank {
                size = offset;
            }
            if buf.len() <= max {
                buf.push(b);
            }
        }

        let used = newline.map_or(chunk.len(), |i| i + 1);
        reader.consume(used);
        if newline.is_some() {
            break;
        }
    }

    Ok(consumed.then_some(size))
}

/// [`LogPipeline`] 빌더
///
/// # 사용 예시
/// ```ignore
/// let pipeline = LogPipelineBuilder::new()
///     .config(PipelineConfig::from_core(&core_config.parser))
///     .build()?;
/// ```
#[derive(Debug, Default)]
pub struct LogPipelineBuilder {
    config: PipelineConfig,
}

impl LogPipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// 파이프라인 설정을 지정합니다.
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// 설정을 검증하고 파이프라인을 생성합니다.
    pub fn build(self) -> Result<LogPipeline, LogPipelineError> {
        self.config.validate()?;

        let normalizer = LineNormalizer::new(self.config.field_mapping())?;
        let detector = MarkerDetector::new(self.config.message_field.clone());

        tracing::debug!(
            message_field = %self.config.message_field,
            max_line_bytes = self.config.max_line_bytes,
            "log pipeline built"
        );

        Ok(LogPipeline {
            config: self.config,
            normalizer,
            detector,
        })
    }
}
