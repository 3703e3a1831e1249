#![doc = include_str!("../README.md")]
//!
//! # 모듈 구성
//!
//! - [`parser`]: 줄 정규화 (JSON 디코딩, 원시 텍스트 휴리스틱, HTTP 본문 디코딩)
//! - [`segmenter`]: plan/apply 마커 감지 및 eager 경계 섹션 분할
//! - [`summary`]: 섹션별 레벨 집계와 시간 범위
//! - [`pipeline`]: 줄 읽기부터 섹션 분할까지의 진입점
//! - [`config`]: 파이프라인 설정 (core 설정 확장)
//! - [`error`]: 도메인 에러 타입
//!
//! # 아키텍처
//!
//! ```text
//! lines -> LineNormalizer -> Vec<Record> -> SectionSegmenter -> Vec<Section>
//!             |                                  |
//!      JSON / raw fallback              MarkerDetector (terraform plan/apply)
//! ```

pub mod config;
pub mod error;
pub mod parser;
pub mod pipeline;
pub mod segmenter;
pub mod summary;

// --- 주요 타입 re-export ---

// 파이프라인
pub use pipeline::{LogPipeline, LogPipelineBuilder, RunOutcome, RunReport};

// 설정
pub use config::{PipelineConfig, PipelineConfigBuilder};

// 에러
pub use error::LogPipelineError;

// 정규화
pub use parser::{JsonFieldMapping, LineFormat, LineNormalizer, RawTextHeuristics};

// 섹션 분할
pub use segmenter::{MarkerDetector, SectionSegmenter, Segmentation};

// 요약
pub use summary::SectionSummary;
