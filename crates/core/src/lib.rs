#![doc = include_str!("../README.md")]

pub mod config;
pub mod error;
pub mod metrics;
pub mod pipeline;
pub mod types;

// --- 주요 타입 re-export ---
// 각 모듈의 핵심 타입을 크레이트 루트에서 바로 사용할 수 있도록 합니다.

// 에러
pub use error::{ConfigError, ParseError, TflensError};

// 설정
pub use config::TflensConfig;

// 실행 리포터 trait
pub use pipeline::{RunReporter, RunSummary, TracingReporter};

// 도메인 타입
pub use types::{
    Level, LineError, ParseOutcome, ParseReport, Record, Section, SectionKind,
};
