//! 기술적 지표 모듈.
//!
//! 트렌드 템플릿이 필요로 하는 후행 집계만 제공합니다:
//! - **SMA**: 단순 이동평균
//! - **rolling min/max**: 구간 최저/최고 (52주 고저)
//!
//! 모든 지표는 엄격한 전체-윈도우 정책을 따릅니다: 인덱스 `i`의 값은
//! `i + 1 >= period` 일 때만 정의되며, 부분 윈도우 평균은 없습니다.

pub mod trend;

use thiserror::Error;

pub use trend::TrendIndicators;

/// 지표 계산 오류.
#[derive(Debug, Error)]
pub enum IndicatorError {
    /// 잘못된 파라미터
    #[error("잘못된 파라미터: {0}")]
    InvalidParameter(String),
}

/// 지표 계산 결과 타입.
pub type IndicatorResult<T> = Result<T, IndicatorError>;
