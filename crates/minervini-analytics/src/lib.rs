//! # Minervini Analytics
//!
//! 트렌드 템플릿 채점 파이프라인의 계산 계층입니다.
//!
//! - `indicators` - 이동평균과 구간 고저 계산
//! - `template` - 종목별 일자별 5기준 채점
//! - `aggregate` - 유니버스 전체의 일자별 분류 집계 (breadth)
//! - `snapshot` - 특정 일자의 종목별 분류 조회
//! - `report` - 렌더링 어댑터용 피벗/차트 데이터 뷰
//!
//! 모든 계산은 입력의 순수 함수이며 실행 간 상태를 갖지 않습니다.

pub mod aggregate;
pub mod indicators;
pub mod report;
pub mod snapshot;
pub mod template;

pub use aggregate::{
    BreadthAggregator, BreadthRow, ClassificationSeries, DateWindow, ScoredDay, SentimentRow,
};
pub use indicators::{IndicatorError, IndicatorResult, TrendIndicators};
pub use report::{BreadthChartData, ChartPoint, PivotRow, PivotTable, SentimentChartData};
pub use snapshot::snapshot;
pub use template::{effective_windows, score_row, TemplateCalculator, TemplateRow, TemplateWindows};
