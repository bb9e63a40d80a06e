//! 렌더링 어댑터용 보고서 뷰.
//!
//! 차트 래스터화나 HTML 템플릿 엔진은 이 크레이트의 몫이 아닙니다.
//! 여기서는 외부 렌더러가 그대로 소비할 수 있는 직렬화 가능한 데이터
//! 구조만 만듭니다.
//!
//! # 제공 뷰
//!
//! - 일자별 분류 개수 라인 차트 데이터
//! - 2상태 평균 점수 라인 차트 데이터
//! - 행=종목, 열=날짜(최신 우선)의 피벗 분류 테이블

use chrono::NaiveDate;
use minervini_core::Classification;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::aggregate::{BreadthRow, ClassificationSeries, DateWindow, SentimentRow};

/// 차트 데이터 포인트.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartPoint {
    /// X축 값 (자정 UTC 기준 타임스탬프, 밀리초)
    pub x: i64,
    /// Y축 값
    pub y: Decimal,
}

impl ChartPoint {
    /// 날짜와 값으로 포인트를 생성합니다.
    pub fn new(date: NaiveDate, value: Decimal) -> Self {
        let millis = date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp_millis())
            .unwrap_or_default();
        Self { x: millis, y: value }
    }
}

/// 분류별 개수 라인 차트 데이터.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreadthChartData {
    /// 5점 종목 수 시계열
    pub pass: Vec<ChartPoint>,
    /// 4점 종목 수 시계열
    pub borderline: Vec<ChartPoint>,
    /// 3점 이하 종목 수 시계열
    pub fail: Vec<ChartPoint>,
    /// 판정 불가 종목 수 시계열
    pub unknown: Vec<ChartPoint>,
}

impl BreadthChartData {
    /// 집계 행에서 차트 데이터를 만듭니다.
    pub fn from_rows(rows: &[BreadthRow]) -> Self {
        let point = |date: NaiveDate, count: usize| {
            ChartPoint::new(date, Decimal::from(count as u64))
        };
        Self {
            pass: rows.iter().map(|r| point(r.date, r.pass)).collect(),
            borderline: rows.iter().map(|r| point(r.date, r.borderline)).collect(),
            fail: rows.iter().map(|r| point(r.date, r.fail)).collect(),
            unknown: rows.iter().map(|r| point(r.date, r.unknown)).collect(),
        }
    }
}

/// 2상태 평균 점수 라인 차트 데이터.
///
/// 표본이 없는 날짜는 포인트를 만들지 않습니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentChartData {
    /// 평균 점수 시계열 (-1 ~ +1)
    pub mean: Vec<ChartPoint>,
}

impl SentimentChartData {
    /// 집계 행에서 차트 데이터를 만듭니다.
    pub fn from_rows(rows: &[SentimentRow]) -> Self {
        Self {
            mean: rows
                .iter()
                .filter_map(|r| r.mean.map(|m| ChartPoint::new(r.date, m)))
                .collect(),
        }
    }
}

/// 피벗 테이블의 한 행 (종목 하나).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PivotRow {
    /// 티커
    pub ticker: String,
    /// 가장 최근 날짜의 분류 (정렬 키)
    pub latest: Classification,
    /// 날짜 열과 같은 순서의 분류 (최신 우선)
    pub cells: Vec<Classification>,
}

/// 행=종목, 열=날짜의 피벗 분류 테이블.
///
/// 날짜 열은 최신 우선으로 정렬되고, 행은 가장 최근 날짜의 분류
/// 오름차순(pass < borderline < fail < unknown), 동순위는 티커순으로
/// 정렬됩니다. 셀은 strict 조회입니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PivotTable {
    /// 날짜 열 (최신 우선)
    pub dates: Vec<NaiveDate>,
    /// 종목 행 (분류 오름차순)
    pub rows: Vec<PivotRow>,
}

impl PivotTable {
    /// 유니버스와 윈도우에서 피벗 테이블을 만듭니다.
    pub fn build(
        universe: &BTreeMap<String, ClassificationSeries>,
        window: &DateWindow,
    ) -> Self {
        let dates: Vec<NaiveDate> = {
            let mut days: Vec<NaiveDate> = window.days().collect();
            days.reverse();
            days
        };

        let mut rows: Vec<PivotRow> = universe
            .iter()
            .map(|(ticker, series)| {
                let cells: Vec<Classification> = dates
                    .iter()
                    .map(|&date| {
                        series
                            .at(date)
                            .map(|day| day.classification)
                            .unwrap_or(Classification::Unknown)
                    })
                    .collect();
                let latest = cells.first().copied().unwrap_or(Classification::Unknown);
                PivotRow {
                    ticker: ticker.clone(),
                    latest,
                    cells,
                }
            })
            .collect();

        rows.sort_by(|a, b| a.latest.cmp(&b.latest).then(a.ticker.cmp(&b.ticker)));

        Self { dates, rows }
    }
}
