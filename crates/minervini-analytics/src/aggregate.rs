//! 유니버스 전체의 일자별 분류 집계 (breadth).
//!
//! 종목별 분류 시계열을 달력일 윈도우 위에 굴려 일자별 분류 개수
//! (또는 2상태 평균)를 만듭니다. 집계는 입력의 순수 함수이며, 같은
//! 저장소 내용과 윈도우로 두 번 실행하면 결과가 같습니다.

use chrono::{Duration, NaiveDate};
use minervini_core::{sentiment, Classification, FillMode};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::template::TemplateRow;

/// 하루치 점수와 분류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredDay {
    /// 만족 기준 수 (0~5)
    pub score: u8,
    /// 점수에서 파생된 분류
    pub classification: Classification,
}

/// 한 종목의 일자별 분류 시계열.
///
/// 점수가 정의된 날짜만 보관합니다. 봉이 없거나 지표가 미정인 날짜는
/// 조회 시점에 결측으로 처리됩니다.
#[derive(Debug, Clone, Default)]
pub struct ClassificationSeries {
    /// 티커
    pub ticker: String,
    days: BTreeMap<NaiveDate, ScoredDay>,
}

impl ClassificationSeries {
    /// 템플릿 행에서 분류 시계열을 만듭니다.
    ///
    /// 점수가 미정인 행은 버립니다.
    pub fn from_rows(ticker: impl Into<String>, rows: &[TemplateRow]) -> Self {
        let days = rows
            .iter()
            .filter_map(|row| {
                row.score.map(|score| {
                    (
                        row.date,
                        ScoredDay {
                            score,
                            classification: Classification::from_score(score),
                        },
                    )
                })
            })
            .collect();

        Self {
            ticker: ticker.into(),
            days,
        }
    }

    /// 정확히 해당 날짜의 값을 조회합니다 (strict).
    pub fn at(&self, date: NaiveDate) -> Option<&ScoredDay> {
        self.days.get(&date)
    }

    /// carry-forward 조회.
    ///
    /// 해당 날짜 이전(포함)의 가장 최근 값을 반환하고, 첫 값 이전
    /// 구간은 첫 값으로 채웁니다. 시계열이 비어 있으면 None입니다.
    pub fn at_filled(&self, date: NaiveDate) -> Option<&ScoredDay> {
        self.days
            .range(..=date)
            .next_back()
            .map(|(_, day)| day)
            .or_else(|| self.days.values().next())
    }

    /// 결측 처리 모드에 따른 조회.
    pub fn lookup(&self, date: NaiveDate, fill: FillMode) -> Option<&ScoredDay> {
        match fill {
            FillMode::Strict => self.at(date),
            FillMode::CarryForward => self.at_filled(date),
        }
    }

    /// 정의된 날짜 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    /// 정의된 날짜가 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// 달력일 기준 집계 윈도우 (양끝 포함).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    /// 시작일 (포함)
    pub start: NaiveDate,
    /// 종료일 (포함)
    pub end: NaiveDate,
}

impl DateWindow {
    /// 시작/종료일로 윈도우를 생성합니다.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// 종료일에서 `days`일 거슬러 올라가는 윈도우를 생성합니다.
    ///
    /// 종료일 포함 `days`개의 달력일을 덮습니다 (기본 30, 대안 180).
    pub fn trailing(days: i64, end: NaiveDate) -> Self {
        Self {
            start: end - Duration::days(days.max(1) - 1),
            end,
        }
    }

    /// 윈도우의 모든 달력일을 순서대로 반환합니다.
    ///
    /// 거래일 여부와 무관하게 모든 날짜가 포함됩니다.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let mut current = self.start;
        let end = self.end;
        std::iter::from_fn(move || {
            if current > end {
                None
            } else {
                let date = current;
                current += Duration::days(1);
                Some(date)
            }
        })
    }

    /// 윈도우가 덮는 달력일 수를 반환합니다.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// 일자별 분류 개수.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreadthRow {
    /// 날짜
    pub date: NaiveDate,
    /// 5점 종목 수
    pub pass: usize,
    /// 4점 종목 수
    pub borderline: usize,
    /// 3점 이하 종목 수
    pub fail: usize,
    /// 판정 불가 종목 수
    pub unknown: usize,
}

/// 일자별 2상태 평균 점수.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentRow {
    /// 날짜
    pub date: NaiveDate,
    /// ±1 점수의 평균 (표본 없으면 None)
    pub mean: Option<Decimal>,
    /// 평균에 포함된 종목 수
    pub samples: usize,
}

/// 유니버스 분류 집계기.
#[derive(Debug, Default)]
pub struct BreadthAggregator;

impl BreadthAggregator {
    /// 새 집계기를 생성합니다.
    pub fn new() -> Self {
        Self
    }

    /// 윈도우의 모든 날짜에 대해 분류별 종목 수를 셉니다.
    pub fn counts(
        &self,
        universe: &BTreeMap<String, ClassificationSeries>,
        window: &DateWindow,
        fill: FillMode,
    ) -> Vec<BreadthRow> {
        let rows: Vec<BreadthRow> = window
            .days()
            .map(|date| {
                let mut row = BreadthRow {
                    date,
                    pass: 0,
                    borderline: 0,
                    fail: 0,
                    unknown: 0,
                };
                for series in universe.values() {
                    match series
                        .lookup(date, fill)
                        .map(|day| day.classification)
                        .unwrap_or(Classification::Unknown)
                    {
                        Classification::Pass => row.pass += 1,
                        Classification::Borderline => row.borderline += 1,
                        Classification::Fail => row.fail += 1,
                        Classification::Unknown => row.unknown += 1,
                    }
                }
                row
            })
            .collect();

        debug!(
            instruments = universe.len(),
            days = rows.len(),
            "breadth 집계 완료"
        );
        rows
    }

    /// 윈도우의 모든 날짜에 대해 2상태 평균 점수를 계산합니다.
    ///
    /// 5점 → +1, 그 외 → -1 로 사상한 뒤 점수가 정의된 종목에 대해
    /// 평균을 냅니다. 정의된 종목이 없으면 평균은 None입니다.
    pub fn sentiment(
        &self,
        universe: &BTreeMap<String, ClassificationSeries>,
        window: &DateWindow,
        fill: FillMode,
    ) -> Vec<SentimentRow> {
        window
            .days()
            .map(|date| {
                let mut sum: i64 = 0;
                let mut samples: usize = 0;
                for series in universe.values() {
                    if let Some(day) = series.lookup(date, fill) {
                        sum += i64::from(sentiment(day.score));
                        samples += 1;
                    }
                }
                let mean = (samples > 0)
                    .then(|| Decimal::from(sum) / Decimal::from(samples as u64));
                SentimentRow {
                    date,
                    mean,
                    samples,
                }
            })
            .collect()
    }

    /// 이름 붙은 그룹 소속 종목만으로 분류 개수를 셉니다.
    ///
    /// 유니버스에 없는 그룹 구성원은 분류 시계열이 없는 종목과
    /// 동일하게 unknown으로 집계됩니다.
    pub fn counts_for_group(
        &self,
        universe: &BTreeMap<String, ClassificationSeries>,
        members: &[String],
        window: &DateWindow,
        fill: FillMode,
    ) -> Vec<BreadthRow> {
        let subset = Self::subset(universe, members);
        self.counts(&subset, window, fill)
    }

    /// 이름 붙은 그룹 소속 종목만으로 2상태 평균을 계산합니다.
    pub fn sentiment_for_group(
        &self,
        universe: &BTreeMap<String, ClassificationSeries>,
        members: &[String],
        window: &DateWindow,
        fill: FillMode,
    ) -> Vec<SentimentRow> {
        let subset = Self::subset(universe, members);
        self.sentiment(&subset, window, fill)
    }

    fn subset(
        universe: &BTreeMap<String, ClassificationSeries>,
        members: &[String],
    ) -> BTreeMap<String, ClassificationSeries> {
        members
            .iter()
            .map(|ticker| {
                let series = universe
                    .get(ticker)
                    .cloned()
                    .unwrap_or_else(|| ClassificationSeries {
                        ticker: ticker.clone(),
                        ..Default::default()
                    });
                (ticker.clone(), series)
            })
            .collect()
    }
}
