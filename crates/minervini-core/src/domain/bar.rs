//! 일봉 가격 데이터와 시계열.
//!
//! - `PriceBar` - 하루치 가격 봉 (종가 필수, 나머지 선택)
//! - `Series` - 한 종목의 날짜 오름차순 일봉 시계열

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 하루치 가격 봉.
///
/// 종가만 필수이며, 한 종목에는 날짜당 하나의 봉만 존재합니다.
/// 기록된 봉은 불변이고, 같은 날짜가 다시 수집되면 나중 값이 이깁니다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// 날짜
    pub date: NaiveDate,
    /// 시가
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open: Option<Decimal>,
    /// 고가
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high: Option<Decimal>,
    /// 저가
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low: Option<Decimal>,
    /// 종가
    pub close: Decimal,
    /// 거래량
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<Decimal>,
}

impl PriceBar {
    /// 종가만으로 봉을 생성합니다.
    pub fn new(date: NaiveDate, close: Decimal) -> Self {
        Self {
            date,
            open: None,
            high: None,
            low: None,
            close,
            volume: None,
        }
    }

    /// OHLCV 전체 필드로 봉을 생성합니다.
    pub fn with_ohlcv(
        date: NaiveDate,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: Decimal,
    ) -> Self {
        Self {
            date,
            open: Some(open),
            high: Some(high),
            low: Some(low),
            close,
            volume: Some(volume),
        }
    }
}

/// 한 종목의 일봉 시계열.
///
/// 봉은 항상 날짜 오름차순으로 정렬되어 있고 중복 날짜가 없습니다.
/// 이 불변식은 모든 수집 경로가 `upsert`를 통과하면서 유지됩니다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Series {
    /// 티커
    pub ticker: String,
    /// 날짜 오름차순 봉 목록
    bars: Vec<PriceBar>,
}

impl Series {
    /// 빈 시계열을 생성합니다.
    pub fn new(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into().to_uppercase(),
            bars: Vec::new(),
        }
    }

    /// 봉 목록으로 시계열을 생성합니다.
    ///
    /// 입력 순서와 무관하게 날짜 기준으로 중복 제거 후 정렬됩니다.
    pub fn from_bars(ticker: impl Into<String>, bars: Vec<PriceBar>) -> Self {
        let mut series = Self::new(ticker);
        series.upsert(bars);
        series
    }

    /// 새 봉들을 병합합니다.
    ///
    /// 날짜 기준으로 중복을 제거하며 같은 날짜는 나중 값이 이깁니다.
    /// 병합 후 항상 날짜 오름차순으로 재정렬되므로, 순서가 어긋난
    /// 입력이 들어와도 손상된 순서가 하류로 전파되지 않습니다.
    ///
    /// # 반환
    /// 병합 후 전체 봉 수
    pub fn upsert(&mut self, new_bars: Vec<PriceBar>) -> usize {
        let mut by_date: BTreeMap<NaiveDate, PriceBar> = BTreeMap::new();
        for bar in self.bars.drain(..) {
            by_date.insert(bar.date, bar);
        }
        for bar in new_bars {
            by_date.insert(bar.date, bar);
        }
        self.bars = by_date.into_values().collect();
        self.bars.len()
    }

    /// 봉 목록을 반환합니다 (날짜 오름차순).
    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    /// 종가 목록을 반환합니다 (날짜 오름차순).
    pub fn closes(&self) -> Vec<Decimal> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// 특정 날짜의 봉을 조회합니다.
    pub fn get(&self, date: NaiveDate) -> Option<&PriceBar> {
        self.bars
            .binary_search_by_key(&date, |b| b.date)
            .ok()
            .map(|i| &self.bars[i])
    }

    /// 가장 최근 봉의 날짜를 반환합니다.
    pub fn latest_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }

    /// 가장 오래된 봉의 날짜를 반환합니다.
    pub fn earliest_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    /// 봉 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// 봉이 하나도 없는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}
