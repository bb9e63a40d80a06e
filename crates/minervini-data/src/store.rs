//! 종목별 시계열 인메모리 저장소.
//!
//! 한 번의 실행 동안 모든 `Series`의 소유권을 가지는 단일 저장소입니다.
//! 종목 간 불변식은 강제하지 않습니다 - 종목마다 날짜 범위와 거래
//! 캘린더가 다를 수 있습니다 (암호화폐는 모든 달력일, 주식은 영업일).

use crate::error::{DataError, Result};
use chrono::NaiveDate;
use minervini_core::Series;
use std::collections::HashMap;

/// 티커 → 시계열 맵.
#[derive(Debug, Default)]
pub struct SeriesStore {
    series: HashMap<String, Series>,
}

impl SeriesStore {
    /// 빈 저장소를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 종목의 시계열을 조회합니다.
    pub fn get(&self, ticker: &str) -> Result<&Series> {
        self.series
            .get(ticker)
            .ok_or_else(|| DataError::NotFound(ticker.to_string()))
    }

    /// 시계열 전체를 교체 삽입합니다.
    pub fn insert_series(&mut self, series: Series) {
        self.series.insert(series.ticker.clone(), series);
    }

    /// 전체 유니버스에서 가장 최근 봉 날짜를 반환합니다.
    ///
    /// 점수 유무와 무관한 봉 기준 최댓값이며, 집계 윈도우의 종료일로
    /// 사용됩니다.
    pub fn latest_date_overall(&self) -> Option<NaiveDate> {
        self.series.values().filter_map(|s| s.latest_date()).max()
    }

    /// 저장된 시계열 수를 반환합니다.
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// 저장소가 비어 있는지 확인합니다.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minervini_core::PriceBar;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_get_not_found() {
        let store = SeriesStore::new();
        assert!(matches!(store.get("AAPL"), Err(DataError::NotFound(_))));
    }

    #[test]
    fn test_latest_date_overall_spans_universe() {
        let mut store = SeriesStore::new();
        assert_eq!(store.latest_date_overall(), None);

        store.insert_series(Series::from_bars(
            "AAPL",
            vec![
                PriceBar::new(date(2024, 1, 2), dec!(185)),
                PriceBar::new(date(2024, 1, 3), dec!(186)),
            ],
        ));
        store.insert_series(Series::from_bars(
            "BTC-USD",
            vec![PriceBar::new(date(2024, 1, 5), dec!(44000))],
        ));

        assert_eq!(store.len(), 2);
        assert_eq!(store.latest_date_overall(), Some(date(2024, 1, 5)));
    }

    #[test]
    fn test_insert_series_replaces() {
        let mut store = SeriesStore::new();
        store.insert_series(Series::from_bars(
            "X",
            vec![PriceBar::new(date(2024, 1, 2), dec!(100))],
        ));
        store.insert_series(Series::new("X"));

        assert_eq!(store.len(), 1);
        assert!(store.get("X").unwrap().is_empty());
    }
}
