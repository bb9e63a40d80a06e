//! 데이터 수집 오케스트레이션.
//!
//! CSV 캐시와 외부 공급자를 묶어 증분 수집을 수행합니다.
//!
//! # 동작 방식
//!
//! 1. 디스크 캐시에서 기존 시계열 로드
//! 2. 마지막 캐시 날짜부터 오늘까지 공급자에서 가져옴
//! 3. 날짜 기준 병합 후 다시 저장 (기존 이력은 절대 덮어쓰지 않음)
//! 4. 병합된 시계열 반환

use crate::error::{DataError, Result};
use crate::provider::HistoryProvider;
use crate::storage::CsvStorage;
use chrono::{Duration, NaiveDate, Utc};
use minervini_core::{Instrument, Series};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// 캐시 + 증분 수집 데이터 관리자.
#[derive(Clone)]
pub struct DataManager {
    storage: CsvStorage,
    provider: Arc<dyn HistoryProvider>,
}

impl DataManager {
    /// 새 데이터 관리자를 생성합니다.
    pub fn new(storage: CsvStorage, provider: Arc<dyn HistoryProvider>) -> Self {
        Self { storage, provider }
    }

    /// 종목 시계열을 최신 상태로 갱신합니다.
    ///
    /// 캐시가 없으면 `lookback_days` 만큼 과거부터 전체를 가져오고,
    /// 캐시가 있으면 마지막 봉 날짜부터 증분으로 가져옵니다. 마지막
    /// 봉 날짜 자체도 다시 요청하여 장중 수정치를 반영합니다.
    ///
    /// 수집이 실패해도 캐시에 봉이 있으면 경고 후 캐시를 반환합니다.
    /// 캐시도 비어 있으면 오류를 전파하며, 호출자는 해당 종목만
    /// 건너뛰고 실행을 계속해야 합니다.
    #[instrument(skip(self), fields(ticker = %instrument.ticker))]
    pub async fn refresh(&self, instrument: &Instrument, lookback_days: i64) -> Result<Series> {
        let ticker = &instrument.ticker;
        let today = Utc::now().date_naive();

        let mut series = match self.storage.load_series(ticker) {
            Ok(series) => series,
            Err(DataError::NotFound(_)) => Series::new(ticker),
            Err(e) => return Err(e),
        };

        let start = series
            .latest_date()
            .unwrap_or_else(|| today - Duration::days(lookback_days));

        match self.provider.fetch(ticker, start, today).await {
            Ok(bars) => {
                let fetched = bars.len();
                let total = series.upsert(bars);
                self.storage.save_series(&series)?;
                info!(fetched = fetched, total = total, "시계열 갱신 완료");
                Ok(series)
            }
            Err(e) if !series.is_empty() => {
                warn!(error = %e, bars = series.len(), "수집 실패, 캐시 사용");
                Ok(series)
            }
            Err(e) => Err(e),
        }
    }

    /// 캐시에서만 시계열을 로드합니다 (수집 없음).
    pub fn load_cached(&self, ticker: &str) -> Result<Series> {
        self.storage.load_series(ticker)
    }

    /// 지정 기간을 가져와 캐시에 병합 저장합니다.
    ///
    /// 일회성 다운로드 명령에서 사용합니다.
    #[instrument(skip(self))]
    pub async fn download_range(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Series> {
        let bars = self.provider.fetch(ticker, start, end).await?;
        debug!(ticker = ticker, bars = bars.len(), "기간 다운로드");

        let mut series = match self.storage.load_series(ticker) {
            Ok(series) => series,
            Err(DataError::NotFound(_)) => Series::new(ticker),
            Err(e) => return Err(e),
        };
        series.upsert(bars);
        self.storage.save_series(&series)?;
        Ok(series)
    }

    /// 내부 저장소 핸들을 반환합니다.
    pub fn storage(&self) -> &CsvStorage {
        &self.storage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use minervini_core::PriceBar;
    use rust_decimal_macros::dec;
    use std::sync::Mutex;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// 호출 기록을 남기는 고정 응답 공급자.
    struct FakeProvider {
        bars: Vec<PriceBar>,
        fail: bool,
        calls: Mutex<Vec<(String, NaiveDate, NaiveDate)>>,
    }

    impl FakeProvider {
        fn returning(bars: Vec<PriceBar>) -> Self {
            Self {
                bars,
                fail: false,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                bars: Vec::new(),
                fail: true,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl HistoryProvider for FakeProvider {
        async fn fetch(
            &self,
            ticker: &str,
            start: NaiveDate,
            end: NaiveDate,
        ) -> Result<Vec<PriceBar>> {
            self.calls
                .lock()
                .unwrap()
                .push((ticker.to_string(), start, end));
            if self.fail {
                Err(DataError::FetchError("offline".to_string()))
            } else {
                Ok(self.bars.clone())
            }
        }
    }

    #[tokio::test]
    async fn test_refresh_merges_and_saves() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = CsvStorage::new(tmp.path());
        storage
            .save_series(&Series::from_bars(
                "AAPL",
                vec![PriceBar::new(date(2024, 1, 2), dec!(185))],
            ))
            .unwrap();

        let provider = Arc::new(FakeProvider::returning(vec![
            PriceBar::new(date(2024, 1, 2), dec!(185.5)),
            PriceBar::new(date(2024, 1, 3), dec!(186)),
        ]));
        let manager = DataManager::new(storage.clone(), provider.clone());

        let series = manager
            .refresh(&Instrument::stock("AAPL"), 730)
            .await
            .unwrap();

        // 마지막 캐시 날짜부터 증분 요청
        let calls = provider.calls.lock().unwrap();
        assert_eq!(calls[0].1, date(2024, 1, 2));

        // 수정치 반영 + 새 봉 추가, 디스크에도 반영
        assert_eq!(series.len(), 2);
        assert_eq!(series.get(date(2024, 1, 2)).unwrap().close, dec!(185.5));
        assert_eq!(storage.load_series("AAPL").unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_refresh_falls_back_to_cache_on_fetch_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = CsvStorage::new(tmp.path());
        storage
            .save_series(&Series::from_bars(
                "AAPL",
                vec![PriceBar::new(date(2024, 1, 2), dec!(185))],
            ))
            .unwrap();

        let manager = DataManager::new(storage, Arc::new(FakeProvider::failing()));
        let series = manager
            .refresh(&Instrument::stock("AAPL"), 730)
            .await
            .unwrap();
        assert_eq!(series.len(), 1);
    }

    #[tokio::test]
    async fn test_refresh_propagates_failure_without_cache() {
        let tmp = tempfile::tempdir().unwrap();
        let manager = DataManager::new(
            CsvStorage::new(tmp.path()),
            Arc::new(FakeProvider::failing()),
        );
        let result = manager.refresh(&Instrument::stock("GONE"), 730).await;
        assert!(matches!(result, Err(DataError::FetchError(_))));
    }
}
