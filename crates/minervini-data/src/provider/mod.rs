//! 외부 가격 이력 공급자.
//!
//! 공급자는 순수한 수집 어댑터입니다. 재시도/백오프와 부분 실패 허용은
//! 호출자(`DataManager`와 CLI)의 책임이며, 한 종목의 실패가 다른 종목의
//! 처리를 중단시키지 않습니다.

pub mod yahoo;

use crate::error::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use minervini_core::PriceBar;

pub use yahoo::YahooProvider;

/// 일봉 가격 이력 공급자 인터페이스.
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    /// 지정 기간의 일봉을 가져옵니다 (날짜 오름차순).
    async fn fetch(&self, ticker: &str, start: NaiveDate, end: NaiveDate)
        -> Result<Vec<PriceBar>>;
}
