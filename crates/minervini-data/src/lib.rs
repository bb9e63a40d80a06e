//! # Minervini Data
//!
//! 시계열 저장소와 가격 이력 수집을 제공합니다.
//!
//! - `SeriesStore` - 종목별 일봉 시계열 인메모리 저장소
//! - `CsvStorage` - 종목당 CSV 파일 하나로 시계열을 영속화
//! - `HistoryProvider` / `YahooProvider` - 외부 가격 이력 공급자
//! - `DataManager` - 캐시 + 증분 수집 + 병합 저장 오케스트레이션

pub mod error;
pub mod manager;
pub mod provider;
pub mod storage;
pub mod store;

pub use error::{DataError, Result};
pub use manager::DataManager;
pub use provider::{HistoryProvider, YahooProvider};
pub use storage::CsvStorage;
pub use store::SeriesStore;
