//! 도메인 모델.
//!
//! 스크리너가 다루는 핵심 개념을 정의합니다:
//! - `Instrument` / `AssetClass` - 종목과 자산 유형
//! - `PriceBar` / `Series` - 일봉 데이터와 시계열
//! - `Classification` - 트렌드 템플릿 분류 결과

pub mod asset;
pub mod bar;
pub mod classification;

pub use asset::*;
pub use bar::*;
pub use classification::*;
