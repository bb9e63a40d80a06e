//! 종목 및 자산 유형 정의.
//!
//! 이 모듈은 스크리닝 대상 종목 관련 타입을 정의합니다:
//! - `AssetClass` - 자산 유형 (주식, ETF, 암호화폐 등)
//! - `Instrument` - 스크리닝 대상 종목

use serde::{Deserialize, Serialize};
use std::fmt;

/// 자산 유형 분류.
///
/// 자산 유형에 따라 거래 캘린더가 달라집니다. 주식/ETF는 영업일에만,
/// 암호화폐와 외환은 모든 달력일에 봉이 생성됩니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    /// 주식
    Stock,
    /// 상장지수펀드
    Etf,
    /// 암호화폐
    Crypto,
    /// 외환
    Forex,
}

impl AssetClass {
    /// 모든 달력일에 거래되는 자산인지 확인합니다.
    pub fn trades_every_day(&self) -> bool {
        matches!(self, AssetClass::Crypto | AssetClass::Forex)
    }
}

impl Default for AssetClass {
    fn default() -> Self {
        Self::Stock
    }
}

impl fmt::Display for AssetClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetClass::Stock => write!(f, "stock"),
            AssetClass::Etf => write!(f, "etf"),
            AssetClass::Crypto => write!(f, "crypto"),
            AssetClass::Forex => write!(f, "forex"),
        }
    }
}

impl std::str::FromStr for AssetClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stock" => Ok(Self::Stock),
            "etf" => Ok(Self::Etf),
            "crypto" => Ok(Self::Crypto),
            "forex" | "fx" => Ok(Self::Forex),
            _ => Err(format!("Unknown asset class: {}", s)),
        }
    }
}

/// 스크리닝 대상 종목.
///
/// 티커 문자열이 안정적인 식별자이며, 시계열 저장소와 모든 파생 결과가
/// 이 문자열을 키로 사용합니다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instrument {
    /// 티커 (예: AAPL, BTC-USD)
    pub ticker: String,
    /// 표시용 이름 (선택)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// 자산 유형
    #[serde(default)]
    pub asset_class: AssetClass,
}

impl Instrument {
    /// 새 종목을 생성합니다.
    pub fn new(ticker: impl Into<String>, asset_class: AssetClass) -> Self {
        Self {
            ticker: ticker.into().to_uppercase(),
            name: None,
            asset_class,
        }
    }

    /// 주식 종목을 생성합니다.
    pub fn stock(ticker: impl Into<String>) -> Self {
        Self::new(ticker, AssetClass::Stock)
    }

    /// 암호화폐 종목을 생성합니다.
    pub fn crypto(ticker: impl Into<String>) -> Self {
        Self::new(ticker, AssetClass::Crypto)
    }

    /// 표시용 이름을 설정합니다.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ticker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instrument_creation() {
        let inst = Instrument::stock("aapl");
        assert_eq!(inst.ticker, "AAPL");
        assert_eq!(inst.asset_class, AssetClass::Stock);
    }

    #[test]
    fn test_trades_every_day() {
        assert!(AssetClass::Crypto.trades_every_day());
        assert!(AssetClass::Forex.trades_every_day());
        assert!(!AssetClass::Stock.trades_every_day());
        assert!(!AssetClass::Etf.trades_every_day());
    }

    #[test]
    fn test_asset_class_from_str() {
        assert_eq!("crypto".parse::<AssetClass>().unwrap(), AssetClass::Crypto);
        assert_eq!("ETF".parse::<AssetClass>().unwrap(), AssetClass::Etf);
        assert!("bond".parse::<AssetClass>().is_err());
    }
}
