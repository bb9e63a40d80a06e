//! 추세 지표 (Trend Indicators).
//!
//! 이동평균과 구간 고저를 제공합니다.
//! - SMA (Simple Moving Average)
//! - rolling min / rolling max

use rust_decimal::Decimal;

use super::{IndicatorError, IndicatorResult};

/// 추세 지표 계산기.
#[derive(Debug, Default)]
pub struct TrendIndicators;

impl TrendIndicators {
    /// 새로운 추세 지표 계산기 생성.
    pub fn new() -> Self {
        Self
    }

    /// 단순 이동평균 (SMA) 계산.
    ///
    /// SMA = (P1 + P2 + ... + Pn) / n
    ///
    /// 현재 봉과 직전 `period - 1`개 봉의 종가를 사용합니다.
    ///
    /// # 인자
    /// * `prices` - 가격 데이터 (종가, 날짜 오름차순)
    /// * `period` - 이동평균 기간
    ///
    /// # 반환
    /// 입력과 같은 길이의 벡터. 처음 `period - 1`개는 None이며,
    /// 입력이 `period`보다 짧으면 전부 None입니다.
    pub fn sma(
        &self,
        prices: &[Decimal],
        period: usize,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        validate_period(period)?;

        let period_decimal = Decimal::from(period as u64);
        let mut result = Vec::with_capacity(prices.len());

        for i in 0..prices.len() {
            if i + 1 < period {
                result.push(None);
            } else {
                let sum: Decimal = prices[i + 1 - period..=i].iter().sum();
                result.push(Some(sum / period_decimal));
            }
        }

        Ok(result)
    }

    /// 구간 최저가 계산.
    ///
    /// 각 위치에서 현재 봉 포함 직전 `period`개 봉의 최솟값입니다.
    ///
    /// # 반환
    /// 입력과 같은 길이의 벡터. 처음 `period - 1`개는 None.
    pub fn rolling_min(
        &self,
        prices: &[Decimal],
        period: usize,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.rolling_extreme(prices, period, |window| window.iter().min().copied())
    }

    /// 구간 최고가 계산.
    ///
    /// 각 위치에서 현재 봉 포함 직전 `period`개 봉의 최댓값입니다.
    ///
    /// # 반환
    /// 입력과 같은 길이의 벡터. 처음 `period - 1`개는 None.
    pub fn rolling_max(
        &self,
        prices: &[Decimal],
        period: usize,
    ) -> IndicatorResult<Vec<Option<Decimal>>> {
        self.rolling_extreme(prices, period, |window| window.iter().max().copied())
    }

    fn rolling_extreme<F>(
        &self,
        prices: &[Decimal],
        period: usize,
        extreme: F,
    ) -> IndicatorResult<Vec<Option<Decimal>>>
    where
        F: Fn(&[Decimal]) -> Option<Decimal>,
    {
        validate_period(period)?;

        let mut result = Vec::with_capacity(prices.len());
        for i in 0..prices.len() {
            if i + 1 < period {
                result.push(None);
            } else {
                result.push(extreme(&prices[i + 1 - period..=i]));
            }
        }

        Ok(result)
    }
}

fn validate_period(period: usize) -> IndicatorResult<()> {
    if period == 0 {
        return Err(IndicatorError::InvalidParameter(
            "기간은 0보다 커야 합니다".to_string(),
        ));
    }
    Ok(())
}
