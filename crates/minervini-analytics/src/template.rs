//! 트렌드 템플릿 채점.
//!
//! 종목 시계열의 각 날짜에 대해 5개 기준의 만족 개수(0~5점)를
//! 계산합니다.
//!
//! # 기준 (각 1점)
//!
//! 1. SMA50 > SMA150 이고 SMA50 > SMA200
//! 2. SMA150 > SMA200
//! 3. 종가가 세 이동평균 모두 위
//! 4. 종가 > 52주 최저가 × 1.30
//! 5. 종가 ≥ 52주 최고가 × 0.75
//!
//! 다섯 지표 값 중 하나라도 미정이면 그 날짜의 점수는 미정입니다.

use chrono::NaiveDate;
use minervini_core::{AssetClass, CalendarMode, Series, WindowConfig};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::indicators::{IndicatorResult, TrendIndicators};

/// 52주 최저가 기준 배수 (기준 4).
const LOW_MULTIPLIER: Decimal = dec!(1.30);
/// 52주 최고가 기준 배수 (기준 5).
const HIGH_MULTIPLIER: Decimal = dec!(0.75);

/// 지표 윈도우 길이. 설정 구조체를 그대로 사용합니다.
pub type TemplateWindows = WindowConfig;

/// 자산 유형과 캘린더 모드에 맞는 실효 윈도우를 반환합니다.
///
/// `CalendarScaled` 모드에서 매일 거래되는 자산(암호화폐/외환)은
/// 거래일 윈도우를 365/252 배율로 환산한 달력일 윈도우를 사용합니다.
/// 그 외에는 설정값을 그대로 사용합니다.
pub fn effective_windows(
    base: &WindowConfig,
    asset_class: AssetClass,
    mode: CalendarMode,
) -> WindowConfig {
    match mode {
        CalendarMode::CalendarScaled if asset_class.trades_every_day() => base.calendar_scaled(),
        _ => *base,
    }
}

/// 하루치 지표 값과 점수.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateRow {
    /// 날짜
    pub date: NaiveDate,
    /// 종가
    pub close: Decimal,
    /// 단기 이동평균
    pub sma_short: Option<Decimal>,
    /// 중기 이동평균
    pub sma_mid: Option<Decimal>,
    /// 장기 이동평균
    pub sma_long: Option<Decimal>,
    /// 구간 최저가
    pub low_n: Option<Decimal>,
    /// 구간 최고가
    pub high_n: Option<Decimal>,
    /// 만족 기준 수 (지표 미정 시 None)
    pub score: Option<u8>,
}

/// 하루치 점수를 계산합니다.
///
/// 다섯 지표 값이 모두 정의된 경우에만 점수가 나오며, 결과는 항상
/// [0, 5] 범위입니다.
pub fn score_row(
    close: Decimal,
    sma_short: Option<Decimal>,
    sma_mid: Option<Decimal>,
    sma_long: Option<Decimal>,
    low_n: Option<Decimal>,
    high_n: Option<Decimal>,
) -> Option<u8> {
    let (s, m, l) = (sma_short?, sma_mid?, sma_long?);
    let (low, high) = (low_n?, high_n?);

    let criteria = [
        s > m && s > l,
        m > l,
        close > s && close > m && close > l,
        close > low * LOW_MULTIPLIER,
        close >= high * HIGH_MULTIPLIER,
    ];

    Some(criteria.iter().filter(|&&c| c).count() as u8)
}

/// 트렌드 템플릿 계산기.
///
/// 시계열 하나를 받아 봉마다 하나씩, 같은 순서의 `TemplateRow`를
/// 생성합니다. 교차 호출 상태가 없으므로 종목 간 병렬 계산이
/// 가능합니다.
#[derive(Debug, Default)]
pub struct TemplateCalculator {
    indicators: TrendIndicators,
}

impl TemplateCalculator {
    /// 새 계산기를 생성합니다.
    pub fn new() -> Self {
        Self::default()
    }

    /// 시계열 전체의 지표와 점수를 계산합니다.
    ///
    /// 봉이 `windows.extrema`개 미만이면 모든 행의 점수가 None이
    /// 됩니다 (`InsufficientHistory`). 이는 오류가 아니라 집계에서
    /// 제외되는 정상 상태입니다.
    pub fn compute(
        &self,
        series: &Series,
        windows: &TemplateWindows,
    ) -> IndicatorResult<Vec<TemplateRow>> {
        let closes = series.closes();

        let sma_short = self.indicators.sma(&closes, windows.short)?;
        let sma_mid = self.indicators.sma(&closes, windows.mid)?;
        let sma_long = self.indicators.sma(&closes, windows.long)?;
        let low_n = self.indicators.rolling_min(&closes, windows.extrema)?;
        let high_n = self.indicators.rolling_max(&closes, windows.extrema)?;

        let rows = series
            .bars()
            .iter()
            .enumerate()
            .map(|(i, bar)| TemplateRow {
                date: bar.date,
                close: bar.close,
                sma_short: sma_short[i],
                sma_mid: sma_mid[i],
                sma_long: sma_long[i],
                low_n: low_n[i],
                high_n: high_n[i],
                score: score_row(
                    bar.close,
                    sma_short[i],
                    sma_mid[i],
                    sma_long[i],
                    low_n[i],
                    high_n[i],
                ),
            })
            .collect();

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use minervini_core::PriceBar;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn daily_series(ticker: &str, start: NaiveDate, closes: &[Decimal]) -> Series {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                PriceBar::new(start + chrono::Duration::days(i as i64), close)
            })
            .collect();
        Series::from_bars(ticker, bars)
    }

    #[test]
    fn test_score_undefined_when_indicator_missing() {
        let score = score_row(
            dec!(100),
            Some(dec!(90)),
            Some(dec!(80)),
            Some(dec!(70)),
            None,
            Some(dec!(110)),
        );
        assert_eq!(score, None);
    }

    #[test]
    fn test_score_range() {
        // 모든 기준 만족
        let all = score_row(
            dec!(100),
            Some(dec!(95)),
            Some(dec!(90)),
            Some(dec!(85)),
            Some(dec!(60)),
            Some(dec!(100)),
        );
        assert_eq!(all, Some(5));

        // 모든 기준 불만족 (하락 배열, 고점 대비 급락)
        let none = score_row(
            dec!(10),
            Some(dec!(50)),
            Some(dec!(60)),
            Some(dec!(70)),
            Some(dec!(10)),
            Some(dec!(100)),
        );
        assert_eq!(none, Some(0));
    }

    #[test]
    fn test_constant_series_scores_one() {
        // 종가가 252일 내내 100.0으로 일정하면:
        // 이동평균이 전부 같아 기준 1~3의 순부등호가 성립하지 않고,
        // low=high=100 이라 기준 4(100 > 130)도 실패,
        // 기준 5(100 >= 75)만 성립하여 점수는 1.
        let windows = TemplateWindows {
            short: 50,
            mid: 150,
            long: 200,
            extrema: 252,
        };
        let closes = vec![dec!(100.0); 252];
        let series = daily_series("FLAT", date(2023, 1, 1), &closes);

        let rows = TemplateCalculator::new().compute(&series, &windows).unwrap();

        assert_eq!(rows.len(), 252);
        // 마지막 행에서만 extrema 윈도우가 채워짐
        let last = rows.last().unwrap();
        assert_eq!(last.sma_short, Some(dec!(100.0)));
        assert_eq!(last.low_n, Some(dec!(100.0)));
        assert_eq!(last.high_n, Some(dec!(100.0)));
        assert_eq!(last.score, Some(1));
        // 그 이전 행은 전부 미정
        assert!(rows[..251].iter().all(|r| r.score.is_none()));
    }

    #[test]
    fn test_monotonic_rise_scores_five() {
        // 260일 동안 단조 상승하면 마지막 날에는 이동평균이 상승
        // 배열이고 종가가 역사적 고점이므로 5점.
        let windows = TemplateWindows::default();
        let closes: Vec<Decimal> = (0..260).map(|i| dec!(50) + Decimal::from(i)).collect();
        let series = daily_series("UP", date(2023, 1, 1), &closes);

        let rows = TemplateCalculator::new().compute(&series, &windows).unwrap();
        let last = rows.last().unwrap();

        assert_eq!(last.score, Some(5));
        assert!(last.sma_short.unwrap() > last.sma_mid.unwrap());
        assert!(last.sma_mid.unwrap() > last.sma_long.unwrap());
        assert_eq!(last.high_n, Some(last.close));
    }

    #[test]
    fn test_short_history_all_undefined() {
        let windows = TemplateWindows::default();
        let closes = vec![dec!(100); 100];
        let series = daily_series("SHORT", date(2024, 1, 1), &closes);

        let rows = TemplateCalculator::new().compute(&series, &windows).unwrap();
        assert!(rows.iter().all(|r| r.score.is_none()));
    }

    #[test]
    fn test_effective_windows_scaling() {
        let base = WindowConfig::default();

        let crypto_scaled = effective_windows(
            &base,
            AssetClass::Crypto,
            CalendarMode::CalendarScaled,
        );
        assert_eq!(crypto_scaled.extrema, 365);

        // 주식은 환산 모드여도 거래일 윈도우 유지
        let stock_scaled =
            effective_windows(&base, AssetClass::Stock, CalendarMode::CalendarScaled);
        assert_eq!(stock_scaled.extrema, 252);

        // 기본 모드에서는 아무도 환산하지 않음
        let crypto_plain =
            effective_windows(&base, AssetClass::Crypto, CalendarMode::TradingDays);
        assert_eq!(crypto_plain.extrema, 252);
    }
}
