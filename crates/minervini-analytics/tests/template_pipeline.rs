//! 템플릿 채점 파이프라인 통합 테스트
//!
//! 가격 시계열 → 지표/점수 → 분류 시계열 → breadth 집계 → 보고서 뷰의
//! 전체 흐름을 검증합니다.

use chrono::{Datelike, Duration, NaiveDate};
use minervini_analytics::{
    snapshot, BreadthAggregator, BreadthChartData, ClassificationSeries, DateWindow, PivotTable,
    TemplateCalculator, TemplateWindows,
};
use minervini_core::{Classification, FillMode, PriceBar, Series};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// 매일 하나씩 봉이 있는 시계열 생성
fn daily_series(ticker: &str, start: NaiveDate, closes: &[Decimal]) -> Series {
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceBar::new(start + Duration::days(i as i64), close))
        .collect();
    Series::from_bars(ticker, bars)
}

fn classify(series: &Series, windows: &TemplateWindows) -> ClassificationSeries {
    let rows = TemplateCalculator::new()
        .compute(series, windows)
        .expect("유효한 윈도우");
    ClassificationSeries::from_rows(series.ticker.clone(), &rows)
}

#[test]
fn test_full_pipeline_mixed_universe() {
    let windows = TemplateWindows::default();
    let start = date(2023, 1, 1);

    // 단조 상승 종목: 마지막 날 5점 (pass)
    let rising: Vec<Decimal> = (0..260).map(|i| dec!(50) + Decimal::from(i)).collect();
    // 횡보 종목: extrema 윈도우가 채워진 뒤 1점 (fail)
    let flat = vec![dec!(100); 260];
    // 이력 부족 종목: 점수가 전혀 없음
    let short = vec![dec!(100); 30];

    let universe: BTreeMap<String, ClassificationSeries> = [
        ("UP".to_string(), classify(&daily_series("UP", start, &rising), &windows)),
        ("FLAT".to_string(), classify(&daily_series("FLAT", start, &flat), &windows)),
        ("NEW".to_string(), classify(&daily_series("NEW", start, &short), &windows)),
    ]
    .into_iter()
    .collect();

    let last_day = start + Duration::days(259);
    let window = DateWindow::trailing(5, last_day);

    // breadth: 마지막 날에 pass 1, fail 1, unknown 1
    let rows = BreadthAggregator::new().counts(&universe, &window, FillMode::Strict);
    let last = rows.last().unwrap();
    assert_eq!(last.date, last_day);
    assert_eq!(last.pass, 1);
    assert_eq!(last.fail, 1);
    assert_eq!(last.unknown, 1);

    // 스냅샷: 이력 부족 종목도 unknown으로 나타남
    let snap = snapshot(&universe, last_day);
    assert_eq!(snap["UP"], Classification::Pass);
    assert_eq!(snap["FLAT"], Classification::Fail);
    assert_eq!(snap["NEW"], Classification::Unknown);

    // 피벗: pass 종목이 첫 행
    let table = PivotTable::build(&universe, &window);
    assert_eq!(table.rows[0].ticker, "UP");
    assert_eq!(table.rows[0].latest, Classification::Pass);
    assert_eq!(table.dates[0], last_day);

    // 차트 데이터는 윈도우 일수만큼의 포인트
    let chart = BreadthChartData::from_rows(&rows);
    assert_eq!(chart.pass.len(), 5);
}

#[test]
fn test_sentiment_pipeline_binary_mode() {
    let windows = TemplateWindows::default();
    let start = date(2023, 1, 1);

    let rising: Vec<Decimal> = (0..260).map(|i| dec!(50) + Decimal::from(i)).collect();
    let flat = vec![dec!(100); 260];

    let universe: BTreeMap<String, ClassificationSeries> = [
        ("UP".to_string(), classify(&daily_series("UP", start, &rising), &windows)),
        ("FLAT".to_string(), classify(&daily_series("FLAT", start, &flat), &windows)),
    ]
    .into_iter()
    .collect();

    let last_day = start + Duration::days(259);
    let window = DateWindow::new(last_day, last_day);

    // +1 (pass) 와 -1 (fail) 의 평균은 0
    let rows = BreadthAggregator::new().sentiment(&universe, &window, FillMode::Strict);
    assert_eq!(rows[0].samples, 2);
    assert_eq!(rows[0].mean, Some(Decimal::ZERO));
}

#[test]
fn test_carry_forward_covers_weekend_gap() {
    let windows = TemplateWindows::default();
    // 금요일에 끝나는 260 거래일 시계열을 주말 건너뛰며 생성
    let mut bars = Vec::new();
    let mut day = date(2023, 1, 2); // 월요일
    let mut i = 0u32;
    while bars.len() < 260 {
        if day.weekday().number_from_monday() <= 5 {
            bars.push(PriceBar::new(day, dec!(50) + Decimal::from(i)));
            i += 1;
        }
        day += Duration::days(1);
    }
    let last_bar_date = bars.last().unwrap().date;
    let series = Series::from_bars("UP", bars);

    let universe: BTreeMap<String, ClassificationSeries> =
        [("UP".to_string(), classify(&series, &windows))]
            .into_iter()
            .collect();

    // 마지막 봉 이후의 일요일까지 윈도우를 늘림
    let sunday = last_bar_date + Duration::days(2);
    let window = DateWindow::new(last_bar_date, sunday);

    let strict = BreadthAggregator::new().counts(&universe, &window, FillMode::Strict);
    let filled = BreadthAggregator::new().counts(&universe, &window, FillMode::CarryForward);

    // strict: 봉 없는 주말은 unknown
    assert_eq!(strict[1].unknown, 1);
    assert_eq!(strict[2].unknown, 1);
    // carry-forward: 금요일 분류가 주말로 전파
    assert_eq!(filled[1].pass, 1);
    assert_eq!(filled[2].pass, 1);
}
