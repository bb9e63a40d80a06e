//! 전체 스크리닝 파이프라인 실행 명령어.
//!
//! 수집 → 채점 → 집계 → 산출물 생성 순서로 진행합니다.
//!
//! 종목 단위 실패는 격리됩니다. 수집에 실패한 종목은 경고 후
//! 건너뛰고, 이력이 부족한 종목은 스냅샷에 unknown으로만 나타나며,
//! 유니버스 전체가 비면 자리표시 페이지를 쓰고 정상 종료합니다.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use futures::future::join_all;
use minervini_analytics::{
    effective_windows, snapshot, BreadthAggregator, BreadthChartData, ClassificationSeries,
    DateWindow, PivotTable, SentimentChartData, TemplateCalculator,
};
use minervini_core::{AppConfig, Classification, Instrument, LogConfig, ScoreMode};
use minervini_data::{CsvStorage, DataManager, SeriesStore, YahooProvider};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::report::{self, RunArtifacts};

/// 집계가 끝난 한 번의 실행 결과.
struct ScreenReport {
    /// 기준일 (유니버스 전체에서 가장 최근의 봉 날짜)
    as_of: NaiveDate,
    breadth: BreadthChartData,
    sentiment: Option<SentimentChartData>,
    groups: BTreeMap<String, BreadthChartData>,
    snapshot: BTreeMap<String, Classification>,
    pivot: PivotTable,
}

/// 설정 파일을 로드하고 파이프라인 전체를 실행합니다.
pub async fn run_screen(config_path: &str, output_override: Option<&str>) -> Result<()> {
    let config = AppConfig::load(config_path)
        .with_context(|| format!("설정 로드 실패: {}", config_path))?;

    init_logging(&config)?;

    let output_dir = output_override.unwrap_or(&config.output_dir).to_string();
    let instruments = config.instruments();

    if instruments.is_empty() {
        warn!("유니버스가 비어 있음");
        report::write_placeholder(Path::new(&output_dir), "설정된 종목이 없습니다")?;
        return Ok(());
    }

    info!(
        instruments = instruments.len(),
        window_days = config.window_days,
        "스크리닝 시작"
    );

    let store = refresh_universe(&config, &instruments).await?;

    match build_report(&config, &store, &instruments)? {
        Some(screen) => {
            report::write_artifacts(
                Path::new(&output_dir),
                &RunArtifacts {
                    as_of: screen.as_of,
                    breadth: &screen.breadth,
                    sentiment: screen.sentiment.as_ref(),
                    groups: &screen.groups,
                    snapshot: &screen.snapshot,
                    pivot: &screen.pivot,
                },
            )?;
            info!(output = %output_dir, as_of = %screen.as_of, "산출물 생성 완료");
            println!("\n스크리닝 완료 ({} 기준)", screen.as_of);
            println!("산출물 위치: {}", output_dir);
        }
        None => {
            warn!("채점 가능한 종목이 하나도 없음");
            report::write_placeholder(
                Path::new(&output_dir),
                "채점 가능한 종목이 없습니다 (수집 실패 또는 이력 부족)",
            )?;
        }
    }
    Ok(())
}

fn init_logging(config: &AppConfig) -> Result<()> {
    let log_config = LogConfig::new(&config.logging.level)
        .with_format(config.logging.format.parse().unwrap_or_default());
    minervini_core::init_logging(log_config).context("로깅 초기화 실패")
}

/// 유니버스 전체를 동시 수집하여 저장소를 채웁니다.
///
/// 실패한 종목은 경고 후 저장소에서 제외됩니다.
async fn refresh_universe(
    config: &AppConfig,
    instruments: &[Instrument],
) -> Result<SeriesStore> {
    let provider = Arc::new(YahooProvider::new().context("HTTP 클라이언트 생성 실패")?);
    let manager = DataManager::new(CsvStorage::new(&config.data_dir), provider);

    let tasks = instruments.iter().map(|instrument| {
        let manager = manager.clone();
        async move {
            let result = manager.refresh(instrument, config.lookback_days).await;
            (instrument, result)
        }
    });

    let mut store = SeriesStore::new();
    for (instrument, result) in join_all(tasks).await {
        match result {
            Ok(series) => store.insert_series(series),
            Err(e) => {
                warn!(ticker = %instrument.ticker, error = %e, "수집 실패, 이번 실행에서 제외");
            }
        }
    }

    info!(
        refreshed = store.len(),
        total = instruments.len(),
        "유니버스 수집 완료"
    );
    Ok(store)
}

/// 저장소 내용으로 집계와 보고서 뷰를 만듭니다.
///
/// 집계 기준일은 점수 유무와 무관하게 유니버스 전체에서 가장 최근의
/// 봉 날짜입니다. 봉이 하나도 없거나 모든 종목이 이력 부족이면
/// None을 반환하며, 호출자는 자리표시 산출물을 씁니다.
fn build_report(
    config: &AppConfig,
    store: &SeriesStore,
    instruments: &[Instrument],
) -> Result<Option<ScreenReport>> {
    let Some(end) = store.latest_date_overall() else {
        return Ok(None);
    };

    let universe = classify_universe(config, store, instruments)?;
    if universe.values().all(|series| series.is_empty()) {
        return Ok(None);
    }

    let window = DateWindow::trailing(config.window_days, end);
    let aggregator = BreadthAggregator::new();

    let breadth_rows = aggregator.counts(&universe, &window, config.fill_mode);
    let breadth = BreadthChartData::from_rows(&breadth_rows);

    let sentiment = (config.score_mode == ScoreMode::Binary).then(|| {
        let rows = aggregator.sentiment(&universe, &window, config.fill_mode);
        SentimentChartData::from_rows(&rows)
    });

    let mut groups = BTreeMap::new();
    for (name, members) in &config.groups {
        let rows = aggregator.counts_for_group(&universe, members, &window, config.fill_mode);
        groups.insert(name.clone(), BreadthChartData::from_rows(&rows));
    }

    Ok(Some(ScreenReport {
        as_of: end,
        snapshot: snapshot(&universe, end),
        pivot: PivotTable::build(&universe, &window),
        breadth,
        sentiment,
        groups,
    }))
}

/// 종목별 템플릿 채점 후 분류 시계열로 변환합니다.
///
/// 이력이 부족해 점수가 전혀 없는 종목도 결과에 포함되어 스냅샷에
/// unknown으로 나타납니다. 저장소에 없는 종목(수집 실패)은 건너뜁니다.
fn classify_universe(
    config: &AppConfig,
    store: &SeriesStore,
    instruments: &[Instrument],
) -> Result<BTreeMap<String, ClassificationSeries>> {
    let calculator = TemplateCalculator::new();
    let mut universe = BTreeMap::new();

    for instrument in instruments {
        let Ok(series) = store.get(&instrument.ticker) else {
            continue;
        };
        let windows =
            effective_windows(&config.windows, instrument.asset_class, config.calendar_mode);
        let rows = calculator
            .compute(series, &windows)
            .with_context(|| format!("지표 계산 실패: {}", instrument.ticker))?;
        let classified = ClassificationSeries::from_rows(instrument.ticker.clone(), &rows);

        if classified.is_empty() {
            info!(
                ticker = %instrument.ticker,
                bars = series.len(),
                needed = windows.extrema,
                "이력 부족, 집계 제외"
            );
        }
        universe.insert(instrument.ticker.clone(), classified);
    }
    Ok(universe)
}
