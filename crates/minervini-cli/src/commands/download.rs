//! 단일 종목 과거 일봉 다운로드 명령어.
//!
//! Yahoo Finance에서 지정 기간을 가져와 종목 CSV에 병합 저장합니다.
//! 기존 캐시가 있으면 덮어쓰지 않고 날짜 기준으로 병합됩니다.

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use indicatif::{ProgressBar, ProgressStyle};
use minervini_core::{AssetClass, Instrument};
use minervini_data::{CsvStorage, DataManager, YahooProvider};
use std::sync::Arc;
use tracing::info;

/// 다운로드 설정.
pub struct DownloadConfig {
    pub instrument: Instrument,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// CSV 저장 디렉토리
    pub output_dir: String,
}

impl DownloadConfig {
    /// CLI 문자열 인자를 검증하며 설정으로 변환합니다.
    pub fn parse_args(
        symbol: &str,
        from: &str,
        to: &str,
        asset_class: &str,
        output_dir: &str,
    ) -> Result<Self> {
        let asset_class: AssetClass = asset_class
            .parse()
            .map_err(|e: String| anyhow!(e))
            .context("지원 유형: stock, etf, crypto, forex")?;

        let start_date = parse_date(from)?;
        let end_date = parse_date(to)?;
        if start_date > end_date {
            bail!("시작 날짜가 종료 날짜보다 늦습니다: {} > {}", start_date, end_date);
        }

        Ok(Self {
            instrument: Instrument::new(symbol, asset_class),
            start_date,
            end_date,
            output_dir: output_dir.to_string(),
        })
    }
}

/// 날짜 문자열 파싱 (YYYY-MM-DD).
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("잘못된 날짜 형식: {} (YYYY-MM-DD)", s))
}

/// 지정 기간을 다운로드하고 저장된 봉 수를 반환합니다.
pub async fn download_history(config: DownloadConfig) -> Result<usize> {
    let ticker = &config.instrument.ticker;

    let provider = Arc::new(YahooProvider::new().context("HTTP 클라이언트 생성 실패")?);
    let storage = CsvStorage::new(&config.output_dir);
    let output_path = storage.path_for(ticker);
    let manager = DataManager::new(storage, provider);

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(format!(
        "{} 다운로드 중 ({} ~ {})...",
        ticker, config.start_date, config.end_date
    ));

    let result = manager
        .download_range(ticker, config.start_date, config.end_date)
        .await;

    match result {
        Ok(series) => {
            pb.finish_with_message(format!("{} 봉 저장됨", series.len()));
            info!(
                ticker = %ticker,
                bars = series.len(),
                path = %output_path.display(),
                "다운로드 완료"
            );
            println!("저장 위치: {}", output_path.display());
            Ok(series.len())
        }
        Err(e) => {
            pb.finish_with_message("다운로드 실패");
            Err(e).with_context(|| format!("{} 다운로드 실패", ticker))
        }
    }
}
