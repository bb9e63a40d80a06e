//! 종목당 CSV 파일 하나로 시계열을 영속화합니다.
//!
//! 파일 형식은 `date,open,high,low,close,volume` 헤더를 가지며,
//! 선택 필드가 없는 칸은 빈 문자열로 기록됩니다. 저장은 항상
//! 중복 제거/정렬이 끝난 시계열 전체를 다시 쓰므로, 호출자가
//! `Series::upsert`로 병합한 뒤 저장하는 한 디스크의 과거 이력이
//! 파괴되지 않습니다.

use crate::error::{DataError, Result};
use chrono::NaiveDate;
use minervini_core::{PriceBar, Series};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info, warn};

/// CSV 헤더.
const HEADER: &str = "date,open,high,low,close,volume";

/// CSV 기반 시계열 저장소.
#[derive(Debug, Clone)]
pub struct CsvStorage {
    dir: PathBuf,
}

impl CsvStorage {
    /// 지정 디렉토리를 사용하는 저장소를 생성합니다.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// 종목 CSV 파일 경로를 반환합니다.
    pub fn path_for(&self, ticker: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", ticker))
    }

    /// 종목 시계열을 로드합니다.
    ///
    /// 파일이 없으면 `NotFound`를, 헤더가 이 저장소의 형식과 다르면
    /// `InvalidData`를 반환합니다. 형식이 어긋난 데이터 행은 경고
    /// 로그 후 건너뛰며, 로드된 시계열은 날짜 기준으로 중복
    /// 제거/정렬됩니다.
    pub fn load_series(&self, ticker: &str) -> Result<Series> {
        let path = self.path_for(ticker);
        if !path.exists() {
            return Err(DataError::NotFound(ticker.to_string()));
        }

        let file = File::open(&path)?;
        let reader = BufReader::new(file);
        let mut bars = Vec::new();

        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            if line_no == 0 {
                if line.trim() != HEADER {
                    return Err(DataError::InvalidData(format!(
                        "{}: 알 수 없는 CSV 헤더: {}",
                        ticker, line
                    )));
                }
                continue;
            }
            if line.trim().is_empty() {
                continue;
            }
            match parse_row(&line) {
                Some(bar) => bars.push(bar),
                None => {
                    warn!(
                        ticker = ticker,
                        line = line_no + 1,
                        "CSV 행 파싱 실패, 건너뜀"
                    );
                }
            }
        }

        debug!(ticker = ticker, bars = bars.len(), "CSV에서 시계열 로드");
        Ok(Series::from_bars(ticker, bars))
    }

    /// 종목 시계열을 저장합니다.
    ///
    /// # 반환
    /// 기록된 봉 수
    pub fn save_series(&self, series: &Series) -> Result<usize> {
        let path = self.path_for(&series.ticker);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(&path)?;
        let mut writer = BufWriter::new(file);

        writeln!(writer, "{}", HEADER)?;
        for bar in series.bars() {
            writeln!(
                writer,
                "{},{},{},{},{},{}",
                bar.date.format("%Y-%m-%d"),
                format_opt(bar.open),
                format_opt(bar.high),
                format_opt(bar.low),
                bar.close,
                format_opt(bar.volume),
            )?;
        }
        writer.flush()?;

        info!(
            ticker = %series.ticker,
            bars = series.len(),
            path = %path.display(),
            "시계열 CSV 저장"
        );
        Ok(series.len())
    }

    /// 저장된 티커 목록을 반환합니다 (정렬됨).
    pub fn list_tickers(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut tickers = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("csv") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    tickers.push(stem.to_string());
                }
            }
        }
        tickers.sort();
        Ok(tickers)
    }

    /// 저장 디렉토리를 반환합니다.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// CSV 한 행을 봉으로 파싱합니다.
fn parse_row(line: &str) -> Option<PriceBar> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != 6 {
        return None;
    }

    let date = NaiveDate::parse_from_str(fields[0].trim(), "%Y-%m-%d").ok()?;
    let close = Decimal::from_str(fields[4].trim()).ok()?;

    Some(PriceBar {
        date,
        open: parse_opt(fields[1]),
        high: parse_opt(fields[2]),
        low: parse_opt(fields[3]),
        close,
        volume: parse_opt(fields[5]),
    })
}

fn parse_opt(field: &str) -> Option<Decimal> {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        None
    } else {
        Decimal::from_str(trimmed).ok()
    }
}

fn format_opt(value: Option<Decimal>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = CsvStorage::new(tmp.path());

        let series = Series::from_bars(
            "AAPL",
            vec![
                PriceBar::with_ohlcv(
                    date(2024, 1, 2),
                    dec!(184.0),
                    dec!(186.5),
                    dec!(183.2),
                    dec!(185.1),
                    dec!(1000000),
                ),
                PriceBar::new(date(2024, 1, 3), dec!(186.0)),
            ],
        );

        storage.save_series(&series).unwrap();
        let loaded = storage.load_series("AAPL").unwrap();

        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.bars()[0].high, Some(dec!(186.5)));
        assert_eq!(loaded.bars()[1].open, None);
        assert_eq!(loaded.bars()[1].close, dec!(186.0));
    }

    #[test]
    fn test_load_missing_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = CsvStorage::new(tmp.path());
        assert!(matches!(
            storage.load_series("NONE"),
            Err(DataError::NotFound(_))
        ));
    }

    #[test]
    fn test_load_skips_malformed_rows() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("X.csv");
        std::fs::write(
            &path,
            "date,open,high,low,close,volume\n\
             2024-01-02,,,,100.5,\n\
             not-a-date,,,,1,\n\
             2024-01-03,,,,abc,\n\
             2024-01-04,,,,101.5,\n",
        )
        .unwrap();

        let storage = CsvStorage::new(tmp.path());
        let series = storage.load_series("X").unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.bars()[1].close, dec!(101.5));
    }

    #[test]
    fn test_load_rejects_foreign_header() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("X.csv"), "time,price\n1,2\n").unwrap();

        let storage = CsvStorage::new(tmp.path());
        assert!(matches!(
            storage.load_series("X"),
            Err(DataError::InvalidData(_))
        ));
    }

    #[test]
    fn test_list_tickers() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = CsvStorage::new(tmp.path());
        storage
            .save_series(&Series::from_bars(
                "MSFT",
                vec![PriceBar::new(date(2024, 1, 2), dec!(400))],
            ))
            .unwrap();
        storage
            .save_series(&Series::from_bars(
                "AAPL",
                vec![PriceBar::new(date(2024, 1, 2), dec!(185))],
            ))
            .unwrap();

        assert_eq!(storage.list_tickers().unwrap(), vec!["AAPL", "MSFT"]);
    }
}
