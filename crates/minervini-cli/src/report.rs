//! 실행 산출물 생성.
//!
//! 렌더링 어댑터가 소비할 JSON 차트 데이터와 정적 상태 페이지를
//! 출력 디렉토리에 씁니다.
//!
//! - `breadth.json` / `sentiment.json` / `groups/<이름>.json` - 차트 데이터
//! - `snapshot.json` - 종목별 최신 분류
//! - `index.html` - 상태 점 + 피벗 분류 테이블

use anyhow::{Context, Result};
use chrono::NaiveDate;
use minervini_analytics::{BreadthChartData, PivotTable, SentimentChartData};
use minervini_core::Classification;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

/// 한 번의 실행이 만들어내는 산출물 전체.
pub struct RunArtifacts<'a> {
    /// 기준일 (유니버스 최신 채점일)
    pub as_of: NaiveDate,
    pub breadth: &'a BreadthChartData,
    /// 2상태 점수 모드에서만 생성
    pub sentiment: Option<&'a SentimentChartData>,
    pub groups: &'a BTreeMap<String, BreadthChartData>,
    pub snapshot: &'a BTreeMap<String, Classification>,
    pub pivot: &'a PivotTable,
}

/// 산출물 전체를 출력 디렉토리에 씁니다.
pub fn write_artifacts(dir: &Path, artifacts: &RunArtifacts) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("출력 디렉토리 생성 실패: {}", dir.display()))?;

    write_json(&dir.join("breadth.json"), artifacts.breadth)?;
    write_json(&dir.join("snapshot.json"), artifacts.snapshot)?;

    if let Some(sentiment) = artifacts.sentiment {
        write_json(&dir.join("sentiment.json"), sentiment)?;
    }

    if !artifacts.groups.is_empty() {
        let group_dir = dir.join("groups");
        fs::create_dir_all(&group_dir)
            .with_context(|| format!("그룹 디렉토리 생성 실패: {}", group_dir.display()))?;
        for (name, chart) in artifacts.groups {
            write_json(&group_dir.join(format!("{}.json", name)), chart)?;
        }
    }

    write_index_html(&dir.join("index.html"), artifacts)?;
    Ok(())
}

/// 채점 가능한 종목이 없을 때의 자리표시 페이지를 씁니다.
///
/// 빈 유니버스는 사용자에게 보여야 하는 최종 상태이지 오류가
/// 아니므로, 호출자는 이후 정상 종료해야 합니다.
pub fn write_placeholder(dir: &Path, reason: &str) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("출력 디렉토리 생성 실패: {}", dir.display()))?;

    let path = dir.join("index.html");
    let file = File::create(&path).with_context(|| format!("파일 생성 실패: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "<!DOCTYPE html>")?;
    writeln!(writer, "<html lang=\"ko\"><head><meta charset=\"utf-8\">")?;
    writeln!(writer, "<title>Trend Template Screener</title></head>")?;
    writeln!(writer, "<body>")?;
    writeln!(writer, "<h1>Trend Template Screener</h1>")?;
    writeln!(writer, "<p class=\"empty\">표시할 결과가 없습니다: {}</p>", reason)?;
    writeln!(writer, "</body></html>")?;
    writer.flush()?;
    Ok(())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path).with_context(|| format!("파일 생성 실패: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("JSON 직렬화 실패: {}", path.display()))?;
    writer.flush()?;
    Ok(())
}

/// 상태 점 스냅샷과 피벗 분류 테이블이 담긴 정적 페이지를 씁니다.
fn write_index_html(path: &Path, artifacts: &RunArtifacts) -> Result<()> {
    let file = File::create(path).with_context(|| format!("파일 생성 실패: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "<!DOCTYPE html>")?;
    writeln!(writer, "<html lang=\"ko\"><head><meta charset=\"utf-8\">")?;
    writeln!(writer, "<title>Trend Template Screener</title>")?;
    writeln!(writer, "<style>")?;
    writeln!(writer, "body {{ font-family: sans-serif; margin: 2rem; }}")?;
    writeln!(
        writer,
        ".dot {{ display: inline-block; width: 0.8em; height: 0.8em; border-radius: 50%; margin-right: 0.4em; }}"
    )?;
    writeln!(writer, "table {{ border-collapse: collapse; margin-top: 1rem; }}")?;
    writeln!(writer, "th, td {{ border: 1px solid #ddd; padding: 0.3em 0.6em; }}")?;
    writeln!(writer, "</style></head>")?;
    writeln!(writer, "<body>")?;
    writeln!(writer, "<h1>Trend Template Screener</h1>")?;
    writeln!(writer, "<p>기준일: {}</p>", artifacts.as_of)?;

    // 종목별 최신 상태 점
    writeln!(writer, "<h2>현재 상태</h2>")?;
    writeln!(writer, "<ul>")?;
    for (ticker, classification) in artifacts.snapshot {
        writeln!(
            writer,
            "<li><span class=\"dot\" style=\"background:{}\"></span>{} — {}</li>",
            classification.color_code(),
            ticker,
            classification.label()
        )?;
    }
    writeln!(writer, "</ul>")?;

    // 피벗 테이블 (열 = 날짜 최신 우선)
    writeln!(writer, "<h2>일자별 분류</h2>")?;
    writeln!(writer, "<table>")?;
    write!(writer, "<tr><th>종목</th>")?;
    for date in &artifacts.pivot.dates {
        write!(writer, "<th>{}</th>", date.format("%m-%d"))?;
    }
    writeln!(writer, "</tr>")?;

    for row in &artifacts.pivot.rows {
        write!(writer, "<tr><td>{}</td>", row.ticker)?;
        for cell in &row.cells {
            write!(
                writer,
                "<td style=\"background:{}\" title=\"{}\">{}</td>",
                cell.color_code(),
                cell.label(),
                cell.icon()
            )?;
        }
        writeln!(writer, "</tr>")?;
    }
    writeln!(writer, "</table>")?;

    writeln!(writer, "</body></html>")?;
    writer.flush()?;
    Ok(())
}
