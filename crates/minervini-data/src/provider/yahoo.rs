//! Yahoo Finance chart API 공급자.
//!
//! Yahoo Finance v8 chart API에서 일봉 데이터를 가져옵니다.
//! 조정 종가가 있으면 종가 대신 사용하고, OHLCV 중 하나라도 비어 있는
//! 행은 버립니다.

use crate::error::{DataError, Result};
use crate::provider::HistoryProvider;
use async_trait::async_trait;
use chrono::{NaiveDate, TimeZone, Utc};
use minervini_core::PriceBar;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use tracing::{debug, warn};

/// Yahoo Finance API v8 응답 구조.
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
    #[serde(rename = "adjclose")]
    adj_close: Option<Vec<AdjClose>>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    open: Option<Vec<Option<f64>>>,
    high: Option<Vec<Option<f64>>>,
    low: Option<Vec<Option<f64>>>,
    close: Option<Vec<Option<f64>>>,
    volume: Option<Vec<Option<i64>>>,
}

#[derive(Debug, Deserialize)]
struct AdjClose {
    #[serde(rename = "adjclose")]
    adj_close: Option<Vec<Option<f64>>>,
}

/// Yahoo Finance 일봉 공급자.
pub struct YahooProvider {
    client: Client,
    base_url: String,
}

impl YahooProvider {
    /// 새 공급자를 생성합니다.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()?;

        Ok(Self {
            client,
            base_url: "https://query1.finance.yahoo.com".to_string(),
        })
    }

    /// 기본 URL을 재지정합니다 (테스트용).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// 응답 본문을 봉 목록으로 변환합니다.
    fn parse_response(ticker: &str, body: &str) -> Result<Vec<PriceBar>> {
        let response: ChartResponse = serde_json::from_str(body)
            .map_err(|e| DataError::ParseError(format!("{}: {}", ticker, e)))?;

        if let Some(error) = response.chart.error {
            return Err(DataError::FetchError(format!(
                "{}: {} - {}",
                ticker, error.code, error.description
            )));
        }

        let result = response
            .chart
            .result
            .and_then(|r| r.into_iter().next())
            .ok_or_else(|| {
                DataError::FetchError(format!("{}: no data returned", ticker))
            })?;

        let timestamps = result.timestamp.unwrap_or_default();
        let quote = result
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| DataError::FetchError(format!("{}: no quote data", ticker)))?;

        let opens = quote.open.unwrap_or_default();
        let highs = quote.high.unwrap_or_default();
        let lows = quote.low.unwrap_or_default();
        let closes = quote.close.unwrap_or_default();
        let volumes = quote.volume.unwrap_or_default();

        // 조정 종가 사용 (있는 경우)
        let adj_closes = result
            .indicators
            .adj_close
            .and_then(|ac| ac.into_iter().next())
            .and_then(|ac| ac.adj_close);

        let mut bars = Vec::with_capacity(timestamps.len());
        let mut dropped = 0usize;

        for (i, &ts) in timestamps.iter().enumerate() {
            let open = opens.get(i).and_then(|v| *v);
            let high = highs.get(i).and_then(|v| *v);
            let low = lows.get(i).and_then(|v| *v);
            let close = adj_closes
                .as_ref()
                .and_then(|ac| ac.get(i).and_then(|v| *v))
                .or_else(|| closes.get(i).and_then(|v| *v));
            let volume = volumes.get(i).and_then(|v| *v);

            let (Some(o), Some(h), Some(l), Some(c), Some(v)) =
                (open, high, low, close, volume)
            else {
                dropped += 1;
                continue;
            };

            let Some(date) = chrono::DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive())
            else {
                dropped += 1;
                continue;
            };

            bars.push(PriceBar {
                date,
                open: decimal_from_f64(o),
                high: decimal_from_f64(h),
                low: decimal_from_f64(l),
                close: decimal_from_f64(c).ok_or_else(|| {
                    DataError::ParseError(format!("{}: invalid close {}", ticker, c))
                })?,
                volume: Some(Decimal::from(v)),
            });
        }

        if dropped > 0 {
            warn!(ticker = ticker, dropped = dropped, "불완전한 봉 제외");
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}

/// f64 가격을 소수점 4자리 Decimal로 변환합니다.
fn decimal_from_f64(value: f64) -> Option<Decimal> {
    Decimal::from_str(&format!("{:.4}", value)).ok()
}

#[async_trait]
impl HistoryProvider for YahooProvider {
    async fn fetch(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>> {
        let start_ts = Utc
            .from_utc_datetime(&start.and_hms_opt(0, 0, 0).unwrap_or_default())
            .timestamp();
        let end_ts = Utc
            .from_utc_datetime(&end.and_hms_opt(23, 59, 59).unwrap_or_default())
            .timestamp();

        let url = format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d&events=history",
            self.base_url, ticker, start_ts, end_ts
        );

        debug!(ticker = ticker, url = %url, "Yahoo Finance 조회");

        let response = self.client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DataError::FetchError(format!(
                "{}: HTTP {} - {}",
                ticker, status, body
            )));
        }

        let body = response.text().await?;
        let bars = Self::parse_response(ticker, &body)?;

        debug!(ticker = ticker, bars = bars.len(), "Yahoo Finance 응답 파싱");
        Ok(bars)
    }
}
