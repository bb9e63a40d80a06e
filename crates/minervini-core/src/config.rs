//! 설정 관리.
//!
//! 스크리닝 대상 유니버스, 그룹 구성, 윈도우 길이, 집계 정책은 모두
//! 소스 상수가 아니라 설정 구조체로 전달됩니다. TOML 파일 위에
//! `MINERVINI__` 접두사 환경 변수가 겹쳐집니다.

use crate::domain::{AssetClass, Instrument, ScoreMode};
use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// 거래 캘린더 모드.
///
/// 소스 변형들이 암호화폐 윈도우에 365/252 배율을 적용할지에 대해
/// 일치하지 않으므로, 명시적인 설정 항목으로 노출하며 기본은 미적용입니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarMode {
    /// 거래일 기준 윈도우를 그대로 사용
    TradingDays,
    /// 매일 거래되는 자산에 한해 윈도우를 365/252 배율로 환산
    CalendarScaled,
}

impl Default for CalendarMode {
    fn default() -> Self {
        Self::TradingDays
    }
}

/// 집계 시 결측일 처리 모드.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillMode {
    /// 결측일은 unknown으로 집계
    Strict,
    /// 가장 최근의 알려진 분류를 전파 (첫 값 이전 구간은 첫 값으로 채움)
    CarryForward,
}

impl Default for FillMode {
    fn default() -> Self {
        Self::Strict
    }
}

/// 지표 윈도우 길이 (거래일 기준).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// 단기 이동평균 윈도우 (기본 50)
    pub short: usize,
    /// 중기 이동평균 윈도우 (기본 150)
    pub mid: usize,
    /// 장기 이동평균 윈도우 (기본 200)
    pub long: usize,
    /// 52주 고저 윈도우 (기본 252)
    pub extrema: usize,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            short: 50,
            mid: 150,
            long: 200,
            extrema: 252,
        }
    }
}

impl WindowConfig {
    /// 달력일 환산 윈도우를 반환합니다.
    ///
    /// 각 윈도우에 365/252 를 곱하고 정수로 내림합니다.
    /// 기본값 기준 50→72, 150→217, 200→289, 252→365.
    pub fn calendar_scaled(&self) -> Self {
        let scale = |w: usize| w * 365 / 252;
        Self {
            short: scale(self.short),
            mid: scale(self.mid),
            long: scale(self.long),
            extrema: scale(self.extrema),
        }
    }
}

/// 유니버스에 포함될 종목 설정.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentConfig {
    /// 티커
    pub ticker: String,
    /// 표시용 이름 (선택)
    #[serde(default)]
    pub name: Option<String>,
    /// 자산 유형
    #[serde(default)]
    pub asset_class: AssetClass,
}

impl InstrumentConfig {
    /// 도메인 객체로 변환합니다.
    pub fn to_instrument(&self) -> Instrument {
        let mut inst = Instrument::new(&self.ticker, self.asset_class);
        if let Some(name) = &self.name {
            inst = inst.with_name(name);
        }
        inst
    }
}

/// 로깅 설정.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 로그 레벨
    pub level: String,
    /// 로그 형식 (pretty, json, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "compact".to_string(),
        }
    }
}

/// 애플리케이션 설정.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 시계열 CSV 저장 디렉토리
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// 산출물 출력 디렉토리
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// 스크리닝 대상 유니버스
    #[serde(default)]
    pub universe: Vec<InstrumentConfig>,
    /// 이름 붙은 그룹 → 소속 티커 목록
    #[serde(default)]
    pub groups: HashMap<String, Vec<String>>,
    /// 지표 윈도우 길이
    #[serde(default)]
    pub windows: WindowConfig,
    /// 거래 캘린더 모드
    #[serde(default)]
    pub calendar_mode: CalendarMode,
    /// 집계 결측일 처리 모드
    #[serde(default)]
    pub fill_mode: FillMode,
    /// 점수 해석 모드
    #[serde(default)]
    pub score_mode: ScoreMode,
    /// 집계 윈도우 길이 (달력일, 기본 30 — 대안 모드는 180)
    #[serde(default = "default_window_days")]
    pub window_days: i64,
    /// 가격 이력 조회 기간 (달력일)
    #[serde(default = "default_lookback_days")]
    pub lookback_days: i64,
    /// 로깅 설정
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_data_dir() -> String {
    "data".to_string()
}
fn default_output_dir() -> String {
    "docs".to_string()
}
fn default_window_days() -> i64 {
    30
}
fn default_lookback_days() -> i64 {
    // 252 거래일 윈도우가 채워지려면 2년치 달력일이 필요
    365 * 2
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            output_dir: default_output_dir(),
            universe: Vec::new(),
            groups: HashMap::new(),
            windows: WindowConfig::default(),
            calendar_mode: CalendarMode::default(),
            fill_mode: FillMode::default(),
            score_mode: ScoreMode::default(),
            window_days: default_window_days(),
            lookback_days: default_lookback_days(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// 파일과 환경 변수에서 설정을 로드합니다.
    pub fn load<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        let builder = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("MINERVINI")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// 기본 경로에서 설정을 로드합니다.
    pub fn load_default() -> CoreResult<Self> {
        Self::load("config/default.toml")
    }

    /// 정책 값의 기본 불변식을 검사합니다.
    pub fn validate(&self) -> CoreResult<()> {
        if self.window_days < 1 {
            return Err(CoreError::InvalidInput(format!(
                "window_days는 1 이상이어야 합니다: {}",
                self.window_days
            )));
        }
        if self.lookback_days < 1 {
            return Err(CoreError::InvalidInput(format!(
                "lookback_days는 1 이상이어야 합니다: {}",
                self.lookback_days
            )));
        }
        let w = &self.windows;
        if w.short == 0 || w.mid == 0 || w.long == 0 || w.extrema == 0 {
            return Err(CoreError::InvalidInput(
                "지표 윈도우 길이는 0이 될 수 없습니다".to_string(),
            ));
        }
        Ok(())
    }

    /// 유니버스를 도메인 객체 목록으로 반환합니다.
    pub fn instruments(&self) -> Vec<Instrument> {
        self.universe.iter().map(|c| c.to_instrument()).collect()
    }
}
