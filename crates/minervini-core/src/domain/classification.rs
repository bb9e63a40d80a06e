//! 트렌드 템플릿 분류.
//!
//! 5개 기준의 만족 개수(0~5점)를 이산 분류로 사상합니다.
//!
//! # 기준
//!
//! - **Pass**: 5점 (기준 전부 만족) ✅
//! - **Borderline**: 4점 🟡
//! - **Fail**: 0~3점 ❌
//! - **Unknown**: 해당 날짜에 봉/점수 없음 ⚪

use serde::{Deserialize, Serialize};
use std::fmt;

/// 트렌드 템플릿 점수의 최대값 (기준 5개).
pub const MAX_SCORE: u8 = 5;

/// 하루치 트렌드 템플릿 분류 결과.
///
/// 변형 선언 순서가 보고서 정렬 순서입니다:
/// pass < borderline < fail < unknown.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// 기준 5개 전부 만족
    Pass,
    /// 기준 4개 만족
    Borderline,
    /// 기준 3개 이하 만족
    Fail,
    /// 해당 날짜에 계산된 점수 없음
    ///
    /// 실제로 계산된 낮은 점수(`Fail`)와 달리, 봉 자체가 없어서
    /// 판정이 불가능한 상태를 나타냅니다.
    Unknown,
}

impl Classification {
    /// 점수로부터 분류를 결정합니다.
    ///
    /// 점수는 [0, 5] 범위의 전함수이며 임계값은 고정입니다:
    /// 5 → Pass, 4 → Borderline, 0~3 → Fail.
    pub fn from_score(score: u8) -> Self {
        match score {
            5 => Self::Pass,
            4 => Self::Borderline,
            _ => Self::Fail,
        }
    }

    /// 아이콘 (상태 표시용).
    pub fn icon(self) -> &'static str {
        match self {
            Self::Pass => "🟢",
            Self::Borderline => "🟡",
            Self::Fail => "🔴",
            Self::Unknown => "⚪",
        }
    }

    /// 컬러 코드 (렌더링 어댑터용).
    pub fn color_code(self) -> &'static str {
        match self {
            Self::Pass => "#22c55e",
            Self::Borderline => "#eab308",
            Self::Fail => "#ef4444",
            Self::Unknown => "#9ca3af",
        }
    }

    /// 표시용 레이블.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Borderline => "borderline",
            Self::Fail => "fail",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 점수 해석 모드.
///
/// 3단계 분류 테이블과 단순화된 2상태 평균 차트가 모두 요구 출력이므로
/// 두 모드를 설정으로 전환합니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreMode {
    /// pass / borderline / fail 3단계 분류
    ThreeState,
    /// 5점 → +1, 그 외 → -1 의 2상태 감정 지표
    Binary,
}

impl Default for ScoreMode {
    fn default() -> Self {
        Self::ThreeState
    }
}

/// 2상태 모드의 점수 사상: 5점이면 +1, 아니면 -1.
pub fn sentiment(score: u8) -> i8 {
    if score >= MAX_SCORE {
        1
    } else {
        -1
    }
}
