//! 특정 일자의 종목별 분류 스냅샷.
//!
//! 집계 없이 단일 날짜를 그대로 조회합니다. 결측 처리 모드와 무관하게
//! 항상 strict 조회이며, 봉이 없는 종목은 unknown으로 나타납니다.
//! 상태 점 표시 같은 시점 뷰에 사용됩니다.

use chrono::NaiveDate;
use minervini_core::Classification;
use std::collections::BTreeMap;

use crate::aggregate::ClassificationSeries;

/// 지정 날짜의 종목별 분류를 반환합니다.
///
/// 유니버스의 모든 종목이 결과에 포함됩니다. 해당 날짜에 계산된
/// 점수가 없는 종목(봉 없음, 이력 부족)은 `Unknown`입니다.
pub fn snapshot(
    universe: &BTreeMap<String, ClassificationSeries>,
    date: NaiveDate,
) -> BTreeMap<String, Classification> {
    universe
        .iter()
        .map(|(ticker, series)| {
            let classification = series
                .at(date)
                .map(|day| day.classification)
                .unwrap_or(Classification::Unknown);
            (ticker.clone(), classification)
        })
        .collect()
}
