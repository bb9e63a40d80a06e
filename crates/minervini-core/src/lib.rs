//! # Minervini Core
//!
//! 트렌드 템플릿 스크리너의 핵심 도메인 모델 및 타입을 제공합니다.
//!
//! 이 크레이트는 시스템 전반에서 사용되는 기본 타입을 제공합니다:
//! - 종목 및 자산 유형 정의
//! - 일봉 가격 데이터와 시계열
//! - 트렌드 템플릿 분류 (pass / borderline / fail / unknown)
//! - 설정 관리
//! - 로깅 인프라

pub mod config;
pub mod domain;
pub mod error;
pub mod logging;

pub use config::*;
pub use domain::*;
pub use error::*;
pub use logging::*;
