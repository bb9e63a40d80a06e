//! CLI 명령어 구현 모듈.

pub mod download;
pub mod list;
pub mod run;
