//! 설정된 유니버스와 그룹 출력 명령어.

use anyhow::{Context, Result};
use minervini_core::AppConfig;

/// 설정 파일의 유니버스와 그룹 구성을 출력합니다.
pub fn print_universe(config_path: &str) -> Result<()> {
    let config = AppConfig::load(config_path)
        .with_context(|| format!("설정 로드 실패: {}", config_path))?;

    if config.universe.is_empty() {
        println!("설정된 종목이 없습니다: {}", config_path);
        return Ok(());
    }

    println!("유니버스 ({} 종목):", config.universe.len());
    for entry in &config.universe {
        let instrument = entry.to_instrument();
        match &instrument.name {
            Some(name) => {
                println!("  {:<12} {:<8} {}", instrument.ticker, instrument.asset_class, name)
            }
            None => println!("  {:<12} {}", instrument.ticker, instrument.asset_class),
        }
    }

    if !config.groups.is_empty() {
        let mut names: Vec<&String> = config.groups.keys().collect();
        names.sort();

        println!("\n그룹:");
        for name in names {
            println!("  {}: {}", name, config.groups[name].join(", "));
        }
    }

    println!(
        "\n집계 윈도우: {}일 / 결측 처리: {:?} / 점수 모드: {:?}",
        config.window_days, config.fill_mode, config.score_mode
    );
    Ok(())
}
