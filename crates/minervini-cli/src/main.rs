//! 트렌드 템플릿 스크리너 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 전체 파이프라인 실행 (수집 → 채점 → 집계 → 산출물 생성)
//! minervini run --config config/default.toml
//!
//! # 단일 종목 일봉 다운로드
//! minervini download -s AAPL -f 2024-01-01 -t 2024-12-31
//!
//! # 암호화폐 종목 다운로드
//! minervini download -s BTC-USD --class crypto -f 2024-01-01 -t 2024-12-31
//!
//! # 설정된 유니버스 보기
//! minervini list
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::error;

mod commands;
mod report;

#[derive(Parser)]
#[command(name = "minervini")]
#[command(about = "Minervini trend-template breadth screener", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 전체 파이프라인 실행 후 산출물 생성
    Run {
        /// 설정 파일 (TOML)
        #[arg(short, long, default_value = "config/default.toml")]
        config: String,

        /// 산출물 출력 디렉토리 (설정값 대신 사용)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// 단일 종목 과거 일봉 다운로드 (Yahoo Finance → CSV)
    Download {
        /// 티커 (예: AAPL, BTC-USD)
        #[arg(short, long)]
        symbol: String,

        /// 시작 날짜 (YYYY-MM-DD)
        #[arg(short = 'f', long)]
        from: String,

        /// 종료 날짜 (YYYY-MM-DD)
        #[arg(short, long)]
        to: String,

        /// 자산 유형 (stock, etf, crypto, forex)
        #[arg(long = "class", default_value = "stock")]
        asset_class: String,

        /// CSV 저장 디렉토리 (기본: data)
        #[arg(short, long, default_value = "data")]
        output: String,
    },

    /// 설정된 유니버스와 그룹 보기
    List {
        /// 설정 파일 (TOML)
        #[arg(short, long, default_value = "config/default.toml")]
        config: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env의 값은 설정 환경 변수 오버라이드로 쓰임
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, output } => {
            if let Err(e) = commands::run::run_screen(&config, output.as_deref()).await {
                error!(error = %e, "파이프라인 실행 실패");
                return Err(e);
            }
        }

        Commands::Download {
            symbol,
            from,
            to,
            asset_class,
            output,
        } => {
            // run과 달리 설정 파일이 없으므로 환경 변수로 초기화
            minervini_core::init_logging_from_env().context("로깅 초기화 실패")?;

            let config = commands::download::DownloadConfig::parse_args(
                &symbol,
                &from,
                &to,
                &asset_class,
                &output,
            )?;

            match commands::download::download_history(config).await {
                Ok(count) => {
                    println!("\n다운로드 완료: {} 봉", count);
                }
                Err(e) => {
                    error!(error = %e, "다운로드 실패");
                    return Err(e);
                }
            }
        }

        Commands::List { config } => {
            minervini_core::init_logging_from_env().context("로깅 초기화 실패")?;
            commands::list::print_universe(&config)?;
        }
    }

    Ok(())
}
