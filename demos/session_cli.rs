//! 로그인 후 추천/인기 영화 목록을 JSON으로 출력하는 CLI 예제
//!
//! 사용법:
//! ```bash
//! cargo run --example session_cli -- <username> <password> [count]
//! ```
//!
//! 예시:
//! ```bash
//! FLIXWIRE_PORT=8080 FLIXWIRE_LOG=debug cargo run --example session_cli -- alice secret1 10
//! ```

use std::env;

use flixwire::{ClientConfig, PopularMovie, Recommendations, Reply, Session};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// JSON 출력용 데이터 구조
#[derive(Debug, Serialize)]
struct OutputData {
    /// 성공 여부
    success: bool,
    /// 메시지 (에러 시 에러 메시지)
    message: String,
    user_id: Option<i32>,
    recommendations: Option<Recommendations>,
    popular: Vec<PopularMovie>,
}

impl OutputData {
    fn failure(message: String) -> Self {
        Self {
            success: false,
            message,
            user_id: None,
            recommendations: None,
            popular: Vec::new(),
        }
    }
}

fn print_usage() {
    eprintln!("영화 추천 세션 CLI");
    eprintln!();
    eprintln!("사용법:");
    eprintln!("  cargo run --example session_cli -- <username> <password> [count]");
    eprintln!();
    eprintln!("인자:");
    eprintln!("  username - 사용자명");
    eprintln!("  password - 비밀번호");
    eprintln!("  count    - 추천 개수 (1~20, 기본 10)");
    eprintln!();
    eprintln!("환경 변수: FLIXWIRE_HOST, FLIXWIRE_PORT, FLIXWIRE_LOG 등 (.env 지원)");
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("FLIXWIRE_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    if !(3..=4).contains(&args.len()) {
        print_usage();
        std::process::exit(1);
    }

    let count = match args.get(3).map(|raw| raw.parse::<u32>()) {
        None => 10,
        Some(Ok(n)) => n,
        Some(Err(_)) => {
            print_usage();
            std::process::exit(1);
        }
    };

    let result = run_session(&args[1], &args[2], count);

    // JSON 출력
    match serde_json::to_string_pretty(&result) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("JSON 직렬화 실패: {}", e);
            std::process::exit(1);
        }
    }

    if !result.success {
        std::process::exit(1);
    }
}

fn run_session(username: &str, password: &str, count: u32) -> OutputData {
    let config = match ClientConfig::from_env() {
        Ok(c) => c,
        Err(e) => return OutputData::failure(format!("설정 로드 실패: {}", e)),
    };
    let mut session = Session::new(config);

    // 1. 로그인
    let account = match session.login(username, password) {
        Ok(Reply::Accepted(account)) => account,
        Ok(Reply::Rejected(reason)) => {
            return OutputData::failure(format!("로그인 거부: {}", reason));
        }
        Err(e) => return OutputData::failure(format!("로그인 실패: {}", e)),
    };

    // 2. 추천 (이력이 없으면 콜드 스타트)
    let recommendations = match session.recommendations_or_cold_start(count) {
        Ok(Reply::Accepted(recs)) => recs,
        Ok(Reply::Rejected(reason)) => {
            session.logout();
            return OutputData::failure(format!("추천 거부: {}", reason));
        }
        Err(e) => {
            session.logout();
            return OutputData::failure(format!("추천 조회 실패: {}", e));
        }
    };

    // 3. 인기 영화 (실패해도 추천 결과는 출력)
    let popular = match session.popular_default() {
        Ok(Reply::Accepted(movies)) => movies,
        Ok(Reply::Rejected(reason)) => {
            tracing::warn!("popular list rejected: {}", reason);
            Vec::new()
        }
        Err(e) => {
            tracing::warn!("popular list failed: {}", e);
            Vec::new()
        }
    };

    // 4. 로그아웃
    session.logout();

    let mode = match &recommendations {
        Recommendations::Personalized(_) => "개인화",
        Recommendations::ColdStart(_) => "콜드 스타트",
    };
    OutputData {
        success: true,
        message: format!(
            "조회 성공: {} 추천 {}편, 인기 영화 {}편",
            mode,
            recommendations.len(),
            popular.len()
        ),
        user_id: Some(account.user_id),
        recommendations: Some(recommendations),
        popular,
    }
}
