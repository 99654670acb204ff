#![allow(dead_code)]

use std::path::Path;

use axum_test::TestServer;
use vc_scrape_gateway::server::{create_router, AppState};
use vc_scrape_gateway::{ScraperConfig, ScraperService};

pub fn test_server(config: &ScraperConfig) -> TestServer {
    let app = create_router(AppState::new(ScraperService::new(config)), None);
    TestServer::new(app).expect("Failed to start test server")
}

/// `sh` で実行するスクレイパースクリプトを作業ディレクトリに置く
pub fn local_config(work_dir: &Path, script: &str) -> ScraperConfig {
    std::fs::write(work_dir.join("scraper.sh"), script).expect("Failed to write script");

    ScraperConfig::new()
        .with_python_bin("sh")
        .with_script_path("scraper.sh")
        .with_work_dir(work_dir)
}

pub const WRITE_CSV_SCRIPT: &str = r#"
echo "scraping $1"
printf 'Company,URL\nAcme,%s\n' "$1" > portfolio_companies.csv
"#;
