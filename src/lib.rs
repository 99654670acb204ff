//! VCポートフォリオスクレイパーのゲートウェイ
//!
//! - URLを受け取り、外部のPythonスクレイパーでCSVを生成して返す
//! - 開発環境: ローカルでPythonプロセスを起動（`LocalScraper`）
//! - 本番環境: `PYTHON_API_URL` のAPIへ委譲（`RemoteScraper`）
//!
//! # 使用例
//!
//! ```rust,ignore
//! use tower::ServiceExt;
//! use vc_scrape_gateway::{ScrapeRequest, ScraperConfig, ScraperService};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ScraperConfig::new().with_python_api_url("http://localhost:5000");
//!     let service = ScraperService::new(&config);
//!
//!     let result = service
//!         .oneshot(ScrapeRequest::new("https://vc.example/portfolio"))
//!         .await
//!         .unwrap();
//!     println!("CSV: {}bytes", result.csv_content.len());
//! }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod local;
pub mod remote;
pub mod server;
pub mod service;
pub mod settings;
pub mod telemetry;
pub mod traits;

// 主要な型をリエクスポート
pub use client::SubmissionForm;
pub use config::{DeploymentMode, ScraperConfig, OUTPUT_FILE_NAME};
pub use error::ScraperError;
pub use local::LocalScraper;
pub use remote::RemoteScraper;
pub use service::{ScrapeRequest, ScrapeResult, ScrapeStrategy, ScraperService};
pub use settings::Settings;
pub use traits::Scraper;
