//! 設定の読み込み
//!
//! デフォルト値 → `config/default` → `config/{APP_ENVIRONMENT}` →
//! `SCRAPE_GATEWAY__*` 環境変数 の順に上書きし、最後に既存の環境変数
//! (`PYTHON_API_URL`, `PORT`, `ALLOWED_ORIGINS`) を反映する。

use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::config::{DeploymentMode, ScraperConfig, OUTPUT_FILE_NAME};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub scraper: ScraperSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// カンマ区切り。`*` は全許可
    pub allowed_origins: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScraperSettings {
    pub mode: DeploymentMode,
    pub python_api_url: Option<String>,
    pub python_bin: String,
    pub script_path: String,
    /// 未指定ならプロセスのカレントディレクトリ
    pub work_dir: Option<String>,
    pub output_file: String,
    /// 未指定なら無制限
    pub timeout_secs: Option<u64>,
    pub isolate_runs: bool,
}

impl Settings {
    /// 環境変数と設定ファイルから読み込む
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());

        Self::builder()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("SCRAPE_GATEWAY").separator("__"))
            .set_override_option("scraper.python_api_url", std::env::var("PYTHON_API_URL").ok())?
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .set_override_option("server.allowed_origins", std::env::var("ALLOWED_ORIGINS").ok())?
            .build()?
            .try_deserialize()
    }

    /// デフォルト値のみ（テスト用の土台にもなる）
    pub fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .set_default("server.allowed_origins", "*")?
            .set_default("scraper.mode", "auto")?
            .set_default("scraper.python_bin", ".venv/bin/python")?
            .set_default("scraper.script_path", "vc_scraper.py")?
            .set_default("scraper.output_file", OUTPUT_FILE_NAME)?
            .set_default("scraper.isolate_runs", true)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// リクエスト処理に渡す解決済みの設定
    pub fn scraper_config(&self) -> ScraperConfig {
        let s = &self.scraper;
        let mut config = ScraperConfig::new()
            .with_mode(s.mode)
            .with_python_bin(&s.python_bin)
            .with_script_path(&s.script_path)
            .with_output_file(&s.output_file)
            .with_isolated_runs(s.isolate_runs);

        if let Some(url) = s.python_api_url.as_deref().filter(|u| !u.trim().is_empty()) {
            config = config.with_python_api_url(url);
        }
        if let Some(dir) = &s.work_dir {
            config = config.with_work_dir(PathBuf::from(dir));
        }
        if let Some(secs) = s.timeout_secs.filter(|secs| *secs > 0) {
            config = config.with_timeout(Duration::from_secs(secs));
        }

        config
    }
}

impl ServerSettings {
    /// `*` の場合は None（全オリジン許可）
    pub fn origins(&self) -> Option<Vec<String>> {
        let origins: Vec<String> = self
            .allowed_origins
            .split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();

        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            None
        } else {
            Some(origins)
        }
    }
}
