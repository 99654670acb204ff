use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// 出力CSVのファイル名（ダウンロード時のファイル名と共通）
pub const OUTPUT_FILE_NAME: &str = "portfolio_companies.csv";

/// デプロイモード
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeploymentMode {
    /// ベースURLが設定されていればリモート、なければローカル
    #[default]
    Auto,
    /// 常にリモートAPIへ委譲
    Production,
    /// 常にローカルのPythonプロセスを起動
    Development,
}

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub mode: DeploymentMode,
    /// リモートAPIのベースURL (PYTHON_API_URL)
    pub python_api_url: Option<String>,
    pub python_bin: PathBuf,
    pub script_path: PathBuf,
    /// サーバーの作業ディレクトリ
    pub work_dir: PathBuf,
    pub output_file: String,
    /// None の場合は無制限に待つ
    pub timeout: Option<Duration>,
    /// リクエストごとに専用ディレクトリでプロセスを実行する
    pub isolate_runs: bool,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            mode: DeploymentMode::Auto,
            python_api_url: None,
            python_bin: PathBuf::from(".venv/bin/python"),
            script_path: PathBuf::from("vc_scraper.py"),
            work_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            output_file: OUTPUT_FILE_NAME.to_string(),
            timeout: None,
            isolate_runs: true,
        }
    }
}

impl ScraperConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mut self, mode: DeploymentMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_python_api_url(mut self, url: impl Into<String>) -> Self {
        self.python_api_url = Some(url.into());
        self
    }

    pub fn with_python_bin(mut self, bin: impl Into<PathBuf>) -> Self {
        self.python_bin = bin.into();
        self
    }

    pub fn with_script_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.script_path = path.into();
        self
    }

    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }

    pub fn with_output_file(mut self, name: impl Into<String>) -> Self {
        self.output_file = name.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_isolated_runs(mut self, isolate: bool) -> Self {
        self.isolate_runs = isolate;
        self
    }

    /// リモート委譲を使うかどうか
    pub fn uses_remote(&self) -> bool {
        match self.mode {
            DeploymentMode::Auto => self
                .python_api_url
                .as_deref()
                .is_some_and(|url| !url.trim().is_empty()),
            DeploymentMode::Production => true,
            DeploymentMode::Development => false,
        }
    }
}
