use thiserror::Error;

/// 出力CSVが得られなかった場合のメッセージ
pub const NO_DATA_MESSAGE: &str = "No data was scraped";

#[derive(Error, Debug)]
pub enum ScraperError {
    /// URL未指定（クライアントエラー）
    #[error("URL is required")]
    MissingUrl,

    /// リクエストボディがJSONとして読めない
    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    /// 設定エラー
    #[error("{0}")]
    Config(String),

    /// リモートAPIが非2xxを返した
    #[error("API Error: {0}")]
    Upstream(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Pythonプロセスが非ゼロ終了
    #[error("Python process exited with code {}\nError: {}", exit_code_label(.code), .stderr)]
    ProcessFailed { code: Option<i32>, stderr: String },

    /// プロセス起動失敗
    #[error("Failed to start scraper process: {0}")]
    Spawn(std::io::Error),

    /// 正常終了したが出力ファイルがない
    #[error("{}", NO_DATA_MESSAGE)]
    NoData,

    #[error("Scrape timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("File I/O error: {0}")]
    FileIO(#[from] std::io::Error),
}

impl ScraperError {
    /// クライアント起因のエラーか
    pub fn is_client_error(&self) -> bool {
        matches!(self, ScraperError::MissingUrl)
    }
}

// シグナル終了時は終了コードがない
fn exit_code_label(code: &Option<i32>) -> String {
    code.map(|c| c.to_string())
        .unwrap_or_else(|| "null".to_string())
}
