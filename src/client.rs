//! ゲートウェイのクライアント
//!
//! ブラウザの入力フォームと同じ状態遷移（loading / error / result）を持ち、
//! 結果を `portfolio_companies.csv` として保存する。

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::OUTPUT_FILE_NAME;
use crate::error::ScraperError;
use crate::service::ScrapeRequest;

/// 非2xx応答時に表示するメッセージ
pub const FAILED_MESSAGE: &str = "Failed to scrape data";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub loading: bool,
    pub error: Option<String>,
    pub csv_data: Option<String>,
}

pub struct SubmissionForm {
    endpoint: String,
    client: reqwest::Client,
    state: FormState,
}

impl SubmissionForm {
    pub fn new(gateway_url: &str) -> Self {
        Self {
            endpoint: format!("{}/api/scrape", gateway_url.trim_end_matches('/')),
            client: reqwest::Client::new(),
            state: FormState::default(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    /// 結果があり、エラーがないときだけダウンロードできる
    pub fn can_download(&self) -> bool {
        self.state.csv_data.is_some() && self.state.error.is_none()
    }

    /// 1回送信する。リトライはしない
    pub async fn submit(&mut self, url: &str) {
        self.state = FormState {
            loading: true,
            error: None,
            csv_data: None,
        };

        match self.request(url).await {
            Ok(text) => self.state.csv_data = Some(text),
            Err(message) => self.state.error = Some(message),
        }

        self.state.loading = false;
    }

    async fn request(&self, url: &str) -> Result<String, String> {
        debug!("POST {} url={}", self.endpoint, url);

        let response = self
            .client
            .post(&self.endpoint)
            .json(&ScrapeRequest::new(url))
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(FAILED_MESSAGE.to_string());
        }

        response.text().await.map_err(|e| e.to_string())
    }

    /// `dir/portfolio_companies.csv` に保存する。保存対象がなければ None
    pub async fn download(&self, dir: &Path) -> Result<Option<PathBuf>, ScraperError> {
        if !self.can_download() {
            return Ok(None);
        }
        let Some(csv) = self.state.csv_data.as_deref() else {
            return Ok(None);
        };

        let path = dir.join(OUTPUT_FILE_NAME);
        tokio::fs::write(&path, csv).await?;
        info!("CSV saved: {:?}", path);

        Ok(Some(path))
    }
}
