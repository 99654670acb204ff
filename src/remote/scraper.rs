use async_trait::async_trait;
use tracing::{debug, error, info};

use crate::config::ScraperConfig;
use crate::error::ScraperError;
use crate::service::{ScrapeRequest, ScrapeResult};
use crate::traits::Scraper;

const SCRAPE_PATH: &str = "/scrape";

pub struct RemoteScraper {
    base_url: Option<String>,
    client: reqwest::Client,
}

impl RemoteScraper {
    pub fn new(config: &ScraperConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    pub fn with_client(config: &ScraperConfig, client: reqwest::Client) -> Self {
        let base_url = config
            .python_api_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(|url| url.trim_end_matches('/').to_string());

        Self { base_url, client }
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// `{PYTHON_API_URL}/scrape`
    fn endpoint(&self) -> Result<String, ScraperError> {
        let base = self.base_url.as_deref().ok_or_else(|| {
            ScraperError::Config("PYTHON_API_URL environment variable is not set".into())
        })?;
        Ok(format!("{}{}", base, SCRAPE_PATH))
    }
}

#[async_trait]
impl Scraper for RemoteScraper {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn execute(&self, request: &ScrapeRequest) -> Result<ScrapeResult, ScraperError> {
        let endpoint = self.endpoint()?;
        info!("Calling API URL: {}", endpoint);

        let response = self.client.post(&endpoint).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            error!("API Error ({}): {}", status, body);
            return Err(ScraperError::Upstream(body));
        }

        // CSVはバイト列のまま返す（再エンコードしない）
        let body = response.bytes().await?;
        debug!("API response received: {}bytes", body.len());

        Ok(ScrapeResult::new(body.to_vec()))
    }
}
