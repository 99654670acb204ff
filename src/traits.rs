use async_trait::async_trait;

use crate::error::ScraperError;
use crate::service::{ScrapeRequest, ScrapeResult};

#[async_trait]
pub trait Scraper: Send + Sync {
    /// ログ用の実行戦略名
    fn name(&self) -> &'static str;

    /// URLを1件スクレイピングしてCSVを返す
    async fn execute(&self, request: &ScrapeRequest) -> Result<ScrapeResult, ScraperError>;
}
