use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tower::Service;
use tracing::{error, info};

use crate::config::ScraperConfig;
use crate::error::ScraperError;
use crate::local::LocalScraper;
use crate::remote::RemoteScraper;
use crate::traits::Scraper;

/// スクレイピングリクエスト
#[derive(Debug, Clone, Serialize)]
pub struct ScrapeRequest {
    pub url: String,
}

impl ScrapeRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// リクエストボディの `url` 値から作成する
    ///
    /// 未指定・null・空文字・false・0 は未指定扱い。検証はそれ以上しない
    /// （空白のみの文字列もそのまま渡す）。文字列以外の値は文字列化する
    pub fn from_json(url: Option<Value>) -> Result<Self, ScraperError> {
        let url = match url {
            None | Some(Value::Null) | Some(Value::Bool(false)) => None,
            Some(Value::String(s)) => Some(s).filter(|s| !s.is_empty()),
            Some(Value::Number(n)) => Some(n.to_string()).filter(|_| n.as_f64() != Some(0.0)),
            Some(other) => Some(other.to_string()),
        };
        url.map(Self::new).ok_or(ScraperError::MissingUrl)
    }
}

/// スクレイピング結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeResult {
    pub csv_content: Vec<u8>,
}

impl ScrapeResult {
    pub fn new(csv_content: Vec<u8>) -> Self {
        Self { csv_content }
    }

    pub fn len(&self) -> usize {
        self.csv_content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.csv_content.is_empty()
    }
}

/// 実行戦略（起動時に一度だけ決定する）
pub enum ScrapeStrategy {
    Remote(RemoteScraper),
    Local(LocalScraper),
}

impl ScrapeStrategy {
    pub fn from_config(config: &ScraperConfig) -> Self {
        if config.uses_remote() {
            ScrapeStrategy::Remote(RemoteScraper::new(config))
        } else {
            ScrapeStrategy::Local(LocalScraper::new(config.clone()))
        }
    }

    fn inner(&self) -> &dyn Scraper {
        match self {
            ScrapeStrategy::Remote(scraper) => scraper,
            ScrapeStrategy::Local(scraper) => scraper,
        }
    }
}

#[async_trait]
impl Scraper for ScrapeStrategy {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    async fn execute(&self, request: &ScrapeRequest) -> Result<ScrapeResult, ScraperError> {
        self.inner().execute(request).await
    }
}

/// tower::Serviceを実装したスクレイパーサービス
#[derive(Clone)]
pub struct ScraperService {
    strategy: Arc<dyn Scraper>,
    timeout: Option<Duration>,
}

impl ScraperService {
    pub fn new(config: &ScraperConfig) -> Self {
        let service = Self::with_scraper(Arc::new(ScrapeStrategy::from_config(config)));
        match config.timeout {
            Some(timeout) => service.with_timeout(timeout),
            None => service,
        }
    }

    pub fn with_scraper(strategy: Arc<dyn Scraper>) -> Self {
        Self {
            strategy,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    async fn run(
        strategy: Arc<dyn Scraper>,
        timeout: Option<Duration>,
        req: ScrapeRequest,
    ) -> Result<ScrapeResult, ScraperError> {
        let Some(limit) = timeout else {
            return strategy.execute(&req).await;
        };

        // タイムアウト時はfutureがドロップされ、子プロセスも終了する
        tokio::time::timeout(limit, strategy.execute(&req))
            .await
            .map_err(|_| ScraperError::Timeout(limit))?
    }
}

impl Service<ScrapeRequest> for ScraperService {
    type Response = ScrapeResult;
    type Error = ScraperError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: ScrapeRequest) -> Self::Future {
        let strategy = Arc::clone(&self.strategy);
        let timeout = self.timeout;

        info!(
            "スクレイピングリクエスト受信: url={}, strategy={}",
            req.url,
            strategy.name()
        );

        Box::pin(async move {
            let url = req.url.clone();
            match Self::run(strategy, timeout, req).await {
                Ok(result) => {
                    info!("スクレイピング完了: url={}, size={}bytes", url, result.len());
                    Ok(result)
                }
                Err(e) => {
                    error!("スクレイピング失敗: url={}, error={}", url, e);
                    Err(e)
                }
            }
        })
    }
}
