//! Webサーバー
//!
//! 入力フォームと `/api/scrape` ゲートウェイを提供する

pub mod error;
pub mod handlers;
pub mod state;

use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::service::ScraperService;
use crate::settings::Settings;

pub use error::ApiError;
pub use state::AppState;

/// ルーターを作成
pub fn create_router(state: AppState, origins: Option<&[String]>) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/api/scrape", post(handlers::scrape))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(origins))
        .with_state(state)
}

/// None なら全オリジン許可
fn cors_layer(origins: Option<&[String]>) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    let Some(origins) = origins else {
        return layer.allow_origin(Any);
    };

    let values: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(values))
}

/// サーバーを起動
pub async fn run_server(settings: &Settings) -> anyhow::Result<()> {
    let scraper_config = settings.scraper_config();
    if scraper_config.uses_remote() && scraper_config.python_api_url.is_none() {
        warn!("Remote mode selected but PYTHON_API_URL is not set; every scrape will fail");
    }

    let service = ScraperService::new(&scraper_config);
    info!(
        "Scrape strategy: {} (timeout: {:?})",
        service.strategy_name(),
        scraper_config.timeout
    );

    let origins = settings.server.origins();
    let app = create_router(AppState::new(service), origins.as_deref());

    let addr = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Web server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
