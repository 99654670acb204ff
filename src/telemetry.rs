use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// RUST_LOG が未設定なら info（このクレートは debug）
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,vc_scrape_gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
