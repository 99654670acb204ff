use crate::service::ScraperService;

/// ハンドラ間で共有する状態
#[derive(Clone)]
pub struct AppState {
    pub service: ScraperService,
}

impl AppState {
    pub fn new(service: ScraperService) -> Self {
        Self { service }
    }
}
