//! リモートAPI委譲
//!
//! 本番環境ではPython APIの `/scrape` にURLを転送し、CSVをそのまま返す

mod scraper;

pub use scraper::RemoteScraper;
