//! ローカル実行
//!
//! 開発環境ではPythonスクレイパーをサブプロセスとして起動し、
//! 書き出された `portfolio_companies.csv` を読み込む

mod scraper;

pub use scraper::LocalScraper;
