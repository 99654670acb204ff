use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::config::ScraperConfig;
use crate::error::ScraperError;
use crate::service::{ScrapeRequest, ScrapeResult};
use crate::traits::Scraper;

const RUN_DIR_PREFIX: &str = "vc-scrape-";

pub struct LocalScraper {
    config: ScraperConfig,
}

impl LocalScraper {
    /// 作業ディレクトリは起動時のカレントディレクトリ基準で絶対パスにしておく
    pub fn new(mut config: ScraperConfig) -> Self {
        match std::path::absolute(&config.work_dir) {
            Ok(dir) => config.work_dir = dir,
            Err(e) => warn!("Failed to resolve work dir {:?}: {}", config.work_dir, e),
        }
        Self { config }
    }

    pub fn work_dir(&self) -> &Path {
        &self.config.work_dir
    }

    /// 作業ディレクトリ基準で解決したスクリプトパス
    pub fn script_path(&self) -> PathBuf {
        resolve_against(&self.config.work_dir, &self.config.script_path)
    }

    /// インタプリタのパス
    ///
    /// `python3` のような裸のコマンド名はPATH検索に任せる
    pub fn python_bin(&self) -> PathBuf {
        let bin = &self.config.python_bin;
        let has_dir = bin.parent().is_some_and(|p| !p.as_os_str().is_empty());
        if has_dir {
            resolve_against(&self.config.work_dir, bin)
        } else {
            bin.clone()
        }
    }

    async fn prepare_run_dir(&self) -> Result<RunDir, ScraperError> {
        if !self.config.isolate_runs {
            return Ok(RunDir::Shared(self.config.work_dir.clone()));
        }

        let dir = tokio::task::spawn_blocking(|| {
            tempfile::Builder::new().prefix(RUN_DIR_PREFIX).tempdir()
        })
        .await
        .map_err(|e| ScraperError::FileIO(std::io::Error::other(e)))??;
        debug!("Created run directory: {:?}", dir.path());

        Ok(RunDir::Isolated(dir))
    }

    /// プロセスを起動して終了を待つ
    async fn run_process(&self, url: &str, cwd: &Path) -> Result<(), ScraperError> {
        let bin = self.python_bin();
        let script = self.script_path();
        info!("Spawning {:?} {:?} in {:?}", bin, script, cwd);

        let mut child = Command::new(&bin)
            .arg(&script)
            .arg(url)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // リクエストが破棄されたら子プロセスも終了させる
            .kill_on_drop(true)
            .spawn()
            .map_err(ScraperError::Spawn)?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let stdout_task = async move {
            if let Some(out) = stdout {
                drain_lines(out, |chunk| info!("Python output: {}", trim_line(chunk))).await;
            }
        };

        // エラーメッセージには改行コードも含めてそのまま残す
        let stderr_task = async move {
            let mut collected = String::new();
            if let Some(err) = stderr {
                drain_lines(err, |chunk| {
                    warn!("Python error: {}", trim_line(chunk));
                    collected.push_str(chunk);
                })
                .await;
            }
            collected
        };

        let ((), error_output) = futures::future::join(stdout_task, stderr_task).await;

        let status = child.wait().await?;
        info!("Python process exited with code: {:?}", status.code());

        if !status.success() {
            return Err(ScraperError::ProcessFailed {
                code: status.code(),
                stderr: error_output,
            });
        }

        Ok(())
    }

    async fn read_output(&self, dir: &Path) -> Result<Vec<u8>, ScraperError> {
        let csv_path = dir.join(&self.config.output_file);
        match tokio::fs::read(&csv_path).await {
            Ok(content) => {
                info!("CSVファイル読み込み: {:?}, size={}bytes", csv_path, content.len());
                Ok(content)
            }
            Err(e) => {
                warn!("Error reading CSV file {:?}: {}", csv_path, e);
                Err(ScraperError::NoData)
            }
        }
    }
}

#[async_trait]
impl Scraper for LocalScraper {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn execute(&self, request: &ScrapeRequest) -> Result<ScrapeResult, ScraperError> {
        let run_dir = self.prepare_run_dir().await?;

        let outcome = match self.run_process(&request.url, run_dir.path()).await {
            Ok(()) => self.read_output(run_dir.path()).await,
            Err(e) => Err(e),
        };
        run_dir.close().await;

        outcome.map(ScrapeResult::new)
    }
}

/// 1回の実行で使う作業ディレクトリ
///
/// `Isolated` はタイムアウトや切断でドロップされた場合も `TempDir` が削除する
enum RunDir {
    Shared(PathBuf),
    Isolated(TempDir),
}

impl RunDir {
    fn path(&self) -> &Path {
        match self {
            RunDir::Shared(path) => path,
            RunDir::Isolated(dir) => dir.path(),
        }
    }

    async fn close(self) {
        let RunDir::Isolated(dir) = self else {
            return;
        };

        let path = dir.path().to_path_buf();
        match tokio::task::spawn_blocking(move || dir.close()).await {
            Ok(Ok(())) => debug!("Removed run directory: {:?}", path),
            Ok(Err(e)) => warn!("Failed to remove run directory {:?}: {}", path, e),
            Err(e) => warn!("Run directory cleanup task failed {:?}: {}", path, e),
        }
    }
}

fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn trim_line(chunk: &str) -> &str {
    chunk.trim_end_matches(['\r', '\n'])
}

/// 行単位で読み出す（改行コードは付けたまま渡す）
///
/// UTF-8でない出力も読み捨てずにlossy変換する
async fn drain_lines<R, F>(reader: R, mut on_chunk: F)
where
    R: AsyncRead + Unpin,
    F: FnMut(&str),
{
    let mut reader = BufReader::new(reader);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => on_chunk(&*String::from_utf8_lossy(&buf)),
            Err(e) => {
                debug!("Pipe read error: {}", e);
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script_scraper(work_dir: &Path, script: &str) -> LocalScraper {
        std::fs::write(work_dir.join("scraper.sh"), script).unwrap();
        LocalScraper::new(
            ScraperConfig::new()
                .with_python_bin("sh")
                .with_script_path("scraper.sh")
                .with_work_dir(work_dir),
        )
    }

    #[test]
    fn test_paths_resolve_against_work_dir() {
        let config = ScraperConfig::new().with_work_dir("/srv/app");
        let scraper = LocalScraper::new(config);

        assert_eq!(scraper.script_path(), PathBuf::from("/srv/app/vc_scraper.py"));
        assert_eq!(scraper.python_bin(), PathBuf::from("/srv/app/.venv/bin/python"));
    }

    #[test]
    fn test_relative_work_dir_becomes_absolute() {
        let scraper = LocalScraper::new(ScraperConfig::new().with_work_dir("app"));
        let cwd = std::env::current_dir().unwrap();

        assert!(scraper.work_dir().is_absolute());
        assert_eq!(scraper.script_path(), cwd.join("app").join("vc_scraper.py"));
        assert_eq!(
            scraper.python_bin(),
            cwd.join("app").join(".venv/bin/python")
        );
    }

    #[test]
    fn test_bare_interpreter_uses_path_lookup() {
        let config = ScraperConfig::new()
            .with_work_dir("/srv/app")
            .with_python_bin("python3")
            .with_script_path("/opt/scraper/run.py");
        let scraper = LocalScraper::new(config);

        assert_eq!(scraper.python_bin(), PathBuf::from("python3"));
        assert_eq!(scraper.script_path(), PathBuf::from("/opt/scraper/run.py"));
    }

    #[tokio::test]
    async fn test_isolated_run_dir_is_removed_on_close() {
        let scraper = LocalScraper::new(ScraperConfig::new());
        let run_dir = scraper.prepare_run_dir().await.unwrap();
        let path = run_dir.path().to_path_buf();

        assert!(path.exists());
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with(RUN_DIR_PREFIX));

        run_dir.close().await;
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_shared_run_dir_is_work_dir() {
        let dir = tempfile::tempdir().unwrap();
        let scraper = LocalScraper::new(
            ScraperConfig::new()
                .with_work_dir(dir.path())
                .with_isolated_runs(false),
        );
        let run_dir = scraper.prepare_run_dir().await.unwrap();
        assert_eq!(run_dir.path(), dir.path());

        run_dir.close().await;
        assert!(dir.path().exists());
    }

    #[tokio::test]
    async fn test_stderr_is_kept_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let scraper = script_scraper(dir.path(), "printf 'a\\r\\nb' >&2\nexit 1\n");

        let err = scraper
            .execute(&ScrapeRequest::new("https://vc.example"))
            .await
            .unwrap_err();

        match err {
            ScraperError::ProcessFailed { code, stderr } => {
                assert_eq!(code, Some(1));
                assert_eq!(stderr, "a\r\nb");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_drain_lines_handles_invalid_utf8() {
        let input: &[u8] = b"first\nsec\xffond\r\nlast";
        let mut chunks = Vec::new();
        drain_lines(input, |chunk| chunks.push(chunk.to_string())).await;

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0], "first\n");
        assert!(chunks[1].starts_with("sec"));
        assert!(chunks[1].ends_with("ond\r\n"));
        assert_eq!(chunks[2], "last");
        assert_eq!(trim_line(&chunks[1]), chunks[1].trim_end());
    }
}
