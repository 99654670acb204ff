//! ゲートウェイにURLを送信し、結果のCSVを保存するCLI

use std::path::PathBuf;

use anyhow::bail;
use clap::Parser;

use vc_scrape_gateway::client::SubmissionForm;
use vc_scrape_gateway::telemetry;

#[derive(Parser, Debug)]
#[command(name = "scrape", about = "Scrape a VC portfolio page into portfolio_companies.csv")]
struct Args {
    /// VC portfolio URL
    url: String,

    /// Gateway base URL
    #[arg(long, env = "SCRAPE_GATEWAY_URL", default_value = "http://127.0.0.1:3000")]
    gateway: String,

    /// Directory the CSV is written to
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing();
    let args = Args::parse();

    let mut form = SubmissionForm::new(&args.gateway);
    println!("Scraping {} ...", args.url);
    form.submit(&args.url).await;

    if let Some(error) = &form.state().error {
        bail!("{}", error);
    }

    match form.download(&args.out_dir).await? {
        Some(path) => println!("成功! CSV保存先: {}", path.display()),
        None => bail!("No CSV data returned"),
    }

    Ok(())
}
