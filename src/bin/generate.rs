use std::path::PathBuf;

use clap::Parser;
use finresearch::generate::generate_static_data;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "generate", about = "Build the static article snapshot served by the API")]
struct Args {
    /// Directory holding all_complete_articles.json and individual/
    #[arg(long, env = "SOURCE_DIR", default_value = "finance_articles")]
    source: PathBuf,

    /// Output directory for articles.json, articles/, search-index.json and categories.json
    #[arg(long, env = "DATA_DIR", default_value = finresearch::config::DEFAULT_DATA_DIR)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let _ = dotenvy::dotenv();
    let args = Args::parse();

    info!("Generating static data from {}", args.source.display());
    match generate_static_data(&args.source, &args.out) {
        Ok(report) => {
            info!(
                articles = report.articles,
                individual_files = report.individual_files,
                categories = report.categories,
                "Static data written to {}",
                args.out.display()
            );
            Ok(())
        }
        Err(e) => {
            error!("Static data generation failed: {:#}", e);
            Err(e)
        }
    }
}
