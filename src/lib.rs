pub mod assets;
pub mod config;
pub mod contract;
pub mod convert;
pub mod emit;
pub mod load_config;
pub mod notion;
pub mod slug;
pub mod synchronise;
pub mod walker;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use assets::AssetStore;
use load_config::load_config;
use notion::NotionClient;
use synchronise::synchronise;

#[derive(Parser)]
#[clap(
    name = "notion-sync",
    version,
    about = "Mirror a Notion page tree into markdown files with frontmatter for a static site generator"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Re-export the configured page tree into the content directory
    Sync {
        /// Optional key=value file loaded into the environment before config
        /// resolution (defaults to ./.env when present)
        #[clap(long)]
        env_file: Option<PathBuf>,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Sync { env_file } => {
            match env_file {
                Some(path) => {
                    dotenvy::from_path(&path)
                        .map_err(|e| anyhow::anyhow!("Failed to load env file {:?}: {e}", path))?;
                }
                // Missing default .env is fine; existing env vars are used.
                None => {
                    dotenvy::dotenv().ok();
                }
            }

            let config = load_config()?;
            let source = NotionClient::new(&config.token)
                .map_err(|e| anyhow::anyhow!("Failed to build Notion client: {e}"))?;
            let fetcher = AssetStore::new(
                config.images_dir.clone(),
                config.published_image_base.clone(),
            )
            .map_err(|e| anyhow::anyhow!("Failed to build asset store: {e}"))?;

            println!("Starting Notion sync...");
            match synchronise(&config, &source, &fetcher).await {
                Ok(report) => {
                    println!(
                        "Successfully processed {} of {} pages ({} skipped)",
                        report.written.len(),
                        report.total_pages,
                        report.skipped
                    );
                    if report.changed {
                        println!("Changes detected");
                    } else {
                        println!("No changes detected");
                    }
                    Ok(())
                }
                Err(e) => {
                    eprintln!("[ERROR] Sync failed: {}", e);
                    Err(anyhow::Error::msg(e))
                }
            }
        }
    }
}
