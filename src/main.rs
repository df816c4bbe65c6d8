use clap::Parser;
use notion_sync::{run, Cli};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    // Exit codes: 0 on a completed run (individual page failures included),
    // 1 for missing configuration or any unrecovered error.
    match run(cli).await {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Fatal error: {e}");
            std::process::exit(1);
        }
    }
}
