use clap::Parser;
use track_datum::cli::{run, Cli};
use track_datum::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli).await
}
