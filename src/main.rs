use clap::Parser;
use finler::cli::{Cli, run};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    finler::logging::init_tracing();
    run(Cli::parse()).await
}
