use clap::Parser;
use tracing::{error, Level};

use etl::{
    cli::{run_aggregate, run_ingest, run_migrate, Cli, Commands},
    error::Error,
};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let result = app_main().await;

    if let Err(err) = &result {
        error!("{}", err);
    }

    result
}

async fn app_main() -> Result<(), Error> {
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_level(true)
        .with_max_level({
            #[cfg(debug_assertions)]
            {
                Level::DEBUG
            }

            #[cfg(not(debug_assertions))]
            {
                Level::INFO
            }
        })
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Migrate => run_migrate().await,
        Commands::Ingest { height, hashes } => run_ingest(height, hashes).await,
        Commands::Aggregate { timestamp } => run_aggregate(timestamp).await,
    }
}
