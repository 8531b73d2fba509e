use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use market_data_ingestor::providers::yahoo::YahooProvider;
use price_loader::config::{LoaderArgs, LoaderConfig, StoreTarget};
use price_loader::db::{connection, migrate};
use price_loader::pipeline::Pipeline;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(version, about = "Load a year of daily prices into stock_prices")]
struct Cli {
    /// Symbols to load; falls back to STOCK_SYMBOLS when omitted
    #[arg(value_name = "SYMBOLS")]
    symbols: Vec<String>,

    /// Apply the embedded migrations before loading
    #[arg(long)]
    migrate: bool,

    /// Store prices as traded instead of dividend/split adjusted
    #[arg(long)]
    raw: bool,

    /// Load into this SQLite file instead of PostgreSQL
    #[arg(long, value_name = "PATH")]
    sqlite: Option<PathBuf>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let migrate = cli.migrate;
    let config = LoaderConfig::from_env(LoaderArgs {
        symbols: cli.symbols,
        sqlite: cli.sqlite,
        raw: cli.raw,
    })?;

    let provider = YahooProvider::new()?;

    let report = match &config.store {
        StoreTarget::Postgres(db) => {
            let mut conn = connection::connect_postgres(db)?;
            info!(store = %db.display_target(), "Connected");
            if migrate {
                let applied = migrate::run_pending(&mut conn)?;
                info!(applied, "Migrations applied");
            }
            let mut pipeline = Pipeline::new(&provider, &mut conn, config.provider_params.clone());
            pipeline.run(&config.symbols).await
        }
        StoreTarget::Sqlite(path) => {
            let path = path
                .to_str()
                .with_context(|| format!("SQLite path {} is not valid UTF-8", path.display()))?;
            let mut conn = connection::connect_sqlite(path)?;
            info!(path, "Connected");
            if migrate {
                let applied = migrate::run_pending(&mut conn)?;
                info!(applied, "Migrations applied");
            }
            let mut pipeline = Pipeline::new(&provider, &mut conn, config.provider_params.clone());
            pipeline.run(&config.symbols).await
        }
    };

    println!("{report}");
    Ok(())
}
